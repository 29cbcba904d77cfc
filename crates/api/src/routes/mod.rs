pub mod author;
pub mod book;
pub mod category;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the catalog route tree.
///
/// Route hierarchy:
///
/// ```text
/// /category                          page (GET)
/// /category/create                   create (POST, JSON)
/// /category/update/{id}              update (POST, JSON)
/// /category/delete/{id}              soft delete (POST)
/// /category/status/{id}              set status (POST, JSON)
///
/// /author                            page (GET)
/// /author/create                     create (POST, JSON)
/// /author/update/{id}                update (POST, JSON)
/// /author/delete/{id}                soft delete (POST)
/// /author/status/{id}                set status (POST, JSON)
/// /author/{id}/genres                genres for the book form (GET)
///
/// /book                              page (GET)
/// /book/{id}                         detail (GET)
/// /book/create                       create (POST, multipart)
/// /book/update/{id}                  update (POST, multipart)
/// /book/delete/{id}                  soft delete (POST)
/// /book/status/{id}                  set status (POST, JSON)
/// /book/check_name                   duplicate-name check (POST, JSON)
/// ```
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .nest("/category", category::router())
        .nest("/author", author::router())
        .nest("/book", book::router())
}
