//! Route definitions for the `/book` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::book;
use crate::state::AppState;

/// Routes mounted at `/book`.
///
/// ```text
/// GET    /                  -> page
/// GET    /{id}              -> get_by_id
/// POST   /create            -> create (multipart)
/// POST   /update/{id}       -> update (multipart)
/// POST   /delete/{id}       -> delete
/// POST   /status/{id}       -> set_status
/// POST   /check_name        -> check_name
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(book::page))
        .route("/{id}", get(book::get_by_id))
        .route("/create", post(book::create))
        .route("/update/{id}", post(book::update))
        .route("/delete/{id}", post(book::delete))
        .route("/status/{id}", post(book::set_status))
        .route("/check_name", post(book::check_name))
}
