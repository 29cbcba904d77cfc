//! Route definitions for the `/author` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::author;
use crate::state::AppState;

/// Routes mounted at `/author`.
///
/// ```text
/// GET    /                  -> page
/// POST   /create            -> create
/// POST   /update/{id}       -> update
/// POST   /delete/{id}       -> delete
/// POST   /status/{id}       -> set_status
/// GET    /{id}/genres       -> genres
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(author::page))
        .route("/create", post(author::create))
        .route("/update/{id}", post(author::update))
        .route("/delete/{id}", post(author::delete))
        .route("/status/{id}", post(author::set_status))
        .route("/{id}/genres", get(author::genres))
}
