//! Route definitions for the `/category` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Routes mounted at `/category`.
///
/// ```text
/// GET    /                  -> page
/// POST   /create            -> create
/// POST   /update/{id}       -> update
/// POST   /delete/{id}       -> delete
/// POST   /status/{id}       -> set_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(category::page))
        .route("/create", post(category::create))
        .route("/update/{id}", post(category::update))
        .route("/delete/{id}", post(category::delete))
        .route("/status/{id}", post(category::set_status))
}
