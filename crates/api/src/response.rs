//! Shared response body types for API handlers.

use bookshelf_core::types::DbId;
use serde::Serialize;

/// Confirmation body returned by every mutating endpoint.
///
/// Creation responses also carry the new row's `id`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<DbId>,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message, id: None }
    }

    pub fn created(message: &'static str, id: DbId) -> Self {
        Self {
            message,
            id: Some(id),
        }
    }
}

/// Body of the duplicate-name check.
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}
