pub mod author;
pub mod book;
pub mod category;

use bookshelf_core::error::CoreError;
use bookshelf_core::status::RecordStatus;
use bookshelf_core::types::DbId;
use bookshelf_core::validation::MISSING_FIELDS;
use serde::Deserialize;

use crate::error::AppError;

/// Body of every `/{entity}/status/{id}` request.
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: Option<RecordStatus>,
}

impl StatusPayload {
    /// The requested status, restricted to the active/inactive toggle.
    pub fn into_status(self) -> Result<RecordStatus, AppError> {
        let status = self
            .status
            .ok_or_else(|| CoreError::Validation(MISSING_FIELDS.into()))?;
        Ok(status.ensure_settable()?)
    }
}

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}
