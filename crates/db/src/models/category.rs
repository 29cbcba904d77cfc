//! Category entity model and DTOs.

use bookshelf_core::types::{DbId, StatusId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A live row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    #[serde(rename = "book_category")]
    pub name: String,
    pub status: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated fields for creating or renaming a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
}
