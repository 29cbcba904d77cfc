//! Author entity model and DTOs.

use bookshelf_core::types::{DbId, StatusId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A live row from the `authors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Author {
    pub id: DbId,
    #[serde(rename = "author_name")]
    pub name: String,
    pub category_id: DbId,
    pub status: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An author joined with its category name, as shown on the author page.
///
/// `category_name` is `None` only if the category row is gone entirely.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuthorListing {
    pub id: DbId,
    #[serde(rename = "author_name")]
    pub name: String,
    pub category_id: DbId,
    #[serde(rename = "book_category")]
    pub category_name: Option<String>,
    pub status: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A genre offered for an author in the book form (`{id, book}`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuthorGenre {
    pub id: DbId,
    pub book: String,
}

/// Validated fields for creating or updating an author.
#[derive(Debug, Clone)]
pub struct AuthorInput {
    pub name: String,
    pub category_id: DbId,
}
