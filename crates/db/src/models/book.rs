//! Book entity model and DTOs.

use bookshelf_core::types::{DbId, StatusId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A live row from the `books` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    #[serde(rename = "book_name")]
    pub name: String,
    pub isbn: String,
    pub author_id: DbId,
    pub category_id: DbId,
    pub stock: i32,
    pub image: Option<String>,
    pub status: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A book joined with its author and category names for the book page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookListing {
    pub id: DbId,
    #[serde(rename = "book_name")]
    pub name: String,
    pub isbn: String,
    pub stock: i32,
    pub image: Option<String>,
    pub status: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub author_id: DbId,
    pub author_name: Option<String>,
    pub category_id: DbId,
    #[serde(rename = "book_category")]
    pub category_name: Option<String>,
}

/// Validated fields for a new book. New books always start active.
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub name: String,
    pub isbn: String,
    pub author_id: DbId,
    pub category_id: DbId,
    pub stock: i32,
    pub image: Option<String>,
}

/// Validated fields for a book update.
///
/// `image: None` keeps the stored image. Status is not part of the input;
/// it is derived from `stock`.
#[derive(Debug, Clone)]
pub struct UpdateBook {
    pub name: String,
    pub isbn: String,
    pub author_id: DbId,
    pub category_id: DbId,
    pub stock: i32,
    pub image: Option<String>,
}
