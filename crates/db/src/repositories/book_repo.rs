//! Repository for the `books` table.

use bookshelf_core::status::RecordStatus;
use bookshelf_core::types::{DbId, StatusId};
use sqlx::PgPool;

use crate::models::book::{Book, BookListing, CreateBook, UpdateBook};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, isbn, author_id, category_id, stock, image, status, \
                       created_at, updated_at";

/// Provides CRUD operations for books.
pub struct BookRepo;

impl BookRepo {
    /// List all live books with their author and category names.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<BookListing>, sqlx::Error> {
        sqlx::query_as::<_, BookListing>(
            "SELECT b.id, b.name, b.isbn, b.stock, b.image, b.status,
                    b.created_at, b.updated_at,
                    b.author_id, a.name AS author_name,
                    b.category_id, c.name AS category_name
             FROM books b
             LEFT JOIN authors a ON a.id = b.author_id
             LEFT JOIN categories c ON c.id = b.category_id
             WHERE b.deleted_at IS NULL
             ORDER BY b.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Find a live book by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new active book, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBook) -> Result<Book, sqlx::Error> {
        let query = format!(
            "INSERT INTO books (name, isbn, author_id, category_id, stock, image, status)
             VALUES ($1, $2, $3, $4, $5, $6, 1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.name)
            .bind(&input.isbn)
            .bind(input.author_id)
            .bind(input.category_id)
            .bind(input.stock)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    /// Update a book. Returns `None` if no live row with `id` exists.
    ///
    /// The stored image is kept when `input.image` is `None`, and the status
    /// is recomputed from the new stock.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let status: StatusId = RecordStatus::for_stock(input.stock).into();
        let query = format!(
            "UPDATE books SET
                name = $2,
                isbn = $3,
                author_id = $4,
                category_id = $5,
                stock = $6,
                image = COALESCE($7, image),
                status = $8,
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.isbn)
            .bind(input.author_id)
            .bind(input.category_id)
            .bind(input.stock)
            .bind(&input.image)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a book. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE books SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the active/inactive status. Returns `true` if a row was updated.
    pub async fn set_status(pool: &PgPool, id: DbId, status: StatusId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE books SET status = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a live book other than `exclude_id` has this name (case-insensitive).
    pub async fn is_duplicate_name(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM books
                WHERE LOWER(name) = LOWER($1)
                  AND deleted_at IS NULL
                  AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Whether a live book other than `exclude_id` has this ISBN (case-insensitive).
    pub async fn is_duplicate_isbn(
        pool: &PgPool,
        isbn: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM books
                WHERE LOWER(isbn) = LOWER($1)
                  AND deleted_at IS NULL
                  AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }
}
