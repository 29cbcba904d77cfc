//! Repository for the `authors` table.

use bookshelf_core::types::{DbId, StatusId};
use sqlx::PgPool;

use crate::models::author::{Author, AuthorGenre, AuthorInput, AuthorListing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category_id, status, created_at, updated_at";

/// Provides CRUD operations for authors.
pub struct AuthorRepo;

impl AuthorRepo {
    /// List all live authors with their category name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<AuthorListing>, sqlx::Error> {
        sqlx::query_as::<_, AuthorListing>(
            "SELECT a.id, a.name, a.category_id, c.name AS category_name,
                    a.status, a.created_at, a.updated_at
             FROM authors a
             LEFT JOIN categories c ON c.id = a.category_id
             WHERE a.deleted_at IS NULL
             ORDER BY a.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Find a live author by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Author>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM authors WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new active author, returning the created row.
    pub async fn create(pool: &PgPool, input: &AuthorInput) -> Result<Author, sqlx::Error> {
        let query = format!(
            "INSERT INTO authors (name, category_id, status)
             VALUES ($1, $2, 1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(&input.name)
            .bind(input.category_id)
            .fetch_one(pool)
            .await
    }

    /// Update an author. Returns `None` if no live row with `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &AuthorInput,
    ) -> Result<Option<Author>, sqlx::Error> {
        let query = format!(
            "UPDATE authors SET name = $2, category_id = $3, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.category_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an author. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE authors SET deleted_at = NOW(), updated_at = NOW()
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
            "UPDATE authors SET status = $2, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The live genres an author writes in, used to populate the book form.
    pub async fn genres(pool: &PgPool, author_id: DbId) -> Result<Vec<AuthorGenre>, sqlx::Error> {
        sqlx::query_as::<_, AuthorGenre>(
            "SELECT c.id, c.name AS book
             FROM authors a
             JOIN categories c ON c.id = a.category_id
             WHERE a.id = $1
               AND a.deleted_at IS NULL
               AND c.deleted_at IS NULL",
        )
        .bind(author_id)
        .fetch_all(pool)
        .await
    }
}
