//! Injected data-access interfaces.
//!
//! Handlers depend on [`CategoryStore`], [`AuthorStore`] and [`BookStore`]
//! trait objects rather than on a pool, so the backing implementation can
//! change (pooling, transactions, an in-memory double in tests) without
//! touching call sites. [`PgCatalog`] is the PostgreSQL implementation and
//! simply delegates to the repositories.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_core::status::RecordStatus;
use bookshelf_core::types::DbId;

use crate::models::author::{Author, AuthorGenre, AuthorInput, AuthorListing};
use crate::models::book::{Book, BookListing, CreateBook, UpdateBook};
use crate::models::category::{Category, CategoryInput};
use crate::repositories::{AuthorRepo, BookRepo, CategoryRepo};
use crate::DbPool;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Errors surfaced by the store traits.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A live row already holds this case-insensitive key.
    #[error("Duplicate {entity} {field}")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
    },

    /// A foreign key points at a row that does not exist.
    #[error("Referenced row does not exist ({constraint})")]
    MissingReference { constraint: String },

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    if let Some((entity, field)) = duplicate_key(&constraint) {
                        tracing::debug!(%constraint, entity, field, "Unique index rejected write");
                        return StoreError::Duplicate { entity, field };
                    }
                    tracing::warn!(%constraint, "Unique violation on unmapped constraint");
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    tracing::debug!(%constraint, "Foreign key rejected write");
                    return StoreError::MissingReference { constraint };
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Map a unique index name to the entity and field it protects.
fn duplicate_key(constraint: &str) -> Option<(&'static str, &'static str)> {
    match constraint {
        "uq_categories_name_live" => Some(("Category", "name")),
        "uq_books_name_live" => Some(("Book", "name")),
        "uq_books_isbn_live" => Some(("Book", "ISBN")),
        _ => None,
    }
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Category>, StoreError>;
    async fn find_by_id(&self, id: DbId) -> Result<Option<Category>, StoreError>;
    async fn create(&self, input: &CategoryInput) -> Result<Category, StoreError>;
    async fn update(&self, id: DbId, input: &CategoryInput)
        -> Result<Option<Category>, StoreError>;
    async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError>;
    async fn set_status(&self, id: DbId, status: RecordStatus) -> Result<bool, StoreError>;
    /// Case-insensitive name check over live rows, optionally ignoring one id.
    async fn exists_by_name(&self, name: &str, exclude_id: Option<DbId>)
        -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn list_active(&self) -> Result<Vec<AuthorListing>, StoreError>;
    async fn find_by_id(&self, id: DbId) -> Result<Option<Author>, StoreError>;
    async fn create(&self, input: &AuthorInput) -> Result<Author, StoreError>;
    async fn update(&self, id: DbId, input: &AuthorInput) -> Result<Option<Author>, StoreError>;
    async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError>;
    async fn set_status(&self, id: DbId, status: RecordStatus) -> Result<bool, StoreError>;
    async fn genres(&self, author_id: DbId) -> Result<Vec<AuthorGenre>, StoreError>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    async fn list_active(&self) -> Result<Vec<BookListing>, StoreError>;
    async fn find_by_id(&self, id: DbId) -> Result<Option<Book>, StoreError>;
    async fn create(&self, input: &CreateBook) -> Result<Book, StoreError>;
    /// Keeps the stored image when `input.image` is `None`; derives status from stock.
    async fn update(&self, id: DbId, input: &UpdateBook) -> Result<Option<Book>, StoreError>;
    async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError>;
    async fn set_status(&self, id: DbId, status: RecordStatus) -> Result<bool, StoreError>;
    async fn is_duplicate_name(&self, name: &str, exclude_id: Option<DbId>)
        -> Result<bool, StoreError>;
    async fn is_duplicate_isbn(&self, isbn: &str, exclude_id: Option<DbId>)
        -> Result<bool, StoreError>;
}

/// Liveness check for the backing store, used by `/health`.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// The set of stores handed to the HTTP layer.
#[derive(Clone)]
pub struct Catalog {
    pub categories: Arc<dyn CategoryStore>,
    pub authors: Arc<dyn AuthorStore>,
    pub books: Arc<dyn BookStore>,
    pub health: Arc<dyn HealthProbe>,
}

impl Catalog {
    /// Build a catalog where one value backs every store.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CategoryStore + AuthorStore + BookStore + HealthProbe + 'static,
    {
        Self {
            categories: store.clone(),
            authors: store.clone(),
            books: store.clone(),
            health: store,
        }
    }

    /// Catalog backed by PostgreSQL.
    pub fn postgres(pool: DbPool) -> Self {
        Self::from_store(Arc::new(PgCatalog::new(pool)))
    }
}

/// PostgreSQL implementation of every store trait.
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCatalog {
    async fn list_active(&self) -> Result<Vec<Category>, StoreError> {
        Ok(CategoryRepo::list_active(&self.pool).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Category>, StoreError> {
        Ok(CategoryRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create(&self, input: &CategoryInput) -> Result<Category, StoreError> {
        Ok(CategoryRepo::create(&self.pool, input).await?)
    }

    async fn update(
        &self,
        id: DbId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, StoreError> {
        Ok(CategoryRepo::update(&self.pool, id, input).await?)
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(CategoryRepo::soft_delete(&self.pool, id).await?)
    }

    async fn set_status(&self, id: DbId, status: RecordStatus) -> Result<bool, StoreError> {
        Ok(CategoryRepo::set_status(&self.pool, id, status.id()).await?)
    }

    async fn exists_by_name(
        &self,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, StoreError> {
        Ok(CategoryRepo::exists_by_name(&self.pool, name, exclude_id).await?)
    }
}

#[async_trait]
impl AuthorStore for PgCatalog {
    async fn list_active(&self) -> Result<Vec<AuthorListing>, StoreError> {
        Ok(AuthorRepo::list_active(&self.pool).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Author>, StoreError> {
        Ok(AuthorRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create(&self, input: &AuthorInput) -> Result<Author, StoreError> {
        Ok(AuthorRepo::create(&self.pool, input).await?)
    }

    async fn update(&self, id: DbId, input: &AuthorInput) -> Result<Option<Author>, StoreError> {
        Ok(AuthorRepo::update(&self.pool, id, input).await?)
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(AuthorRepo::soft_delete(&self.pool, id).await?)
    }

    async fn set_status(&self, id: DbId, status: RecordStatus) -> Result<bool, StoreError> {
        Ok(AuthorRepo::set_status(&self.pool, id, status.id()).await?)
    }

    async fn genres(&self, author_id: DbId) -> Result<Vec<AuthorGenre>, StoreError> {
        Ok(AuthorRepo::genres(&self.pool, author_id).await?)
    }
}

#[async_trait]
impl BookStore for PgCatalog {
    async fn list_active(&self) -> Result<Vec<BookListing>, StoreError> {
        Ok(BookRepo::list_active(&self.pool).await?)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Book>, StoreError> {
        Ok(BookRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create(&self, input: &CreateBook) -> Result<Book, StoreError> {
        Ok(BookRepo::create(&self.pool, input).await?)
    }

    async fn update(&self, id: DbId, input: &UpdateBook) -> Result<Option<Book>, StoreError> {
        Ok(BookRepo::update(&self.pool, id, input).await?)
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(BookRepo::soft_delete(&self.pool, id).await?)
    }

    async fn set_status(&self, id: DbId, status: RecordStatus) -> Result<bool, StoreError> {
        Ok(BookRepo::set_status(&self.pool, id, status.id()).await?)
    }

    async fn is_duplicate_name(
        &self,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, StoreError> {
        Ok(BookRepo::is_duplicate_name(&self.pool, name, exclude_id).await?)
    }

    async fn is_duplicate_isbn(
        &self,
        isbn: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, StoreError> {
        Ok(BookRepo::is_duplicate_isbn(&self.pool, isbn, exclude_id).await?)
    }
}

#[async_trait]
impl HealthProbe for PgCatalog {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
