#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use bookshelf_api::config::ServerConfig;
use bookshelf_api::router::build_app_router;
use bookshelf_api::state::AppState;
use bookshelf_core::status::RecordStatus;
use bookshelf_core::types::DbId;
use bookshelf_db::models::author::{Author, AuthorGenre, AuthorInput, AuthorListing};
use bookshelf_db::models::book::{Book, BookListing, CreateBook, UpdateBook};
use bookshelf_db::models::category::{Category, CategoryInput};
use bookshelf_db::{AuthorStore, BookStore, Catalog, CategoryStore, HealthProbe, StoreError};

/// Multipart boundary used by [`post_multipart`].
const BOUNDARY: &str = "bookshelf-test-boundary";

/// Build a test `ServerConfig` rooted in a temporary directory.
pub fn test_config(root: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5000".to_string()],
        request_timeout_secs: 30,
        static_dir: root.path().join("static"),
        upload_dir: root.path().join("static").join("uploads"),
        max_upload_bytes: 1024 * 1024,
    }
}

/// A running test application plus the handles tests inspect afterwards.
///
/// The temporary directory lives as long as the `TestApp` so uploaded files
/// can be checked after the request completes.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCatalog>,
    pub root: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn upload_path(&self, filename: &str) -> std::path::PathBuf {
        self.root.path().join("static").join("uploads").join(filename)
    }
}

/// Build the full application router backed by an in-memory catalog.
///
/// Uses the same [`build_app_router`] as `main.rs`, so requests go through
/// the production middleware stack.
pub fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(MemoryCatalog::default()))
}

pub fn build_test_app_with(store: Arc<MemoryCatalog>) -> TestApp {
    let root = tempfile::tempdir().unwrap();
    let state = AppState::new(Catalog::from_store(store.clone()), test_config(&root));
    TestApp {
        router: build_app_router(state),
        store,
        root,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// A file part for [`post_multipart`].
pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub data: &'a [u8],
}

/// POST a `multipart/form-data` body built from text fields and optional files.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    files: &[FilePart<'_>],
) -> Response<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for file in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                file.field, file.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status code and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

pub async fn create_category(app: Router, genre: &str) -> DbId {
    let response = post_json(app, "/category/create", serde_json::json!({ "genre": genre })).await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["id"].as_i64().unwrap()
}

pub async fn create_author(app: Router, name: &str, category_id: DbId) -> DbId {
    let response = post_json(
        app,
        "/author/create",
        serde_json::json!({ "author_name": name, "category_id": category_id }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["id"].as_i64().unwrap()
}

/// Text fields of a valid book form.
pub fn book_fields<'a>(
    name: &'a str,
    isbn: &'a str,
    author_id: &'a str,
    category_id: &'a str,
    stock: &'a str,
) -> Vec<(&'a str, &'a str)> {
    vec![
        ("book_name", name),
        ("isbn", isbn),
        ("author_id", author_id),
        ("category_id", category_id),
        ("stock", stock),
    ]
}

// ---------------------------------------------------------------------------
// In-memory catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Row<T> {
    record: T,
    deleted: bool,
}

#[derive(Default)]
struct Tables {
    next_id: DbId,
    categories: Vec<Row<Category>>,
    authors: Vec<Row<Author>>,
    books: Vec<Row<Book>>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

fn live<T>(rows: &[Row<T>]) -> impl Iterator<Item = &T> {
    rows.iter().filter(|r| !r.deleted).map(|r| &r.record)
}

fn same_key(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// In-memory stand-in for the PostgreSQL catalog.
///
/// Mirrors the database rules the handlers rely on: soft-deleted rows are
/// invisible, duplicate checks are case-insensitive over live rows, and a
/// book update keeps its image when none is given and derives status from
/// stock.
#[derive(Default)]
pub struct MemoryCatalog {
    tables: Mutex<Tables>,
    /// When set, `ping` fails so `/health` reports degraded.
    pub unhealthy: AtomicBool,
    /// When set, book create and update fail as if a unique index fired
    /// after the pre-checks passed.
    pub fail_book_writes: AtomicBool,
}

impl MemoryCatalog {
    fn racing_book_write(&self) -> Result<(), StoreError> {
        if self.fail_book_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Duplicate {
                entity: "Book",
                field: "name",
            });
        }
        Ok(())
    }

    /// Raw book row, including soft-deleted ones.
    pub fn book_row(&self, id: DbId) -> Option<(Book, bool)> {
        let tables = self.tables.lock().unwrap();
        tables
            .books
            .iter()
            .find(|r| r.record.id == id)
            .map(|r| (r.record.clone(), r.deleted))
    }

    pub fn book_count(&self) -> usize {
        self.tables.lock().unwrap().books.len()
    }

    pub fn category_row(&self, id: DbId) -> Option<(Category, bool)> {
        let tables = self.tables.lock().unwrap();
        tables
            .categories
            .iter()
            .find(|r| r.record.id == id)
            .map(|r| (r.record.clone(), r.deleted))
    }

    pub fn author_row(&self, id: DbId) -> Option<(Author, bool)> {
        let tables = self.tables.lock().unwrap();
        tables
            .authors
            .iter()
            .find(|r| r.record.id == id)
            .map(|r| (r.record.clone(), r.deleted))
    }
}

trait Keyed {
    fn key(&self) -> DbId;
}

impl Keyed for Category {
    fn key(&self) -> DbId {
        self.id
    }
}

impl Keyed for Author {
    fn key(&self) -> DbId {
        self.id
    }
}

impl Keyed for Book {
    fn key(&self) -> DbId {
        self.id
    }
}

/// Apply `f` to the live row with `id`, returning whether one was found.
fn with_live<T, F>(rows: &mut [Row<T>], id: DbId, f: F) -> bool
where
    T: Keyed,
    F: FnOnce(&mut Row<T>),
{
    match rows.iter_mut().find(|r| !r.deleted && r.record.key() == id) {
        Some(row) => {
            f(row);
            true
        }
        None => false,
    }
}

#[async_trait]
impl CategoryStore for MemoryCatalog {
    async fn list_active(&self) -> Result<Vec<Category>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(live(&tables.categories).cloned().collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Category>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let result = Ok(live(&tables.categories).find(|c| c.id == id).cloned());
        result
    }

    async fn create(&self, input: &CategoryInput) -> Result<Category, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if live(&tables.categories).any(|c| same_key(&c.name, &input.name)) {
            return Err(StoreError::Duplicate {
                entity: "Category",
                field: "name",
            });
        }
        let now = Utc::now();
        let category = Category {
            id: tables.next_id(),
            name: input.name.clone(),
            status: RecordStatus::Active.id(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(Row {
            record: category.clone(),
            deleted: false,
        });
        Ok(category)
    }

    async fn update(
        &self,
        id: DbId,
        input: &CategoryInput,
    ) -> Result<Option<Category>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let mut updated = None;
        with_live(&mut tables.categories, id, |row| {
            row.record.name = input.name.clone();
            row.record.updated_at = Utc::now();
            updated = Some(row.record.clone());
        });
        Ok(updated)
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(with_live(&mut tables.categories, id, |row| {
            row.deleted = true;
        }))
    }

    async fn set_status(&self, id: DbId, status: RecordStatus) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(with_live(&mut tables.categories, id, |row| {
            row.record.status = status.id();
        }))
    }

    async fn exists_by_name(
        &self,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.lock().unwrap();
        let result = Ok(live(&tables.categories)
            .any(|c| same_key(&c.name, name) && Some(c.id) != exclude_id));
        result
    }
}

#[async_trait]
impl AuthorStore for MemoryCatalog {
    async fn list_active(&self) -> Result<Vec<AuthorListing>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(live(&tables.authors)
            .map(|a| AuthorListing {
                id: a.id,
                name: a.name.clone(),
                category_id: a.category_id,
                category_name: tables
                    .categories
                    .iter()
                    .find(|c| c.record.id == a.category_id)
                    .map(|c| c.record.name.clone()),
                status: a.status,
                created_at: a.created_at,
                updated_at: a.updated_at,
            })
            .collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Author>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let result = Ok(live(&tables.authors).find(|a| a.id == id).cloned());
        result
    }

    async fn create(&self, input: &AuthorInput) -> Result<Author, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let author = Author {
            id: tables.next_id(),
            name: input.name.clone(),
            category_id: input.category_id,
            status: RecordStatus::Active.id(),
            created_at: now,
            updated_at: now,
        };
        tables.authors.push(Row {
            record: author.clone(),
            deleted: false,
        });
        Ok(author)
    }

    async fn update(&self, id: DbId, input: &AuthorInput) -> Result<Option<Author>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let mut updated = None;
        with_live(&mut tables.authors, id, |row| {
            row.record.name = input.name.clone();
            row.record.category_id = input.category_id;
            row.record.updated_at = Utc::now();
            updated = Some(row.record.clone());
        });
        Ok(updated)
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(with_live(&mut tables.authors, id, |row| {
            row.deleted = true;
        }))
    }

    async fn set_status(&self, id: DbId, status: RecordStatus) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(with_live(&mut tables.authors, id, |row| {
            row.record.status = status.id();
        }))
    }

    async fn genres(&self, author_id: DbId) -> Result<Vec<AuthorGenre>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let Some(author) = live(&tables.authors).find(|a| a.id == author_id) else {
            return Ok(Vec::new());
        };
        Ok(live(&tables.categories)
            .filter(|c| c.id == author.category_id)
            .map(|c| AuthorGenre {
                id: c.id,
                book: c.name.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl BookStore for MemoryCatalog {
    async fn list_active(&self) -> Result<Vec<BookListing>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(live(&tables.books)
            .map(|b| BookListing {
                id: b.id,
                name: b.name.clone(),
                isbn: b.isbn.clone(),
                stock: b.stock,
                image: b.image.clone(),
                status: b.status,
                created_at: b.created_at,
                updated_at: b.updated_at,
                author_id: b.author_id,
                author_name: tables
                    .authors
                    .iter()
                    .find(|a| a.record.id == b.author_id)
                    .map(|a| a.record.name.clone()),
                category_id: b.category_id,
                category_name: tables
                    .categories
                    .iter()
                    .find(|c| c.record.id == b.category_id)
                    .map(|c| c.record.name.clone()),
            })
            .collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Book>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let result = Ok(live(&tables.books).find(|b| b.id == id).cloned());
        result
    }

    async fn create(&self, input: &CreateBook) -> Result<Book, StoreError> {
        self.racing_book_write()?;
        let mut tables = self.tables.lock().unwrap();
        if live(&tables.books).any(|b| same_key(&b.name, &input.name)) {
            return Err(StoreError::Duplicate {
                entity: "Book",
                field: "name",
            });
        }
        if live(&tables.books).any(|b| same_key(&b.isbn, &input.isbn)) {
            return Err(StoreError::Duplicate {
                entity: "Book",
                field: "ISBN",
            });
        }
        let now = Utc::now();
        let book = Book {
            id: tables.next_id(),
            name: input.name.clone(),
            isbn: input.isbn.clone(),
            author_id: input.author_id,
            category_id: input.category_id,
            stock: input.stock,
            image: input.image.clone(),
            status: RecordStatus::Active.id(),
            created_at: now,
            updated_at: now,
        };
        tables.books.push(Row {
            record: book.clone(),
            deleted: false,
        });
        Ok(book)
    }

    async fn update(&self, id: DbId, input: &UpdateBook) -> Result<Option<Book>, StoreError> {
        self.racing_book_write()?;
        let mut tables = self.tables.lock().unwrap();
        let mut updated = None;
        with_live(&mut tables.books, id, |row| {
            let book = &mut row.record;
            book.name = input.name.clone();
            book.isbn = input.isbn.clone();
            book.author_id = input.author_id;
            book.category_id = input.category_id;
            book.stock = input.stock;
            if let Some(image) = &input.image {
                book.image = Some(image.clone());
            }
            book.status = RecordStatus::for_stock(input.stock).id();
            book.updated_at = Utc::now();
            updated = Some(book.clone());
        });
        Ok(updated)
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(with_live(&mut tables.books, id, |row| {
            row.deleted = true;
        }))
    }

    async fn set_status(&self, id: DbId, status: RecordStatus) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(with_live(&mut tables.books, id, |row| {
            row.record.status = status.id();
        }))
    }

    async fn is_duplicate_name(
        &self,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.lock().unwrap();
        let result = Ok(live(&tables.books).any(|b| same_key(&b.name, name) && Some(b.id) != exclude_id));
        result
    }

    async fn is_duplicate_isbn(
        &self,
        isbn: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.lock().unwrap();
        let result = Ok(live(&tables.books).any(|b| same_key(&b.isbn, isbn) && Some(b.id) != exclude_id));
        result
    }
}

#[async_trait]
impl HealthProbe for MemoryCatalog {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}
