//! Handlers for the `/book` resource.
//!
//! Create and update take a multipart form because the cover image travels
//! with the text fields; every other action takes JSON.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use bookshelf_core::error::CoreError;
use bookshelf_core::types::DbId;
use bookshelf_core::validation::{
    deserialize_optional_id, parse_id, parse_stock, required_text, validate_max_length,
    MAX_ISBN_LENGTH, MAX_NAME_LENGTH,
};
use bookshelf_db::models::author::AuthorListing;
use bookshelf_db::models::book::{Book, BookListing, CreateBook, UpdateBook};
use bookshelf_db::models::category::Category;
use serde::{Deserialize, Serialize};

use super::{not_found, StatusPayload};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::{ExistsResponse, MessageResponse};
use crate::state::AppState;
use crate::uploads::{ImageUpload, StagedImage};

const DUPLICATE_NAME: &str = "Book with this name already exists";
const DUPLICATE_ISBN: &str = "Book with this ISBN already exists";

/// Raw multipart fields, before validation.
#[derive(Debug, Default)]
struct BookForm {
    book_name: Option<String>,
    isbn: Option<String>,
    author_id: Option<String>,
    category_id: Option<String>,
    stock: Option<String>,
    image: Option<ImageUpload>,
}

/// Validated book fields shared by create and update.
#[derive(Debug)]
struct BookFields {
    name: String,
    isbn: String,
    author_id: DbId,
    category_id: DbId,
    stock: i32,
    image: Option<ImageUpload>,
}

impl BookForm {
    /// Drain the multipart stream. Unknown parts are ignored; an `image`
    /// part with an empty filename counts as no image.
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = BookForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "image" => {
                    let filename = field.file_name().unwrap_or("").to_string();
                    let data = field.bytes().await?;
                    if !filename.is_empty() {
                        form.image = Some(ImageUpload::new(&filename, data)?);
                    }
                }
                "book_name" => form.book_name = Some(field.text().await?),
                "isbn" => form.isbn = Some(field.text().await?),
                "author_id" => form.author_id = Some(field.text().await?),
                "category_id" => form.category_id = Some(field.text().await?),
                "stock" => form.stock = Some(field.text().await?),
                _ => {}
            }
        }

        Ok(form)
    }

    fn validate(self) -> Result<BookFields, CoreError> {
        let name = required_text(self.book_name.as_deref())?;
        let isbn = required_text(self.isbn.as_deref())?;
        let author_id = parse_id("author_id", self.author_id.as_deref())?;
        let category_id = parse_id("category_id", self.category_id.as_deref())?;
        let stock = parse_stock(self.stock.as_deref())?;

        validate_max_length("book_name", &name, MAX_NAME_LENGTH)?;
        validate_max_length("isbn", &isbn, MAX_ISBN_LENGTH)?;

        Ok(BookFields {
            name,
            isbn,
            author_id,
            category_id,
            stock,
            image: self.image,
        })
    }
}

/// Records behind the book page: books plus the author and category pickers.
#[derive(Debug, Serialize)]
pub struct BookPage {
    pub books: Vec<BookListing>,
    pub authors: Vec<AuthorListing>,
    pub categories: Vec<Category>,
}

/// Body of the duplicate-name check used by the edit form.
#[derive(Debug, Deserialize)]
pub struct CheckNamePayload {
    pub book_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub book_id: Option<DbId>,
}

/// GET /book
pub async fn page(State(state): State<AppState>) -> AppResult<Json<BookPage>> {
    let books = state.catalog.books.list_active().await?;
    let authors = state.catalog.authors.list_active().await?;
    let categories = state.catalog.categories.list_active().await?;
    Ok(Json(BookPage {
        books,
        authors,
        categories,
    }))
}

/// GET /book/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Book>> {
    let book = state
        .catalog
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found("Book", id))?;
    Ok(Json(book))
}

/// POST /book/create
///
/// Returns 400 for missing fields, 404 for an unknown author or category and
/// 409 when the name or ISBN is already taken by a live book.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let fields = BookForm::read(multipart).await?.validate()?;

    ensure_references(&state, &fields).await?;
    ensure_unique(&state, &fields, None).await?;

    let staged = stage_image(&state, &fields).await?;

    let input = CreateBook {
        name: fields.name,
        isbn: fields.isbn,
        author_id: fields.author_id,
        category_id: fields.category_id,
        stock: fields.stock,
        image: staged.as_ref().map(|image| image.filename().to_string()),
    };
    let written = state.catalog.books.create(&input).await.map_err(AppError::from);
    let book = settle_image(staged, written).await?;

    tracing::info!(id = book.id, name = %book.name, isbn = %book.isbn, "Book created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::created("Book created successfully", book.id)),
    ))
}

/// POST /book/update/{id}
///
/// Without an image part the stored image is kept. Stock 0 makes the book
/// inactive, any other stock makes it active.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    multipart: Multipart,
) -> AppResult<Json<MessageResponse>> {
    let fields = BookForm::read(multipart).await?.validate()?;

    state
        .catalog
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found("Book", id))?;

    ensure_references(&state, &fields).await?;
    ensure_unique(&state, &fields, Some(id)).await?;

    let staged = stage_image(&state, &fields).await?;

    let input = UpdateBook {
        name: fields.name,
        isbn: fields.isbn,
        author_id: fields.author_id,
        category_id: fields.category_id,
        stock: fields.stock,
        image: staged.as_ref().map(|image| image.filename().to_string()),
    };
    let written = state
        .catalog
        .books
        .update(id, &input)
        .await
        .map_err(AppError::from)
        .and_then(|book| book.ok_or_else(|| not_found("Book", id)));
    let book = settle_image(staged, written).await?;

    tracing::info!(id, stock = book.stock, status = book.status, "Book updated");
    Ok(Json(MessageResponse::new("Book updated successfully")))
}

/// POST /book/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !state.catalog.books.soft_delete(id).await? {
        return Err(not_found("Book", id));
    }
    tracing::info!(id, "Book soft deleted");
    Ok(Json(MessageResponse::new("Book soft deleted")))
}

/// POST /book/status/{id}
pub async fn set_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(payload): AppJson<StatusPayload>,
) -> AppResult<Json<MessageResponse>> {
    let status = payload.into_status()?;
    if !state.catalog.books.set_status(id, status).await? {
        return Err(not_found("Book", id));
    }
    tracing::info!(id, status = status.id(), "Book status updated");
    Ok(Json(MessageResponse::new("Book status updated")))
}

/// POST /book/check_name
///
/// A blank name never exists. `book_id` excludes the book being edited.
pub async fn check_name(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CheckNamePayload>,
) -> AppResult<Json<ExistsResponse>> {
    let name = payload.book_name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        return Ok(Json(ExistsResponse { exists: false }));
    }

    let exists = state
        .catalog
        .books
        .is_duplicate_name(name, payload.book_id)
        .await?;
    Ok(Json(ExistsResponse { exists }))
}

async fn stage_image(state: &AppState, fields: &BookFields) -> AppResult<Option<StagedImage>> {
    match &fields.image {
        Some(upload) => Ok(Some(state.uploads.stage(upload).await?)),
        None => Ok(None),
    }
}

/// Commit the staged image if the row write succeeded, drop it otherwise.
async fn settle_image<T>(staged: Option<StagedImage>, written: AppResult<T>) -> AppResult<T> {
    match (written, staged) {
        (Ok(row), Some(image)) => {
            image.commit().await?;
            Ok(row)
        }
        (Ok(row), None) => Ok(row),
        (Err(err), Some(image)) => {
            image.discard().await;
            Err(err)
        }
        (Err(err), None) => Err(err),
    }
}

async fn ensure_references(state: &AppState, fields: &BookFields) -> AppResult<()> {
    state
        .catalog
        .authors
        .find_by_id(fields.author_id)
        .await?
        .ok_or_else(|| not_found("Author", fields.author_id))?;
    state
        .catalog
        .categories
        .find_by_id(fields.category_id)
        .await?
        .ok_or_else(|| not_found("Category", fields.category_id))?;
    Ok(())
}

/// Name and ISBN are checked independently; the name check wins when both collide.
async fn ensure_unique(
    state: &AppState,
    fields: &BookFields,
    exclude_id: Option<DbId>,
) -> AppResult<()> {
    let books = &state.catalog.books;

    if books.is_duplicate_name(&fields.name, exclude_id).await? {
        tracing::debug!(name = %fields.name, "Rejected duplicate book name");
        return Err(CoreError::Conflict(DUPLICATE_NAME.into()).into());
    }
    if books.is_duplicate_isbn(&fields.isbn, exclude_id).await? {
        tracing::debug!(isbn = %fields.isbn, "Rejected duplicate book ISBN");
        return Err(CoreError::Conflict(DUPLICATE_ISBN.into()).into());
    }
    Ok(())
}
