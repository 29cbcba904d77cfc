//! Handlers for the `/author` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bookshelf_core::types::DbId;
use bookshelf_core::validation::{
    deserialize_optional_id, required_id, required_text, validate_max_length, MAX_NAME_LENGTH,
};
use bookshelf_db::models::author::{AuthorGenre, AuthorInput, AuthorListing};
use bookshelf_db::models::category::Category;
use serde::{Deserialize, Serialize};

use super::{not_found, StatusPayload};
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Body of author create/update requests.
#[derive(Debug, Deserialize)]
pub struct AuthorPayload {
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub category_id: Option<DbId>,
}

impl AuthorPayload {
    fn into_input(self) -> AppResult<AuthorInput> {
        let name = required_text(self.author_name.as_deref())?;
        let category_id = required_id(self.category_id)?;
        validate_max_length("author_name", &name, MAX_NAME_LENGTH)?;
        Ok(AuthorInput { name, category_id })
    }
}

/// Records behind the author page: the authors plus the category picker.
#[derive(Debug, Serialize)]
pub struct AuthorPage {
    pub authors: Vec<AuthorListing>,
    pub categories: Vec<Category>,
}

/// GET /author
pub async fn page(State(state): State<AppState>) -> AppResult<Json<AuthorPage>> {
    let authors = state.catalog.authors.list_active().await?;
    let categories = state.catalog.categories.list_active().await?;
    Ok(Json(AuthorPage {
        authors,
        categories,
    }))
}

/// POST /author/create
pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AuthorPayload>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let input = payload.into_input()?;
    ensure_category(&state, input.category_id).await?;

    let author = state.catalog.authors.create(&input).await?;

    tracing::info!(id = author.id, name = %author.name, "Author created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::created("Author created successfully", author.id)),
    ))
}

/// POST /author/update/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(payload): AppJson<AuthorPayload>,
) -> AppResult<Json<MessageResponse>> {
    let input = payload.into_input()?;
    ensure_category(&state, input.category_id).await?;

    state
        .catalog
        .authors
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found("Author", id))?;

    tracing::info!(id, name = %input.name, "Author updated");
    Ok(Json(MessageResponse::new("Author updated successfully")))
}

/// POST /author/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !state.catalog.authors.soft_delete(id).await? {
        return Err(not_found("Author", id));
    }
    tracing::info!(id, "Author soft deleted");
    Ok(Json(MessageResponse::new("Author soft deleted")))
}

/// POST /author/status/{id}
pub async fn set_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(payload): AppJson<StatusPayload>,
) -> AppResult<Json<MessageResponse>> {
    let status = payload.into_status()?;
    if !state.catalog.authors.set_status(id, status).await? {
        return Err(not_found("Author", id));
    }
    tracing::info!(id, status = status.id(), "Author status updated");
    Ok(Json(MessageResponse::new("Author status updated")))
}

/// GET /author/{id}/genres
///
/// The genres offered in the book form once an author is picked. An unknown
/// author yields an empty list.
pub async fn genres(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Vec<AuthorGenre>>> {
    let genres = state.catalog.authors.genres(id).await?;
    Ok(Json(genres))
}

async fn ensure_category(state: &AppState, category_id: DbId) -> AppResult<()> {
    state
        .catalog
        .categories
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| not_found("Category", category_id))?;
    Ok(())
}
