//! Handlers for the `/category` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bookshelf_core::types::DbId;
use bookshelf_core::validation::{required_text, validate_max_length, MAX_NAME_LENGTH};
use bookshelf_db::models::category::{Category, CategoryInput};
use bookshelf_db::StoreError;
use serde::{Deserialize, Serialize};

use super::{not_found, StatusPayload};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Returned when a live category already uses the name. Category collisions
/// answer 400, unlike book collisions.
pub const CATEGORY_EXISTS: &str = "Category already exists.";

/// Body of category create/update requests.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub genre: Option<String>,
}

impl CategoryPayload {
    fn into_input(self) -> AppResult<CategoryInput> {
        let name = required_text(self.genre.as_deref())?;
        validate_max_length("genre", &name, MAX_NAME_LENGTH)?;
        Ok(CategoryInput { name })
    }
}

/// Records behind the category page.
#[derive(Debug, Serialize)]
pub struct CategoryPage {
    pub categories: Vec<Category>,
}

/// GET /category
pub async fn page(State(state): State<AppState>) -> AppResult<Json<CategoryPage>> {
    let categories = state.catalog.categories.list_active().await?;
    Ok(Json(CategoryPage { categories }))
}

/// POST /category/create
pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let input = payload.into_input()?;

    if state.catalog.categories.exists_by_name(&input.name, None).await? {
        tracing::debug!(name = %input.name, "Rejected duplicate category");
        return Err(AppError::BadRequest(CATEGORY_EXISTS.into()));
    }

    let category = state
        .catalog
        .categories
        .create(&input)
        .await
        .map_err(duplicate_as_bad_request)?;

    tracing::info!(id = category.id, name = %category.name, "Category created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::created(
            "Category created successfully",
            category.id,
        )),
    ))
}

/// POST /category/update/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> AppResult<Json<MessageResponse>> {
    let input = payload.into_input()?;

    if state
        .catalog
        .categories
        .exists_by_name(&input.name, Some(id))
        .await?
    {
        tracing::debug!(id, name = %input.name, "Rejected duplicate category rename");
        return Err(AppError::BadRequest(CATEGORY_EXISTS.into()));
    }

    state
        .catalog
        .categories
        .update(id, &input)
        .await
        .map_err(duplicate_as_bad_request)?
        .ok_or_else(|| not_found("Category", id))?;

    tracing::info!(id, name = %input.name, "Category updated");
    Ok(Json(MessageResponse::new("Category updated successfully")))
}

/// POST /category/delete/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !state.catalog.categories.soft_delete(id).await? {
        return Err(not_found("Category", id));
    }
    tracing::info!(id, "Category soft deleted");
    Ok(Json(MessageResponse::new("Category soft deleted")))
}

/// POST /category/status/{id}
pub async fn set_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(payload): AppJson<StatusPayload>,
) -> AppResult<Json<MessageResponse>> {
    let status = payload.into_status()?;
    if !state.catalog.categories.set_status(id, status).await? {
        return Err(not_found("Category", id));
    }
    tracing::info!(id, status = status.id(), "Category status updated");
    Ok(Json(MessageResponse::new("Category status updated")))
}

/// A unique-index rejection that slipped past the pre-check answers like the
/// pre-check does.
fn duplicate_as_bad_request(err: StoreError) -> AppError {
    match err {
        StoreError::Duplicate { .. } => AppError::BadRequest(CATEGORY_EXISTS.into()),
        other => other.into(),
    }
}
