//! Category handlers. Categories are read-only over the API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use tusla_core::models::Category;
use tusla_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// List all categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All categories", body = [Category])
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let categories = state.categories.list_categories().await?;

    Ok(Json(categories))
}

/// Fetch a category by id
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 404, description = "No such category", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let category = state
        .categories
        .get_category(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(category))
}
