use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_category::{Category, CategoryDto, CategoryListResponse, CategoryPatch};

use crate::domain::a001_category::service;
use crate::shared::error::ApiError;
use crate::shared::pagination::{PageQuery, Pagination};
use crate::shared::state::AppState;

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let pagination = Pagination::from_query(&query, state.default_limit);
    Ok(Json(service::list(&state.db, pagination).await?))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CategoryDto>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(service::get_by_id(&state.db, &id).await?))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(service::update(&state.db, &id, patch).await?))
}

/// DELETE /api/categories/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(service::delete(&state.db, &id).await?))
}
