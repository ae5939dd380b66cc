use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a002_product::{ProductDto, ProductListResponse, ProductPatch, ProductView};
use serde::Deserialize;

use crate::domain::a002_product::service;
use crate::shared::error::ApiError;
use crate::shared::pagination::{PageQuery, Pagination};
use crate::shared::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    /// Category name
    pub category: Option<String>,
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let pagination = Pagination::from_query(&query.page, state.default_limit);
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    Ok(Json(service::list(&state.db, pagination, category).await?))
}

/// GET /api/products/out-of-stock
pub async fn list_out_of_stock(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let pagination = Pagination::from_query(&query, state.default_limit);
    Ok(Json(service::list_out_of_stock(&state.db, pagination).await?))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<ProductDto>,
) -> Result<(StatusCode, Json<ProductView>), ApiError> {
    let product = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>, ApiError> {
    Ok(Json(service::get_by_id(&state.db, &id).await?))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ProductView>, ApiError> {
    Ok(Json(service::update(&state.db, &id, patch).await?))
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>, ApiError> {
    Ok(Json(service::delete(&state.db, &id).await?))
}
