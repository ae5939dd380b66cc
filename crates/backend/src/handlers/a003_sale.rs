use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a003_sale::{Sale, SaleDto};

use crate::domain::a003_sale::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

/// POST /api/sales
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<SaleDto>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let sale = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// GET /api/sales/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Sale>, ApiError> {
    Ok(Json(service::get_by_id(&state.db, &id).await?))
}
