use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a004_user::{CreateUserDto, User};

use crate::domain::a004_user::service;
use crate::shared::error::ApiError;
use crate::shared::state::AppState;

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Json(dto): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = service::create(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(service::get_by_id(&state.db, &id).await?))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(service::delete(&state.db, &id).await?))
}
