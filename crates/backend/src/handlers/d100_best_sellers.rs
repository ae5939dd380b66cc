use axum::extract::{Query, State};
use axum::Json;
use contracts::dashboards::d100_best_sellers::BestSellersResponse;

use crate::dashboards::d100_best_sellers::service;
use crate::shared::error::ApiError;
use crate::shared::pagination::{PageQuery, Pagination};
use crate::shared::state::AppState;

/// GET /api/products/statistics
pub async fn best_sellers(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<BestSellersResponse>, ApiError> {
    let pagination = Pagination::from_query(&query, state.default_limit);
    let response = service::get_best_sellers(state.sales.as_ref(), pagination).await?;
    Ok(Json(response))
}
