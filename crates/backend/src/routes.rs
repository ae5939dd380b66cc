use axum::http::{header, Method};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::shared::state::AppState;
use crate::{handlers, system};

/// All application routes
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // Products
        .route(
            "/api/products",
            get(handlers::a002_product::list).post(handlers::a002_product::create),
        )
        .route(
            "/api/products/out-of-stock",
            get(handlers::a002_product::list_out_of_stock),
        )
        .route(
            "/api/products/statistics",
            get(handlers::d100_best_sellers::best_sellers),
        )
        .route(
            "/api/products/:id",
            get(handlers::a002_product::get_by_id)
                .put(handlers::a002_product::update)
                .delete(handlers::a002_product::delete),
        )
        // Categories
        .route(
            "/api/categories",
            get(handlers::a001_category::list).post(handlers::a001_category::create),
        )
        .route(
            "/api/categories/:id",
            get(handlers::a001_category::get_by_id)
                .put(handlers::a001_category::update)
                .delete(handlers::a001_category::delete),
        )
        // Sales
        .route("/api/sales", post(handlers::a003_sale::create))
        .route("/api/sales/:id", get(handlers::a003_sale::get_by_id))
        // Users
        .route("/api/users", post(handlers::a004_user::create))
        .route(
            "/api/users/:id",
            get(handlers::a004_user::get_by_id).delete(handlers::a004_user::delete),
        )
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors)
        .with_state(state)
}
