use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::middleware::request_id_middleware;

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        // Catalog mirror
        .route("/products", get(handlers::get_products))
        .route("/sync-products", post(handlers::sync_products))
        .route("/add-product", post(handlers::add_product))
        .route("/delete-product/:id", delete(handlers::delete_product))
        // Recommendations & interaction tracking
        .route("/recommend", post(handlers::recommend))
        .route("/track-view", post(handlers::track_view))
        // Analytics
        .route("/analytics", get(handlers::get_analytics))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
