use std::collections::BTreeSet;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Product, ProductId, RecommendedProduct, DEFAULT_CATEGORY};
use crate::services::{catalog_sync, recommendations};

use super::{AppState, AppStateInner};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// One entry of the caller-declared purchase history. Clients send whole
/// product objects; only the id matters here.
#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: Option<ProductId>,
}

fn default_user_id() -> String {
    "anonymous".to_string()
}

fn default_limit() -> i64 {
    6
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendedProduct>,
    pub total_products: usize,
    pub user_history_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub name: String,
    pub price: f64,
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddProductResponse {
    pub message: String,
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub struct TrackViewRequest {
    #[serde(default)]
    pub product_id: Option<ProductId>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProductCount {
    pub product_id: ProductId,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub total_products: usize,
    pub total_users: usize,
    pub most_viewed_products: Vec<ProductCount>,
    pub most_purchased_products: Vec<ProductCount>,
    pub categories: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "Recommendation API is running"
}

/// Full mirrored catalog
pub async fn get_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    let inner = state.inner.read().await;
    Json(inner.catalog.all().to_vec())
}

/// Re-mirrors the catalog from the commerce backend
pub async fn sync_products(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    let provider = state.provider.clone();
    let mut inner = state.inner.write().await;
    let AppStateInner { catalog, rng, .. } = &mut *inner;

    let count = catalog_sync::sync_catalog(provider.as_ref(), catalog, rng).await?;
    Ok(Json(MessageResponse {
        message: format!("Successfully synced {count} products"),
    }))
}

/// Adds a locally managed product, synthesizing rating, reviews, and tags the
/// same way a sync does
pub async fn add_product(
    State(state): State<AppState>,
    Json(request): Json<AddProductRequest>,
) -> AppResult<(StatusCode, Json<AddProductResponse>)> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Missing product fields".to_string()));
    }
    if !request.price.is_finite() || request.price < 0.0 {
        return Err(AppError::InvalidInput(
            "Price must be a non-negative number".to_string(),
        ));
    }

    let mut inner = state.inner.write().await;
    let AppStateInner { catalog, rng, .. } = &mut *inner;

    let product = Product {
        id: catalog.next_numeric_id(),
        rating: catalog_sync::synthetic_rating(rng),
        reviews: catalog_sync::synthetic_reviews(rng),
        tags: catalog_sync::extract_tags(&request.name, &request.description),
        category: request
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        name: request.name,
        price: request.price,
        image: request.image,
        description: request.description,
    };
    tracing::info!(id = %product.id, name = %product.name, "Product added");

    let response = AddProductResponse {
        message: "Product added".to_string(),
        product: product.clone(),
    };
    catalog.add(product);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Removes a product from the mirror
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> AppResult<Json<MessageResponse>> {
    let mut inner = state.inner.write().await;
    if inner.catalog.remove(&id) {
        tracing::info!(%id, "Product deleted");
        Ok(Json(MessageResponse {
            message: "Product deleted".to_string(),
        }))
    } else {
        Err(AppError::NotFound(format!("Product {id} not found")))
    }
}

/// Core entry point: blends the recommendation strategies for one user
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Json<RecommendResponse> {
    let limit = request.limit.max(0) as usize;
    let history_ids: Vec<ProductId> = request
        .history
        .iter()
        .filter_map(|entry| entry.id.clone())
        .collect();

    let mut inner = state.inner.write().await;
    let AppStateInner {
        catalog,
        interactions,
        rng,
    } = &mut *inner;

    let recommendations =
        recommendations::recommend(catalog, interactions, &request.user_id, &history_ids, limit, rng);

    tracing::info!(
        user_id = %request.user_id,
        history = request.history.len(),
        returned = recommendations.len(),
        "Generated recommendations"
    );

    Json(RecommendResponse {
        recommendations,
        total_products: catalog.len(),
        user_history_count: request.history.len(),
    })
}

/// Increments a product's view counter
pub async fn track_view(
    State(state): State<AppState>,
    Json(request): Json<TrackViewRequest>,
) -> Json<MessageResponse> {
    if let Some(product_id) = request.product_id {
        let mut inner = state.inner.write().await;
        let total = inner.interactions.record_view(product_id.clone());
        tracing::debug!(%product_id, total, "View tracked");
    }
    Json(MessageResponse {
        message: "View tracked".to_string(),
    })
}

/// Basic catalog and behavior analytics
pub async fn get_analytics(State(state): State<AppState>) -> Json<AnalyticsResponse> {
    let inner = state.inner.read().await;

    let categories: BTreeSet<String> = inner
        .catalog
        .all()
        .iter()
        .map(|p| p.category.clone())
        .collect();

    let to_counts = |entries: Vec<(ProductId, u64)>| {
        entries
            .into_iter()
            .map(|(product_id, count)| ProductCount { product_id, count })
            .collect()
    };

    Json(AnalyticsResponse {
        total_products: inner.catalog.len(),
        total_users: inner.interactions.user_count(),
        most_viewed_products: to_counts(inner.interactions.top_viewed(5)),
        most_purchased_products: to_counts(inner.interactions.top_purchased(5)),
        categories: categories.into_iter().collect(),
    })
}
