use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use aisle_api::api::{create_router, AppState};
use aisle_api::config::Config;
use aisle_api::services::catalog_sync::{self, CommerceBackendProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("aisle_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let provider = Arc::new(CommerceBackendProvider::new(
        config.catalog_backend_url.clone(),
    ));
    let state = AppState::new(provider);

    // Mirror the catalog once up front; a failed backend is not fatal, the
    // service just starts empty and can be synced later via /sync-products.
    if config.sync_on_start {
        let provider = state.provider.clone();
        let mut guard = state.inner.write().await;
        let inner = &mut *guard;
        match catalog_sync::sync_catalog(provider.as_ref(), &mut inner.catalog, &mut inner.rng)
            .await
        {
            Ok(count) => tracing::info!(count, "Initial catalog sync complete"),
            Err(err) => {
                tracing::warn!(error = %err, "Initial catalog sync failed, starting with an empty catalog")
            }
        }
    }

    let origins: Vec<HeaderValue> = config
        .cors_origin_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
