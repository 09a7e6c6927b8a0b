//! Care N Tour quotation service
//!
//! Prices medical-tourism packages for the operations team and keeps the
//! finalized quotations in PostgreSQL.

pub mod cache;
pub mod config;
pub mod error;
pub mod quotation;
pub mod routes;

use axum::{extract::State, routing::get, Json, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use cache::QuoteCache;
use config::AppConfig;
use quotation::PricingSettings;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: QuoteCache,
    /// Default pricing rules for quotes that carry none
    pub pricing: Arc<PricingSettings>,
}

impl AppState {
    pub fn new(db: PgPool, config: &AppConfig) -> Self {
        Self {
            db,
            cache: QuoteCache::new(config.cache.quote_capacity, config.cache.quote_ttl()),
            pricing: Arc::new(config.pricing.settings()),
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/operations", quotation::router())
        .route("/operations/quotes/:id/print", get(routes::print::print_quote))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "cache": state.cache.stats(),
    }))
}
