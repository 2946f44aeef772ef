//! HTTP API assembly
//!
//! Everything is mounted under `/api`:
//!
//! - `GET /api/health`
//! - `/api/sequences/...`
//! - `/api/expressions/...`

pub mod response;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;

use crate::{config::Config, features, middleware};

/// Build the application router with all routes and middleware
pub fn create_router(db: PgPool, config: &Config) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(features::router(db));

    Router::new()
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Liveness probe; does not touch the database
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
