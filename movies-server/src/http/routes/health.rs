//! Health check endpoints
//!
//! Each service answers `GET /{service}/healthz` with an empty 200. The
//! check does not touch the database.

use axum::{http::StatusCode, routing::get, Router};

/// GET /{prefix}/healthz
async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Health route for the service mounted under `prefix`
pub fn router<S>(prefix: &str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(&format!("/{prefix}/healthz"), get(healthz))
}
