//! Catalog service endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;

use super::{documents_or_empty, health};
use crate::http::server::AppState;
use crate::store::Collection;

/// GET /catalog - every catalog document as stored
async fn list_catalog(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    tracing::info!("GET /catalog");
    documents_or_empty(state.store.find_all(Collection::Catalog).await, "catalog")
}

/// Catalog routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog", get(list_catalog))
        .merge(health::router("catalog"))
}
