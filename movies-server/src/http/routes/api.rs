//! Movies API endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;

use super::{documents_or_empty, health, users};
use crate::http::server::AppState;
use crate::store::Collection;

/// GET /api/movies
async fn list_movies(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    tracing::info!("GET /api/movies");
    documents_or_empty(state.store.find_all(Collection::Movies).await, "movies")
}

/// GET /api/watching
async fn list_watching(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    tracing::info!("GET /api/watching");
    documents_or_empty(state.store.find_all(Collection::Watching).await, "watching")
}

/// Movies API routes, including the user directory
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/movies", get(list_movies))
        .route("/api/watching", get(list_watching))
        .merge(users::router())
        .merge(health::router("api"))
}
