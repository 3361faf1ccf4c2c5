//! User directory endpoints, served by the API service

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use movies_core::DocumentId;

use super::documents_or_empty;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::store::Collection;

/// GET /users
async fn list_users(State(state): State<Arc<AppState>>) -> Json<Vec<Value>> {
    tracing::info!("GET /users");
    documents_or_empty(state.store.find_all(Collection::Users).await, "users")
}

/// GET /users/{userid}
///
/// A store failure is logged and answered like a missing user.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(userid): Path<String>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!(userid = %userid, "GET /users/{{userid}}");
    let id = DocumentId::new(userid);

    match state.store.find_one(Collection::Users, &id).await {
        Ok(Some(doc)) => Ok(Json(doc.into_value())),
        Ok(None) => {
            tracing::info!(userid = %id, "No user was found");
            Err(ApiError::NotFound {
                resource: "user",
                id: id.into_string(),
            })
        }
        Err(e) => {
            tracing::error!(userid = %id, "failed to query user: {}", e);
            Err(ApiError::NotFound {
                resource: "user",
                id: id.into_string(),
            })
        }
    }
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{userid}", get(get_user))
}
