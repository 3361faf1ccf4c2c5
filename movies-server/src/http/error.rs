//! API error type with IntoResponse
//!
//! Only request-shape problems and unknown keys surface as errors. Store and
//! catalog failures are logged by the handlers and answered with empty
//! results.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Body missing, not JSON, or missing a required field (400)
    BadRequest { message: String },

    /// No document under the requested key (404)
    NotFound { resource: &'static str, id: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::BadRequest { message } => {
                tracing::warn!("Rejected request: {}", message);
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "bad_request",
                        "message": message
                    }),
                )
            }
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{resource} '{id}' not found")
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            message: rejection.body_text(),
        }
    }
}
