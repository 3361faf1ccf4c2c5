//! HTTP server layer
//!
//! Axum routers for the three services with:
//! - Request tracing and a request timeout
//! - Graceful shutdown
//! - JSON error responses for malformed requests

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError, Service};
