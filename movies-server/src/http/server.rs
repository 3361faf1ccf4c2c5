//! Axum server setup
//!
//! One binary runs any of the three services, or all of them in one
//! process:
//! - Request tracing and a request timeout
//! - Optional permissive CORS
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::catalog_source::CatalogSource;
use crate::store::DocumentStore;

/// Which service's routes a process serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// `/catalog`
    Catalog,
    /// `/rentals`, `/rent`, `/rent/return`
    Rentals,
    /// `/api/movies`, `/api/watching`, `/users`
    Api,
    /// Everything above in one process
    All,
}

impl Service {
    pub fn name(self) -> &'static str {
        match self {
            Service::Catalog => "catalog",
            Service::Rentals => "rentals",
            Service::Api => "api",
            Service::All => "all",
        }
    }

    /// Routes served by this service
    pub fn router(self) -> Router<Arc<AppState>> {
        match self {
            Service::Catalog => routes::catalog::router(),
            Service::Rentals => routes::rentals::router(),
            Service::Api => routes::api::router(),
            Service::All => Router::new()
                .merge(routes::catalog::router())
                .merge(routes::rentals::router())
                .merge(routes::api::router()),
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8080)
    pub bind_addr: SocketAddr,

    /// Service whose routes are mounted
    pub service: Service,

    /// Upper bound on handling a single request
    pub request_timeout: Duration,

    /// Allow any origin. Off by default: the frontend proxies same-origin.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            service: Service::All,
            request_timeout: Duration::from_secs(30),
            cors_permissive: false,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    /// Catalog used by the rentals join
    pub catalog: Arc<dyn CatalogSource>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, catalog: Arc<dyn CatalogSource>) -> Self {
        Self { store, catalog }
    }
}

/// Build the router for `config.service` with the middleware stack.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(cors);

    config
        .service
        .router()
        .layer(middleware)
        .with_state(Arc::new(state))
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(PgDocumentStore::new(create_pool(&database_url)?));
/// let catalog = Arc::new(HttpCatalog::new("http://catalog:8080", timeout)?);
/// run_server(AppState::new(store, catalog), ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        service = %config.service,
        "Server running on {}",
        config.bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use movies_core::DocumentId;
    use tower::ServiceExt;

    use crate::catalog_source::StoreCatalog;
    use crate::store::{Collection, Document, StoreError};

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.service, Service::All);
        assert!(!config.cors_permissive);
    }

    #[test]
    fn service_display_uses_name() {
        assert_eq!(Service::Rentals.to_string(), "rentals");
        assert_eq!(Service::All.to_string(), "all");
    }

    /// Store whose reads outlast any reasonable request timeout
    struct SlowStore;

    #[async_trait]
    impl DocumentStore for SlowStore {
        async fn find_all(&self, _: Collection) -> Result<Vec<Document>, StoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }

        async fn find_one(
            &self,
            _: Collection,
            _: &DocumentId,
        ) -> Result<Option<Document>, StoreError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }

        async fn insert_many(&self, _: Collection, _: Vec<Document>) -> Result<u64, StoreError> {
            Ok(0)
        }

        async fn upsert(&self, _: Collection, _: Document) -> Result<(), StoreError> {
            Ok(())
        }

        async fn delete(&self, _: Collection, _: &DocumentId) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn slow_request_times_out_with_408() {
        let store: Arc<dyn DocumentStore> = Arc::new(SlowStore);
        let catalog = Arc::new(StoreCatalog::new(store.clone()));
        let config = ServerConfig {
            service: Service::Catalog,
            request_timeout: Duration::from_millis(50),
            ..ServerConfig::default()
        };
        let app = build_router(AppState::new(store, catalog), &config);

        let request = Request::builder()
            .uri("/catalog")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
