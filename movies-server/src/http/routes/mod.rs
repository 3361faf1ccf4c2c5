//! Route handlers organized by service

pub mod api;
pub mod catalog;
pub mod health;
pub mod rentals;
pub mod users;

use axum::Json;
use serde_json::Value;

use crate::store::{Document, StoreError};

/// Documents as a JSON array, or `[]` when the query failed.
///
/// Read endpoints never report store errors to the client; the failure is
/// logged and the client sees an empty collection.
pub(crate) fn documents_or_empty(
    result: Result<Vec<Document>, StoreError>,
    what: &str,
) -> Json<Vec<Value>> {
    match result {
        Ok(docs) => Json(docs.into_iter().map(Document::into_value).collect()),
        Err(e) => {
            tracing::error!("failed to query {}: {}", what, e);
            Json(Vec::new())
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Router test helpers

    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{HeaderMap, Request, StatusCode};
    use axum::Router;
    use movies_core::{CatalogItem, DocumentId, SeedSet};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::catalog_source::{CatalogError, CatalogSource, StoreCatalog};
    use crate::http::server::{build_router, AppState, ServerConfig, Service};
    use crate::store::{seed, Collection, Document, DocumentStore, MemoryDocumentStore, StoreError};

    /// Store whose every operation fails, like an unreachable database
    pub struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn find_all(&self, _: Collection) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn find_one(
            &self,
            _: Collection,
            _: &DocumentId,
        ) -> Result<Option<Document>, StoreError> {
            Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn insert_many(&self, _: Collection, _: Vec<Document>) -> Result<u64, StoreError> {
            Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn upsert(&self, _: Collection, _: Document) -> Result<(), StoreError> {
            Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
        }

        async fn delete(&self, _: Collection, _: &DocumentId) -> Result<bool, StoreError> {
            Err(StoreError::Sqlx(sqlx::Error::PoolTimedOut))
        }
    }

    /// Catalog service that is down
    pub struct UnavailableCatalog;

    #[async_trait]
    impl CatalogSource for UnavailableCatalog {
        async fn fetch(&self, _: &HeaderMap) -> Result<Vec<CatalogItem>, CatalogError> {
            Err(CatalogError::Status { status: 503 })
        }
    }

    /// In-memory store with every built-in seed set loaded
    pub async fn seeded_store() -> Arc<MemoryDocumentStore> {
        let store = Arc::new(MemoryDocumentStore::new());
        for set in SeedSet::ALL {
            seed(store.as_ref(), set).await.unwrap();
        }
        store
    }

    pub fn app_with(
        service: Service,
        store: Arc<dyn DocumentStore>,
        catalog: Arc<dyn CatalogSource>,
    ) -> Router {
        let config = ServerConfig {
            service,
            ..ServerConfig::default()
        };
        build_router(AppState::new(store, catalog), &config)
    }

    /// Router over `store`, reading the catalog from the same store
    pub fn app(service: Service, store: Arc<dyn DocumentStore>) -> Router {
        let catalog = Arc::new(StoreCatalog::new(store.clone()));
        app_with(service, store, catalog)
    }

    pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        send(app, request).await
    }

    /// Send a request; an empty body decodes to `Value::Null`.
    pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}
