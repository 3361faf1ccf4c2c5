//! Where the rentals service reads the catalog from
//!
//! Deployed separately, rentals calls the catalog service over HTTP. When
//! both routers share a process the catalog collection is read directly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};
use serde_json::Value;

use movies_core::CatalogItem;

use crate::store::{Collection, DocumentStore, StoreError};

/// Tracing headers forwarded from the incoming request to the catalog call
pub static PROPAGATED_HEADERS: [HeaderName; 3] = [
    HeaderName::from_static("baggage"),
    HeaderName::from_static("traceparent"),
    HeaderName::from_static("tracestate"),
];

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("catalog service answered {status}")]
    Status { status: u16 },

    #[error("catalog store error: {0}")]
    Store(#[from] StoreError),
}

/// Source of catalog items for the rentals join
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the whole catalog. `headers` are the incoming request's headers.
    async fn fetch(&self, headers: &HeaderMap) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// Catalog served by a remote catalog service
pub struct HttpCatalog {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalog {
    /// `base_url` is the catalog service root, e.g. `http://catalog:8080`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/catalog", base_url.trim_end_matches('/')),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn propagated(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in PROPAGATED_HEADERS.iter() {
        for value in headers.get_all(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn fetch(&self, headers: &HeaderMap) -> Result<Vec<CatalogItem>, CatalogError> {
        let response = self
            .client
            .get(&self.url)
            .headers(propagated(headers))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let docs: Vec<Value> = response.json().await?;
        Ok(docs
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<CatalogItem>(doc) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("skipping catalog item: {}", e);
                    None
                }
            })
            .collect())
    }
}

/// Catalog read straight from the document store
pub struct StoreCatalog {
    store: Arc<dyn DocumentStore>,
}

impl StoreCatalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogSource for StoreCatalog {
    async fn fetch(&self, _headers: &HeaderMap) -> Result<Vec<CatalogItem>, CatalogError> {
        let docs = self.store.find_all(Collection::Catalog).await?;

        Ok(docs
            .iter()
            .filter_map(|doc| match doc.decode::<CatalogItem>() {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("skipping catalog document: {}", e);
                    None
                }
            })
            .collect())
    }
}
