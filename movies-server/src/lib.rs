//! movies-server: HTTP services for the movie rental demo
//!
//! Three thin services over one document store:
//! - catalog: the static list of rentable movies
//! - rentals: rent/return and the priced rentals listing
//! - api: the movies and watching lists
//!
//! Any of them, or all three, can run in a single process.

pub mod catalog_source;
pub mod http;
pub mod store;

pub use catalog_source::{CatalogError, CatalogSource, HttpCatalog, StoreCatalog};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError, Service};
pub use store::{
    create_pool, seed, Collection, Document, DocumentStore, MemoryDocumentStore, PgDocumentStore,
    StoreError,
};
