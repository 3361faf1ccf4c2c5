//! movies-core: domain model for the movie rental services
//!
//! Shared by the HTTP services in `movies-server` and the `movies` binary:
//! - Document types (catalog items, rentals, request bodies)
//! - Rental pricing and the rentals/catalog join
//! - Built-in seed collections
//! - Environment configuration

pub mod config;
pub mod error;
pub mod model;
pub mod pricing;
pub mod seed;

pub use error::{MoviesError, Result};
pub use model::{CatalogItem, DocumentId, ExpandedRental, Rental, RentRequest, ReturnRequest};
pub use pricing::{expand_rentals, rental_price, RENTAL_MARKUP};
pub use seed::{SeedDocument, SeedSet};
