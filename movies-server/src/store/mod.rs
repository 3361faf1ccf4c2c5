//! Document store - one keyed collection per service concern
//!
//! The services only need a handful of collection operations: read everything
//! or one key, bulk insert that tolerates existing keys, upsert by key and
//! delete by key.
//! Backends:
//! - [`PgDocumentStore`]: PostgreSQL, JSONB bodies
//! - [`MemoryDocumentStore`]: process-local, for development and tests

pub mod memory;
pub mod pool;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use movies_core::{DocumentId, MoviesError, SeedSet};

pub use memory::MemoryDocumentStore;
pub use pool::create_pool;
pub use postgres::PgDocumentStore;

/// Named collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Catalog,
    Rentals,
    Movies,
    Watching,
    Users,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Catalog => "catalog",
            Collection::Rentals => "rentals",
            Collection::Movies => "movies",
            Collection::Watching => "watching",
            Collection::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<SeedSet> for Collection {
    fn from(set: SeedSet) -> Self {
        match set {
            SeedSet::Catalog => Collection::Catalog,
            SeedSet::Movies => Collection::Movies,
            SeedSet::Watching => Collection::Watching,
            SeedSet::Users => Collection::Users,
        }
    }
}

/// A stored document: its key and its JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn new(id: DocumentId, body: Map<String, Value>) -> Self {
        Self { id, body }
    }

    /// Serialize `value` into a document body keyed by `id`.
    pub fn from_serializable<T: Serialize>(id: DocumentId, value: &T) -> Result<Self, StoreError> {
        match serde_json::to_value(value).map_err(StoreError::Encode)? {
            Value::Object(body) => Ok(Self { id, body }),
            other => Err(StoreError::NotAnObject {
                id: id.into_string(),
                kind: json_kind(&other),
            }),
        }
    }

    /// Decode the body into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.body.clone())).map_err(|source| {
            StoreError::Decode {
                id: self.id.to_string(),
                source,
            }
        })
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("failed to encode document: {0}")]
    Encode(serde_json::Error),

    #[error("failed to decode document '{id}': {source}")]
    Decode {
        id: String,
        source: serde_json::Error,
    },

    #[error("document '{id}' is a JSON {kind}, expected an object")]
    NotAnObject { id: String, kind: &'static str },

    #[error("seed data error: {0}")]
    Seed(#[from] MoviesError),
}

/// Collection operations shared by every backend
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of `collection`, in insertion order.
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError>;

    /// The document stored under `id`, if any.
    async fn find_one(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert `docs`, skipping any whose id is already stored.
    ///
    /// Returns how many were inserted.
    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<Document>,
    ) -> Result<u64, StoreError>;

    /// Insert `doc` or replace the body stored under its id.
    async fn upsert(&self, collection: Collection, doc: Document) -> Result<(), StoreError>;

    /// Remove the document with `id`. Returns whether one existed.
    async fn delete(&self, collection: Collection, id: &DocumentId) -> Result<bool, StoreError>;
}

/// Load a built-in seed set into its collection.
///
/// Existing documents are left untouched, so seeding twice is harmless.
pub async fn seed(store: &dyn DocumentStore, set: SeedSet) -> Result<u64, StoreError> {
    let docs = set
        .documents()?
        .into_iter()
        .map(|d| Document::new(d.id, d.body))
        .collect();

    let inserted = store.insert_many(Collection::from(set), docs).await?;
    tracing::info!(collection = %set, inserted, "seeded collection");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use movies_core::Rental;
    use serde_json::json;

    #[test]
    fn from_serializable_requires_object() {
        let err = Document::from_serializable(DocumentId::from("1"), &json!([1, 2])).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject { kind: "array", .. }));
    }

    #[test]
    fn decode_round_trips_rental() {
        let rental = Rental::new(DocumentId::from("5"), Some(2.0));
        let doc = Document::from_serializable(rental.id.clone(), &rental).unwrap();
        let back: Rental = doc.decode().unwrap();
        assert_eq!(back, rental);
    }

    #[tokio::test]
    async fn seeding_twice_inserts_once() {
        let store = MemoryDocumentStore::new();
        assert_eq!(seed(&store, SeedSet::Catalog).await.unwrap(), 6);
        assert_eq!(seed(&store, SeedSet::Catalog).await.unwrap(), 0);
        assert_eq!(store.find_all(Collection::Catalog).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn users_seed_into_their_own_collection() {
        let store = MemoryDocumentStore::new();
        seed(&store, SeedSet::Users).await.unwrap();

        let user = store
            .find_one(Collection::Users, &DocumentId::from("2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.body["Firstname"], "James");
        assert!(store.find_all(Collection::Catalog).await.unwrap().is_empty());
    }
}
