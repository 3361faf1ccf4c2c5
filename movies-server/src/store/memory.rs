//! In-process document store
//!
//! Same semantics as the PostgreSQL backend, nothing survives a restart.
//! Used by `movies serve --in-memory` and by the router tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use movies_core::DocumentId;

use super::{Collection, Document, DocumentStore, StoreError};

/// Collections kept as insertion-ordered vectors
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|stored| stored.iter().find(|d| &d.id == id))
            .cloned())
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<Document>,
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection).or_default();

        let mut inserted = 0;
        for doc in docs {
            if stored.iter().any(|d| d.id == doc.id) {
                continue;
            }
            stored.push(doc);
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn upsert(&self, collection: Collection, doc: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection).or_default();

        match stored.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => existing.body = doc.body,
            None => stored.push(doc),
        }
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &DocumentId) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(stored) = collections.get_mut(&collection) else {
            return Ok(false);
        };

        let before = stored.len();
        stored.retain(|d| &d.id != id);
        Ok(stored.len() != before)
    }
}
