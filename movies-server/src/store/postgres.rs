//! PostgreSQL document store
//!
//! All collections share one table. Bodies are JSONB; `seq` keeps the
//! insertion order that `find_all` returns.
//! - insert_many: ON CONFLICT DO NOTHING inside one transaction
//! - upsert: ON CONFLICT DO UPDATE, row keeps its `seq`

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use movies_core::DocumentId;

use super::{Collection, Document, DocumentStore, StoreError};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS movies_documents (
        seq        BIGSERIAL,
        collection TEXT  NOT NULL,
        id         TEXT  NOT NULL,
        body       JSONB NOT NULL,
        PRIMARY KEY (collection, id)
    )
"#;

/// Document store backed by a PostgreSQL pool
pub struct PgDocumentStore {
    pool: PgPool,
    schema: OnceCell<()>,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the table on first use. A failed attempt is retried by the
    /// next operation rather than cached.
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
                tracing::debug!("movies_documents table ready");
                Ok::<(), StoreError>(())
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_all(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        self.ensure_schema().await?;

        let rows: Vec<(String, Json<Map<String, Value>>)> = sqlx::query_as(
            r#"
            SELECT id, body
            FROM movies_documents
            WHERE collection = $1
            ORDER BY seq
            "#,
        )
        .bind(collection.name())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(body))| Document::new(DocumentId::new(id), body))
            .collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: &DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        self.ensure_schema().await?;

        let row: Option<(Json<Map<String, Value>>,)> = sqlx::query_as(
            "SELECT body FROM movies_documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.name())
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(body),)| Document::new(id.clone(), body)))
    }

    async fn insert_many(
        &self,
        collection: Collection,
        docs: Vec<Document>,
    ) -> Result<u64, StoreError> {
        self.ensure_schema().await?;

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for doc in docs {
            let result = sqlx::query(
                r#"
                INSERT INTO movies_documents (collection, id, body)
                VALUES ($1, $2, $3)
                ON CONFLICT (collection, id) DO NOTHING
                "#,
            )
            .bind(collection.name())
            .bind(doc.id.as_str())
            .bind(Json(&doc.body))
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;

        Ok(inserted)
    }

    async fn upsert(&self, collection: Collection, doc: Document) -> Result<(), StoreError> {
        self.ensure_schema().await?;

        sqlx::query(
            r#"
            INSERT INTO movies_documents (collection, id, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body
            "#,
        )
        .bind(collection.name())
        .bind(doc.id.as_str())
        .bind(Json(&doc.body))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &DocumentId) -> Result<bool, StoreError> {
        self.ensure_schema().await?;

        let result = sqlx::query("DELETE FROM movies_documents WHERE collection = $1 AND id = $2")
            .bind(collection.name())
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
