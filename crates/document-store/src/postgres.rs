use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{Document, DocumentStore, DocumentStoreError, ETag, EntityId, Result};

/// PostgreSQL-backed document store implementation.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_document(row: PgRow) -> Result<Document> {
        Ok(Document {
            collection: row.try_get("collection")?,
            id: EntityId::from_uuid(row.try_get::<Uuid, _>("id")?),
            etag: ETag::from_string(row.try_get::<String, _>("etag")?),
            updated_at: row.try_get("updated_at")?,
            body: row.try_get("body")?,
        })
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        id: EntityId,
        body: serde_json::Value,
    ) -> Result<Document> {
        let doc = Document::new_revision(collection, id, body);

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, etag, updated_at, body)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&doc.collection)
        .bind(doc.id.as_uuid())
        .bind(doc.etag.as_str())
        .bind(doc.updated_at)
        .bind(&doc.body)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // A primary key violation means the identity is already taken
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return DocumentStoreError::DuplicateId {
                    collection: collection.to_string(),
                    id,
                };
            }
            DocumentStoreError::Database(e)
        })?;

        Ok(doc)
    }

    async fn get(&self, collection: &str, id: EntityId) -> Result<Option<Document>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT collection, id, etag, updated_at, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_document).transpose()
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT collection, id, etag, updated_at, body
            FROM documents
            WHERE collection = $1
            ORDER BY id ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn replace(
        &self,
        collection: &str,
        id: EntityId,
        expected: &ETag,
        body: serde_json::Value,
    ) -> Result<Document> {
        let etag = ETag::generate();
        let updated_at = Utc::now();

        // Single conditional UPDATE: the token check and the write are one
        // atomic statement executed by the database.
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET etag = $1, updated_at = $2, body = $3
            WHERE collection = $4 AND id = $5 AND etag = $6
            "#,
        )
        .bind(etag.as_str())
        .bind(updated_at)
        .bind(&body)
        .bind(collection)
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Zero rows affected: either the document is gone or the token
            // is stale. Re-read the stored token to tell the two apart.
            let actual: Option<String> =
                sqlx::query_scalar("SELECT etag FROM documents WHERE collection = $1 AND id = $2")
                    .bind(collection)
                    .bind(id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await?;

            return Err(match actual {
                Some(actual) => DocumentStoreError::ConcurrencyConflict {
                    collection: collection.to_string(),
                    id,
                    expected: expected.clone(),
                    actual: ETag::from_string(actual),
                },
                None => DocumentStoreError::NotFound {
                    collection: collection.to_string(),
                    id,
                },
            });
        }

        Ok(Document {
            collection: collection.to_string(),
            id,
            etag,
            updated_at,
            body,
        })
    }

    async fn delete(&self, collection: &str, id: EntityId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
