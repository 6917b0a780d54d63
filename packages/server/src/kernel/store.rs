//! PgStore - tenant-scoped document store on Postgres JSONB.
//!
//! One table holds every collection; rows are scoped by (namespace,
//! collection) and keyed by the caller's primary key. Lookups use JSONB
//! containment so any subset of document fields works as a filter.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::traits::BaseStore;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseStore for PgStore {
    async fn find_one(
        &self,
        namespace: &str,
        collection: &str,
        filter: Value,
    ) -> Result<Option<Value>> {
        let doc = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT doc FROM documents
            WHERE namespace = $1 AND collection = $2 AND doc @> $3
            LIMIT 1
            "#,
        )
        .bind(namespace)
        .bind(collection)
        .bind(filter)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc)
    }

    async fn save(
        &self,
        namespace: &str,
        collection: &str,
        key: &str,
        document: Value,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (namespace, collection, doc_key, doc)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (namespace, collection, doc_key)
            DO UPDATE SET doc = EXCLUDED.doc, updated_at = now()
            "#,
        )
        .bind(namespace)
        .bind(collection)
        .bind(key)
        .bind(document)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
