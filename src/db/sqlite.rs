use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use super::document::merge_into;
use super::migrations::run_migrations;
use super::{Document, DocumentStore, StoreError};

/// Documents kept as JSON text in a single SQLite table.
#[derive(Clone, Debug)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Open (creating the file if needed) and migrate.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Unavailable(e.into()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Unavailable(e.into()))?;

        info!(url, "🗄️ Connected to database");
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗄️ Database pool closed");
    }
}

fn decode(collection: &str, id: &str, data: &str) -> Result<Document, StoreError> {
    serde_json::from_str(data).map_err(|source| StoreError::Malformed {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })
}

fn read_err(e: sqlx::Error) -> StoreError {
    StoreError::Read(e.into())
}

fn write_err(e: sqlx::Error) -> StoreError {
    StoreError::WriteFailed(e.into())
}

const UPSERT: &str = r#"
INSERT INTO documents (collection, id, data, updated_at)
VALUES (?, ?, ?, unixepoch())
ON CONFLICT(collection, id) DO UPDATE SET
    data = excluded.data,
    updated_at = excluded.updated_at
"#;

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(read_err)?;

        row.map(|(data,)| decode(collection, id, &data)).transpose()
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Document,
        merge: bool,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(write_err)?;

        let mut doc = Document::new();
        if merge {
            let existing: Option<(String,)> =
                sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                    .bind(collection)
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(write_err)?;
            if let Some((raw,)) = existing {
                doc = decode(collection, id, &raw)?;
            }
        }
        merge_into(&mut doc, data);

        let encoded = serde_json::to_string(&doc).map_err(StoreError::Encode)?;
        sqlx::query(UPSERT)
            .bind(collection)
            .bind(id)
            .bind(encoded)
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;

        tx.commit().await.map_err(write_err)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(write_err)?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(write_err)?;
        let Some((raw,)) = existing else {
            return Ok(false);
        };

        let mut doc = decode(collection, id, &raw)?;
        merge_into(&mut doc, data);

        let encoded = serde_json::to_string(&doc).map_err(StoreError::Encode)?;
        let updated = sqlx::query(
            "UPDATE documents SET data = ?, updated_at = unixepoch() \
             WHERE collection = ? AND id = ?",
        )
        .bind(encoded)
        .bind(collection)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(write_err)?
        .rows_affected();

        tx.commit().await.map_err(write_err)?;
        Ok(updated > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(write_err)?;
        Ok(())
    }

    async fn query_array_contains(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT d.id, d.data FROM documents d
            WHERE d.collection = ?
              AND EXISTS (
                SELECT 1 FROM json_each(d.data, ?) j
                WHERE j.type = 'text' AND j.value = ?
              )
            ORDER BY d.id
            "#,
        )
        .bind(collection)
        .bind(format!("$.{field}"))
        .bind(value)
        .fetch_all(&self.pool)
        .await
        .map_err(read_err)?;

        rows.into_iter()
            .map(|(id, data)| decode(collection, &id, &data).map(|doc| (id, doc)))
            .collect()
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, StoreError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = ? ORDER BY id")
                .bind(collection)
                .fetch_all(&self.pool)
                .await
                .map_err(read_err)?;

        rows.into_iter()
            .map(|(id, data)| decode(collection, &id, &data).map(|doc| (id, doc)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    async fn store() -> SqliteDocumentStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteDocumentStore::from_pool(pool).await.unwrap()
    }

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = store().await;
        assert!(store.get("c", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_replace_and_merge() {
        let store = store().await;
        store
            .set("c", "a", doc(json!({"x": 1, "nested": {"k": "v"}})), false)
            .await
            .unwrap();
        store
            .set("c", "a", doc(json!({"y": 2, "nested.other": true})), true)
            .await
            .unwrap();

        let got = store.get("c", "a").await.unwrap().unwrap();
        assert_eq!(
            Value::Object(got),
            json!({"x": 1, "y": 2, "nested": {"k": "v", "other": true}})
        );

        store.set("c", "a", doc(json!({"z": 3})), false).await.unwrap();
        let got = store.get("c", "a").await.unwrap().unwrap();
        assert_eq!(Value::Object(got), json!({"z": 3}));
    }

    #[tokio::test]
    async fn merge_creates_missing_document() {
        let store = store().await;
        store
            .set("c", "new", doc(json!({"communities.1": {"added_by": "2"}})), true)
            .await
            .unwrap();

        let got = store.get("c", "new").await.unwrap().unwrap();
        assert_eq!(
            Value::Object(got),
            json!({"communities": {"1": {"added_by": "2"}}})
        );
    }

    #[tokio::test]
    async fn update_only_touches_existing_documents() {
        let store = store().await;
        assert!(!store.update("c", "gone", doc(json!({"rank": 1}))).await.unwrap());
        assert!(store.get("c", "gone").await.unwrap().is_none());

        store
            .set("c", "a", doc(json!({"x": 1, "nested": {"k": "v"}})), false)
            .await
            .unwrap();
        assert!(store.update("c", "a", doc(json!({"nested.k": "w"}))).await.unwrap());

        let got = store.get("c", "a").await.unwrap().unwrap();
        assert_eq!(Value::Object(got), json!({"x": 1, "nested": {"k": "w"}}));
    }

    #[tokio::test]
    async fn delete_removes_document() {
        let store = store().await;
        store.set("c", "a", doc(json!({"x": 1})), false).await.unwrap();
        store.delete("c", "a").await.unwrap();
        store.delete("c", "a").await.unwrap();
        assert!(store.get("c", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn array_contains_scan_matches_strings_only() {
        let store = store().await;
        store
            .set("users", "a", doc(json!({"subscribers": ["1", "2"]})), false)
            .await
            .unwrap();
        store
            .set("users", "b", doc(json!({"subscribers": ["2"]})), false)
            .await
            .unwrap();
        store
            .set("users", "c", doc(json!({"subscribers": [1]})), false)
            .await
            .unwrap();
        store
            .set("other", "d", doc(json!({"subscribers": ["1"]})), false)
            .await
            .unwrap();

        let ids: Vec<String> = store
            .query_array_contains("users", "subscribers", "1")
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["a".to_string()]);

        let ids: Vec<String> = store
            .query_array_contains("users", "subscribers", "2")
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn list_is_scoped_to_collection() {
        let store = store().await;
        store.set("users", "b", doc(json!({})), false).await.unwrap();
        store.set("users", "a", doc(json!({})), false).await.unwrap();
        store.set("guilds", "z", doc(json!({})), false).await.unwrap();

        let ids: Vec<String> = store
            .list("users")
            .await
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn connect_to_bad_url_is_unavailable() {
        let err = SqliteDocumentStore::connect("postgres://nope")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
