//! In-process store for tests.

use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::document::{lookup, merge_into};
use super::{Document, DocumentStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<BTreeMap<String, BTreeMap<String, Document>>>,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `set`/`delete` fail with `WriteFailed`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert a raw document, bypassing the merge logic.
    pub fn insert_raw(&self, collection: &str, id: &str, doc: Document) {
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
    }

    pub fn count(&self, collection: &str) -> usize {
        self.lock().get(collection).map_or(0, BTreeMap::len)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, BTreeMap<String, Document>>> {
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteFailed(
                io::Error::other("writes disabled").into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .lock()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Document,
        merge: bool,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut collections = self.lock();
        let docs = collections.entry(collection.to_string()).or_default();
        let doc = docs.entry(id.to_string()).or_default();
        if !merge {
            doc.clear();
        }
        merge_into(doc, data);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<bool, StoreError> {
        self.check_writable()?;
        let mut collections = self.lock();
        let Some(doc) = collections.get_mut(collection).and_then(|docs| docs.get_mut(id)) else {
            return Ok(false);
        };
        merge_into(doc, data);
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        if let Some(docs) = self.lock().get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn query_array_contains(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let needle = Value::String(value.to_string());
        let collections = self.lock();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, doc)| {
                lookup(doc, field)
                    .and_then(Value::as_array)
                    .is_some_and(|items| items.contains(&needle))
            })
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, StoreError> {
        Ok(self
            .lock()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[tokio::test]
    async fn array_contains_scan() {
        let store = MemoryDocumentStore::new();
        store
            .set("users", "a", doc(json!({"subscribers": ["1", "2"]})), false)
            .await
            .unwrap();
        store
            .set("users", "b", doc(json!({"subscribers": ["2"]})), false)
            .await
            .unwrap();

        let hits = store
            .query_array_contains("users", "subscribers", "1")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "a");
        assert!(
            store
                .query_array_contains("missing", "subscribers", "1")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn update_skips_missing_documents() {
        let store = MemoryDocumentStore::new();
        assert!(!store.update("c", "a", doc(json!({"x": 1}))).await.unwrap());
        assert_eq!(store.count("c"), 0);

        store.set("c", "a", doc(json!({"x": 1})), false).await.unwrap();
        assert!(store.update("c", "a", doc(json!({"y": 2}))).await.unwrap());
        assert_eq!(
            Value::Object(store.get("c", "a").await.unwrap().unwrap()),
            json!({"x": 1, "y": 2})
        );
    }

    #[tokio::test]
    async fn write_failures_leave_data_untouched() {
        let store = MemoryDocumentStore::new();
        store.set("c", "a", doc(json!({"x": 1})), false).await.unwrap();

        store.fail_writes(true);
        assert!(matches!(
            store.set("c", "a", doc(json!({"x": 2})), true).await,
            Err(StoreError::WriteFailed(_))
        ));
        assert!(store.delete("c", "a").await.is_err());

        let got = store.get("c", "a").await.unwrap().unwrap();
        assert_eq!(got["x"], json!(1));
    }
}
