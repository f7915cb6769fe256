//! Persistence: a small document store interface, its adapters and the typed repository the
//! rest of the crate talks to.

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

mod document;
#[cfg(test)]
pub mod memory;
mod migrations;
mod models;
mod repository;
mod sqlite;

pub use models::{CommunityConfig, Snowflake, Subscription, TrackedIdentity};
pub use repository::{Repository, Unsubscribe};
pub use sqlite::SqliteDocumentStore;

/// A stored JSON object.
pub type Document = Map<String, Value>;

pub type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] BoxError),

    #[error("store read failed: {0}")]
    Read(#[source] BoxError),

    #[error("store write failed: {0}")]
    WriteFailed(#[source] BoxError),

    #[error("malformed document {collection}/{id}: {source}")]
    Malformed {
        collection: String,
        id: String,
        source: serde_json::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Collections of JSON documents addressed by id.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Write `data`. With `merge`, keys are merged into the existing document (dotted keys
    /// address nested maps), otherwise the document is replaced.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Document,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Merge `data` into an existing document. Returns `false`, writing nothing, when the
    /// document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Document,
    ) -> Result<bool, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Documents whose array at `field` contains the string `value`.
    async fn query_array_contains(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, Document)>, StoreError>;

    /// Every document of a collection, ordered by id.
    async fn list(&self, collection: &str) -> Result<Vec<(String, Document)>, StoreError>;
}
