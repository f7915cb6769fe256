use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::models::{CommunityConfig, Snowflake, Subscription, TrackedIdentity};
use super::{Document, DocumentStore, StoreError};
use crate::identity::RiotId;
use crate::rank::RankSnapshot;

pub const TRACKED_USERS: &str = "tracked_users";
pub const GUILD_CONFIG: &str = "guild_config";

/// Result of removing a community from an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsubscribe {
    NotSubscribed,
    /// Other communities still follow the player.
    Removed,
    /// That was the last subscriber, the record is gone.
    Deleted,
}

fn encode<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value).map_err(StoreError::Encode)? {
        Value::Object(doc) => Ok(doc),
        other => Err(StoreError::Encode(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        )))),
    }
}

fn decode<T: DeserializeOwned>(collection: &str, id: &str, doc: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(doc)).map_err(|source| StoreError::Malformed {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })
}

fn patch(value: Value) -> Document {
    match value {
        Value::Object(doc) => doc,
        _ => Document::new(),
    }
}

/// Typed access to the `tracked_users` and `guild_config` collections.
#[derive(Clone, Debug)]
pub struct Repository {
    docs: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(docs: Arc<dyn DocumentStore>) -> Self {
        Self { docs }
    }

    // === Identity operations ===

    pub async fn get_identity(
        &self,
        riot_id: &RiotId,
    ) -> Result<Option<TrackedIdentity>, StoreError> {
        let key = riot_id.key();
        self.docs
            .get(TRACKED_USERS, &key)
            .await?
            .map(|doc| decode(TRACKED_USERS, &key, doc))
            .transpose()
    }

    /// Write a brand new record, replacing anything under the same key.
    pub async fn create_identity(&self, identity: &TrackedIdentity) -> Result<(), StoreError> {
        self.docs
            .set(TRACKED_USERS, &identity.key(), encode(identity)?, false)
            .await
    }

    /// Add `community` to an existing record.
    pub async fn add_subscriber(
        &self,
        identity: &TrackedIdentity,
        community: Snowflake,
        subscription: Subscription,
    ) -> Result<(), StoreError> {
        let mut subscribers = identity.subscribers.clone();
        if !subscribers.contains(&community) {
            subscribers.push(community);
        }

        let mut data = patch(json!({ "subscribers": subscribers }));
        data.insert(
            format!("communities.{community}"),
            serde_json::to_value(subscription).map_err(StoreError::Encode)?,
        );
        self.docs
            .set(TRACKED_USERS, &identity.key(), data, true)
            .await
    }

    /// Drop `community` from the record, deleting it once nobody follows the player.
    pub async fn remove_subscriber(
        &self,
        riot_id: &RiotId,
        community: Snowflake,
    ) -> Result<Unsubscribe, StoreError> {
        let Some(mut identity) = self.get_identity(riot_id).await? else {
            return Ok(Unsubscribe::NotSubscribed);
        };
        if !identity.is_subscribed(community) {
            return Ok(Unsubscribe::NotSubscribed);
        }

        identity.subscribers.retain(|id| *id != community);
        identity.communities.remove(&community);

        if identity.subscribers.is_empty() {
            self.docs.delete(TRACKED_USERS, &riot_id.key()).await?;
            debug!(riot_id = %riot_id, "🗑️ last subscriber left, record deleted");
            return Ok(Unsubscribe::Deleted);
        }

        self.create_identity(&identity).await?;
        Ok(Unsubscribe::Removed)
    }

    /// Persist a fresh snapshot. Returns `false` when the record vanished meanwhile.
    pub async fn save_rank(&self, key: &str, rank: RankSnapshot) -> Result<bool, StoreError> {
        let data = patch(json!({ "rank": rank }));
        self.docs.update(TRACKED_USERS, key, data).await
    }

    /// Every tracked identity; unreadable documents are logged and skipped.
    pub async fn all_identities(&self) -> Result<Vec<TrackedIdentity>, StoreError> {
        let docs = self.docs.list(TRACKED_USERS).await?;
        Ok(decode_all(docs))
    }

    pub async fn identities_for_community(
        &self,
        community: Snowflake,
    ) -> Result<Vec<TrackedIdentity>, StoreError> {
        let docs = self
            .docs
            .query_array_contains(TRACKED_USERS, "subscribers", &community.to_string())
            .await?;
        Ok(decode_all(docs))
    }

    // === Community operations ===

    pub async fn community_config(
        &self,
        community: Snowflake,
    ) -> Result<Option<CommunityConfig>, StoreError> {
        let id = community.to_string();
        self.docs
            .get(GUILD_CONFIG, &id)
            .await?
            .map(|doc| decode(GUILD_CONFIG, &id, doc))
            .transpose()
    }

    pub async fn set_notification_channel(
        &self,
        community: Snowflake,
        channel: Snowflake,
    ) -> Result<(), StoreError> {
        let config = CommunityConfig {
            channel_id: Some(channel),
        };
        self.docs
            .set(GUILD_CONFIG, &community.to_string(), encode(&config)?, true)
            .await
    }
}

fn decode_all(docs: Vec<(String, Document)>) -> Vec<TrackedIdentity> {
    docs.into_iter()
        .filter_map(|(id, doc)| match decode(TRACKED_USERS, &id, doc) {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!(id, error = %e, "⚠️ skipping unreadable tracked identity");
                None
            }
        })
        .collect()
}
