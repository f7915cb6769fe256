//! Delivery of rank change announcements.

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, ChannelId, CreateEmbed, CreateMessage};

use crate::db::{BoxError, Snowflake};

mod format;

pub use format::rank_change_announcement;

/// A rendered message, independent of the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub description: String,
    pub colour: u32,
    /// `(name, value, inline)`
    pub fields: Vec<(String, String, bool)>,
}

impl Announcement {
    pub fn to_embed(&self) -> CreateEmbed {
        CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .color(self.colour)
            .fields(self.fields.clone())
    }
}

/// Where announcements go.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, channel: Snowflake, announcement: &Announcement) -> Result<(), BoxError>;
}

#[async_trait]
impl NotificationSink for Arc<serenity::Http> {
    async fn send(&self, channel: Snowflake, announcement: &Announcement) -> Result<(), BoxError> {
        if channel.get() == 0 {
            return Err("channel id 0 is not a valid Discord channel".into());
        }

        ChannelId::new(channel.get())
            .send_message(self, CreateMessage::new().embed(announcement.to_embed()))
            .await
            .map(|_| ())
            .map_err(Into::into)
    }
}
