use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::db::{CommunityConfig, Repository, StoreError, TrackedIdentity};
use crate::notify::{Announcement, NotificationSink, rank_change_announcement};
use crate::rank::{RankChange, classify};
use crate::riot::{RankedStatsApi, RiotError};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Riot(#[from] RiotError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RefreshError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Riot(e) if e.is_auth())
    }
}

/// Fetch, classify, persist and announce for a single tracked player.
pub struct RankRefresher {
    repo: Repository,
    api: Arc<dyn RankedStatsApi>,
    sink: Arc<dyn NotificationSink>,
}

impl RankRefresher {
    pub fn new(
        repo: Repository,
        api: Arc<dyn RankedStatsApi>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self { repo, api, sink }
    }

    /// The new snapshot is saved even when nothing changed. Notifications only go out once
    /// the save went through.
    #[instrument(skip_all, fields(riot_id = %identity.key()))]
    pub async fn refresh(&self, identity: &TrackedIdentity) -> Result<RankChange, RefreshError> {
        let current = self.api.fetch_rank_snapshot(&identity.puuid).await?;
        let change = classify(identity.rank, current);

        if !self.repo.save_rank(&identity.key(), current).await? {
            debug!("🔄 Player untracked meanwhile, nothing to announce");
            return Ok(change);
        }

        if !change.is_changed() {
            debug!(rank = %current, "🔄 No rank change");
            return Ok(change);
        }

        info!(
            kind = ?change.kind,
            previous = %change.previous,
            current = %change.current,
            "🏆 Rank change detected"
        );
        self.announce(identity, &change).await;

        Ok(change)
    }

    async fn announce(&self, identity: &TrackedIdentity, change: &RankChange) {
        let mut announcement: Option<Announcement> = None;

        for community in &identity.subscribers {
            let channel = match self.repo.community_config(*community).await {
                Ok(Some(CommunityConfig {
                    channel_id: Some(channel),
                })) => channel,
                Ok(_) => {
                    debug!(guild_id = %community, "✉️ No notification channel, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, guild_id = %community, "✉️ ⚠️ Could not load guild config");
                    continue;
                }
            };

            if announcement.is_none() {
                let last_match = match self.api.fetch_recent_match_summary(&identity.puuid).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        warn!(error = %e, "🎮 ⚠️ Could not fetch latest match, announcing without it");
                        None
                    }
                };
                announcement = Some(rank_change_announcement(
                    &identity.key(),
                    change,
                    last_match.as_ref(),
                ));
            }

            let Some(announcement) = announcement.as_ref() else {
                continue;
            };
            if let Err(e) = self.sink.send(channel, announcement).await {
                warn!(
                    error = %e,
                    guild_id = %community,
                    channel_id = %channel,
                    "✉️ ❌ Failed to send rank announcement"
                );
            }
        }
    }
}
