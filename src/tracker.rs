//! The operations behind the slash commands.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, instrument, warn};

use crate::db::{Repository, Snowflake, Subscription, TrackedIdentity, Unsubscribe};
use crate::error::AppError;
use crate::identity::RiotId;
use crate::poller::{RankRefresher, RefreshError};
use crate::rank::RankChange;
use crate::rank::leaderboard::{LeaderboardEntry, rank_entries};
use crate::riot::{RankedStatsApi, RiotError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// First community to follow this player.
    Created,
    /// Player was already known, this community now follows it too.
    Subscribed,
    AlreadyTracked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UntrackOutcome {
    Removed,
    /// No community follows the player anymore.
    Deleted,
}

#[derive(Debug)]
pub struct IdentityUpdate {
    pub riot_id: RiotId,
    pub result: Result<RankChange, RefreshError>,
}

#[derive(Debug)]
pub enum UpdateOutcome {
    NoneTracked,
    Updated(Vec<IdentityUpdate>),
}

pub struct Tracker {
    repo: Repository,
    api: Arc<dyn RankedStatsApi>,
    refresher: Arc<RankRefresher>,
}

impl Tracker {
    pub fn new(
        repo: Repository,
        api: Arc<dyn RankedStatsApi>,
        refresher: Arc<RankRefresher>,
    ) -> Self {
        Self {
            repo,
            api,
            refresher,
        }
    }

    #[instrument(skip(self), fields(guild_id = %community))]
    pub async fn track(
        &self,
        community: Snowflake,
        riot_id: &str,
        requested_by: Snowflake,
    ) -> Result<(RiotId, TrackOutcome), AppError> {
        let riot_id = RiotId::parse(riot_id)?;
        let subscription = Subscription {
            added_by: requested_by,
            added_at: unix_now(),
        };

        if let Some(identity) = self.repo.get_identity(&riot_id).await? {
            if identity.is_subscribed(community) {
                return Ok((riot_id, TrackOutcome::AlreadyTracked));
            }
            self.repo
                .add_subscriber(&identity, community, subscription)
                .await?;
            info!(riot_id = %riot_id, "✅ Guild subscribed to tracked player");
            return Ok((riot_id, TrackOutcome::Subscribed));
        }

        let puuid = self
            .api
            .resolve_identity(&riot_id.game_name, &riot_id.tag_line)
            .await
            .map_err(|e| match e {
                RiotError::IdentityNotFound(_) => AppError::IdentityNotFound {
                    game_name: riot_id.game_name.clone(),
                    tag_line: riot_id.tag_line.clone(),
                },
                other => other.into(),
            })?;
        let rank = self.api.fetch_rank_snapshot(&puuid).await?;

        let mut identity = TrackedIdentity::new(&riot_id, puuid, rank);
        identity.subscribers.push(community);
        identity.communities.insert(community, subscription);
        self.repo.create_identity(&identity).await?;

        info!(riot_id = %riot_id, rank = %rank, "✅ Player now tracked");
        Ok((riot_id, TrackOutcome::Created))
    }

    #[instrument(skip(self), fields(guild_id = %community))]
    pub async fn untrack(
        &self,
        community: Snowflake,
        riot_id: &str,
    ) -> Result<(RiotId, UntrackOutcome), AppError> {
        let riot_id = RiotId::parse(riot_id)?;

        let outcome = match self.repo.remove_subscriber(&riot_id, community).await? {
            Unsubscribe::NotSubscribed => return Err(AppError::PlayerNotTracked),
            Unsubscribe::Removed => UntrackOutcome::Removed,
            Unsubscribe::Deleted => UntrackOutcome::Deleted,
        };

        info!(riot_id = %riot_id, ?outcome, "🗑️ Player untracked");
        Ok((riot_id, outcome))
    }

    /// Refresh every player this community follows right now.
    ///
    /// A rejected API key fails the whole request; any other per-player failure is reported
    /// in its entry.
    #[instrument(skip(self), fields(guild_id = %community))]
    pub async fn trigger_update(&self, community: Snowflake) -> Result<UpdateOutcome, AppError> {
        let identities = self.repo.identities_for_community(community).await?;
        if identities.is_empty() {
            return Ok(UpdateOutcome::NoneTracked);
        }

        let mut updates = Vec::with_capacity(identities.len());
        for identity in &identities {
            let result = match self.refresher.refresh(identity).await {
                Err(RefreshError::Riot(e)) if e.is_auth() => return Err(e.into()),
                other => other,
            };
            if let Err(e) = &result {
                warn!(error = %e, riot_id = %identity.key(), "🔄 ⚠️ Manual refresh failed");
            }
            updates.push(IdentityUpdate {
                riot_id: identity.riot_id(),
                result,
            });
        }

        Ok(UpdateOutcome::Updated(updates))
    }

    /// Persisted ranks of the community's players, best first.
    pub async fn leaderboard(
        &self,
        community: Snowflake,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let entries = self
            .repo
            .identities_for_community(community)
            .await?
            .into_iter()
            .map(|identity| LeaderboardEntry::new(identity.key(), identity.rank))
            .collect();
        Ok(rank_entries(entries))
    }

    pub async fn list(&self, community: Snowflake) -> Result<Vec<TrackedIdentity>, AppError> {
        Ok(self.repo.identities_for_community(community).await?)
    }

    #[instrument(skip(self), fields(guild_id = %community))]
    pub async fn set_notification_channel(
        &self,
        community: Snowflake,
        channel: Snowflake,
    ) -> Result<(), AppError> {
        self.repo.set_notification_channel(community, channel).await?;
        info!(channel_id = %channel, "📢 Notification channel set");
        Ok(())
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
