//! Riot API access: HTTP plumbing, endpoint wrappers and the ranked-stats facade used by the
//! poller and the commands.

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::debug;

use crate::rank::RankSnapshot;

mod client;
mod endpoints;
pub mod metrics;
mod region;
pub mod types;

pub use client::{DEFAULT_MAX_ATTEMPTS, RiotClient};
pub use region::Platform;
pub use types::RiotError;

use types::{SOLO_QUEUE_ID, solo_queue_snapshot};

/// The tracked player's line in their latest ranked game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub champion: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub win: bool,
}

/// Ranked data the tracker needs from upstream.
#[async_trait]
pub trait RankedStatsApi: Send + Sync + Debug {
    /// Stable PUUID of a Riot ID.
    async fn resolve_identity(&self, game_name: &str, tag_line: &str) -> Result<String, RiotError>;

    /// Current solo queue standing; players without a solo entry are unranked, not an error.
    async fn fetch_rank_snapshot(&self, puuid: &str) -> Result<RankSnapshot, RiotError>;

    /// Summary of the most recent ranked solo game, `None` when there is none.
    async fn fetch_recent_match_summary(
        &self,
        puuid: &str,
    ) -> Result<Option<MatchSummary>, RiotError>;
}

#[async_trait]
impl RankedStatsApi for RiotClient {
    async fn resolve_identity(&self, game_name: &str, tag_line: &str) -> Result<String, RiotError> {
        let account = self.get_account_by_riot_id(game_name, tag_line).await?;
        Ok(account.puuid)
    }

    async fn fetch_rank_snapshot(&self, puuid: &str) -> Result<RankSnapshot, RiotError> {
        let entries = self.get_league_entries_by_puuid(puuid).await?;
        solo_queue_snapshot(&entries)
    }

    async fn fetch_recent_match_summary(
        &self,
        puuid: &str,
    ) -> Result<Option<MatchSummary>, RiotError> {
        let match_ids = self.get_match_ids(puuid, Some(SOLO_QUEUE_ID), 1).await?;
        let Some(match_id) = match_ids.first() else {
            debug!(puuid, "no ranked match found");
            return Ok(None);
        };

        let Some(match_data) = self.get_match(match_id).await? else {
            return Ok(None);
        };

        let participant =
            match_data
                .participant(puuid)
                .ok_or_else(|| RiotError::PlayerNotInMatch {
                    puuid: puuid.to_string(),
                    match_id: match_id.clone(),
                })?;

        Ok(Some(MatchSummary {
            champion: participant.champion_name.clone(),
            kills: participant.kills,
            deaths: participant.deaths,
            assists: participant.assists,
            win: participant.win,
        }))
    }
}
