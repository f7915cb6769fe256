use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::rank::{Division, RankSnapshot, Tier};

#[derive(Debug, Error)]
pub enum RiotError {
    #[error("no Riot account or ranked data found for {0}")]
    IdentityNotFound(String),

    #[error("Riot API rate limit still hit after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Riot API rejected the API key ({0})")]
    Auth(StatusCode),

    #[error("Riot API error: {0}")]
    Status(StatusCode),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("player {puuid} is not part of match {match_id}")]
    PlayerNotInMatch { puuid: String, match_id: String },

    #[error("unexpected ranked data from the Riot API: {0}")]
    InvalidRank(String),
}

impl RiotError {
    /// The API key is bad or expired; every other call will fail the same way.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Worth retrying later from the user's point of view.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Status(_) | Self::Reqwest(_))
    }
}

// ============================================================================
// Account-v1
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

// ============================================================================
// League-v4
// ============================================================================

pub const SOLO_QUEUE_TYPE: &str = "RANKED_SOLO_5x5";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: i64,
}

impl LeagueEntryDto {
    pub fn is_solo_queue(&self) -> bool {
        self.queue_type == SOLO_QUEUE_TYPE
    }
}

impl TryFrom<&LeagueEntryDto> for RankSnapshot {
    type Error = RiotError;

    fn try_from(entry: &LeagueEntryDto) -> Result<Self, Self::Error> {
        let tier: Tier = entry.tier.parse().map_err(RiotError::InvalidRank)?;
        let division = if tier == Tier::Unranked {
            Division::None
        } else {
            entry.rank.parse().map_err(RiotError::InvalidRank)?
        };
        let league_points = u32::try_from(entry.league_points).map_err(|_| {
            RiotError::InvalidRank(format!("negative league points: {}", entry.league_points))
        })?;

        Ok(RankSnapshot::new(tier, division, league_points))
    }
}

/// Reduce the league entries of a player to their solo queue standing.
pub fn solo_queue_snapshot(entries: &[LeagueEntryDto]) -> Result<RankSnapshot, RiotError> {
    match entries.iter().find(|entry| entry.is_solo_queue()) {
        Some(entry) => RankSnapshot::try_from(entry),
        None => Ok(RankSnapshot::default()),
    }
}

// ============================================================================
// Match-v5
// ============================================================================

/// Ranked Solo/Duo queue id.
pub const SOLO_QUEUE_ID: u16 = 420;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub metadata: MetadataDto,
    pub info: InfoDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub match_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoDto {
    pub queue_id: u16,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub champion_name: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub win: bool,
}

impl MatchDto {
    pub fn participant(&self, puuid: &str) -> Option<&ParticipantDto> {
        self.info.participants.iter().find(|p| p.puuid == puuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(queue: &str, tier: &str, rank: &str, lp: i64) -> LeagueEntryDto {
        LeagueEntryDto {
            queue_type: queue.to_string(),
            tier: tier.to_string(),
            rank: rank.to_string(),
            league_points: lp,
        }
    }

    #[test]
    fn picks_solo_queue_entry_only() {
        let entries = [
            entry("RANKED_FLEX_SR", "SILVER", "I", 10),
            entry(SOLO_QUEUE_TYPE, "GOLD", "IV", 20),
        ];
        let snapshot = solo_queue_snapshot(&entries).unwrap();
        assert_eq!(snapshot, RankSnapshot::new(Tier::Gold, Division::IV, 20));
    }

    #[test]
    fn missing_solo_entry_is_unranked() {
        assert_eq!(solo_queue_snapshot(&[]).unwrap(), RankSnapshot::default());

        let flex_only = [entry("RANKED_FLEX_SR", "SILVER", "I", 10)];
        assert_eq!(
            solo_queue_snapshot(&flex_only).unwrap(),
            RankSnapshot::default()
        );
    }

    #[test]
    fn unknown_tier_is_rejected() {
        let entries = [entry(SOLO_QUEUE_TYPE, "WOOD", "IV", 20)];
        assert!(matches!(
            solo_queue_snapshot(&entries),
            Err(RiotError::InvalidRank(_))
        ));

        let entries = [entry(SOLO_QUEUE_TYPE, "GOLD", "IV", -3)];
        assert!(matches!(
            solo_queue_snapshot(&entries),
            Err(RiotError::InvalidRank(_))
        ));
    }

    #[test]
    fn match_payload_decodes_and_finds_participant() {
        let value = serde_json::json!({
            "metadata": { "matchId": "NA1_1" },
            "info": {
                "queueId": 420,
                "participants": [
                    { "puuid": "a", "championName": "Ahri", "kills": 1, "deaths": 2, "assists": 3, "win": true },
                    { "puuid": "b", "championName": "Lux", "kills": 4, "deaths": 5, "assists": 6, "win": false }
                ]
            }
        });
        let match_data: MatchDto = serde_json::from_value(value).unwrap();

        let participant = match_data.participant("b").unwrap();
        assert_eq!(participant.champion_name, "Lux");
        assert!(match_data.participant("zzz").is_none());
    }
}
