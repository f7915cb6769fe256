use crate::riot::client::RiotClient;
use crate::riot::types::{MatchDto, RiotError};

impl RiotClient {
    /// Get list of match IDs by PUUID, most recent first, optionally filtered by queue
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match_ids(
        &self,
        puuid: &str,
        queue: Option<u16>,
        count: u32,
    ) -> Result<Vec<String>, RiotError> {
        let mut url = format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?count={}",
            self.region_url(),
            urlencoding::encode(puuid),
            count
        );
        if let Some(queue) = queue {
            url.push_str(&format!("&queue={queue}"));
        }

        Ok(self.get(&url).await?.unwrap_or_default())
    }

    /// Get match details by match ID
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_match(&self, match_id: &str) -> Result<Option<MatchDto>, RiotError> {
        let url = format!(
            "{}/lol/match/v5/matches/{}",
            self.region_url(),
            urlencoding::encode(match_id)
        );

        self.get(&url).await
    }
}
