use crate::riot::client::RiotClient;
use crate::riot::types::{LeagueEntryDto, RiotError};

impl RiotClient {
    /// Get league entries (ranked info) for a player by PUUID
    /// Uses platform routing (euw1, na1, kr, etc.)
    ///
    /// An empty list is a valid answer for players without placements; a 404 means the PUUID
    /// is unknown on this platform.
    pub async fn get_league_entries_by_puuid(
        &self,
        puuid: &str,
    ) -> Result<Vec<LeagueEntryDto>, RiotError> {
        let url = format!(
            "{}/lol/league/v4/entries/by-puuid/{}",
            self.platform_url(),
            urlencoding::encode(puuid)
        );

        self.get(&url)
            .await?
            .ok_or_else(|| RiotError::IdentityNotFound(format!("puuid {puuid}")))
    }
}
