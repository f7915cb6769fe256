use crate::riot::client::RiotClient;
use crate::riot::types::{AccountDto, RiotError};

impl RiotClient {
    /// Get account by Riot ID (game name + tag line)
    /// Uses regional routing (americas, europe, asia, sea)
    pub async fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
    ) -> Result<AccountDto, RiotError> {
        let url = format!(
            "{}/riot/account/v1/accounts/by-riot-id/{}/{}",
            self.region_url(),
            urlencoding::encode(game_name),
            urlencoding::encode(tag_line)
        );

        self.get(&url)
            .await?
            .ok_or_else(|| RiotError::IdentityNotFound(format!("{game_name}#{tag_line}")))
    }
}
