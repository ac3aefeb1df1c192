use crate::{Error, RegionGroup, RiotApiClient};
use serde::{Deserialize, Serialize};

/// Account data from the account-v1 endpoint. Upstream omits the name and
/// tag for some accounts; only the PUUID is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_line: Option<String>,
}

impl RiotApiClient {
    /// Resolve a Riot ID (`name#tag`) to an [`Account`] via the given
    /// routing group.
    pub async fn get_account(
        &self,
        group: RegionGroup,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, Error> {
        let url = self.endpoint(
            group,
            &[
                "riot",
                "account",
                "v1",
                "accounts",
                "by-riot-id",
                game_name,
                tag_line,
            ],
        );
        self.get_json(url).await
    }
}
