use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

pub mod account;
pub mod error;
pub mod match_data;
pub mod match_ids;

pub use error::Error;

/// Header carrying the API key on every request.
const AUTH_HEADER: &str = "X-Riot-Token";

/// Continental routing group used by the account-v1 and match-v5 endpoints.
/// Distinct from the per-server region codes (`EUW1`, `NA1`, ...) players
/// actually select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegionGroup {
    Europe,
    Americas,
    Asia,
}

impl RegionGroup {
    /// Map a per-server region code to its routing group. Codes are
    /// case-sensitive; anything outside the known EUROPE/AMERICAS servers
    /// routes to ASIA.
    pub fn from_region(region: &str) -> Self {
        match region {
            "EUW1" | "EUN1" | "TR1" | "RU" => Self::Europe,
            "NA1" | "BR1" | "LA1" | "LA2" => Self::Americas,
            _ => Self::Asia,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Europe => "EUROPE",
            Self::Americas => "AMERICAS",
            Self::Asia => "ASIA",
        }
    }

    fn host(&self) -> &'static str {
        match self {
            Self::Europe => "europe.api.riotgames.com",
            Self::Americas => "americas.api.riotgames.com",
            Self::Asia => "asia.api.riotgames.com",
        }
    }
}

impl std::fmt::Display for RegionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RegionGroup {
    type Err = error::InvalidRegionGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EUROPE" => Ok(Self::Europe),
            "AMERICAS" => Ok(Self::Americas),
            "ASIA" => Ok(Self::Asia),
            _ => Err(error::InvalidRegionGroup),
        }
    }
}

/// Client for the handful of Riot HTTP endpoints the pipeline reads.
#[derive(Debug, Clone)]
pub struct RiotApiClient {
    http: Client,
    api_key: String,
}

impl RiotApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Build an endpoint URL on the group's host from raw path segments,
    /// percent-encoding each one (Riot IDs may contain spaces and slashes).
    fn endpoint(&self, group: RegionGroup, segments: &[&str]) -> Url {
        let mut url = Url::parse(&format!("https://{}", group.host()))
            .expect("group host is a valid base url");
        url.path_segments_mut()
            .expect("https urls always have a path")
            .extend(segments);
        url
    }

    /// GET `url` with the key attached and deserialize the body. The body
    /// text is read before parsing so that both failure shapes keep it:
    /// non-success statuses carry the body verbatim, and a 2xx body that
    /// does not parse becomes a schema error with a snippet attached.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let response = self
            .http
            .get(url)
            .header(AUTH_HEADER, &self.api_key)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            // TODO: back off and retry on 429 instead of surfacing it.
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|e| Error::schema(e.to_string(), &body))
    }
}
