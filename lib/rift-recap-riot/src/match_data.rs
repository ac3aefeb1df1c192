use crate::{Error, RegionGroup, RiotApiClient};
use serde::Deserialize;
use serde_json::Value;

/// Typed view over a raw match-v5 document. Only the fields the pipeline
/// reads are modeled, and every one of them is optional or defaulted:
/// payloads from older game versions and special modes omit fields freely.
/// The raw document stays the unit of storage and exchange; this view is
/// parsed from it where fields are actually needed.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchData {
    #[serde(default)]
    pub metadata: Option<MatchMetadata>,
    #[serde(default)]
    pub info: Option<MatchInfo>,
}

impl MatchData {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    /// Milliseconds since epoch.
    #[serde(default)]
    pub game_creation: i64,
    /// Seconds.
    #[serde(default)]
    pub game_duration: i64,
    #[serde(default)]
    pub game_version: Option<String>,
    #[serde(default)]
    pub queue_id: Option<i64>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default)]
    pub puuid: String,
    #[serde(default)]
    pub win: bool,
    #[serde(default)]
    pub champion_id: i64,
    #[serde(default)]
    pub champion_name: Option<String>,
    /// TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY, or empty.
    #[serde(default)]
    pub team_position: String,
    #[serde(default)]
    pub kills: i64,
    #[serde(default)]
    pub deaths: i64,
    #[serde(default)]
    pub assists: i64,
    #[serde(default)]
    pub total_minions_killed: i64,
    #[serde(default)]
    pub neutral_minions_killed: i64,
    #[serde(default)]
    pub vision_score: i64,
}

impl RiotApiClient {
    /// Fetch one match document as raw JSON. The body is only checked to
    /// be JSON here; shape interpretation is left to consumers going
    /// through [`MatchData`].
    pub async fn get_match(&self, group: RegionGroup, match_id: &str) -> Result<Value, Error> {
        let url = self.endpoint(group, &["lol", "match", "v5", "matches", match_id]);
        self.get_json(url).await
    }
}
