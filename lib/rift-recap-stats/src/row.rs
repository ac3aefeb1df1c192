use rift_recap_riot::match_data::MatchData;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One player's line in one match, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRow {
    pub match_id: String,
    pub win: bool,
    pub champion_name: String,
    /// TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY, or empty when unknown.
    pub team_position: String,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    /// Lane plus jungle minions combined.
    pub cs: i64,
    pub cs_per_min: f64,
    pub vision_score: i64,
    pub vision_per_min: f64,
    pub duration_min: f64,
    /// Milliseconds since epoch.
    pub game_creation: i64,
}

/// Project a raw match document onto one player's row. `None` when the
/// document has no usable view or the player did not take part; neither
/// case is an error, the match is simply skipped.
pub fn extract_row(puuid: &str, payload: &Value) -> Option<MatchRow> {
    let data = MatchData::from_value(payload).ok()?;
    let metadata = data.metadata?;
    let info = data.info?;
    let participant = info.participants.iter().find(|p| p.puuid == puuid)?;

    let duration_min = info.game_duration as f64 / 60.0;
    let cs = participant.total_minions_killed + participant.neutral_minions_killed;
    // Remakes report a zero duration; rates are zeroed rather than divided.
    let per_min = |value: f64| {
        if duration_min > 0.0 {
            value / duration_min
        } else {
            0.0
        }
    };

    Some(MatchRow {
        match_id: metadata.match_id,
        win: participant.win,
        champion_name: participant
            .champion_name
            .clone()
            .unwrap_or_else(|| participant.champion_id.to_string()),
        team_position: participant.team_position.clone(),
        kills: participant.kills,
        deaths: participant.deaths,
        assists: participant.assists,
        cs,
        cs_per_min: per_min(cs as f64),
        vision_score: participant.vision_score,
        vision_per_min: per_min(participant.vision_score as f64),
        duration_min,
        game_creation: info.game_creation,
    })
}
