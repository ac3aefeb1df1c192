use crate::row::MatchRow;
use serde::{Deserialize, Serialize};

/// Champions are capped to the most-played handful; roles are not capped.
const TOP_CHAMPIONS: usize = 8;

/// Label for rows without a team position (special modes, old payloads).
const UNKNOWN_ROLE: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChampionCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCount {
    pub role: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub games: usize,
    pub wins: usize,
    pub winrate: f64,
    pub avg_k: f64,
    pub avg_d: f64,
    pub avg_a: f64,
    pub avg_cs_per_min: f64,
    pub avg_vision_per_min: f64,
    pub top_champs: Vec<ChampionCount>,
    pub roles: Vec<RoleCount>,
}

/// Fold rows into the aggregate the dashboard shows. An empty slice yields
/// zeroed averages and empty lists, never NaN.
pub fn summarize(rows: &[MatchRow]) -> Summary {
    let games = rows.len();
    let wins = rows.iter().filter(|row| row.win).count();

    let avg = |value: fn(&MatchRow) -> f64| {
        if games == 0 {
            0.0
        } else {
            rows.iter().map(value).sum::<f64>() / games as f64
        }
    };

    let mut top_champs: Vec<ChampionCount> = Vec::new();
    for row in rows {
        match top_champs.iter_mut().find(|c| c.name == row.champion_name) {
            Some(champion) => champion.count += 1,
            None => top_champs.push(ChampionCount {
                name: row.champion_name.clone(),
                count: 1,
            }),
        }
    }
    // Stable sort: ties keep first-played order.
    top_champs.sort_by(|a, b| b.count.cmp(&a.count));
    top_champs.truncate(TOP_CHAMPIONS);

    let mut roles: Vec<RoleCount> = Vec::new();
    for row in rows {
        let label = if row.team_position.is_empty() {
            UNKNOWN_ROLE
        } else {
            row.team_position.as_str()
        };
        match roles.iter_mut().find(|r| r.role == label) {
            Some(role) => role.count += 1,
            None => roles.push(RoleCount {
                role: label.to_string(),
                count: 1,
            }),
        }
    }
    roles.sort_by(|a, b| b.count.cmp(&a.count));

    Summary {
        games,
        wins,
        winrate: if games == 0 { 0.0 } else { wins as f64 / games as f64 },
        avg_k: avg(|row| row.kills as f64),
        avg_d: avg(|row| row.deaths as f64),
        avg_a: avg(|row| row.assists as f64),
        avg_cs_per_min: avg(|row| row.cs_per_min),
        avg_vision_per_min: avg(|row| row.vision_per_min),
        top_champs,
        roles,
    }
}
