use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{prelude::FromRow, types::chrono::NaiveDateTime, types::Json};

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Player {
    pub puuid: String,
    pub region: String,
    pub game_name: String,
    pub tag: String,
    pub first_seen: NaiveDateTime,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub region_group: String,
    pub game_creation: i64,
    pub game_version: Option<String>,
    pub queue_id: Option<i64>,
    pub payload: Json<Value>,
}

#[derive(Debug, FromRow, Serialize, Deserialize)]
pub struct PlayerMatch {
    pub puuid: String,
    pub match_id: String,
}
