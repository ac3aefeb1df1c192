use crate::ingest::MatchSource;
use async_trait::async_trait;
use rift_recap_db::{DbHandler, SqlitePoolOptions};
use rift_recap_riot::account::Account;
use rift_recap_riot::{Error as RiotError, RegionGroup};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// In-memory store for tests. A single connection, because every
/// connection to `sqlite::memory:` gets its own database.
pub async fn mem_db() -> DbHandler {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to sqlite");
    let db = DbHandler::new(pool);
    db.migrate().await.expect("Failed to run migrations");
    db
}

/// [`MatchSource`] double serving canned data and recording every call.
pub struct FakeSource {
    pub account: Account,
    pub match_ids: Vec<String>,
    pub payloads: HashMap<String, Value>,
    /// Match IDs that fail with an upstream 503 when requested.
    pub fail_ids: Vec<String>,
    /// Artificial per-ID latency, for completion-order tests.
    pub delays: HashMap<String, Duration>,
    pub requested_counts: Mutex<Vec<usize>>,
    pub match_calls: Mutex<Vec<String>>,
}

impl FakeSource {
    /// A source that resolves every lookup to `Fiddle#EUW` under `puuid`
    /// and serves a well-formed winning payload for each given match ID.
    pub fn new(puuid: &str, match_ids: &[&str]) -> Self {
        let payloads = match_ids
            .iter()
            .map(|id| ((*id).to_string(), match_payload(id, puuid, true)))
            .collect();
        Self {
            account: Account {
                puuid: puuid.to_string(),
                game_name: Some("Fiddle".to_string()),
                tag_line: Some("EUW".to_string()),
            },
            match_ids: match_ids.iter().map(|id| (*id).to_string()).collect(),
            payloads,
            fail_ids: Vec::new(),
            delays: HashMap::new(),
            requested_counts: Mutex::new(Vec::new()),
            match_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MatchSource for FakeSource {
    async fn get_account(
        &self,
        _group: RegionGroup,
        _game_name: &str,
        _tag_line: &str,
    ) -> Result<Account, RiotError> {
        Ok(self.account.clone())
    }

    async fn get_match_ids(
        &self,
        _group: RegionGroup,
        _puuid: &str,
        count: usize,
    ) -> Result<Vec<String>, RiotError> {
        self.requested_counts.lock().unwrap().push(count);
        Ok(self.match_ids.iter().take(count).cloned().collect())
    }

    async fn get_match(&self, _group: RegionGroup, match_id: &str) -> Result<Value, RiotError> {
        self.match_calls.lock().unwrap().push(match_id.to_string());
        if let Some(delay) = self.delays.get(match_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_ids.iter().any(|id| id == match_id) {
            return Err(RiotError::Upstream {
                status: 503,
                body: "upstream down".to_string(),
            });
        }
        Ok(self.payloads[match_id].clone())
    }
}

/// Minimal but fully-shaped match document for `puuid` in `match_id`.
pub fn match_payload(match_id: &str, puuid: &str, win: bool) -> Value {
    json!({
        "metadata": { "matchId": match_id },
        "info": {
            "gameCreation": 1_700_000_000_000_i64,
            "gameDuration": 1800,
            "gameVersion": "14.1.545.1234",
            "queueId": 420,
            "participants": [{
                "puuid": puuid,
                "win": win,
                "championId": 64,
                "championName": "LeeSin",
                "teamPosition": "JUNGLE",
                "kills": 5,
                "deaths": 2,
                "assists": 9,
                "totalMinionsKilled": 150,
                "neutralMinionsKilled": 30,
                "visionScore": 24
            }]
        }
    })
}
