use rift_recap_riot::RegionGroup;
use serde_json::Value;
use sqlx::types::chrono::Utc;
use sqlx::types::Json;
use sqlx::{Pool, Sqlite};

pub mod error;
pub mod model;

pub use error::Error;
// Re-exported so binaries can build pools without a direct sqlx dependency.
pub use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Wrapper around the match-cache database — callers stay database
/// agnostic by going through [`DbHandler`].
#[derive(Debug)]
pub struct DbHandler {
    pool: Pool<Sqlite>,
}

impl DbHandler {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Get a player from the database given the PUUID.
    pub async fn get_player(&self, puuid: &str) -> Result<Option<model::Player>, Error> {
        let player = sqlx::query_as("SELECT * FROM player WHERE puuid = ?")
            .bind(puuid)
            .fetch_optional(&self.pool)
            .await?;
        Ok(player)
    }

    /// Insert a player, or refresh the identity fields on conflict.
    /// `first_seen` is written once and never updated.
    pub async fn upsert_player(
        &self,
        puuid: &str,
        region: &str,
        game_name: &str,
        tag: &str,
    ) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO player (puuid, region, game_name, tag, first_seen)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (puuid) DO UPDATE SET
                 region = excluded.region,
                 game_name = excluded.game_name,
                 tag = excluded.tag",
        )
        .bind(puuid)
        .bind(region)
        .bind(game_name)
        .bind(tag)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Point lookup of a cached match. `None` means never fetched.
    pub async fn get_match(&self, match_id: &str) -> Result<Option<model::Match>, Error> {
        let cached = sqlx::query_as("SELECT * FROM match WHERE id = ?")
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cached)
    }

    /// Insert a match, or overwrite its metadata and payload on conflict.
    /// A single statement, so concurrent writers converge on the last
    /// payload instead of erroring.
    pub async fn upsert_match(
        &self,
        match_id: &str,
        region_group: RegionGroup,
        game_creation: i64,
        game_version: Option<&str>,
        queue_id: Option<i64>,
        payload: &Value,
    ) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO match (id, region_group, game_creation, game_version, queue_id, payload)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                 region_group = excluded.region_group,
                 game_creation = excluded.game_creation,
                 game_version = excluded.game_version,
                 queue_id = excluded.queue_id,
                 payload = excluded.payload",
        )
        .bind(match_id)
        .bind(region_group.as_str())
        .bind(game_creation)
        .bind(game_version)
        .bind(queue_id)
        .bind(Json(payload))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Record that a player appeared in a match. Both rows must already
    /// exist; re-linking an existing pair is a no-op.
    pub async fn link_player_match(&self, puuid: &str, match_id: &str) -> Result<(), Error> {
        sqlx::query("INSERT OR IGNORE INTO player_match (puuid, match_id) VALUES (?, ?)")
            .bind(puuid)
            .bind(match_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All match links recorded for a PUUID.
    pub async fn get_player_matches(&self, puuid: &str) -> Result<Vec<model::PlayerMatch>, Error> {
        let links = sqlx::query_as("SELECT * FROM player_match WHERE puuid = ?")
            .bind(puuid)
            .fetch_all(&self.pool)
            .await?;
        Ok(links)
    }
}
