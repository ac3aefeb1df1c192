use crate::error::Error;
use async_trait::async_trait;
use rift_recap_db::DbHandler;
use rift_recap_riot::account::Account;
use rift_recap_riot::match_data::MatchData;
use rift_recap_riot::{RegionGroup, RiotApiClient};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Hard cap on matches ingested per request, protecting upstream rate
/// limits regardless of what the caller asks for.
pub const MAX_MATCH_COUNT: usize = 10;

/// Concurrent match retrievals within one request.
const WORKER_COUNT: usize = 3;

/// The upstream operations the ingestor needs. [`RiotApiClient`] is the
/// production implementation; tests substitute a recording fake.
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn get_account(
        &self,
        group: RegionGroup,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, rift_recap_riot::Error>;

    async fn get_match_ids(
        &self,
        group: RegionGroup,
        puuid: &str,
        count: usize,
    ) -> Result<Vec<String>, rift_recap_riot::Error>;

    async fn get_match(
        &self,
        group: RegionGroup,
        match_id: &str,
    ) -> Result<Value, rift_recap_riot::Error>;
}

#[async_trait]
impl MatchSource for RiotApiClient {
    async fn get_account(
        &self,
        group: RegionGroup,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, rift_recap_riot::Error> {
        RiotApiClient::get_account(self, group, game_name, tag_line).await
    }

    async fn get_match_ids(
        &self,
        group: RegionGroup,
        puuid: &str,
        count: usize,
    ) -> Result<Vec<String>, rift_recap_riot::Error> {
        RiotApiClient::get_match_ids(self, group, puuid, count).await
    }

    async fn get_match(
        &self,
        group: RegionGroup,
        match_id: &str,
    ) -> Result<Value, rift_recap_riot::Error> {
        RiotApiClient::get_match(self, group, match_id).await
    }
}

/// What one ingest run learned: the resolved account and the raw match
/// documents, in match-ID order.
#[derive(Debug)]
pub struct Ingestion {
    pub account: Account,
    pub region_group: RegionGroup,
    pub payloads: Vec<Value>,
}

/// Coordinates upstream client and cache store for one request.
pub struct Ingestor {
    source: Arc<dyn MatchSource>,
    db: Arc<DbHandler>,
}

impl Ingestor {
    pub fn new(source: Arc<dyn MatchSource>, db: Arc<DbHandler>) -> Self {
        Self { source, db }
    }

    /// Resolve the player and produce their recent match documents,
    /// cache-first, in upstream order.
    pub async fn ingest(
        &self,
        region: &str,
        game_name: &str,
        tag_line: &str,
        count: usize,
    ) -> Result<Ingestion, Error> {
        // The cap applies before anything talks to upstream.
        let count = count.clamp(1, MAX_MATCH_COUNT);
        let group = RegionGroup::from_region(region);

        let account = self.source.get_account(group, game_name, tag_line).await?;
        let name = account.game_name.as_deref().unwrap_or(game_name);
        let tag = account.tag_line.as_deref().unwrap_or(tag_line);
        self.db
            .upsert_player(&account.puuid, region, name, tag)
            .await?;

        let ids = self.source.get_match_ids(group, &account.puuid, count).await?;
        debug!("Retrieving {} matches for {}", ids.len(), account.puuid);

        // Workers claim indices from a shared cursor and tag results with
        // them, so a slow fetch never reorders the output and never stalls
        // the other workers.
        let cursor = AtomicUsize::new(0);
        let cursor = &cursor;
        let ids = &ids;
        let puuid = account.puuid.as_str();
        let worker = move || async move {
            let mut fetched = Vec::new();
            loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(match_id) = ids.get(index) else {
                    break;
                };
                let payload = self.fetch_match(group, puuid, match_id).await?;
                fetched.push((index, payload));
            }
            Ok::<_, Error>(fetched)
        };
        // TODO: collect per-match failures instead of failing the whole
        // request once the dashboard can render partial results.
        let results =
            futures::future::try_join_all((0..WORKER_COUNT).map(|_| worker())).await?;

        let mut payloads = vec![Value::Null; ids.len()];
        for (index, payload) in results.into_iter().flatten() {
            payloads[index] = payload;
        }

        Ok(Ingestion {
            account,
            region_group: group,
            payloads,
        })
    }

    /// One match, cache-first. A hit returns the stored document without
    /// touching upstream; a miss fetches, persists the match, then links
    /// it to the player. Links are written after the match row so a link
    /// never points at a row that is not there yet.
    async fn fetch_match(
        &self,
        group: RegionGroup,
        puuid: &str,
        match_id: &str,
    ) -> Result<Value, Error> {
        if let Some(cached) = self.db.get_match(match_id).await? {
            debug!("Cache hit for {match_id}");
            return Ok(cached.payload.0);
        }
        debug!("Cache miss for {match_id}, fetching");

        let payload = self.source.get_match(group, match_id).await?;
        let data = MatchData::from_value(&payload)
            .map_err(|e| rift_recap_riot::Error::schema(e.to_string(), &payload.to_string()))?;
        let (game_creation, game_version, queue_id) = match &data.info {
            Some(info) => (info.game_creation, info.game_version.as_deref(), info.queue_id),
            None => (0, None, None),
        };
        self.db
            .upsert_match(match_id, group, game_creation, game_version, queue_id, &payload)
            .await?;
        self.db.link_player_match(puuid, match_id).await?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{match_payload, mem_db, FakeSource};
    use std::time::Duration;

    const PUUID: &str = "puuid-1";

    async fn setup(source: FakeSource) -> (Arc<FakeSource>, Arc<DbHandler>, Ingestor) {
        let source = Arc::new(source);
        let db = Arc::new(mem_db().await);
        let ingestor = Ingestor::new(source.clone(), db.clone());
        (source, db, ingestor)
    }

    #[tokio::test]
    async fn clamps_count_before_asking_upstream() {
        let ids: Vec<String> = (0..12).map(|i| format!("EUW1_{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let (source, _db, ingestor) = setup(FakeSource::new(PUUID, &id_refs)).await;

        let ingestion = ingestor.ingest("EUW1", "Fiddle", "EUW", 12).await.unwrap();

        assert_eq!(*source.requested_counts.lock().unwrap(), vec![MAX_MATCH_COUNT]);
        assert_eq!(ingestion.payloads.len(), MAX_MATCH_COUNT);
    }

    #[tokio::test]
    async fn zero_count_is_raised_to_one() {
        let (source, _db, ingestor) = setup(FakeSource::new(PUUID, &["EUW1_1", "EUW1_2"])).await;

        let ingestion = ingestor.ingest("EUW1", "Fiddle", "EUW", 0).await.unwrap();

        assert_eq!(*source.requested_counts.lock().unwrap(), vec![1]);
        assert_eq!(ingestion.payloads.len(), 1);
    }

    #[tokio::test]
    async fn cached_matches_are_not_refetched() {
        let (source, db, ingestor) = setup(FakeSource::new(PUUID, &["EUW1_1", "EUW1_2"])).await;
        // EUW1_1 is already cached, with a payload that differs from what
        // upstream would serve.
        let cached = match_payload("EUW1_1", PUUID, false);
        db.upsert_match("EUW1_1", RegionGroup::Europe, 1, None, None, &cached)
            .await
            .unwrap();

        let ingestion = ingestor.ingest("EUW1", "Fiddle", "EUW", 2).await.unwrap();

        // Only the miss went upstream, and the hit kept the stored bytes.
        assert_eq!(*source.match_calls.lock().unwrap(), vec!["EUW1_2".to_string()]);
        assert_eq!(ingestion.payloads[0], cached);
        assert_eq!(ingestion.payloads[1], match_payload("EUW1_2", PUUID, true));

        // The hit is not re-linked either; only the miss produced a link.
        let links = db.get_player_matches(PUUID).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].match_id, "EUW1_2");
    }

    #[tokio::test]
    async fn payloads_keep_match_id_order_despite_slow_fetches() {
        let mut source = FakeSource::new(PUUID, &["EUW1_1", "EUW1_2", "EUW1_3"]);
        source
            .delays
            .insert("EUW1_1".to_string(), Duration::from_millis(40));
        source
            .delays
            .insert("EUW1_2".to_string(), Duration::from_millis(10));
        let (_source, _db, ingestor) = setup(source).await;

        let ingestion = ingestor.ingest("EUW1", "Fiddle", "EUW", 3).await.unwrap();

        let returned: Vec<&str> = ingestion
            .payloads
            .iter()
            .map(|payload| payload["metadata"]["matchId"].as_str().unwrap())
            .collect();
        assert_eq!(returned, vec!["EUW1_1", "EUW1_2", "EUW1_3"]);
    }

    #[tokio::test]
    async fn first_upstream_failure_fails_the_request() {
        let mut source = FakeSource::new(PUUID, &["EUW1_1", "EUW1_2"]);
        source.fail_ids.push("EUW1_2".to_string());
        let (_source, _db, ingestor) = setup(source).await;

        let error = ingestor
            .ingest("EUW1", "Fiddle", "EUW", 2)
            .await
            .expect_err("should propagate the upstream failure");
        assert!(matches!(
            error,
            Error::Riot(rift_recap_riot::Error::Upstream { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn misses_are_written_back_and_linked() {
        let (_source, db, ingestor) = setup(FakeSource::new(PUUID, &["EUW1_1"])).await;

        ingestor.ingest("EUW1", "Fiddle", "EUW", 1).await.unwrap();

        let row = db.get_match("EUW1_1").await.unwrap().expect("cached match");
        assert_eq!(row.region_group, "EUROPE");
        assert_eq!(row.game_creation, 1_700_000_000_000);
        assert_eq!(row.game_version.as_deref(), Some("14.1.545.1234"));
        assert_eq!(row.queue_id, Some(420));
        assert_eq!(row.payload.0, match_payload("EUW1_1", PUUID, true));

        let links = db.get_player_matches(PUUID).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].match_id, "EUW1_1");

        let player = db.get_player(PUUID).await.unwrap().expect("player row");
        assert_eq!(player.region, "EUW1");
        assert_eq!(player.game_name, "Fiddle");
        assert_eq!(player.tag, "EUW");
    }

    #[tokio::test]
    async fn second_ingest_serves_entirely_from_cache() {
        let (source, _db, ingestor) = setup(FakeSource::new(PUUID, &["EUW1_1", "EUW1_2"])).await;

        let first = ingestor.ingest("EUW1", "Fiddle", "EUW", 2).await.unwrap();
        let second = ingestor.ingest("EUW1", "Fiddle", "EUW", 2).await.unwrap();

        // Two match fetches total; the second run hit the cache for both.
        assert_eq!(source.match_calls.lock().unwrap().len(), 2);
        assert_eq!(first.payloads, second.payloads);
    }

    #[tokio::test]
    async fn payload_without_info_is_cached_with_defaults() {
        let mut source = FakeSource::new(PUUID, &["EUW1_1"]);
        source.payloads.insert(
            "EUW1_1".to_string(),
            serde_json::json!({ "metadata": { "matchId": "EUW1_1" } }),
        );
        let (_source, db, ingestor) = setup(source).await;

        ingestor.ingest("EUW1", "Fiddle", "EUW", 1).await.unwrap();

        let row = db.get_match("EUW1_1").await.unwrap().expect("cached match");
        assert_eq!(row.game_creation, 0);
        assert_eq!(row.game_version, None);
        assert_eq!(row.queue_id, None);
    }

    #[tokio::test]
    async fn non_object_payload_is_a_schema_error() {
        let mut source = FakeSource::new(PUUID, &["EUW1_1"]);
        source
            .payloads
            .insert("EUW1_1".to_string(), serde_json::json!("maintenance page"));
        let (_source, db, ingestor) = setup(source).await;

        let error = ingestor
            .ingest("EUW1", "Fiddle", "EUW", 1)
            .await
            .expect_err("should reject the unusable document");
        assert!(matches!(
            error,
            Error::Riot(rift_recap_riot::Error::Schema { .. })
        ));
        // Nothing was cached for the bad document.
        assert!(db.get_match("EUW1_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resolved_identity_wins_over_requested_casing() {
        let (_source, db, ingestor) = setup(FakeSource::new(PUUID, &[])).await;

        // FakeSource resolves to Fiddle#EUW regardless of the lookup casing.
        ingestor.ingest("EUW1", "fiddle", "euw", 1).await.unwrap();

        let player = db.get_player(PUUID).await.unwrap().expect("player row");
        assert_eq!(player.game_name, "Fiddle");
        assert_eq!(player.tag, "EUW");
    }
}
