use crate::error::Error;
use crate::ingest::{Ingestor, MAX_MATCH_COUNT};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use rift_recap_riot::account::Account;
use rift_recap_riot::{RegionGroup, RiotApiClient};
use rift_recap_stats::{extract_row, summarize, MatchRow, Summary};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Match IDs listed when the caller does not pass a count.
const DEFAULT_ID_COUNT: usize = 20;

#[derive(Clone)]
pub struct AppState {
    pub ingestor: Arc<Ingestor>,
    pub riot: Arc<RiotApiClient>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/dashboard", get(dashboard))
        .route("/api/account", get(account))
        .route("/api/match-ids", get(match_ids))
        .route("/api/match", get(match_by_id))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardParams {
    pub region: Option<String>,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub region: String,
    pub region_group: RegionGroup,
    pub account: AccountInfo,
    pub summary: Summary,
    pub rows: Vec<MatchRow>,
}

/// Account echo on the dashboard: the resolved identity when upstream
/// returned one, the requested spelling otherwise.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
}

/// The full pipeline: resolve, ingest cache-first, derive rows, summarize.
async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardResponse>, Error> {
    let (Some(region), Some(game_name), Some(tag_line)) = (
        params.region.filter(|s| !s.is_empty()),
        params.game_name.filter(|s| !s.is_empty()),
        params.tag_line.filter(|s| !s.is_empty()),
    ) else {
        return Err(Error::Validation(
            "Missing region, gameName, or tagLine".to_string(),
        ));
    };
    let count = params.count.unwrap_or(MAX_MATCH_COUNT);

    info!("Dashboard request for {game_name}#{tag_line} on {region}");
    let ingestion = state
        .ingestor
        .ingest(&region, &game_name, &tag_line, count)
        .await?;

    let rows: Vec<MatchRow> = ingestion
        .payloads
        .iter()
        .filter_map(|payload| extract_row(&ingestion.account.puuid, payload))
        .collect();
    let summary = summarize(&rows);

    let account = ingestion.account;
    Ok(Json(DashboardResponse {
        region,
        region_group: ingestion.region_group,
        account: AccountInfo {
            puuid: account.puuid,
            game_name: account.game_name.unwrap_or(game_name),
            tag_line: account.tag_line.unwrap_or(tag_line),
        },
        summary,
        rows,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountParams {
    pub region: Option<String>,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub region: String,
    pub region_group: RegionGroup,
    #[serde(flatten)]
    pub account: Account,
}

/// Resolve a Riot ID without touching the store.
async fn account(
    State(state): State<AppState>,
    Query(params): Query<AccountParams>,
) -> Result<Json<AccountResponse>, Error> {
    let (Some(region), Some(game_name), Some(tag_line)) = (
        params.region.filter(|s| !s.is_empty()),
        params.game_name.filter(|s| !s.is_empty()),
        params.tag_line.filter(|s| !s.is_empty()),
    ) else {
        return Err(Error::Validation(
            "Missing region, gameName, or tagLine".to_string(),
        ));
    };

    let group = RegionGroup::from_region(&region);
    let account = state.riot.get_account(group, &game_name, &tag_line).await?;
    Ok(Json(AccountResponse {
        region,
        region_group: group,
        account,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchIdsParams {
    pub region_group: Option<String>,
    pub puuid: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchIdsResponse {
    pub puuid: String,
    pub region_group: RegionGroup,
    pub count: usize,
    pub match_ids: Vec<String>,
}

/// Raw match-ID listing, straight from upstream.
async fn match_ids(
    State(state): State<AppState>,
    Query(params): Query<MatchIdsParams>,
) -> Result<Json<MatchIdsResponse>, Error> {
    let (Some(region_group), Some(puuid)) = (
        params.region_group.filter(|s| !s.is_empty()),
        params.puuid.filter(|s| !s.is_empty()),
    ) else {
        return Err(Error::Validation("Missing regionGroup or puuid".to_string()));
    };
    let group: RegionGroup = region_group
        .parse()
        .map_err(|e| Error::Validation(format!("{e}")))?;
    let count = params.count.unwrap_or(DEFAULT_ID_COUNT);

    let match_ids = state.riot.get_match_ids(group, &puuid, count).await?;
    Ok(Json(MatchIdsResponse {
        puuid,
        region_group: group,
        count,
        match_ids,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchParams {
    pub region_group: Option<String>,
    pub match_id: Option<String>,
}

/// Raw single-match passthrough, uncached.
async fn match_by_id(
    State(state): State<AppState>,
    Query(params): Query<MatchParams>,
) -> Result<Json<Value>, Error> {
    let (Some(region_group), Some(match_id)) = (
        params.region_group.filter(|s| !s.is_empty()),
        params.match_id.filter(|s| !s.is_empty()),
    ) else {
        return Err(Error::Validation(
            "Missing regionGroup or matchId".to_string(),
        ));
    };
    let group: RegionGroup = region_group
        .parse()
        .map_err(|e| Error::Validation(format!("{e}")))?;

    let payload = state.riot.get_match(group, &match_id).await?;
    Ok(Json(payload))
}
