use anyhow::Context as _;
use config::Config;
use http::AppState;
use ingest::Ingestor;
use rift_recap_db::{DbHandler, SqliteConnectOptions, SqlitePoolOptions};
use rift_recap_riot::RiotApiClient;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod http;
mod ingest;
#[cfg(test)]
mod testutil;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_tracing_subscriber();

    info!("Loading configuration");
    let config = Config::load(std::env::args().nth(1)).await?;

    info!("Setting up database handler");
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;
    let db = Arc::new(DbHandler::new(pool));
    info!("Running migrations");
    db.migrate().await.context("Failed to run migrations")?;

    info!("Setting up Riot API client");
    let riot = Arc::new(RiotApiClient::new(config.rgapi_key.clone()));

    let ingestor = Arc::new(Ingestor::new(riot.clone(), db));
    let state = AppState { ingestor, riot };

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, http::router(state)).await?;

    Ok(())
}

fn setup_tracing_subscriber() {
    let layer = fmt::layer()
        .pretty()
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_thread_ids(false)
        .with_target(false);
    tracing_subscriber::registry()
        .with(layer)
        .with(EnvFilter::from_default_env())
        .init();
}
