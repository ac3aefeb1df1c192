use serde::Deserialize;
use std::path::Path;
use tokio::fs::read_to_string;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection string for the match cache.
    pub database_url: String,
    /// Riot developer API key, sent on every upstream request.
    pub rgapi_key: String,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://rift_recap.db".to_string(),
            rgapi_key: String::new(),
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file, then let environment
    /// variables override individual fields.
    pub async fn load(path: Option<impl AsRef<Path>>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_file(path).await?,
            None => Default::default(),
        };

        config.database_url = std::env::var("DATABASE_URL")
            .ok()
            .unwrap_or(config.database_url);
        config.rgapi_key = std::env::var("RGAPI_KEY").ok().unwrap_or(config.rgapi_key);
        config.bind_addr = std::env::var("BIND_ADDR").ok().unwrap_or(config.bind_addr);

        Ok(config)
    }

    async fn load_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = read_to_string(path).await?;
        Ok(toml::from_str(&contents)?)
    }
}
