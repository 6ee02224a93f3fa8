use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://resume_database.db";
const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed numbers fail start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Base URL of an Ollama-compatible embedding server. `None` disables semantic matching.
    pub embedding_url: Option<String>,
    pub embedding_model: String,
    pub embedding_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let embedding_timeout_secs = var("EMBEDDING_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("EMBEDDING_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_url: var("EMBEDDING_URL"),
            embedding_model: var("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_timeout: Duration::from_secs(embedding_timeout_secs),
        })
    }
}
