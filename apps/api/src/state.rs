use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::matching::semantic::SemanticCapability;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// Embedding model loaded once at start-up. Unavailable means keyword matching only.
    pub semantic: Arc<SemanticCapability>,
}

#[cfg(test)]
impl AppState {
    /// In-memory database, default config, no embedding model.
    pub async fn for_tests() -> Self {
        Self::for_tests_with(SemanticCapability::unavailable()).await
    }

    pub async fn for_tests_with(semantic: SemanticCapability) -> Self {
        let config = Config::from_lookup(|_| None).unwrap();
        AppState {
            db: crate::db::test_pool().await,
            config,
            semantic: Arc::new(semantic),
        }
    }
}
