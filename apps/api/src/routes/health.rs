use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub semantic_model: bool,
    pub embedding_configured: bool,
    /// Name of the loaded embedding model, if any.
    pub embedding_model: Option<String>,
}

/// GET /api/health
/// Reports database reachability and whether semantic matching is available.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Health check could not reach the database: {e}");
            false
        }
    };

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" },
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        database,
        semantic_model: state.semantic.is_available(),
        embedding_configured: state.config.embedding_url.is_some(),
        embedding_model: state.semantic.model().map(|m| m.model_name().to_string()),
    })
}
