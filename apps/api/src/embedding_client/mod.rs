//! Embedding Client: HTTP access to an Ollama-compatible embedding server.
//!
//! The client is built once at start-up inside `SemanticCapability::load`. Every call is bounded
//! by the configured timeout and is never retried: a failed call is reported to the caller,
//! which answers the request in keyword mode instead.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::matching::semantic::EmbeddingModel;

const EMBED_PATH: &str = "/api/embed";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding server returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct EmbedErrorBody {
    error: String,
}

/// Batch embedding client for `POST {base_url}/api/embed`.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl EmbeddingClient {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: endpoint_url(base_url),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl EmbeddingModel for EmbeddingClient {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<EmbedErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbedResponse = response.json().await?;
        if parsed.embeddings.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: parsed.embeddings.len(),
            });
        }

        debug!(
            "Embedded {} texts with {} ({} dims)",
            texts.len(),
            self.model,
            parsed.embeddings.first().map(Vec::len).unwrap_or(0)
        );

        Ok(parsed.embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn endpoint_url(base_url: &str) -> String {
    format!("{}{EMBED_PATH}", base_url.trim_end_matches('/'))
}
