//! Semantic-mode matching: cosine similarity between embedding vectors.
//!
//! The embedding model is wrapped in a `SemanticCapability` that is built once at start-up and
//! shared read-only through `AppState`. When the model is absent the capability reports itself
//! unavailable and callers fall back to keyword mode for the life of the process.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::Config;
use crate::embedding_client::{EmbeddingClient, EmbeddingError};
use crate::matching::candidate::CandidateItem;
use crate::matching::{sort_best_first, MatchResult};

/// Candidates must be strictly more similar than this to be returned.
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// A text embedding backend. Implement this to swap models without touching the matcher.
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embeds every text in one batch call, preserving order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn model_name(&self) -> &str;
}

/// Start-up-loaded handle to the embedding model, possibly absent.
#[derive(Clone, Default)]
pub struct SemanticCapability {
    model: Option<Arc<dyn EmbeddingModel>>,
}

impl SemanticCapability {
    pub fn unavailable() -> Self {
        Self { model: None }
    }

    pub fn with_model(model: Arc<dyn EmbeddingModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Builds the configured embedding client and probes it once.
    /// Any failure leaves semantic mode disabled until restart.
    pub async fn load(config: &Config) -> Self {
        let Some(base_url) = config.embedding_url.as_deref() else {
            info!("EMBEDDING_URL not set. Semantic matching disabled, using keyword matching");
            return Self::unavailable();
        };

        let client = match EmbeddingClient::new(
            base_url,
            &config.embedding_model,
            config.embedding_timeout,
        ) {
            Ok(client) => client,
            Err(e) => {
                warn!("Could not build embedding client: {e}. Falling back to keyword matching.");
                return Self::unavailable();
            }
        };

        Self::probe(Arc::new(client)).await
    }

    /// Keeps the model only if it answers a one-item batch.
    pub async fn probe(model: Arc<dyn EmbeddingModel>) -> Self {
        match model.embed_batch(&["health check".to_string()]).await {
            Ok(vectors) if vectors.len() == 1 && !vectors[0].is_empty() => {
                info!("Semantic model loaded successfully ({})", model.model_name());
                Self::with_model(model)
            }
            Ok(_) => {
                warn!("Embedding probe returned no vector. Falling back to keyword matching.");
                Self::unavailable()
            }
            Err(e) => {
                warn!("Could not load semantic model: {e}. Falling back to keyword matching.");
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&dyn EmbeddingModel> {
        self.model.as_deref()
    }
}

/// Ranks candidates by cosine similarity to the job description.
pub async fn semantic_matches(
    model: &dyn EmbeddingModel,
    job_description: &str,
    candidates: &[CandidateItem],
) -> Result<Vec<MatchResult>, EmbeddingError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    // One batch: job description first, then every candidate.
    let mut texts = Vec::with_capacity(candidates.len() + 1);
    texts.push(job_description.to_string());
    texts.extend(candidates.iter().map(CandidateItem::embedding_text));

    let vectors = model.embed_batch(&texts).await?;
    if vectors.len() != texts.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }

    let (job_vector, candidate_vectors) = vectors.split_at(1);
    let similarities: Vec<f64> = candidate_vectors
        .iter()
        .map(|v| cosine_similarity(&job_vector[0], v))
        .collect();

    Ok(select_by_similarity(candidates, &similarities))
}

/// Keeps candidates above the threshold and sorts them best first.
pub fn select_by_similarity(
    candidates: &[CandidateItem],
    similarities: &[f64],
) -> Vec<MatchResult> {
    let mut matches: Vec<MatchResult> = candidates
        .iter()
        .zip(similarities)
        .filter(|(_, similarity)| **similarity > SIMILARITY_THRESHOLD)
        .map(|(item, &similarity)| MatchResult {
            item: item.clone(),
            score: similarity,
            match_percentage: (similarity * 100.0).round().clamp(0.0, 100.0) as u8,
            matched_keywords: Vec::new(),
        })
        .collect();

    sort_best_first(&mut matches);
    matches
}

/// Cosine similarity accumulated in f64. Zero-length or mismatched vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::matching::candidate::ComponentCandidate;

    /// Deterministic model: each text maps to a fixed vector by keyword.
    pub(crate) struct FakeModel {
        pub fail: bool,
    }

    #[async_trait]
    impl EmbeddingModel for FakeModel {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            if self.fail {
                return Err(EmbeddingError::Api {
                    status: 503,
                    message: "model offline".to_string(),
                });
            }
            Ok(texts
                .iter()
                .map(|t| {
                    let t = t.to_lowercase();
                    if t.contains("printer") {
                        vec![0.0, 1.0, 0.0]
                    } else if t.contains("network") {
                        vec![0.6, 0.8, 0.0]
                    } else if t.contains("windows") {
                        vec![1.0, 0.0, 0.0]
                    } else {
                        vec![0.0, 0.0, 1.0]
                    }
                })
                .collect())
        }

        fn model_name(&self) -> &str {
            "fake"
        }
    }

    pub(crate) fn make_component(id: i64, title: &str) -> CandidateItem {
        CandidateItem::Component(ComponentCandidate {
            id,
            section_type: "technical_skills".to_string(),
            title: title.to_string(),
            content: String::new(),
            keywords: String::new(),
        })
    }

    fn component_id(result: &MatchResult) -> i64 {
        match &result.item {
            CandidateItem::Component(c) => c.id,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_cosine_identical_is_one() {
        let v = [0.2_f32, 0.4, 0.4];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_degenerate_vectors_are_zero() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let candidates = vec![make_component(1, "a"), make_component(2, "b")];
        let matches = select_by_similarity(&candidates, &[0.3, 0.31]);
        assert_eq!(matches.len(), 1);
        assert_eq!(component_id(&matches[0]), 2);
        assert_eq!(matches[0].match_percentage, 31);
        assert!(matches[0].matched_keywords.is_empty());
    }

    #[test]
    fn test_selection_sorts_descending_and_keeps_ties_stable() {
        let candidates = vec![
            make_component(1, "a"),
            make_component(2, "b"),
            make_component(3, "c"),
            make_component(4, "d"),
        ];
        let matches = select_by_similarity(&candidates, &[0.5, 0.9, 0.5, 0.1]);
        let ids: Vec<i64> = matches.iter().map(component_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_semantic_matches_ranks_by_similarity() {
        let model = FakeModel { fail: false };
        let candidates = vec![
            make_component(1, "Printer fleet maintenance"),
            make_component(2, "Network cabling"),
            make_component(3, "Windows imaging"),
        ];
        let matches = semantic_matches(&model, "Windows desktop engineer", &candidates)
            .await
            .unwrap();

        // windows·windows = 1.0, windows·network = 0.6, windows·printer = 0.0
        let ids: Vec<i64> = matches.iter().map(component_id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(matches[0].match_percentage, 100);
        assert_eq!(matches[1].match_percentage, 60);
    }

    #[tokio::test]
    async fn test_semantic_matches_propagates_model_errors() {
        let model = FakeModel { fail: true };
        let candidates = vec![make_component(1, "Windows")];
        assert!(semantic_matches(&model, "Windows", &candidates).await.is_err());
    }

    #[tokio::test]
    async fn test_probe_failure_leaves_capability_unavailable() {
        let capability = SemanticCapability::probe(Arc::new(FakeModel { fail: true })).await;
        assert!(!capability.is_available());

        let capability = SemanticCapability::probe(Arc::new(FakeModel { fail: false })).await;
        assert!(capability.is_available());
    }
}
