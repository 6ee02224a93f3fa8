// Job-description matching.
// Keyword extraction, keyword-mode scoring, and the optional embedding-based semantic mode.

pub mod candidate;
pub mod handlers;
pub mod keyword_mode;
pub mod keywords;
pub mod semantic;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::matching::candidate::CandidateItem;
use crate::matching::keyword_mode::keyword_matches;
use crate::matching::semantic::{semantic_matches, SemanticCapability};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Keyword,
    #[default]
    Semantic,
}

/// One ranked candidate. Created per call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub item: CandidateItem,
    pub score: f64,
    pub match_percentage: u8, // 0 – 100
    pub matched_keywords: Vec<String>,
}

/// Matches plus the mode that actually produced them.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatches {
    pub mode: MatchMode,
    pub matches: Vec<MatchResult>,
}

/// Ranks candidates against a job description, best first.
///
/// `Semantic` is honoured only when the capability is available; otherwise, or if the embedding
/// call fails, the request is answered in keyword mode. Blank job descriptions match nothing.
pub async fn rank_candidates(
    job_description: &str,
    candidates: &[CandidateItem],
    mode: MatchMode,
    semantic: &SemanticCapability,
) -> RankedMatches {
    if job_description.trim().is_empty() {
        return RankedMatches {
            mode: MatchMode::Keyword,
            matches: Vec::new(),
        };
    }

    if mode == MatchMode::Semantic {
        if let Some(model) = semantic.model() {
            match semantic_matches(model, job_description, candidates).await {
                Ok(matches) => {
                    debug!(
                        "Semantic matching: {} of {} candidates above threshold",
                        matches.len(),
                        candidates.len()
                    );
                    return RankedMatches {
                        mode: MatchMode::Semantic,
                        matches,
                    };
                }
                Err(e) => warn!("Semantic matching failed, using keyword matching: {e}"),
            }
        }
    }

    let matches = keyword_matches(job_description, candidates);
    debug!(
        "Keyword matching: {} of {} candidates scored above zero",
        matches.len(),
        candidates.len()
    );
    RankedMatches {
        mode: MatchMode::Keyword,
        matches,
    }
}

/// Stable descending sort by score; equal scores keep input order.
pub(crate) fn sort_best_first(matches: &mut [MatchResult]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::matching::semantic::tests::{make_component, FakeModel};

    fn candidates() -> Vec<CandidateItem> {
        vec![
            make_component(1, "Printer fleet maintenance"),
            make_component(2, "Windows imaging"),
        ]
    }

    #[tokio::test]
    async fn test_unavailable_capability_falls_back_to_keyword_mode() {
        let ranked = rank_candidates(
            "Windows imaging technician",
            &candidates(),
            MatchMode::Semantic,
            &SemanticCapability::unavailable(),
        )
        .await;
        assert_eq!(ranked.mode, MatchMode::Keyword);
        assert_eq!(ranked.matches.len(), 1);
        assert_eq!(ranked.matches[0].score, 2.0);
    }

    #[tokio::test]
    async fn test_available_capability_uses_semantic_mode() {
        let capability = SemanticCapability::with_model(Arc::new(FakeModel { fail: false }));
        let ranked = rank_candidates(
            "Windows imaging technician",
            &candidates(),
            MatchMode::Semantic,
            &capability,
        )
        .await;
        assert_eq!(ranked.mode, MatchMode::Semantic);
        assert_eq!(ranked.matches.len(), 1);
        assert_eq!(ranked.matches[0].match_percentage, 100);
    }

    #[tokio::test]
    async fn test_keyword_mode_requested_explicitly() {
        let capability = SemanticCapability::with_model(Arc::new(FakeModel { fail: false }));
        let ranked = rank_candidates(
            "Windows imaging technician",
            &candidates(),
            MatchMode::Keyword,
            &capability,
        )
        .await;
        assert_eq!(ranked.mode, MatchMode::Keyword);
    }

    #[tokio::test]
    async fn test_embedding_failure_answers_in_keyword_mode() {
        let capability = SemanticCapability::with_model(Arc::new(FakeModel { fail: true }));
        let ranked = rank_candidates(
            "Windows imaging technician",
            &candidates(),
            MatchMode::Semantic,
            &capability,
        )
        .await;
        assert_eq!(ranked.mode, MatchMode::Keyword);
        assert_eq!(ranked.matches.len(), 1);
        // The capability itself is not disabled by a per-request failure.
        assert!(capability.is_available());
    }

    #[tokio::test]
    async fn test_blank_job_description_matches_nothing() {
        let capability = SemanticCapability::with_model(Arc::new(FakeModel { fail: false }));
        for jd in ["", "   "] {
            let ranked = rank_candidates(jd, &candidates(), MatchMode::Semantic, &capability).await;
            assert!(ranked.matches.is_empty());
        }
    }

    #[tokio::test]
    async fn test_results_respect_score_and_percentage_bounds() {
        let ranked = rank_candidates(
            "Windows imaging, printer maintenance, fleet rollout",
            &candidates(),
            MatchMode::Keyword,
            &SemanticCapability::unavailable(),
        )
        .await;
        assert!(!ranked.matches.is_empty());
        for m in &ranked.matches {
            assert!(m.score > 0.0);
            assert!(m.match_percentage <= 100);
        }
    }
}
