//! Keyword-mode matching: substring overlap against the job description's frequency keywords,
//! plus tag bonuses for work orders and projects.

use std::collections::HashSet;

use tracing::warn;

use crate::matching::candidate::{CandidateItem, TagList};
use crate::matching::keywords::extract_frequency_keywords;
use crate::matching::{sort_best_first, MatchResult};

/// Bonus per distinct technology tag found in the job description.
pub const TECHNOLOGY_BONUS: f64 = 2.0;
/// Bonus per distinct skill tag found in the job description.
pub const SKILL_BONUS: f64 = 1.5;

/// Scores every candidate against the job description and returns the non-zero ones, best first.
pub fn keyword_matches(job_description: &str, candidates: &[CandidateItem]) -> Vec<MatchResult> {
    let keywords = extract_frequency_keywords(job_description);
    score_against_keywords(job_description, &keywords, candidates)
}

/// Scores candidates against an already-extracted keyword set.
///
/// Algorithm:
/// 1. +1 per keyword occurring as a substring of the candidate's searchable text
/// 2. work items: +2 per distinct technology tag, +1.5 per distinct skill tag found
///    (case-sensitive) in the original job description
/// 3. drop zero scores, percentage = min(100, round(score / max(|keywords|, 1) × 100))
/// 4. stable sort by score, descending
pub fn score_against_keywords(
    job_description: &str,
    keywords: &[String],
    candidates: &[CandidateItem],
) -> Vec<MatchResult> {
    let total_keywords = keywords.len().max(1) as f64;

    let mut matches: Vec<MatchResult> = candidates
        .iter()
        .filter_map(|item| {
            let searchable = item.searchable_text();

            let matched_keywords: Vec<String> = keywords
                .iter()
                .filter(|k| searchable.contains(k.to_lowercase().as_str()))
                .cloned()
                .collect();

            let technology_bonus = tag_bonus(
                item,
                "technology",
                item.technology_tags(),
                job_description,
                TECHNOLOGY_BONUS,
            );
            let skill_bonus =
                tag_bonus(item, "skill", item.skill_tags(), job_description, SKILL_BONUS);
            let score = matched_keywords.len() as f64 + technology_bonus + skill_bonus;

            if score <= 0.0 {
                return None;
            }

            let match_percentage = ((score / total_keywords) * 100.0).round().min(100.0) as u8;

            Some(MatchResult {
                item: item.clone(),
                score,
                match_percentage,
                matched_keywords,
            })
        })
        .collect();

    sort_best_first(&mut matches);
    matches
}

/// Bonus for tags that appear verbatim in the job description. Components carry no tags.
fn tag_bonus(
    item: &CandidateItem,
    field: &str,
    tags: &TagList,
    job_description: &str,
    weight: f64,
) -> f64 {
    let Some(tags) = tags.tags() else {
        warn!(
            "Skipping {field} bonus for {:?} '{}': stored tag list is not a JSON array",
            item.item_type(),
            item.title()
        );
        return 0.0;
    };

    let distinct: HashSet<&str> = tags
        .iter()
        .map(|t| t.as_str())
        .filter(|t| !t.is_empty())
        .collect();

    distinct
        .into_iter()
        .filter(|tag| job_description.contains(tag))
        .count() as f64
        * weight
}
