//! Keyword extraction: two independent strategies.
//!
//! `extract_frequency_keywords` produces the scoring vocabulary for keyword matching.
//! `extract_domain_keywords` produces the UI-facing keyword list shown next to a job posting
//! and stored with saved job descriptions. The two are intentionally not unified: callers
//! depend on which terms each one surfaces.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Maximum number of terms returned by the frequency extractor.
pub const FREQUENCY_KEYWORD_CAP: usize = 50;

/// Number of capitalized tokens inspected by the domain extractor.
const CAPITALIZED_SCAN_LIMIT: usize = 10;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "have", "has", "had", "will", "would", "should",
    "could", "may", "might", "can", "this", "that", "these", "those", "i", "you", "he", "she",
    "it", "we", "they", "our", "your", "their", "his", "her", "its",
];

/// Curated IT-support / helpdesk vocabulary, scanned in this order.
const DOMAIN_VOCABULARY: &[&str] = &[
    "windows",
    "linux",
    "macos",
    "active directory",
    "servicenow",
    "office365",
    "microsoft 365",
    "azure",
    "aws",
    "vmware",
    "citrix",
    "desktop support",
    "help desk",
    "technical support",
    "troubleshooting",
    "hardware",
    "software",
    "network",
    "networking",
    "vpn",
    "security",
    "server",
    "cloud",
    "deployment",
    "migration",
    "imaging",
    "sccm",
    "intune",
    "jamf",
    "bitlocker",
    "powershell",
    "scripting",
    "automation",
    "itil",
    "incident management",
    "asset management",
    "documentation",
    "customer service",
    "communication",
    "problem solving",
];

lazy_static! {
    // Applied to lower-cased text, so only the lower-case range can match.
    static ref WORD_RE: Regex = Regex::new(r"\b[a-z]{2,}\b").unwrap();
    static ref CAPITALIZED_RE: Regex = Regex::new(r"\b[A-Z][A-Za-z0-9]+\b").unwrap();
}

/// Frequency extractor.
///
/// Tokenizes into word-bounded runs of 2+ letters, lower-cases, removes stop words and
/// duplicates, then ranks by how often each term occurs in the lower-cased text (raw substring
/// count, so "support" also counts inside "supported"). Ties keep first-appearance order.
/// At most [`FREQUENCY_KEYWORD_CAP`] terms are returned.
pub fn extract_frequency_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut seen = HashSet::new();
    let mut unique: Vec<&str> = Vec::new();
    for word in WORD_RE.find_iter(&lowered).map(|m| m.as_str()) {
        if STOP_WORDS.contains(&word) {
            continue;
        }
        if seen.insert(word) {
            unique.push(word);
        }
    }

    let mut ranked: Vec<(&str, usize)> = unique
        .into_iter()
        .map(|word| (word, lowered.matches(word).count()))
        .collect();

    // Stable sort: equal counts stay in first-appearance order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(FREQUENCY_KEYWORD_CAP)
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Domain-keyword extractor.
///
/// Curated terms found case-insensitively come first, in vocabulary order. Then the first
/// ten capitalized tokens of the original text are appended (original casing kept) when longer
/// than two characters and not already present under any casing.
pub fn extract_domain_keywords(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    let mut found: Vec<String> = DOMAIN_VOCABULARY
        .iter()
        .filter(|term| lowered.contains(*term))
        .map(|term| term.to_string())
        .collect();

    for token in CAPITALIZED_RE
        .find_iter(text)
        .take(CAPITALIZED_SCAN_LIMIT)
        .map(|m| m.as_str())
    {
        if token.len() > 2 && !found.iter().any(|f| f.eq_ignore_ascii_case(token)) {
            found.push(token.to_string());
        }
    }

    found
}
