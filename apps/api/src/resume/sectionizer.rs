//! Resume-text sectionizer: splits pasted resume text into labelled sections.
//!
//! `sectionize` is the multi-signal detector. A line becomes a header when:
//! 1. after normalisation it is exactly one of a category's header phrases, or
//! 2. it carries no entry signal (date range, "City, ST", organisation, degree or job-title
//!    keyword) and its structural signals (short ALL-CAPS line, short line ending in a colon,
//!    short line followed by a much longer or a bulleted line) add up to 2, or to 1 when the
//!    line also contains a category hint word.
//!
//! Lines before the first recognised header form a preamble section. Decisions depend only on
//! the sequence of non-blank lines, so re-parsing rendered output yields the same sections.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Certifications,
    Projects,
    Contact,
    Other,
}

impl SectionKind {
    /// Component section type a section of this kind is filed under.
    pub fn component_section_type(self) -> &'static str {
        match self {
            SectionKind::Summary => "professional_summary",
            SectionKind::Skills => "technical_skills",
            SectionKind::Experience => "work_experience",
            SectionKind::Education => "education",
            SectionKind::Certifications => "certifications",
            SectionKind::Projects => "projects",
            SectionKind::Contact => "contact_information",
            SectionKind::Other => "additional_information",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    /// The header line as written. `None` for the preamble.
    pub heading: Option<String>,
    /// Non-blank body lines joined with `\n`.
    pub content: String,
}

impl Section {
    fn new(kind: SectionKind, heading: Option<&str>, lines: &[&str]) -> Self {
        Section {
            kind,
            heading: heading.map(str::to_string),
            content: lines.join("\n"),
        }
    }
}

// ──────────────────────────────────────────────
// Vocabulary
// ──────────────────────────────────────────────

/// Whole-line header phrases, compared after normalisation.
const HEADER_PHRASES: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Summary,
        &[
            "summary",
            "professional summary",
            "career summary",
            "executive summary",
            "summary of qualifications",
            "profile",
            "professional profile",
            "objective",
            "career objective",
            "about me",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "professional skills",
            "key skills",
            "core competencies",
            "competencies",
            "technical competencies",
            "areas of expertise",
            "technologies",
            "skills summary",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "employment",
            "employment history",
            "work history",
            "career history",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education",
            "educational background",
            "academic background",
            "education and training",
        ],
    ),
    (
        SectionKind::Certifications,
        &[
            "certifications",
            "certification",
            "certifications and licenses",
            "licenses",
            "credentials",
            "training",
            "professional development",
        ],
    ),
    (
        SectionKind::Projects,
        &[
            "projects",
            "key projects",
            "notable projects",
            "selected projects",
            "major projects",
            "project experience",
        ],
    ),
    (
        SectionKind::Contact,
        &["contact", "contact information", "contact details", "personal information"],
    ),
    (
        SectionKind::Other,
        &[
            "accomplishments",
            "achievements",
            "awards",
            "honors",
            "volunteer experience",
            "volunteering",
            "interests",
            "languages",
            "references",
        ],
    ),
];

/// Substrings that suggest a category for headers that are not exact phrases.
const HINT_WORDS: &[(SectionKind, &[&str])] = &[
    (SectionKind::Summary, &["summary", "profile", "objective"]),
    (
        SectionKind::Skills,
        &["skill", "competenc", "expertise", "technolog"],
    ),
    (
        SectionKind::Experience,
        &["experience", "employment", "work history", "career"],
    ),
    (SectionKind::Education, &["education", "academic"]),
    (
        SectionKind::Certifications,
        &["certif", "license", "credential", "training"],
    ),
    (SectionKind::Projects, &["project", "portfolio"]),
    (SectionKind::Contact, &["contact"]),
];

const ORGANISATION_WORDS: &[&str] = &[
    "inc",
    "llc",
    "ltd",
    "corp",
    "corporation",
    "company",
    "university",
    "college",
    "institute",
    "school",
    "academy",
    "hospital",
    "bank",
];

const DEGREE_WORDS: &[&str] = &[
    "bachelor",
    "bachelors",
    "master",
    "masters",
    "associate",
    "associates",
    "diploma",
    "degree",
    "phd",
    "mba",
    "ged",
];

const JOB_TITLE_WORDS: &[&str] = &[
    "technician",
    "engineer",
    "specialist",
    "analyst",
    "administrator",
    "manager",
    "developer",
    "consultant",
    "coordinator",
    "director",
    "supervisor",
    "architect",
    "assistant",
    "representative",
    "officer",
    "intern",
];

const BULLET_CHARS: &[char] = &['•', '-', '*', '·', '▪', '◦', '●', '‣', '–'];

lazy_static! {
    static ref DATE_RANGE_RE: Regex = Regex::new(
        r"(?i)\b(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+)?(?:\d{1,2}/)?(?:19|20)\d{2}\s*(?:-|–|—|to)\s*(?:(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+)?(?:\d{1,2}/)?(?:19|20)\d{2}|present|current|now)\b"
    )
    .unwrap();
    static ref LOCATION_RE: Regex =
        Regex::new(r"\b[A-Z][a-zA-Z.]+(?:\s+[A-Z][a-zA-Z.]+)*,\s*[A-Z]{2}\b").unwrap();
    static ref DEGREE_ABBREVIATION_RE: Regex =
        Regex::new(r"\b(?:B\.S|B\.A|M\.S|M\.A|A\.A|A\.S|Ph\.D)\.?").unwrap();
    static ref NUMBERED_RE: Regex = Regex::new(r"^\d+[.)]\s").unwrap();
    static ref EMAIL_RE: Regex = Regex::new(r"[\w.+-]+@[\w-]+\.[\w.]+").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"\(?\d{3}\)?[\s.-]?\d{3}[\s.-]\d{4}").unwrap();
}

// ──────────────────────────────────────────────
// Detection
// ──────────────────────────────────────────────

/// Splits resume text into sections using the multi-signal header detector.
pub fn sectionize(text: &str) -> Vec<Section> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut sections = Vec::new();
    let mut preamble: Vec<&str> = Vec::new();
    let mut current: Option<(SectionKind, &str, Vec<&str>)> = None;

    for (i, &line) in lines.iter().enumerate() {
        let header = classify_header(line, lines.get(i + 1).copied())
            // Unrecognised header shapes near the top are usually a name banner.
            .filter(|kind| current.is_some() || *kind != SectionKind::Other || is_exact_phrase(line));

        if let Some(kind) = header {
            if let Some((k, heading, body)) = current.take() {
                sections.push(Section::new(k, Some(heading), &body));
            }
            current = Some((kind, line, Vec::new()));
        } else if let Some((_, _, body)) = current.as_mut() {
            body.push(line);
        } else {
            preamble.push(line);
        }
    }

    if let Some((k, heading, body)) = current {
        sections.push(Section::new(k, Some(heading), &body));
    }
    if !preamble.is_empty() {
        let kind = if preamble
            .iter()
            .any(|l| EMAIL_RE.is_match(l) || PHONE_RE.is_match(l))
        {
            SectionKind::Contact
        } else {
            SectionKind::Other
        };
        sections.insert(0, Section::new(kind, None, &preamble));
    }

    sections
}

/// Decides whether `line` is a section header, given the next non-blank line.
pub fn classify_header(line: &str, next: Option<&str>) -> Option<SectionKind> {
    if is_bullet_line(line) {
        return None;
    }
    let normalized = normalize_heading(line);
    if normalized.is_empty() {
        return None;
    }
    if let Some(kind) = exact_phrase_kind(&normalized) {
        return Some(kind);
    }
    if has_entry_signal(line, &normalized) {
        return None;
    }

    let hint = hinted_kind(&normalized);
    match structural_score(line, next) {
        score if score >= 2 => Some(hint.unwrap_or(SectionKind::Other)),
        1 => hint,
        _ => None,
    }
}

fn is_exact_phrase(line: &str) -> bool {
    exact_phrase_kind(&normalize_heading(line)).is_some()
}

/// Lower-cases, spells out `&`, drops punctuation and collapses whitespace.
fn normalize_heading(line: &str) -> String {
    let replaced: String = line
        .to_lowercase()
        .replace('&', " and ")
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn exact_phrase_kind(normalized: &str) -> Option<SectionKind> {
    HEADER_PHRASES
        .iter()
        .find(|(_, phrases)| phrases.contains(&normalized))
        .map(|(kind, _)| *kind)
}

fn hinted_kind(normalized: &str) -> Option<SectionKind> {
    HINT_WORDS
        .iter()
        .find(|(_, hints)| hints.iter().any(|h| normalized.contains(h)))
        .map(|(kind, _)| *kind)
}

/// Signals that a line belongs to an entry (a job, a school) rather than naming a section.
fn has_entry_signal(line: &str, normalized: &str) -> bool {
    if DATE_RANGE_RE.is_match(line)
        || LOCATION_RE.is_match(line)
        || DEGREE_ABBREVIATION_RE.is_match(line)
    {
        return true;
    }
    normalized.split(' ').any(|word| {
        ORGANISATION_WORDS.contains(&word)
            || DEGREE_WORDS.contains(&word)
            || JOB_TITLE_WORDS.contains(&word)
    })
}

fn structural_score(line: &str, next: Option<&str>) -> u8 {
    let words = line.split_whitespace().count();
    let length = line.chars().count();
    let mut score = 0;

    if words <= 6 && is_all_caps(line) {
        score += 1;
    }
    if words <= 5 && line.ends_with(':') {
        score += 1;
    }
    if words <= 5 && length <= 40 {
        if let Some(next) = next {
            if is_bullet_line(next) || next.chars().count() >= 2 * length {
                score += 1;
            }
        }
    }
    score
}

fn is_all_caps(line: &str) -> bool {
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

/// Lines opening with a bullet glyph or a `1.` / `1)` marker.
pub(crate) fn is_bullet_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with(BULLET_CHARS) || NUMBERED_RE.is_match(trimmed)
}

/// A capitalised, non-bullet line naming a role or an organisation: the first line of a job entry.
pub(crate) fn is_entry_head(line: &str) -> bool {
    if is_bullet_line(line) || !line.starts_with(|c: char| c.is_uppercase()) {
        return false;
    }
    normalize_heading(line)
        .split(' ')
        .any(|word| JOB_TITLE_WORDS.contains(&word) || ORGANISATION_WORDS.contains(&word))
}

/// Strips leading/trailing bullet glyphs and whitespace.
pub(crate) fn strip_bullet(line: &str) -> &str {
    line.trim_matches(|c: char| BULLET_CHARS.contains(&c) || c.is_whitespace())
}

/// Renders sections back to text: header line, body, blank line between sections.
#[cfg(test)]
fn render_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| match (&s.heading, s.content.is_empty()) {
            (Some(heading), true) => heading.clone(),
            (Some(heading), false) => format!("{heading}\n{}", s.content),
            (None, _) => s.content.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

// ──────────────────────────────────────────────
// Legacy detector
// ──────────────────────────────────────────────

lazy_static! {
    /// Unanchored per-category patterns, checked in order. The first hit wins.
    static ref LEGACY_PATTERNS: Vec<(SectionKind, Regex)> = vec![
        (
            SectionKind::Summary,
            Regex::new(r"(?i)professional\s+summary|summary|objective|profile").unwrap(),
        ),
        (
            SectionKind::Skills,
            Regex::new(r"(?i)technical\s+skills|programming\s+languages|technologies|software|tools|platforms|skills|core\s+competencies").unwrap(),
        ),
        (
            SectionKind::Experience,
            Regex::new(r"(?i)work\s+experience|professional\s+experience|employment|career\s+history|experience").unwrap(),
        ),
        (
            SectionKind::Projects,
            Regex::new(r"(?i)projects|portfolio|achievements").unwrap(),
        ),
        (
            SectionKind::Certifications,
            Regex::new(r"(?i)certifications|licenses|credentials|training|professional\s+development").unwrap(),
        ),
        (
            SectionKind::Education,
            Regex::new(r"(?i)education|academic\s+background|qualifications|degree|university|college").unwrap(),
        ),
        (
            SectionKind::Other,
            Regex::new(r"(?i)accomplishments|awards|honors|recognition").unwrap(),
        ),
    ];
}

/// First-generation detector: any line containing a section word starts a new section.
/// Lines before the first header are dropped, as are sections with no body.
#[deprecated(note = "use `sectionize`; this treats any line mentioning a section word as a header")]
pub fn sectionize_legacy(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(SectionKind, &str, Vec<&str>)> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let header = LEGACY_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(line))
            .map(|(kind, _)| *kind);

        match header {
            Some(kind) => {
                if let Some((k, heading, body)) = current.take() {
                    if !body.is_empty() {
                        sections.push(Section::new(k, Some(heading), &body));
                    }
                }
                current = Some((kind, line, Vec::new()));
            }
            None => {
                if let Some((_, _, body)) = current.as_mut() {
                    body.push(line);
                }
            }
        }
    }

    if let Some((k, heading, body)) = current {
        if !body.is_empty() {
            sections.push(Section::new(k, Some(heading), &body));
        }
    }
    sections
}
