//! Section-to-component conversion: turns sectionized resume text into component drafts
//! ready to be stored as reusable components.

use serde::{Deserialize, Serialize};

use crate::matching::keywords::extract_domain_keywords;
use crate::resume::sectionizer::{is_bullet_line, is_entry_head, strip_bullet, Section, SectionKind};

/// Experience entries this short are dropped.
const MIN_EXPERIENCE_LEN: usize = 50;
/// Project entries this short are dropped.
const MIN_PROJECT_LEN: usize = 30;
/// Certification lines this short are dropped.
const MIN_CERTIFICATION_LEN: usize = 10;
/// A skills line is a `Category: items` line when the category has at most this many words.
const MAX_CATEGORY_WORDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDraft {
    pub section_type: String,
    pub title: String,
    pub content: String,
    pub keywords: String,
    pub skill_level: String,
}

impl ComponentDraft {
    fn new(section_type: &str, title: String, content: String, skill_level: &str) -> Self {
        ComponentDraft {
            section_type: section_type.to_string(),
            keywords: extract_domain_keywords(&content).join(", "),
            title,
            content,
            skill_level: skill_level.to_string(),
        }
    }
}

/// Converts every section into drafts, in section order.
pub fn drafts_from_sections(sections: &[Section]) -> Vec<ComponentDraft> {
    sections.iter().flat_map(drafts_from_section).collect()
}

pub fn drafts_from_section(section: &Section) -> Vec<ComponentDraft> {
    let section_type = section.kind.component_section_type();
    match section.kind {
        SectionKind::Skills => skill_drafts(section_type, &section.content),
        SectionKind::Experience => experience_drafts(section_type, &section.content),
        SectionKind::Projects => project_drafts(section_type, &section.content),
        SectionKind::Certifications => certification_drafts(section_type, &section.content),
        _ => {
            let content = section.content.trim();
            if content.is_empty() {
                return Vec::new();
            }
            vec![ComponentDraft::new(
                section_type,
                format!("{} Section", display_name(section_type)),
                content.to_string(),
                "intermediate",
            )]
        }
    }
}

/// `Category: a, b` lines open a group; following lines join it. Lines before any category
/// each become their own draft.
fn skill_drafts(section_type: &str, content: &str) -> Vec<ComponentDraft> {
    let mut drafts = Vec::new();
    let mut group: Option<(String, Vec<String>)> = None;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let category = line
            .split_once(':')
            .filter(|(category, _)| category.split_whitespace().count() <= MAX_CATEGORY_WORDS);

        if let Some((category, rest)) = category {
            flush_skill_group(section_type, group.take(), &mut drafts);
            let rest = rest.trim();
            let items = if rest.is_empty() {
                Vec::new()
            } else {
                vec![rest.to_string()]
            };
            group = Some((category.trim().to_string(), items));
        } else if let Some((_, items)) = group.as_mut() {
            items.push(line.to_string());
        } else {
            drafts.push(ComponentDraft::new(
                section_type,
                format!("{}: {}...", display_name(section_type), truncate_chars(line, 30)),
                line.to_string(),
                "intermediate",
            ));
        }
    }
    flush_skill_group(section_type, group, &mut drafts);
    drafts
}

fn flush_skill_group(
    section_type: &str,
    group: Option<(String, Vec<String>)>,
    drafts: &mut Vec<ComponentDraft>,
) {
    if let Some((category, items)) = group {
        if !items.is_empty() {
            drafts.push(ComponentDraft::new(
                section_type,
                category,
                items.join(", "),
                "advanced",
            ));
        }
    }
}

fn experience_drafts(section_type: &str, content: &str) -> Vec<ComponentDraft> {
    split_entries(content, is_entry_head)
        .into_iter()
        .filter(|entry| entry.chars().count() > MIN_EXPERIENCE_LEN)
        .map(|entry| {
            let title = truncate_chars(entry.lines().next().unwrap_or_default(), 100);
            ComponentDraft::new(section_type, title, entry, "advanced")
        })
        .collect()
}

fn project_drafts(section_type: &str, content: &str) -> Vec<ComponentDraft> {
    split_entries(content, is_bullet_line)
        .into_iter()
        .filter(|entry| entry.chars().count() > MIN_PROJECT_LEN)
        .map(|entry| {
            let first_line = strip_bullet(entry.lines().next().unwrap_or_default());
            let title = if first_line.chars().count() > 50 {
                format!("{}...", truncate_chars(first_line, 50))
            } else {
                first_line.to_string()
            };
            ComponentDraft::new(section_type, title, entry, "advanced")
        })
        .collect()
}

fn certification_drafts(section_type: &str, content: &str) -> Vec<ComponentDraft> {
    content
        .lines()
        .map(strip_bullet)
        .filter(|line| line.chars().count() > MIN_CERTIFICATION_LEN)
        .map(|line| {
            ComponentDraft::new(
                section_type,
                truncate_chars(line, 50),
                line.to_string(),
                "expert",
            )
        })
        .collect()
}

/// Splits into entries, starting a new one at every line for which `starts_entry` holds.
fn split_entries(content: &str, starts_entry: fn(&str) -> bool) -> Vec<String> {
    let mut entries: Vec<Vec<&str>> = Vec::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match entries.last_mut() {
            Some(entry) if !starts_entry(line) => entry.push(line),
            _ => entries.push(vec![line]),
        }
    }
    entries.into_iter().map(|lines| lines.join("\n")).collect()
}

/// `technical_skills` -> `Technical Skills`
fn display_name(section_type: &str) -> String {
    section_type
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
