use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Section types a component may be filed under.
pub const SECTION_TYPES: &[&str] = &[
    "professional_summary",
    "technical_skills",
    "professional_skills",
    "work_experience",
    "projects",
    "certifications",
    "education",
    "accomplishments",
    "contact_information",
    "additional_information",
];

pub const DEFAULT_SKILL_LEVEL: &str = "intermediate";

pub fn is_known_section_type(section_type: &str) -> bool {
    SECTION_TYPES.contains(&section_type)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ComponentRow {
    pub id: i64,
    pub section_type: String,
    pub title: String,
    pub content: String,
    pub keywords: Option<String>,
    pub industry_tags: Option<String>,
    pub skill_level: String,
    pub usage_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComponent {
    pub section_type: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub industry_tags: String,
    pub skill_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentUpdate {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub keywords: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentFilter {
    pub section_type: Option<String>,
    pub q: Option<String>,
    pub limit: Option<i64>,
}
