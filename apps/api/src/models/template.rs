use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

/// A stored resume template. Mapping and style columns hold JSON objects.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TemplateRow {
    pub id: i64,
    pub template_name: String,
    pub description: String,
    pub target_role: String,
    pub target_industry: String,
    pub component_mapping: Json<Value>,
    pub style_settings: Json<Value>,
    pub is_default: bool,
    pub usage_count: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTemplate {
    pub template_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_role: String,
    #[serde(default)]
    pub target_industry: String,
    /// Section type to component ids, or any caller-defined shape. Defaults to `{}`.
    pub component_mapping: Option<Value>,
    pub style_settings: Option<Value>,
    #[serde(default)]
    pub is_default: bool,
}

/// Body of `POST /api/templates/import-url`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportTemplate {
    #[serde(default)]
    pub url: String,
    pub template_name: Option<String>,
    #[serde(default)]
    pub target_role: String,
    #[serde(default)]
    pub target_industry: String,
}
