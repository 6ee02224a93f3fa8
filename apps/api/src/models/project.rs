use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::matching::candidate::serialize_tag_column;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub project_name: String,
    pub project_description: Option<String>,
    pub project_type: String,
    pub client_name: Option<String>,
    pub client_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub project_summary: Option<String>,
    #[serde(serialize_with = "serialize_tag_column")]
    pub technologies_used: Option<String>,
    #[serde(serialize_with = "serialize_tag_column")]
    pub skills_demonstrated: Option<String>,
    pub include_in_resume: bool,
    pub priority_level: i64,
    pub total_work_orders: i64,
    pub total_earnings: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn default_project_type() -> String {
    "support".to_string()
}

fn default_true() -> bool {
    true
}

fn default_priority() -> i64 {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub project_name: String,
    pub project_description: Option<String>,
    #[serde(default = "default_project_type")]
    pub project_type: String,
    pub client_name: Option<String>,
    pub client_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub project_summary: Option<String>,
    #[serde(default)]
    pub technologies_used: Vec<String>,
    #[serde(default)]
    pub skills_demonstrated: Vec<String>,
    #[serde(default = "default_true")]
    pub include_in_resume: bool,
    #[serde(default = "default_priority")]
    pub priority_level: i64,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub project_type: Option<String>,
    pub client_name: Option<String>,
    pub client_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub project_summary: Option<String>,
    pub technologies_used: Option<Vec<String>>,
    pub skills_demonstrated: Option<Vec<String>>,
    pub include_in_resume: Option<bool>,
    pub priority_level: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignWorkOrders {
    pub work_order_ids: Vec<i64>,
    pub role_in_project: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    #[serde(default)]
    pub resume_only: bool,
}
