use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::matching::candidate::serialize_tag_column;

/// A stored gig/service job. Tag columns hold JSON text and are decoded on output.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WorkOrderRow {
    pub id: i64,
    pub external_id: Option<String>,
    pub title: String,
    pub work_type: Option<String>,
    pub company_name: String,
    pub service_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub pay_amount: Option<f64>,
    pub status: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub work_category: Option<String>,
    pub client_type: Option<String>,
    #[serde(serialize_with = "serialize_tag_column")]
    pub technologies_used: Option<String>,
    #[serde(serialize_with = "serialize_tag_column")]
    pub skills_demonstrated: Option<String>,
    pub complexity_level: Option<String>,
    pub work_description: Option<String>,
    pub challenges_faced: Option<String>,
    pub solutions_implemented: Option<String>,
    pub client_feedback: Option<String>,
    pub lessons_learned: Option<String>,
    pub include_in_resume: bool,
    pub highlight_project: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Create payload. Missing category, client type and tags are derived from the title.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWorkOrder {
    pub external_id: Option<String>,
    pub title: String,
    pub work_type: Option<String>,
    pub company_name: String,
    pub service_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub pay_amount: Option<f64>,
    pub status: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub work_category: Option<String>,
    pub client_type: Option<String>,
    pub technologies_used: Option<Vec<String>>,
    pub skills_demonstrated: Option<Vec<String>>,
    pub work_description: Option<String>,
}

/// Narrative fields editable after import. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderUpdate {
    pub work_description: Option<String>,
    pub challenges_faced: Option<String>,
    pub solutions_implemented: Option<String>,
    pub client_feedback: Option<String>,
    pub lessons_learned: Option<String>,
    pub complexity_level: Option<String>,
    pub include_in_resume: Option<bool>,
    pub highlight_project: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkOrderFilter {
    pub category: Option<String>,
    pub company: Option<String>,
    pub work_type: Option<String>,
    pub client_type: Option<String>,
    pub state: Option<String>,
    pub project_id: Option<i64>,
    #[serde(default)]
    pub unassigned: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
