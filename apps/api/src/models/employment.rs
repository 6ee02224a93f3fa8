use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmploymentRow {
    pub id: i64,
    pub company_name: String,
    pub position_title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: String,
    pub employment_type: String,
    pub industry: String,
    pub responsibilities: Json<Vec<String>>,
    pub achievements: Json<Vec<String>>,
    pub technologies_used: Json<Vec<String>>,
    pub skills_gained: Json<Vec<String>>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn default_employment_type() -> String {
    "full-time".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEmployment {
    pub company_name: String,
    pub position_title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_employment_type")]
    pub employment_type: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies_used: Vec<String>,
    #[serde(default)]
    pub skills_gained: Vec<String>,
}
