use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: i64,
    pub company_name: String,
    pub position_title: String,
    pub job_description: String,
    /// Domain keywords extracted when the posting was saved.
    pub keywords: Json<Vec<String>>,
    pub location: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewJobDescription {
    pub company_name: String,
    pub position_title: String,
    pub job_description: String,
    #[serde(default)]
    pub location: String,
}
