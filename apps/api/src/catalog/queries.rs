use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::component::{
    ComponentFilter, ComponentRow, ComponentUpdate, NewComponent, DEFAULT_SKILL_LEVEL,
};
use crate::models::employment::{EmploymentRow, NewEmployment};
use crate::models::job_description::{JobDescriptionRow, NewJobDescription};

pub const DEFAULT_COMPONENT_LIMIT: i64 = 100;
const MAX_COMPONENT_LIMIT: i64 = 1000;

// ──────────────────────────────────────────────
// Components
// ──────────────────────────────────────────────

/// Most-used first, then newest.
pub async fn list_components(
    pool: &SqlitePool,
    filter: &ComponentFilter,
) -> Result<Vec<ComponentRow>, sqlx::Error> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM components WHERE 1 = 1");

    if let Some(section_type) = filter.section_type.as_deref().filter(|s| !s.is_empty()) {
        query.push(" AND section_type = ").push_bind(section_type.to_string());
    }
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{q}%");
        query
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR content LIKE ")
            .push_bind(pattern.clone())
            .push(" OR keywords LIKE ")
            .push_bind(pattern)
            .push(")");
    }

    let limit = filter
        .limit
        .unwrap_or(DEFAULT_COMPONENT_LIMIT)
        .clamp(1, MAX_COMPONENT_LIMIT);
    query
        .push(" ORDER BY usage_count DESC, created_at DESC, id DESC LIMIT ")
        .push_bind(limit);

    query.build_query_as::<ComponentRow>().fetch_all(pool).await
}

/// Every component, in insertion order. Used as the matching snapshot.
pub async fn all_components(pool: &SqlitePool) -> Result<Vec<ComponentRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM components ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn insert_component(
    pool: &SqlitePool,
    component: &NewComponent,
) -> Result<ComponentRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO components (section_type, title, content, keywords, industry_tags, skill_level)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&component.section_type)
    .bind(&component.title)
    .bind(&component.content)
    .bind(&component.keywords)
    .bind(&component.industry_tags)
    .bind(component.skill_level.as_deref().unwrap_or(DEFAULT_SKILL_LEVEL))
    .fetch_one(pool)
    .await
}

/// Inserts every component in one transaction. Returns how many were stored.
pub async fn insert_components(
    pool: &SqlitePool,
    components: &[NewComponent],
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for component in components {
        let result = sqlx::query(
            r#"
            INSERT INTO components (section_type, title, content, keywords, industry_tags, skill_level)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&component.section_type)
        .bind(&component.title)
        .bind(&component.content)
        .bind(&component.keywords)
        .bind(&component.industry_tags)
        .bind(component.skill_level.as_deref().unwrap_or(DEFAULT_SKILL_LEVEL))
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
}

pub async fn update_component(
    pool: &SqlitePool,
    id: i64,
    update: &ComponentUpdate,
) -> Result<Option<ComponentRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE components
        SET title = ?, content = ?, keywords = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&update.title)
    .bind(&update.content)
    .bind(&update.keywords)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_component(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM components WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns the new usage count, or `None` if the component does not exist.
pub async fn increment_usage(pool: &SqlitePool, id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        UPDATE components
        SET usage_count = usage_count + 1, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING usage_count
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

// ──────────────────────────────────────────────
// Employment history
// ──────────────────────────────────────────────

pub async fn list_employment(pool: &SqlitePool) -> Result<Vec<EmploymentRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM employment_history ORDER BY start_date DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn insert_employment(
    pool: &SqlitePool,
    employment: &NewEmployment,
) -> Result<EmploymentRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO employment_history
            (company_name, position_title, start_date, end_date, location, employment_type,
             industry, responsibilities, achievements, technologies_used, skills_gained)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&employment.company_name)
    .bind(&employment.position_title)
    .bind(employment.start_date)
    .bind(employment.end_date)
    .bind(&employment.location)
    .bind(&employment.employment_type)
    .bind(&employment.industry)
    .bind(Json(&employment.responsibilities))
    .bind(Json(&employment.achievements))
    .bind(Json(&employment.technologies_used))
    .bind(Json(&employment.skills_gained))
    .fetch_one(pool)
    .await
}

// ──────────────────────────────────────────────
// Job descriptions
// ──────────────────────────────────────────────

pub async fn list_job_descriptions(
    pool: &SqlitePool,
) -> Result<Vec<JobDescriptionRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM job_descriptions ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn insert_job_description(
    pool: &SqlitePool,
    job: &NewJobDescription,
    keywords: &[String],
) -> Result<JobDescriptionRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO job_descriptions (company_name, position_title, job_description, keywords, location)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&job.company_name)
    .bind(&job.position_title)
    .bind(&job.job_description)
    .bind(Json(keywords))
    .bind(&job.location)
    .fetch_one(pool)
    .await
}

// ──────────────────────────────────────────────
// Dashboard statistics
// ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Stats {
    pub total_components: i64,
    pub components_by_section: BTreeMap<String, i64>,
    pub total_employment: i64,
    pub total_jobs: i64,
    pub total_work_orders: i64,
    pub total_projects: i64,
}

pub async fn stats(pool: &SqlitePool) -> Result<Stats, sqlx::Error> {
    let by_section: Vec<(String, i64)> = sqlx::query_as(
        "SELECT section_type, COUNT(*) FROM components GROUP BY section_type ORDER BY section_type",
    )
    .fetch_all(pool)
    .await?;

    Ok(Stats {
        total_components: count(pool, "components").await?,
        components_by_section: by_section.into_iter().collect(),
        total_employment: count(pool, "employment_history").await?,
        total_jobs: count(pool, "job_descriptions").await?,
        total_work_orders: count(pool, "work_orders").await?,
        total_projects: count(pool, "projects").await?,
    })
}

/// `table` must be a fixed table name, never user input.
async fn count(pool: &SqlitePool, table: &'static str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
}
