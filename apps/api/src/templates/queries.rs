use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::template::{NewTemplate, TemplateRow};

/// Defaults first, then most used, then newest.
pub async fn list_templates(pool: &SqlitePool) -> Result<Vec<TemplateRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM resume_templates ORDER BY is_default DESC, usage_count DESC, created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_template(
    pool: &SqlitePool,
    template: &NewTemplate,
) -> Result<TemplateRow, sqlx::Error> {
    let empty = || Value::Object(Default::default());
    sqlx::query_as(
        r#"
        INSERT INTO resume_templates
            (template_name, description, target_role, target_industry,
             component_mapping, style_settings, is_default)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(template.template_name.trim())
    .bind(&template.description)
    .bind(&template.target_role)
    .bind(&template.target_industry)
    .bind(Json(template.component_mapping.clone().unwrap_or_else(empty)))
    .bind(Json(template.style_settings.clone().unwrap_or_else(empty)))
    .bind(template.is_default)
    .fetch_one(pool)
    .await
}
