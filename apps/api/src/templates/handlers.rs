use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::template::{ImportTemplate, NewTemplate, TemplateRow};
use crate::state::AppState;
use crate::templates::download::{download_template, parse_template_url, DOWNLOAD_TIMEOUT};
use crate::templates::queries;

/// GET /api/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateRow>>, AppError> {
    let templates = queries::list_templates(&state.db).await?;
    Ok(Json(templates))
}

/// POST /api/templates
pub async fn handle_create_template(
    State(state): State<AppState>,
    Json(req): Json<NewTemplate>,
) -> Result<(StatusCode, Json<TemplateRow>), AppError> {
    if req.template_name.trim().is_empty() {
        return Err(AppError::Validation("template_name is required".into()));
    }

    let template = queries::insert_template(&state.db, &req).await?;
    info!("Created template {} ({})", template.id, template.template_name);
    Ok((StatusCode::CREATED, Json(template)))
}

/// POST /api/templates/import-url
///
/// Downloads the document and stores it as a non-default template whose mapping carries
/// `{source_url, content}`. Download failures are the caller's problem and map to 400.
pub async fn handle_import_template(
    State(state): State<AppState>,
    Json(req): Json<ImportTemplate>,
) -> Result<(StatusCode, Json<TemplateRow>), AppError> {
    if req.url.trim().is_empty() {
        return Err(AppError::Validation("No URL provided".into()));
    }
    let url = parse_template_url(&req.url).map_err(|e| AppError::Validation(e.to_string()))?;

    let content = download_template(&url, DOWNLOAD_TIMEOUT)
        .await
        .map_err(|e| {
            warn!("Template download from {url} failed: {e}");
            AppError::Validation(format!("Failed to download template: {e}"))
        })?;

    let template_name = req
        .template_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Template from {}", url.host_str().unwrap_or("unknown host")));

    let new_template = NewTemplate {
        template_name,
        description: format!("Imported from {url}"),
        target_role: req.target_role,
        target_industry: req.target_industry,
        component_mapping: Some(json!({ "source_url": url.as_str(), "content": content })),
        style_settings: Some(json!({ "imported": true })),
        is_default: false,
    };
    let template = queries::insert_template(&state.db, &new_template).await?;
    info!("Imported template {} from {url}", template.id);
    Ok((StatusCode::CREATED, Json(template)))
}
