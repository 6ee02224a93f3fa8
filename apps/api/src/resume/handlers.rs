use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::queries::insert_components;
use crate::errors::AppError;
use crate::models::component::{is_known_section_type, NewComponent};
use crate::resume::drafts::{drafts_from_sections, ComponentDraft};
use crate::resume::sectionizer::{sectionize, Section};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
    /// Use the first-generation detector instead of the multi-signal one.
    #[serde(default)]
    pub legacy: bool,
}

#[derive(Debug, Serialize)]
pub struct ParseTextResponse {
    pub detector: &'static str,
    pub sections: Vec<Section>,
    pub components: Vec<ComponentDraft>,
}

#[derive(Debug, Deserialize)]
pub struct ImportComponentsRequest {
    pub components: Vec<ComponentDraft>,
}

#[derive(Debug, Serialize)]
pub struct ImportComponentsResponse {
    pub imported_count: u64,
    pub skipped_count: usize,
}

/// POST /api/resumes/parse-text
pub async fn handle_parse_text(
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<ParseTextResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text is required".to_string()));
    }

    let (detector, sections) = if req.legacy {
        #[allow(deprecated)]
        let sections = crate::resume::sectionizer::sectionize_legacy(&req.text);
        ("legacy", sections)
    } else {
        ("multi_signal", sectionize(&req.text))
    };
    let components = drafts_from_sections(&sections);

    info!(
        "Parsed resume text with {detector} detector: {} sections, {} component drafts",
        sections.len(),
        components.len()
    );
    Ok(Json(ParseTextResponse {
        detector,
        sections,
        components,
    }))
}

/// POST /api/resumes/import-components
/// Stores reviewed drafts. Drafts with an unknown section type or blank text are skipped.
pub async fn handle_import_components(
    State(state): State<AppState>,
    Json(req): Json<ImportComponentsRequest>,
) -> Result<Json<ImportComponentsResponse>, AppError> {
    if req.components.is_empty() {
        return Err(AppError::Validation("components must not be empty".to_string()));
    }

    let total = req.components.len();
    let accepted: Vec<NewComponent> = req
        .components
        .into_iter()
        .filter(|draft| {
            let ok = is_known_section_type(&draft.section_type)
                && !draft.title.trim().is_empty()
                && !draft.content.trim().is_empty();
            if !ok {
                warn!(
                    "Skipping component draft '{}' ({})",
                    draft.title, draft.section_type
                );
            }
            ok
        })
        .map(|draft| NewComponent {
            section_type: draft.section_type,
            title: draft.title,
            content: draft.content,
            keywords: draft.keywords,
            industry_tags: String::new(),
            skill_level: Some(draft.skill_level).filter(|level| !level.is_empty()),
        })
        .collect();

    let imported_count = insert_components(&state.db, &accepted).await?;
    info!("Imported {imported_count} of {total} component drafts");
    Ok(Json(ImportComponentsResponse {
        imported_count,
        skipped_count: total - accepted.len(),
    }))
}
