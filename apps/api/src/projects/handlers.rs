use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::matching::candidate::TagList;
use crate::models::project::{
    AssignWorkOrders, NewProject, ProjectFilter, ProjectRow, ProjectUpdate,
};
use crate::projects::grouping::{propose_projects, ProjectProposal};
use crate::projects::queries::{self, DEFAULT_ROLE};
use crate::resume::drafts::ComponentDraft;
use crate::state::AppState;

const PRIORITY_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

#[derive(Debug, Serialize)]
pub struct AssignResponse {
    pub assigned_count: u64,
    pub project: ProjectRow,
}

#[derive(Debug, Default, Deserialize)]
pub struct AutoCreateParams {
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct AutoCreateResponse {
    pub created_count: usize,
    pub proposals: Vec<ProjectProposal>,
    pub projects: Vec<ProjectRow>,
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Project {id} not found"))
}

fn validate_priority(priority: i64) -> Result<(), AppError> {
    if !PRIORITY_RANGE.contains(&priority) {
        return Err(AppError::Validation(format!(
            "priority_level must be between {} and {}",
            PRIORITY_RANGE.start(),
            PRIORITY_RANGE.end()
        )));
    }
    Ok(())
}

/// GET /api/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    Ok(Json(queries::list_projects(&state.db, &filter).await?))
}

/// POST /api/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(req): Json<NewProject>,
) -> Result<(StatusCode, Json<ProjectRow>), AppError> {
    if req.project_name.trim().is_empty() {
        return Err(AppError::Validation("project_name is required".to_string()));
    }
    validate_priority(req.priority_level)?;

    let mut conn = state.db.acquire().await?;
    let project = queries::insert_project(&mut conn, &req).await?;
    info!("Created project {} ({})", project.id, project.project_name);
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ProjectUpdate>,
) -> Result<Json<ProjectRow>, AppError> {
    if req
        .project_name
        .as_deref()
        .is_some_and(|name| name.trim().is_empty())
    {
        return Err(AppError::Validation("project_name must not be blank".to_string()));
    }
    if let Some(priority) = req.priority_level {
        validate_priority(priority)?;
    }

    let project = queries::update_project(&state.db, id, &req)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(project))
}

/// DELETE /api/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !queries::delete_project(&state.db, id).await? {
        return Err(not_found(id));
    }
    info!("Deleted project {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/projects/:id/work-orders
pub async fn handle_assign_work_orders(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AssignWorkOrders>,
) -> Result<Json<AssignResponse>, AppError> {
    if req.work_order_ids.is_empty() {
        return Err(AppError::Validation("work_order_ids must not be empty".to_string()));
    }
    if queries::get_project(&state.db, id).await?.is_none() {
        return Err(not_found(id));
    }

    let role = req
        .role_in_project
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_ROLE);
    let assigned_count =
        queries::assign_work_orders(&state.db, id, &req.work_order_ids, role).await?;

    let project = queries::get_project(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!("Assigned {assigned_count} work orders to project {id}");
    Ok(Json(AssignResponse {
        assigned_count,
        project,
    }))
}

/// DELETE /api/projects/:id/work-orders/:work_order_id
pub async fn handle_unassign_work_order(
    State(state): State<AppState>,
    Path((id, work_order_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    if !queries::unassign_work_order(&state.db, id, work_order_id).await? {
        return Err(AppError::NotFound(format!(
            "Work order {work_order_id} is not assigned to project {id}"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/projects/auto-create
/// Groups unassigned work orders by company and quarter. `?dry_run=true` only previews.
pub async fn handle_auto_create(
    State(state): State<AppState>,
    Query(params): Query<AutoCreateParams>,
) -> Result<Json<AutoCreateResponse>, AppError> {
    let candidates = queries::unassigned_dated_work_orders(&state.db).await?;
    let proposals = propose_projects(&candidates);

    let projects = if params.dry_run || proposals.is_empty() {
        Vec::new()
    } else {
        queries::create_proposed_projects(&state.db, &proposals).await?
    };

    info!(
        "Auto-grouping: {} unassigned work orders, {} proposals, {} projects created",
        candidates.len(),
        proposals.len(),
        projects.len()
    );
    Ok(Json(AutoCreateResponse {
        created_count: projects.len(),
        proposals,
        projects,
    }))
}

/// GET /api/projects/resume-components
pub async fn handle_project_drafts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ComponentDraft>>, AppError> {
    let projects = queries::resume_ready_projects(&state.db).await?;
    Ok(Json(projects.iter().map(draft_from_project).collect()))
}

pub fn draft_from_project(project: &ProjectRow) -> ComponentDraft {
    let mut title = format!("Project: {}", project.project_name);
    if let Some(client) = project.client_name.as_deref().filter(|c| !c.is_empty()) {
        if !project.project_name.contains(client) {
            title.push_str(&format!(" - {client}"));
        }
    }

    let mut lines = vec![format!(
        "Project with {} work orders",
        project.total_work_orders
    )];
    if let Some(summary) = project.project_summary.as_deref().filter(|s| !s.is_empty()) {
        lines.push(summary.to_string());
    }
    if project.total_earnings > 0.0 {
        lines.push(format!("Project value: ${:.2}", project.total_earnings));
    }

    let mut keywords: Vec<String> = Vec::new();
    for tags in [&project.technologies_used, &project.skills_demonstrated] {
        if let Some(parsed) = TagList::from_column(tags.as_deref()).tags() {
            keywords.extend(parsed.iter().cloned());
        }
    }
    keywords.push(project.project_type.clone());
    keywords.extend(project.client_type.iter().cloned());
    keywords.retain(|k| !k.is_empty());

    ComponentDraft {
        section_type: "projects".to_string(),
        title,
        content: lines.join("\n"),
        keywords: keywords.join(", "),
        skill_level: "advanced".to_string(),
    }
}
