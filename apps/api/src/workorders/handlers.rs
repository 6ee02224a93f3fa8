use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::matching::candidate::TagList;
use crate::models::work_order::{NewWorkOrder, WorkOrderFilter, WorkOrderRow, WorkOrderUpdate};
use crate::projects::queries::refresh_project_totals;
use crate::resume::drafts::ComponentDraft;
use crate::state::AppState;
use crate::workorders::queries::{self, WorkOrderFacets, WorkOrderPage, WorkOrderStats};

/// Work orders turned into resume drafts per request.
const RESUME_DRAFT_LIMIT: usize = 20;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Work order {id} not found"))
}

/// GET /api/work-orders
pub async fn handle_list_work_orders(
    State(state): State<AppState>,
    Query(filter): Query<WorkOrderFilter>,
) -> Result<Json<WorkOrderPage>, AppError> {
    Ok(Json(queries::list_work_orders(&state.db, &filter).await?))
}

/// POST /api/work-orders
pub async fn handle_create_work_order(
    State(state): State<AppState>,
    Json(req): Json<NewWorkOrder>,
) -> Result<(StatusCode, Json<WorkOrderRow>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    if req.company_name.trim().is_empty() {
        return Err(AppError::Validation("company_name is required".to_string()));
    }

    let row = match queries::insert_work_order(&state.db, &req).await {
        Ok(row) => row,
        Err(e)
            if e.as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false) =>
        {
            return Err(AppError::Validation(format!(
                "A work order with external_id '{}' already exists",
                req.external_id.as_deref().unwrap_or_default()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        "Created work order {} ({}, {})",
        row.id,
        row.company_name,
        row.work_category.as_deref().unwrap_or("general")
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/work-orders/:id
pub async fn handle_get_work_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<WorkOrderRow>, AppError> {
    let row = queries::get_work_order(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(row))
}

/// PUT /api/work-orders/:id
pub async fn handle_update_work_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<WorkOrderUpdate>,
) -> Result<Json<WorkOrderRow>, AppError> {
    let row = queries::update_work_order(&state.db, id, &req)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(row))
}

/// DELETE /api/work-orders/:id
pub async fn handle_delete_work_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !queries::delete_work_order(&state.db, id).await? {
        return Err(not_found(id));
    }
    refresh_project_totals(&state.db).await?;
    info!("Deleted work order {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/work-orders/stats
pub async fn handle_work_order_stats(
    State(state): State<AppState>,
) -> Result<Json<WorkOrderStats>, AppError> {
    Ok(Json(queries::work_order_stats(&state.db).await?))
}

/// GET /api/work-orders/categories
pub async fn handle_work_order_facets(
    State(state): State<AppState>,
) -> Result<Json<WorkOrderFacets>, AppError> {
    Ok(Json(queries::work_order_facets(&state.db).await?))
}

/// GET /api/work-orders/resume-components
pub async fn handle_work_order_drafts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ComponentDraft>>, AppError> {
    let rows = queries::resume_ready_work_orders(&state.db).await?;
    let drafts = rows
        .iter()
        .take(RESUME_DRAFT_LIMIT)
        .map(draft_from_work_order)
        .collect();
    Ok(Json(drafts))
}

/// A work-experience draft: "{type} - {company} (Month YYYY)" over title, description, location.
pub fn draft_from_work_order(row: &WorkOrderRow) -> ComponentDraft {
    let mut title = format!(
        "{} - {}",
        row.work_type.as_deref().unwrap_or("Field Service"),
        row.company_name
    );
    if let Some(date) = row.service_date {
        title.push_str(&format!(" ({})", date.format("%B %Y")));
    }

    let mut content = row.title.clone();
    for (label, value) in [("", &row.work_description), ("Location: ", &row.location)] {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            content.push_str(&format!("\n{label}{value}"));
        }
    }

    let mut keywords: Vec<String> = Vec::new();
    for tags in [&row.technologies_used, &row.skills_demonstrated] {
        if let Some(parsed) = TagList::from_column(tags.as_deref()).tags() {
            keywords.extend(parsed.iter().cloned());
        }
    }
    keywords.extend(row.work_category.iter().cloned());
    keywords.extend(row.client_type.iter().cloned());
    keywords.retain(|k| !k.is_empty());

    ComponentDraft {
        section_type: "work_experience".to_string(),
        title,
        content,
        keywords: keywords.join(", "),
        skill_level: "intermediate".to_string(),
    }
}
