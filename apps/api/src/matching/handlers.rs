use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::queries::all_components;
use crate::errors::AppError;
use crate::matching::candidate::{CandidateItem, ItemType};
use crate::matching::keywords::extract_domain_keywords;
use crate::matching::{rank_candidates, MatchMode, MatchResult};
use crate::projects::queries::resume_ready_projects;
use crate::state::AppState;
use crate::workorders::queries::resume_ready_work_orders;

pub const MATCH_LIMIT: usize = 20;
pub const COMPONENT_MATCH_LIMIT: usize = 10;
pub const WORK_ORDER_MATCH_LIMIT: usize = 10;
pub const PROJECT_MATCH_LIMIT: usize = 5;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub job_description: String,
    #[serde(default)]
    pub mode: MatchMode,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    /// Domain keywords for display; scoring uses the frequency keywords.
    pub keywords: Vec<String>,
    pub matches: Vec<MatchResult>,
    pub total_matches: usize,
    pub mode: MatchMode,
}

#[derive(Debug, Serialize)]
pub struct EnhancedMatchResponse {
    pub keywords: Vec<String>,
    pub component_matches: Vec<MatchResult>,
    pub work_order_matches: Vec<MatchResult>,
    pub project_matches: Vec<MatchResult>,
    pub total_matches: usize,
    pub mode: MatchMode,
}

fn require_job_description(req: &MatchRequest) -> Result<(), AppError> {
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }
    Ok(())
}

/// POST /api/job-matcher
/// Ranks stored components against a job description.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    require_job_description(&req)?;

    let components = all_components(&state.db).await?;
    let candidates: Vec<CandidateItem> = components.iter().map(CandidateItem::from).collect();

    let ranked = rank_candidates(&req.job_description, &candidates, req.mode, &state.semantic).await;
    let total_matches = ranked.matches.len();
    info!(
        "Job match ({:?}): {total_matches} of {} components matched",
        ranked.mode,
        candidates.len()
    );

    Ok(Json(MatchResponse {
        keywords: extract_domain_keywords(&req.job_description),
        matches: ranked.matches.into_iter().take(MATCH_LIMIT).collect(),
        total_matches,
        mode: ranked.mode,
    }))
}

/// POST /api/job-matcher/enhanced
/// Ranks components, resume-ready work orders and resume-ready projects in one pass, then
/// reports each kind separately.
pub async fn handle_enhanced_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<EnhancedMatchResponse>, AppError> {
    require_job_description(&req)?;

    let components = all_components(&state.db).await?;
    let work_orders = resume_ready_work_orders(&state.db).await?;
    let projects = resume_ready_projects(&state.db).await?;

    let candidates: Vec<CandidateItem> = components
        .iter()
        .map(CandidateItem::from)
        .chain(work_orders.iter().map(CandidateItem::from))
        .chain(projects.iter().map(CandidateItem::from))
        .collect();

    let ranked = rank_candidates(&req.job_description, &candidates, req.mode, &state.semantic).await;
    let total_matches = ranked.matches.len();
    info!(
        "Enhanced job match ({:?}): {total_matches} of {} items matched",
        ranked.mode,
        candidates.len()
    );

    let mut component_matches = Vec::new();
    let mut work_order_matches = Vec::new();
    let mut project_matches = Vec::new();
    for m in ranked.matches {
        match m.item.item_type() {
            ItemType::Component => component_matches.push(m),
            ItemType::WorkOrder => work_order_matches.push(m),
            ItemType::Project => project_matches.push(m),
        }
    }
    component_matches.truncate(COMPONENT_MATCH_LIMIT);
    work_order_matches.truncate(WORK_ORDER_MATCH_LIMIT);
    project_matches.truncate(PROJECT_MATCH_LIMIT);

    Ok(Json(EnhancedMatchResponse {
        keywords: extract_domain_keywords(&req.job_description),
        component_matches,
        work_order_matches,
        project_matches,
        total_matches,
        mode: ranked.mode,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::queries::insert_component;
    use crate::matching::semantic::tests::FakeModel;
    use crate::matching::semantic::SemanticCapability;
    use crate::models::component::NewComponent;
    use crate::projects::queries::{insert_project, tests::make_project};
    use crate::workorders::queries::{insert_work_order, tests::make_work_order};

    fn request(job_description: &str, mode: MatchMode) -> Json<MatchRequest> {
        Json(MatchRequest {
            job_description: job_description.to_string(),
            mode,
        })
    }

    async fn seed_component(state: &AppState, title: &str, content: &str) {
        insert_component(
            &state.db,
            &NewComponent {
                section_type: "technical_skills".to_string(),
                title: title.to_string(),
                content: content.to_string(),
                keywords: String::new(),
                industry_tags: String::new(),
                skill_level: None,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_blank_job_description_is_rejected() {
        let state = AppState::for_tests().await;
        let err = handle_match(State(state), request("  \n", MatchMode::Keyword))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_keyword_match_returns_display_keywords_and_mode() {
        let state = AppState::for_tests().await;
        seed_component(&state, "Desktop support", "Windows 10 imaging").await;
        seed_component(&state, "Forklift", "Warehouse certified").await;

        let Json(resp) = handle_match(
            State(state),
            request("Windows desktop support technician", MatchMode::Semantic),
        )
        .await
        .unwrap();
        // No embedding model configured: answered in keyword mode.
        assert_eq!(resp.mode, MatchMode::Keyword);
        assert_eq!(resp.total_matches, 1);
        assert_eq!(resp.matches[0].item.title(), "Desktop support");
        assert_eq!(resp.keywords, vec!["windows", "desktop support"]);
    }

    #[tokio::test]
    async fn test_semantic_match_uses_loaded_model() {
        let state =
            AppState::for_tests_with(SemanticCapability::with_model(Arc::new(FakeModel {
                fail: false,
            })))
            .await;
        seed_component(&state, "Windows imaging", "").await;
        seed_component(&state, "Printer fleet", "").await;

        let Json(resp) = handle_match(
            State(state),
            request("Windows engineer", MatchMode::Semantic),
        )
        .await
        .unwrap();
        assert_eq!(resp.mode, MatchMode::Semantic);
        assert_eq!(resp.total_matches, 1);
        assert_eq!(resp.matches[0].match_percentage, 100);
    }

    #[tokio::test]
    async fn test_enhanced_match_partitions_by_item_type() {
        let state = AppState::for_tests().await;
        seed_component(&state, "ServiceNow queues", "Incident triage").await;

        let mut wo = make_work_order("ServiceNow ticket cleanup", "Acme", Some("2023-01-02"));
        wo.technologies_used = Some(vec!["ServiceNow".to_string()]);
        insert_work_order(&state.db, &wo).await.unwrap();

        let mut project = make_project("ServiceNow migration");
        project.project_description = Some("Moved queues to ServiceNow".to_string());
        let mut conn = state.db.acquire().await.unwrap();
        insert_project(&mut conn, &project).await.unwrap();
        drop(conn);

        let Json(resp) = handle_enhanced_match(
            State(state),
            request("ServiceNow administrator", MatchMode::Keyword),
        )
        .await
        .unwrap();

        assert_eq!(resp.total_matches, 3);
        assert_eq!(resp.component_matches.len(), 1);
        assert_eq!(resp.work_order_matches.len(), 1);
        assert_eq!(resp.project_matches.len(), 1);
        // keyword "servicenow" + technology bonus
        assert_eq!(resp.work_order_matches[0].score, 1.0 + 2.0);
        assert_eq!(resp.keywords, vec!["servicenow"]);
    }
}
