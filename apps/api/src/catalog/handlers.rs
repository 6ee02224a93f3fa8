use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::catalog::queries::{self, Stats};
use crate::errors::AppError;
use crate::matching::keywords::extract_domain_keywords;
use crate::models::component::{
    is_known_section_type, ComponentFilter, ComponentRow, ComponentUpdate, NewComponent,
};
use crate::models::employment::{EmploymentRow, NewEmployment};
use crate::models::job_description::{JobDescriptionRow, NewJobDescription};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub id: i64,
    pub usage_count: i64,
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// GET /api/components
pub async fn handle_list_components(
    State(state): State<AppState>,
    Query(filter): Query<ComponentFilter>,
) -> Result<Json<Vec<ComponentRow>>, AppError> {
    let components = queries::list_components(&state.db, &filter).await?;
    Ok(Json(components))
}

/// POST /api/components
pub async fn handle_create_component(
    State(state): State<AppState>,
    Json(req): Json<NewComponent>,
) -> Result<(StatusCode, Json<ComponentRow>), AppError> {
    if !is_known_section_type(&req.section_type) {
        return Err(AppError::Validation(format!(
            "Invalid section type '{}'",
            req.section_type
        )));
    }
    require("title", &req.title)?;
    require("content", &req.content)?;

    let component = queries::insert_component(&state.db, &req).await?;
    info!(
        "Created component {} ({})",
        component.id, component.section_type
    );
    Ok((StatusCode::CREATED, Json(component)))
}

/// PUT /api/components/:id
pub async fn handle_update_component(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ComponentUpdate>,
) -> Result<Json<ComponentRow>, AppError> {
    require("title", &req.title)?;
    require("content", &req.content)?;

    let component = queries::update_component(&state.db, id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Component {id} not found")))?;
    Ok(Json(component))
}

/// DELETE /api/components/:id
pub async fn handle_delete_component(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !queries::delete_component(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Component {id} not found")));
    }
    info!("Deleted component {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/components/:id/usage
pub async fn handle_track_usage(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UsageResponse>, AppError> {
    let usage_count = queries::increment_usage(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Component {id} not found")))?;
    Ok(Json(UsageResponse { id, usage_count }))
}

/// GET /api/employment
pub async fn handle_list_employment(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmploymentRow>>, AppError> {
    Ok(Json(queries::list_employment(&state.db).await?))
}

/// POST /api/employment
pub async fn handle_create_employment(
    State(state): State<AppState>,
    Json(req): Json<NewEmployment>,
) -> Result<(StatusCode, Json<EmploymentRow>), AppError> {
    require("company_name", &req.company_name)?;
    require("position_title", &req.position_title)?;
    if let (Some(start), Some(end)) = (req.start_date, req.end_date) {
        if end < start {
            return Err(AppError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
    }

    let employment = queries::insert_employment(&state.db, &req).await?;
    info!(
        "Created employment record {} ({})",
        employment.id, employment.company_name
    );
    Ok((StatusCode::CREATED, Json(employment)))
}

/// GET /api/job-descriptions
pub async fn handle_list_job_descriptions(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobDescriptionRow>>, AppError> {
    Ok(Json(queries::list_job_descriptions(&state.db).await?))
}

/// POST /api/job-descriptions
/// Saves a posting together with its domain keywords.
pub async fn handle_create_job_description(
    State(state): State<AppState>,
    Json(req): Json<NewJobDescription>,
) -> Result<(StatusCode, Json<JobDescriptionRow>), AppError> {
    require("company_name", &req.company_name)?;
    require("position_title", &req.position_title)?;
    require("job_description", &req.job_description)?;

    let keywords = extract_domain_keywords(&req.job_description);
    let job = queries::insert_job_description(&state.db, &req, &keywords).await?;
    info!(
        "Saved job description {} with {} keywords",
        job.id,
        keywords.len()
    );
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<Stats>, AppError> {
    Ok(Json(queries::stats(&state.db).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::component::ComponentFilter;

    fn make_component(section_type: &str, title: &str, content: &str) -> NewComponent {
        NewComponent {
            section_type: section_type.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            keywords: String::new(),
            industry_tags: String::new(),
            skill_level: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_components() {
        let state = AppState::for_tests().await;
        let (status, Json(created)) = handle_create_component(
            State(state.clone()),
            Json(make_component("technical_skills", "Imaging", "SCCM task sequences")),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.skill_level, "intermediate");
        assert_eq!(created.usage_count, 0);

        let Json(listed) = handle_list_components(
            State(state),
            Query(ComponentFilter {
                q: Some("sccm".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }

    #[tokio::test]
    async fn test_unknown_section_type_is_rejected() {
        let state = AppState::for_tests().await;
        let err = handle_create_component(
            State(state),
            Json(make_component("hobbies", "Chess", "Club champion")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_orders_by_usage_then_filters_by_section() {
        let state = AppState::for_tests().await;
        let first = queries::insert_component(
            &state.db,
            &make_component("technical_skills", "Windows", "Windows 10 imaging"),
        )
        .await
        .unwrap();
        let second = queries::insert_component(
            &state.db,
            &make_component("certifications", "CompTIA A+", "Certified 2018"),
        )
        .await
        .unwrap();
        handle_track_usage(State(state.clone()), Path(first.id))
            .await
            .unwrap();

        let all = queries::list_components(&state.db, &ComponentFilter::default())
            .await
            .unwrap();
        assert_eq!(all[0].id, first.id);

        let certs = queries::list_components(
            &state.db,
            &ComponentFilter {
                section_type: Some("certifications".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(certs.len(), 1);
        assert_eq!(certs[0].id, second.id);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_component_is_not_found() {
        let state = AppState::for_tests().await;
        let update = ComponentUpdate {
            title: "x".to_string(),
            content: "y".to_string(),
            keywords: String::new(),
        };
        let err = handle_update_component(State(state.clone()), Path(99), Json(update))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = handle_delete_component(State(state), Path(99))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_usage_count_increments() {
        let state = AppState::for_tests().await;
        let created = queries::insert_component(
            &state.db,
            &make_component("projects", "Migration", "Windows 10 rollout"),
        )
        .await
        .unwrap();

        handle_track_usage(State(state.clone()), Path(created.id))
            .await
            .unwrap();
        let Json(usage) = handle_track_usage(State(state), Path(created.id))
            .await
            .unwrap();
        assert_eq!(usage.usage_count, 2);
    }

    #[tokio::test]
    async fn test_job_description_saved_with_domain_keywords() {
        let state = AppState::for_tests().await;
        let req = NewJobDescription {
            company_name: "Contoso".to_string(),
            position_title: "Desktop Support Technician".to_string(),
            job_description: "Support Windows and ServiceNow queues".to_string(),
            location: String::new(),
        };
        let (_, Json(job)) = handle_create_job_description(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(job.keywords.0, vec!["windows", "servicenow", "Support"]);
        assert_eq!(job.status, "saved");

        let Json(jobs) = handle_list_job_descriptions(State(state)).await.unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_employment_round_trips_json_lists() {
        let state = AppState::for_tests().await;
        let req: NewEmployment = serde_json::from_value(serde_json::json!({
            "company_name": "Acme Corp",
            "position_title": "Field Technician",
            "start_date": "2019-01-07",
            "responsibilities": ["Imaging", "Break/fix"]
        }))
        .unwrap();
        let (_, Json(created)) = handle_create_employment(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(created.employment_type, "full-time");
        assert_eq!(created.responsibilities.0, vec!["Imaging", "Break/fix"]);

        let Json(all) = handle_list_employment(State(state)).await.unwrap();
        assert_eq!(all[0].id, created.id);
    }

    #[tokio::test]
    async fn test_employment_dates_must_be_ordered() {
        let state = AppState::for_tests().await;
        let req: NewEmployment = serde_json::from_value(serde_json::json!({
            "company_name": "Acme Corp",
            "position_title": "Field Technician",
            "start_date": "2020-01-01",
            "end_date": "2019-01-01"
        }))
        .unwrap();
        let err = handle_create_employment(State(state), Json(req))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_stats_counts_by_section() {
        let state = AppState::for_tests().await;
        for title in ["A", "B"] {
            queries::insert_component(
                &state.db,
                &make_component("technical_skills", title, "content"),
            )
            .await
            .unwrap();
        }
        let Json(stats) = handle_stats(State(state)).await.unwrap();
        assert_eq!(stats.total_components, 2);
        assert_eq!(stats.components_by_section.get("technical_skills"), Some(&2));
        assert_eq!(stats.total_jobs, 0);
    }
}
