pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::matching::handlers as matching;
use crate::projects::handlers as projects;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::templates::handlers as templates;
use crate::workorders::handlers as workorders;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/stats", get(catalog::handle_stats))
        // Components, employment, saved postings
        .route(
            "/api/components",
            get(catalog::handle_list_components).post(catalog::handle_create_component),
        )
        .route(
            "/api/components/:id",
            put(catalog::handle_update_component).delete(catalog::handle_delete_component),
        )
        .route(
            "/api/components/:id/usage",
            post(catalog::handle_track_usage),
        )
        .route(
            "/api/employment",
            get(catalog::handle_list_employment).post(catalog::handle_create_employment),
        )
        .route(
            "/api/job-descriptions",
            get(catalog::handle_list_job_descriptions)
                .post(catalog::handle_create_job_description),
        )
        // Matching
        .route("/api/job-matcher", post(matching::handle_match))
        .route(
            "/api/job-matcher/enhanced",
            post(matching::handle_enhanced_match),
        )
        // Work orders
        .route(
            "/api/work-orders",
            get(workorders::handle_list_work_orders).post(workorders::handle_create_work_order),
        )
        .route(
            "/api/work-orders/stats",
            get(workorders::handle_work_order_stats),
        )
        .route(
            "/api/work-orders/categories",
            get(workorders::handle_work_order_facets),
        )
        .route(
            "/api/work-orders/resume-components",
            get(workorders::handle_work_order_drafts),
        )
        .route(
            "/api/work-orders/:id",
            get(workorders::handle_get_work_order)
                .put(workorders::handle_update_work_order)
                .delete(workorders::handle_delete_work_order),
        )
        // Projects
        .route(
            "/api/projects",
            get(projects::handle_list_projects).post(projects::handle_create_project),
        )
        .route("/api/projects/auto-create", post(projects::handle_auto_create))
        .route(
            "/api/projects/resume-components",
            get(projects::handle_project_drafts),
        )
        .route(
            "/api/projects/:id",
            put(projects::handle_update_project).delete(projects::handle_delete_project),
        )
        .route(
            "/api/projects/:id/work-orders",
            post(projects::handle_assign_work_orders),
        )
        .route(
            "/api/projects/:id/work-orders/:work_order_id",
            delete(projects::handle_unassign_work_order),
        )
        // Resume text import
        .route("/api/resumes/parse-text", post(resume::handle_parse_text))
        .route(
            "/api/resumes/import-components",
            post(resume::handle_import_components),
        )
        // Templates
        .route(
            "/api/templates",
            get(templates::handle_list_templates).post(templates::handle_create_template),
        )
        .route(
            "/api/templates/import-url",
            post(templates::handle_import_template),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn send(
        router: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_database_and_semantic_state() {
        let router = build_router(AppState::for_tests().await);
        let (status, body) = send(router, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], true);
        assert_eq!(body["semantic_model"], false);
        assert_eq!(body["embedding_configured"], false);
        assert_eq!(body["embedding_model"], Value::Null);
    }

    #[tokio::test]
    async fn test_component_lifecycle_over_http() {
        let state = AppState::for_tests().await;
        let router = build_router(state);

        let (status, created) = send(
            router.clone(),
            Method::POST,
            "/api/components",
            Some(json!({
                "section_type": "technical_skills",
                "title": "Imaging",
                "content": "SCCM and MDT task sequences"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, usage) = send(
            router.clone(),
            Method::POST,
            &format!("/api/components/{id}/usage"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(usage["usage_count"], 1);

        let (status, _) = send(
            router.clone(),
            Method::DELETE,
            &format!("/api/components/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            router,
            Method::DELETE,
            &format!("/api/components/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_job_matcher_rejects_blank_description() {
        let router = build_router(AppState::for_tests().await);
        let (status, body) = send(
            router,
            Method::POST,
            "/api/job-matcher",
            Some(json!({ "job_description": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_job_matcher_response_shape() {
        let router = build_router(AppState::for_tests().await);
        send(
            router.clone(),
            Method::POST,
            "/api/components",
            Some(json!({
                "section_type": "work_experience",
                "title": "Desktop support",
                "content": "Supported Windows systems for 300 users"
            })),
        )
        .await;

        let (status, body) = send(
            router,
            Method::POST,
            "/api/job-matcher",
            Some(json!({ "job_description": "Windows desktop support", "mode": "keyword" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mode"], "keyword");
        assert_eq!(body["total_matches"], 1);
        assert_eq!(body["matches"][0]["item"]["item_type"], "component");
        assert_eq!(body["matches"][0]["match_percentage"], 100);
    }

    #[tokio::test]
    async fn test_static_work_order_routes_win_over_id_route() {
        let router = build_router(AppState::for_tests().await);
        let (status, body) = send(router.clone(), Method::GET, "/api/work-orders/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_orders"], 0);

        let (status, body) = send(router, Method::GET, "/api/work-orders/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["categories"], json!([]));
    }

    #[tokio::test]
    async fn test_work_order_and_project_flow() {
        let router = build_router(AppState::for_tests().await);
        let mut ids = Vec::new();
        for date in ["2024-01-08", "2024-02-12", "2024-03-18"] {
            let (status, body) = send(
                router.clone(),
                Method::POST,
                "/api/work-orders",
                Some(json!({
                    "title": "Printer repair",
                    "company_name": "Initech",
                    "service_date": date,
                    "pay_amount": 75.0
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["technologies_used"], json!(["Printers"]));
            ids.push(body["id"].as_i64().unwrap());
        }

        let (status, body) = send(
            router.clone(),
            Method::POST,
            "/api/projects/auto-create",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["created_count"], 1);
        assert_eq!(body["projects"][0]["total_work_orders"], 3);

        let project_id = body["projects"][0]["id"].as_i64().unwrap();
        let (status, body) = send(
            router.clone(),
            Method::GET,
            &format!("/api/work-orders?project_id={project_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_count"], 3);

        let (status, _) = send(
            router.clone(),
            Method::DELETE,
            &format!("/api/projects/{project_id}/work-orders/{}", ids[0]),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(router, Method::GET, "/api/work-orders?unassigned=true", None).await;
        assert_eq!(body["total_count"], 1);
    }

    #[tokio::test]
    async fn test_template_routes() {
        let router = build_router(AppState::for_tests().await);
        let (status, created) = send(
            router.clone(),
            Method::POST,
            "/api/templates",
            Some(json!({ "template_name": "Help Desk", "is_default": true })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["component_mapping"], json!({}));

        let (status, listed) = send(router.clone(), Method::GET, "/api/templates", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed[0]["template_name"], "Help Desk");
        assert_eq!(listed[0]["is_default"], true);

        let (status, body) = send(
            router,
            Method::POST,
            "/api/templates/import-url",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "No URL provided");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let router = build_router(AppState::for_tests().await);
        let (status, _) = send(router, Method::GET, "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
