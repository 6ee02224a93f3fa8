use chrono::NaiveDate;
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::matching::candidate::TagList;
use crate::models::project::{NewProject, ProjectFilter, ProjectRow, ProjectUpdate};
use crate::projects::grouping::{GroupableWorkOrder, ProjectProposal};
use crate::workorders::tagging::DEFAULT_CLIENT_TYPE;

pub const DEFAULT_ROLE: &str = "Primary";

pub async fn list_projects(
    pool: &SqlitePool,
    filter: &ProjectFilter,
) -> Result<Vec<ProjectRow>, sqlx::Error> {
    if filter.resume_only {
        return resume_ready_projects(pool).await;
    }
    sqlx::query_as(
        "SELECT * FROM projects ORDER BY total_work_orders DESC, created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

/// Projects flagged for resume use, highest priority (lowest number) first.
pub async fn resume_ready_projects(pool: &SqlitePool) -> Result<Vec<ProjectRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM projects
        WHERE include_in_resume = 1
        ORDER BY priority_level, end_date DESC, id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_project(pool: &SqlitePool, id: i64) -> Result<Option<ProjectRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_project(
    conn: &mut SqliteConnection,
    project: &NewProject,
) -> Result<ProjectRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO projects
            (project_name, project_description, project_type, client_name, client_type,
             start_date, end_date, project_summary, technologies_used, skills_demonstrated,
             include_in_resume, priority_level)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&project.project_name)
    .bind(&project.project_description)
    .bind(&project.project_type)
    .bind(&project.client_name)
    .bind(&project.client_type)
    .bind(project.start_date)
    .bind(project.end_date)
    .bind(&project.project_summary)
    .bind(TagList::encode(&project.technologies_used))
    .bind(TagList::encode(&project.skills_demonstrated))
    .bind(project.include_in_resume)
    .bind(project.priority_level)
    .fetch_one(&mut *conn)
    .await
}

/// Partial update. Absent fields keep their stored value.
pub async fn update_project(
    pool: &SqlitePool,
    id: i64,
    update: &ProjectUpdate,
) -> Result<Option<ProjectRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE projects SET
            project_name = COALESCE(?, project_name),
            project_description = COALESCE(?, project_description),
            project_type = COALESCE(?, project_type),
            client_name = COALESCE(?, client_name),
            client_type = COALESCE(?, client_type),
            start_date = COALESCE(?, start_date),
            end_date = COALESCE(?, end_date),
            project_summary = COALESCE(?, project_summary),
            technologies_used = COALESCE(?, technologies_used),
            skills_demonstrated = COALESCE(?, skills_demonstrated),
            include_in_resume = COALESCE(?, include_in_resume),
            priority_level = COALESCE(?, priority_level),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&update.project_name)
    .bind(&update.project_description)
    .bind(&update.project_type)
    .bind(&update.client_name)
    .bind(&update.client_type)
    .bind(update.start_date)
    .bind(update.end_date)
    .bind(&update.project_summary)
    .bind(update.technologies_used.as_deref().map(TagList::encode))
    .bind(update.skills_demonstrated.as_deref().map(TagList::encode))
    .bind(update.include_in_resume)
    .bind(update.priority_level)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Deletes the project; its assignments cascade away and the work orders become unassigned.
pub async fn delete_project(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ──────────────────────────────────────────────
// Assignments
// ──────────────────────────────────────────────

/// Recomputes `total_work_orders` and `total_earnings` for every project.
pub async fn refresh_project_totals<'e, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    executor
        .execute(
            r#"
            UPDATE projects SET
                total_work_orders = (
                    SELECT COUNT(*) FROM project_work_orders pwo
                    WHERE pwo.project_id = projects.id
                ),
                total_earnings = (
                    SELECT COALESCE(SUM(wo.pay_amount), 0)
                    FROM project_work_orders pwo
                    JOIN work_orders wo ON wo.id = pwo.work_order_id
                    WHERE pwo.project_id = projects.id
                )
            "#,
        )
        .await?;
    Ok(())
}

/// Assigns each existing work order to the project, moving it out of any previous project.
/// Unknown ids are skipped. Returns how many work orders were assigned.
async fn assign_in(
    conn: &mut SqliteConnection,
    project_id: i64,
    work_order_ids: &[i64],
    role: &str,
) -> Result<u64, sqlx::Error> {
    let mut assigned = 0;
    for work_order_id in work_order_ids {
        let result = sqlx::query(
            r#"
            INSERT INTO project_work_orders (work_order_id, project_id, role_in_project)
            SELECT id, ?, ? FROM work_orders WHERE id = ?
            ON CONFLICT (work_order_id) DO UPDATE SET
                project_id = excluded.project_id,
                role_in_project = excluded.role_in_project,
                assigned_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(project_id)
        .bind(role)
        .bind(work_order_id)
        .execute(&mut *conn)
        .await?;
        assigned += result.rows_affected();
    }
    Ok(assigned)
}

pub async fn assign_work_orders(
    pool: &SqlitePool,
    project_id: i64,
    work_order_ids: &[i64],
    role: &str,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let assigned = assign_in(&mut tx, project_id, work_order_ids, role).await?;
    refresh_project_totals(&mut *tx).await?;
    tx.commit().await?;

    debug!(
        "Assigned {assigned} of {} work orders to project {project_id}",
        work_order_ids.len()
    );
    Ok(assigned)
}

/// Returns false when the work order was not assigned to that project.
pub async fn unassign_work_order(
    pool: &SqlitePool,
    project_id: i64,
    work_order_id: i64,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let result =
        sqlx::query("DELETE FROM project_work_orders WHERE project_id = ? AND work_order_id = ?")
            .bind(project_id)
            .bind(work_order_id)
            .execute(&mut *tx)
            .await?;
    refresh_project_totals(&mut *tx).await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

// ──────────────────────────────────────────────
// Automatic grouping
// ──────────────────────────────────────────────

/// Work orders with a service date that belong to no project, in id order.
pub async fn unassigned_dated_work_orders(
    pool: &SqlitePool,
) -> Result<Vec<GroupableWorkOrder>, sqlx::Error> {
    let rows: Vec<(i64, String, NaiveDate, Option<f64>, Option<String>)> = sqlx::query_as(
        r#"
        SELECT wo.id, wo.company_name, wo.service_date, wo.pay_amount, wo.work_category
        FROM work_orders wo
        LEFT JOIN project_work_orders pwo ON pwo.work_order_id = wo.id
        WHERE pwo.work_order_id IS NULL AND wo.service_date IS NOT NULL
        ORDER BY wo.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, company_name, service_date, pay_amount, work_category)| GroupableWorkOrder {
                id,
                company_name,
                service_date,
                pay_amount,
                work_category,
            },
        )
        .collect())
}

/// Persists every proposal as a project and assigns its work orders, all in one transaction.
pub async fn create_proposed_projects(
    pool: &SqlitePool,
    proposals: &[ProjectProposal],
) -> Result<Vec<ProjectRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut project_ids = Vec::with_capacity(proposals.len());
    for proposal in proposals {
        let project = insert_project(&mut tx, &new_project_from(proposal)).await?;
        assign_in(&mut tx, project.id, &proposal.work_order_ids, DEFAULT_ROLE).await?;
        project_ids.push(project.id);
    }
    refresh_project_totals(&mut *tx).await?;

    let mut created = Vec::with_capacity(project_ids.len());
    for id in project_ids {
        let project: ProjectRow = sqlx::query_as("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        created.push(project);
    }

    tx.commit().await?;
    Ok(created)
}

fn new_project_from(proposal: &ProjectProposal) -> NewProject {
    NewProject {
        project_name: proposal.project_name.clone(),
        project_description: Some(proposal.project_description.clone()),
        project_type: "support".to_string(),
        client_name: Some(proposal.company_name.clone()),
        client_type: Some(DEFAULT_CLIENT_TYPE.to_string()),
        start_date: Some(proposal.start_date),
        end_date: Some(proposal.end_date),
        project_summary: Some(proposal.project_summary.clone()),
        technologies_used: Vec::new(),
        skills_demonstrated: Vec::new(),
        include_in_resume: true,
        priority_level: 3,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::workorders::queries::insert_work_order;
    use crate::workorders::queries::tests::make_work_order;

    pub(crate) fn make_project(name: &str) -> NewProject {
        serde_json::from_value(serde_json::json!({ "project_name": name })).unwrap()
    }

    async fn seed_work_order(pool: &SqlitePool, company: &str, date: &str, pay: f64) -> i64 {
        let mut new = make_work_order("Desktop imaging", company, Some(date));
        new.pay_amount = Some(pay);
        insert_work_order(pool, &new).await.unwrap().id
    }

    async fn create(pool: &SqlitePool, name: &str) -> ProjectRow {
        let mut conn = pool.acquire().await.unwrap();
        insert_project(&mut conn, &make_project(name)).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_applies_defaults() {
        let pool = test_pool().await;
        let project = create(&pool, "Store refresh").await;
        assert_eq!(project.project_type, "support");
        assert_eq!(project.priority_level, 3);
        assert!(project.include_in_resume);
        assert_eq!(project.total_work_orders, 0);
        assert_eq!(project.technologies_used.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_assign_updates_totals_and_skips_unknown_ids() {
        let pool = test_pool().await;
        let project = create(&pool, "P").await;
        let a = seed_work_order(&pool, "Acme", "2023-01-05", 100.0).await;
        let b = seed_work_order(&pool, "Acme", "2023-01-06", 50.0).await;

        let assigned = assign_work_orders(&pool, project.id, &[a, b, 999], DEFAULT_ROLE)
            .await
            .unwrap();
        assert_eq!(assigned, 2);

        let project = get_project(&pool, project.id).await.unwrap().unwrap();
        assert_eq!(project.total_work_orders, 2);
        assert_eq!(project.total_earnings, 150.0);
    }

    #[tokio::test]
    async fn test_reassignment_moves_work_order_between_projects() {
        let pool = test_pool().await;
        let first = create(&pool, "First").await;
        let second = create(&pool, "Second").await;
        let wo = seed_work_order(&pool, "Acme", "2023-01-05", 80.0).await;

        assign_work_orders(&pool, first.id, &[wo], DEFAULT_ROLE)
            .await
            .unwrap();
        assign_work_orders(&pool, second.id, &[wo], "Lead")
            .await
            .unwrap();

        let first = get_project(&pool, first.id).await.unwrap().unwrap();
        let second = get_project(&pool, second.id).await.unwrap().unwrap();
        assert_eq!(first.total_work_orders, 0);
        assert_eq!(first.total_earnings, 0.0);
        assert_eq!(second.total_work_orders, 1);
    }

    #[tokio::test]
    async fn test_unassign_refreshes_totals() {
        let pool = test_pool().await;
        let project = create(&pool, "P").await;
        let wo = seed_work_order(&pool, "Acme", "2023-01-05", 80.0).await;
        assign_work_orders(&pool, project.id, &[wo], DEFAULT_ROLE)
            .await
            .unwrap();

        assert!(unassign_work_order(&pool, project.id, wo).await.unwrap());
        assert!(!unassign_work_order(&pool, project.id, wo).await.unwrap());

        let project = get_project(&pool, project.id).await.unwrap().unwrap();
        assert_eq!(project.total_work_orders, 0);
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let pool = test_pool().await;
        let project = create(&pool, "Before").await;
        let updated = update_project(
            &pool,
            project.id,
            &ProjectUpdate {
                priority_level: Some(1),
                technologies_used: Some(vec!["Windows".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.project_name, "Before");
        assert_eq!(updated.priority_level, 1);
        assert_eq!(updated.technologies_used.as_deref(), Some(r#"["Windows"]"#));
    }

    #[tokio::test]
    async fn test_delete_releases_work_orders() {
        let pool = test_pool().await;
        let project = create(&pool, "P").await;
        let wo = seed_work_order(&pool, "Acme", "2023-01-05", 80.0).await;
        assign_work_orders(&pool, project.id, &[wo], DEFAULT_ROLE)
            .await
            .unwrap();

        assert!(delete_project(&pool, project.id).await.unwrap());
        let free = unassigned_dated_work_orders(&pool).await.unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].id, wo);
    }

    #[tokio::test]
    async fn test_resume_only_orders_by_priority() {
        let pool = test_pool().await;
        let low = create(&pool, "Low").await;
        let high = create(&pool, "High").await;
        let hidden = create(&pool, "Hidden").await;
        update_project(
            &pool,
            high.id,
            &ProjectUpdate {
                priority_level: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        update_project(
            &pool,
            hidden.id,
            &ProjectUpdate {
                include_in_resume: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let ready = list_projects(&pool, &ProjectFilter { resume_only: true })
            .await
            .unwrap();
        let ids: Vec<i64> = ready.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![high.id, low.id]);
    }

    #[tokio::test]
    async fn test_create_proposed_projects_assigns_members() {
        let pool = test_pool().await;
        let mut ids = Vec::new();
        for day in ["2023-01-05", "2023-02-10", "2023-03-20"] {
            ids.push(seed_work_order(&pool, "Acme", day, 100.0).await);
        }
        seed_work_order(&pool, "Globex", "2023-01-05", 100.0).await;

        let orders = unassigned_dated_work_orders(&pool).await.unwrap();
        let proposals = crate::projects::grouping::propose_projects(&orders);
        assert_eq!(proposals.len(), 1);

        let created = create_proposed_projects(&pool, &proposals).await.unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].project_name, "Acme - Q1 2023 Support");
        assert_eq!(created[0].total_work_orders, 3);
        assert_eq!(created[0].total_earnings, 300.0);
        assert_eq!(created[0].client_name.as_deref(), Some("Acme"));

        // Only the Globex order is left unassigned.
        let left = unassigned_dated_work_orders(&pool).await.unwrap();
        assert_eq!(left.len(), 1);
        assert!(!ids.contains(&left[0].id));
    }
}
