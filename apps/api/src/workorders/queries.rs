use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::matching::candidate::TagList;
use crate::models::work_order::{NewWorkOrder, WorkOrderFilter, WorkOrderRow, WorkOrderUpdate};
use crate::workorders::tagging::tag_work_order;

pub const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Serialize)]
pub struct WorkOrderPage {
    pub work_orders: Vec<WorkOrderRow>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Appends `FROM ... WHERE ...` for the filter. Shared by the page and count queries.
fn push_filtered_source(query: &mut QueryBuilder<'_, Sqlite>, filter: &WorkOrderFilter) {
    query.push(" FROM work_orders wo");
    if let Some(project_id) = filter.project_id {
        query
            .push(" JOIN project_work_orders pwo ON pwo.work_order_id = wo.id AND pwo.project_id = ")
            .push_bind(project_id);
    } else if filter.unassigned {
        query.push(" LEFT JOIN project_work_orders pwo ON pwo.work_order_id = wo.id");
    }

    query.push(" WHERE 1 = 1");
    if filter.project_id.is_none() && filter.unassigned {
        query.push(" AND pwo.work_order_id IS NULL");
    }
    if let Some(category) = non_blank(&filter.category) {
        query.push(" AND wo.work_category = ").push_bind(category.to_string());
    }
    if let Some(company) = non_blank(&filter.company) {
        query
            .push(" AND wo.company_name LIKE ")
            .push_bind(format!("%{company}%"));
    }
    if let Some(work_type) = non_blank(&filter.work_type) {
        query
            .push(" AND wo.work_type LIKE ")
            .push_bind(format!("%{work_type}%"));
    }
    if let Some(client_type) = non_blank(&filter.client_type) {
        query.push(" AND wo.client_type = ").push_bind(client_type.to_string());
    }
    if let Some(state) = non_blank(&filter.state) {
        query.push(" AND wo.state = ").push_bind(state.to_string());
    }
}

/// Newest service date first, undated last.
pub async fn list_work_orders(
    pool: &SqlitePool,
    filter: &WorkOrderFilter,
) -> Result<WorkOrderPage, sqlx::Error> {
    let limit = filter
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = filter.offset.unwrap_or(0).max(0);

    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
    push_filtered_source(&mut count_query, filter);
    let total_count: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut query = QueryBuilder::<Sqlite>::new("SELECT wo.*");
    push_filtered_source(&mut query, filter);
    query
        .push(" ORDER BY wo.service_date IS NULL, wo.service_date DESC, wo.id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let work_orders = query.build_query_as::<WorkOrderRow>().fetch_all(pool).await?;

    Ok(WorkOrderPage {
        work_orders,
        total_count,
        limit,
        offset,
        has_more: offset.saturating_add(limit) < total_count,
    })
}

pub async fn get_work_order(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<WorkOrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM work_orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Inserts a work order, deriving category, client type and tags from the title when absent.
pub async fn insert_work_order(
    pool: &SqlitePool,
    work_order: &NewWorkOrder,
) -> Result<WorkOrderRow, sqlx::Error> {
    let derived = tag_work_order(&work_order.title);

    let work_category = non_blank(&work_order.work_category)
        .map(str::to_string)
        .unwrap_or(derived.work_category);
    let client_type = non_blank(&work_order.client_type)
        .map(str::to_string)
        .unwrap_or(derived.client_type);
    let technologies = work_order
        .technologies_used
        .as_deref()
        .unwrap_or(&derived.technologies);
    let skills = work_order
        .skills_demonstrated
        .as_deref()
        .unwrap_or(&derived.skills);

    sqlx::query_as(
        r#"
        INSERT INTO work_orders
            (external_id, title, work_type, company_name, service_date, location, pay_amount,
             status, state, city, work_category, client_type, technologies_used,
             skills_demonstrated, work_description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(non_blank(&work_order.external_id))
    .bind(&work_order.title)
    .bind(&work_order.work_type)
    .bind(&work_order.company_name)
    .bind(work_order.service_date)
    .bind(&work_order.location)
    .bind(work_order.pay_amount)
    .bind(&work_order.status)
    .bind(&work_order.state)
    .bind(&work_order.city)
    .bind(work_category)
    .bind(client_type)
    .bind(TagList::encode(technologies))
    .bind(TagList::encode(skills))
    .bind(&work_order.work_description)
    .fetch_one(pool)
    .await
}

/// Updates the narrative fields. Absent fields keep their stored value.
pub async fn update_work_order(
    pool: &SqlitePool,
    id: i64,
    update: &WorkOrderUpdate,
) -> Result<Option<WorkOrderRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE work_orders SET
            work_description = COALESCE(?, work_description),
            challenges_faced = COALESCE(?, challenges_faced),
            solutions_implemented = COALESCE(?, solutions_implemented),
            client_feedback = COALESCE(?, client_feedback),
            lessons_learned = COALESCE(?, lessons_learned),
            complexity_level = COALESCE(?, complexity_level),
            include_in_resume = COALESCE(?, include_in_resume),
            highlight_project = COALESCE(?, highlight_project),
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(&update.work_description)
    .bind(&update.challenges_faced)
    .bind(&update.solutions_implemented)
    .bind(&update.client_feedback)
    .bind(&update.lessons_learned)
    .bind(&update.complexity_level)
    .bind(update.include_in_resume)
    .bind(update.highlight_project)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Deletes the work order; its project assignment cascades away.
pub async fn delete_work_order(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM work_orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Work orders flagged for resume use, highlighted and best paid first.
pub async fn resume_ready_work_orders(
    pool: &SqlitePool,
) -> Result<Vec<WorkOrderRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM work_orders
        WHERE include_in_resume = 1
        ORDER BY highlight_project DESC, pay_amount DESC, service_date DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

// ──────────────────────────────────────────────
// Statistics
// ──────────────────────────────────────────────

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct GroupTotal {
    pub label: String,
    pub count: i64,
    pub total_pay: f64,
}

#[derive(Debug, Serialize)]
pub struct WorkOrderStats {
    pub total_orders: i64,
    pub unique_companies: i64,
    pub total_earnings: f64,
    pub average_pay: f64,
    pub unassigned_orders: i64,
    pub by_category: Vec<GroupTotal>,
    pub by_year: Vec<GroupTotal>,
    pub top_companies: Vec<GroupTotal>,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub async fn work_order_stats(pool: &SqlitePool) -> Result<WorkOrderStats, sqlx::Error> {
    let (total_orders, unique_companies, total_earnings, average_pay): (i64, i64, f64, f64) =
        sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(DISTINCT company_name),
                   CAST(COALESCE(SUM(pay_amount), 0) AS REAL),
                   CAST(COALESCE(AVG(pay_amount), 0) AS REAL)
            FROM work_orders
            "#,
        )
        .fetch_one(pool)
        .await?;

    let unassigned_orders: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM work_orders wo
        LEFT JOIN project_work_orders pwo ON pwo.work_order_id = wo.id
        WHERE pwo.work_order_id IS NULL
        "#,
    )
    .fetch_one(pool)
    .await?;

    let by_category = sqlx::query_as(
        r#"
        SELECT COALESCE(work_category, 'general') AS label, COUNT(*) AS count,
               CAST(COALESCE(SUM(pay_amount), 0) AS REAL) AS total_pay
        FROM work_orders
        GROUP BY label
        ORDER BY count DESC, label
        "#,
    )
    .fetch_all(pool)
    .await?;

    let by_year = sqlx::query_as(
        r#"
        SELECT strftime('%Y', service_date) AS label, COUNT(*) AS count,
               CAST(COALESCE(SUM(pay_amount), 0) AS REAL) AS total_pay
        FROM work_orders
        WHERE service_date IS NOT NULL
        GROUP BY label
        ORDER BY label DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let top_companies = sqlx::query_as(
        r#"
        SELECT company_name AS label, COUNT(*) AS count,
               CAST(COALESCE(SUM(pay_amount), 0) AS REAL) AS total_pay
        FROM work_orders
        GROUP BY company_name
        ORDER BY count DESC, label
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(WorkOrderStats {
        total_orders,
        unique_companies,
        total_earnings: round_cents(total_earnings),
        average_pay: round_cents(average_pay),
        unassigned_orders,
        by_category,
        by_year,
        top_companies,
    })
}

#[derive(Debug, Serialize)]
pub struct WorkOrderFacets {
    pub categories: Vec<String>,
    pub work_types: Vec<String>,
    pub client_types: Vec<String>,
    pub states: Vec<String>,
}

/// Distinct non-null values of the filterable columns, for building filter menus.
pub async fn work_order_facets(pool: &SqlitePool) -> Result<WorkOrderFacets, sqlx::Error> {
    Ok(WorkOrderFacets {
        categories: distinct_values(pool, "work_category").await?,
        work_types: distinct_values(pool, "work_type").await?,
        client_types: distinct_values(pool, "client_type").await?,
        states: distinct_values(pool, "state").await?,
    })
}

/// `column` must be a fixed column name, never user input.
async fn distinct_values(
    pool: &SqlitePool,
    column: &'static str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(&format!(
        "SELECT DISTINCT {column} FROM work_orders WHERE {column} IS NOT NULL ORDER BY {column}"
    ))
    .fetch_all(pool)
    .await
}
