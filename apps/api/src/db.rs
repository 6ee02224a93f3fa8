use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Idempotent schema, applied one statement at a time on every start-up.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS components (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        section_type TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        keywords TEXT,
        industry_tags TEXT,
        skill_level TEXT NOT NULL DEFAULT 'intermediate',
        usage_count INTEGER NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_components_section_type ON components (section_type)",
    r#"
    CREATE TABLE IF NOT EXISTS employment_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_name TEXT NOT NULL,
        position_title TEXT NOT NULL,
        start_date DATE,
        end_date DATE,
        location TEXT NOT NULL DEFAULT '',
        employment_type TEXT NOT NULL DEFAULT 'full-time',
        industry TEXT NOT NULL DEFAULT '',
        responsibilities TEXT NOT NULL DEFAULT '[]',
        achievements TEXT NOT NULL DEFAULT '[]',
        technologies_used TEXT NOT NULL DEFAULT '[]',
        skills_gained TEXT NOT NULL DEFAULT '[]',
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_descriptions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_name TEXT NOT NULL,
        position_title TEXT NOT NULL,
        job_description TEXT NOT NULL,
        keywords TEXT NOT NULL DEFAULT '[]',
        location TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'saved',
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS work_orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        external_id TEXT UNIQUE,
        title TEXT NOT NULL,
        work_type TEXT,
        company_name TEXT NOT NULL,
        service_date DATE,
        location TEXT,
        pay_amount REAL,
        status TEXT,
        state TEXT,
        city TEXT,
        work_category TEXT,
        client_type TEXT,
        technologies_used TEXT,
        skills_demonstrated TEXT,
        complexity_level TEXT,
        work_description TEXT,
        challenges_faced TEXT,
        solutions_implemented TEXT,
        client_feedback TEXT,
        lessons_learned TEXT,
        include_in_resume BOOLEAN NOT NULL DEFAULT 1,
        highlight_project BOOLEAN NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_work_orders_company ON work_orders (company_name)",
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_name TEXT NOT NULL,
        project_description TEXT,
        project_type TEXT NOT NULL DEFAULT 'support',
        client_name TEXT,
        client_type TEXT,
        start_date DATE,
        end_date DATE,
        project_summary TEXT,
        technologies_used TEXT,
        skills_demonstrated TEXT,
        include_in_resume BOOLEAN NOT NULL DEFAULT 1,
        priority_level INTEGER NOT NULL DEFAULT 3,
        total_work_orders INTEGER NOT NULL DEFAULT 0,
        total_earnings REAL NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS project_work_orders (
        work_order_id INTEGER PRIMARY KEY REFERENCES work_orders (id) ON DELETE CASCADE,
        project_id INTEGER NOT NULL REFERENCES projects (id) ON DELETE CASCADE,
        role_in_project TEXT NOT NULL DEFAULT 'Primary',
        assigned_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_project_work_orders_project ON project_work_orders (project_id)",
    r#"
    CREATE TABLE IF NOT EXISTS resume_templates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        template_name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        target_role TEXT NOT NULL DEFAULT '',
        target_industry TEXT NOT NULL DEFAULT '',
        component_mapping TEXT NOT NULL DEFAULT '{}',
        style_settings TEXT NOT NULL DEFAULT '{}',
        is_default BOOLEAN NOT NULL DEFAULT 0,
        usage_count INTEGER NOT NULL DEFAULT 0,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
];

/// Creates and returns a SQLite connection pool, creating the database file if needed.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Connecting to SQLite at {database_url}...");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to open SQLite database")?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Applies the schema. Safe to run against an existing database.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Migration failed: {}", statement.trim()))?;
    }
    info!("Database schema is up to date ({} statements)", SCHEMA.len());
    Ok(())
}

/// Single-connection in-memory database with the schema applied.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    // One connection: every in-memory connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
