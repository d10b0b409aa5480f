use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .pragma("cache_size", "-2000")
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
}

/// Single-connection in-memory database, kept alive for the pool's lifetime.
/// Used by tests and throwaway runs.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Create forklifts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS forklifts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            brand TEXT NOT NULL,
            type TEXT NOT NULL,
            eq_no TEXT NOT NULL,
            serial_number TEXT NOT NULL,
            location TEXT NOT NULL,
            powertrain TEXT NOT NULL,
            owner TEXT NOT NULL,
            mfg_year INTEGER NOT NULL,
            status TEXT NOT NULL,
            CONSTRAINT uq_eq_no UNIQUE (eq_no),
            CONSTRAINT uq_serial_number UNIQUE (serial_number)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT UNIQUE,
            password TEXT,
            role TEXT NOT NULL DEFAULT 'teknisi'
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create PM job tables
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pm_jobs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            forklift_id INTEGER NOT NULL REFERENCES forklifts(id) ON DELETE CASCADE,
            date DATE NOT NULL,
            report_no TEXT NOT NULL,
            job_desc TEXT NOT NULL,
            recommendation TEXT,
            next_pm_date DATE,
            created_by INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pm_job_assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id INTEGER NOT NULL REFERENCES pm_jobs(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create workshop job tables
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workshop_jobs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            forklift_id INTEGER NOT NULL REFERENCES forklifts(id) ON DELETE CASCADE,
            date DATE NOT NULL,
            report_no TEXT NOT NULL,
            job_desc TEXT NOT NULL,
            notes TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workshop_job_assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id INTEGER NOT NULL REFERENCES workshop_jobs(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workshop_job_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            job_id INTEGER NOT NULL REFERENCES workshop_jobs(id) ON DELETE CASCADE,
            item_name TEXT NOT NULL,
            qty INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for the job list and assignment lookups
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pm_jobs_forklift_id ON pm_jobs(forklift_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_pm_jobs_date ON pm_jobs(date DESC)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_pm_job_assignments_job_id ON pm_job_assignments(job_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_workshop_jobs_forklift_id ON workshop_jobs(forklift_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_workshop_jobs_date ON workshop_jobs(date DESC)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_workshop_job_assignments_job_id ON workshop_job_assignments(job_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_workshop_job_items_job_id ON workshop_job_items(job_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
