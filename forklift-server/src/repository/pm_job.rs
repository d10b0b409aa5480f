//! PM Job Repository
//!
//! Handles all database operations related to preventive maintenance jobs
//! and their technician assignments.

use chrono::NaiveDate;
use forklift_core::domain::ForkliftRef;
use forklift_core::domain::pm_job::{NewPmJob, PmJob};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::load_assignees;

const SELECT_JOBS: &str = r#"
    SELECT j.id, j.forklift_id, f.eq_no, f.brand, f.type AS forklift_type,
           j.date, j.report_no, j.job_desc, j.recommendation, j.next_pm_date, j.created_by
    FROM pm_jobs j
    JOIN forklifts f ON f.id = j.forklift_id
"#;

/// Create a PM job together with its technician assignments
pub async fn create(pool: &SqlitePool, job: &NewPmJob, created_by: i64) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO pm_jobs (
            forklift_id, date, report_no, job_desc, recommendation, next_pm_date, created_by
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(job.forklift_id)
    .bind(job.date)
    .bind(&job.report_no)
    .bind(&job.job_desc)
    .bind(&job.recommendation)
    .bind(job.next_pm_date)
    .bind(created_by)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    insert_assignments(&mut tx, id, &job.technicians).await?;

    tx.commit().await?;
    Ok(id)
}

/// Find a PM job by ID, with its forklift and assignments loaded
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<PmJob>, sqlx::Error> {
    let row = sqlx::query_as::<_, PmJobRow>(&format!("{SELECT_JOBS} WHERE j.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut assignees = load_assignees(pool, "pm_job_assignments", &[row.id]).await?;
    let assigned = assignees.remove(&row.id).unwrap_or_default();
    Ok(Some(row.into_job(assigned)))
}

/// List one page of PM jobs, most recent first
pub async fn list_page(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<PmJob>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PmJobRow>(&format!(
        "{SELECT_JOBS} ORDER BY j.date DESC, j.id DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut assignees = load_assignees(pool, "pm_job_assignments", &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let assigned = assignees.remove(&row.id).unwrap_or_default();
            row.into_job(assigned)
        })
        .collect())
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pm_jobs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Update a PM job and replace its assignments
pub async fn update(pool: &SqlitePool, id: i64, job: &NewPmJob) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE pm_jobs
        SET forklift_id = ?, date = ?, report_no = ?, job_desc = ?,
            recommendation = ?, next_pm_date = ?
        WHERE id = ?
        "#,
    )
    .bind(job.forklift_id)
    .bind(job.date)
    .bind(&job.report_no)
    .bind(&job.job_desc)
    .bind(&job.recommendation)
    .bind(job.next_pm_date)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("DELETE FROM pm_job_assignments WHERE job_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_assignments(&mut tx, id, &job.technicians).await?;

    tx.commit().await?;
    Ok(true)
}

/// Delete a PM job by ID; assignments cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pm_jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

async fn insert_assignments(
    tx: &mut Transaction<'_, Sqlite>,
    job_id: i64,
    technicians: &[i64],
) -> Result<(), sqlx::Error> {
    for user_id in technicians {
        sqlx::query("INSERT INTO pm_job_assignments (job_id, user_id) VALUES (?, ?)")
            .bind(job_id)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PmJobRow {
    id: i64,
    forklift_id: i64,
    eq_no: String,
    brand: String,
    forklift_type: String,
    date: NaiveDate,
    report_no: String,
    job_desc: String,
    recommendation: Option<String>,
    next_pm_date: Option<NaiveDate>,
    created_by: i64,
}

impl PmJobRow {
    fn into_job(self, assigned: Vec<forklift_core::domain::Assignee>) -> PmJob {
        PmJob {
            id: self.id,
            forklift: ForkliftRef {
                id: self.forklift_id,
                eq_no: self.eq_no,
                brand: self.brand,
                forklift_type: self.forklift_type,
            },
            date: self.date,
            report_no: self.report_no,
            job_desc: self.job_desc,
            recommendation: self.recommendation,
            next_pm_date: self.next_pm_date,
            created_by: self.created_by,
            assigned,
        }
    }
}
