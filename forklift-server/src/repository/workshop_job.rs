//! Workshop Job Repository
//!
//! Handles all database operations related to workshop jobs, their
//! technician assignments and the items used.

use std::collections::HashMap;

use chrono::NaiveDate;
use forklift_core::domain::workshop_job::{JobItem, NewWorkshopJob, WorkshopJob};
use forklift_core::domain::{Assignee, ForkliftRef};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};

use super::load_assignees;

const SELECT_JOBS: &str = r#"
    SELECT j.id, j.forklift_id, f.eq_no, f.brand, f.type AS forklift_type,
           j.date, j.report_no, j.job_desc, j.notes
    FROM workshop_jobs j
    JOIN forklifts f ON f.id = j.forklift_id
"#;

/// Create a workshop job with its assignments and items
pub async fn create(pool: &SqlitePool, job: &NewWorkshopJob) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO workshop_jobs (forklift_id, date, report_no, job_desc, notes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(job.forklift_id)
    .bind(job.date)
    .bind(&job.report_no)
    .bind(&job.job_desc)
    .bind(&job.notes)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    insert_children(&mut tx, id, job).await?;

    tx.commit().await?;
    Ok(id)
}

/// Find a workshop job by ID, fully loaded
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<WorkshopJob>, sqlx::Error> {
    let row = sqlx::query_as::<_, WorkshopJobRow>(&format!("{SELECT_JOBS} WHERE j.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut assignees = load_assignees(pool, "workshop_job_assignments", &[row.id]).await?;
    let mut items = load_items(pool, &[row.id]).await?;
    Ok(Some(row.into_job(&mut assignees, &mut items)))
}

/// List one page of workshop jobs, most recent first
pub async fn list_page(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<WorkshopJob>, sqlx::Error> {
    let rows = sqlx::query_as::<_, WorkshopJobRow>(&format!(
        "{SELECT_JOBS} ORDER BY j.date DESC, j.id DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut assignees = load_assignees(pool, "workshop_job_assignments", &ids).await?;
    let mut items = load_items(pool, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| row.into_job(&mut assignees, &mut items))
        .collect())
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workshop_jobs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Update a workshop job, replacing assignments and items
pub async fn update(pool: &SqlitePool, id: i64, job: &NewWorkshopJob) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE workshop_jobs
        SET forklift_id = ?, date = ?, report_no = ?, job_desc = ?, notes = ?
        WHERE id = ?
        "#,
    )
    .bind(job.forklift_id)
    .bind(job.date)
    .bind(&job.report_no)
    .bind(&job.job_desc)
    .bind(&job.notes)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query("DELETE FROM workshop_job_assignments WHERE job_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM workshop_job_items WHERE job_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_children(&mut tx, id, job).await?;

    tx.commit().await?;
    Ok(true)
}

/// Delete a workshop job by ID; assignments and items cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM workshop_jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

async fn insert_children(
    tx: &mut Transaction<'_, Sqlite>,
    job_id: i64,
    job: &NewWorkshopJob,
) -> Result<(), sqlx::Error> {
    for user_id in &job.technicians {
        sqlx::query("INSERT INTO workshop_job_assignments (job_id, user_id) VALUES (?, ?)")
            .bind(job_id)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
    }

    for item in &job.items {
        sqlx::query("INSERT INTO workshop_job_items (job_id, item_name, qty) VALUES (?, ?, ?)")
            .bind(job_id)
            .bind(&item.item_name)
            .bind(item.qty)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

async fn load_items(
    pool: &SqlitePool,
    job_ids: &[i64],
) -> Result<HashMap<i64, Vec<JobItem>>, sqlx::Error> {
    let mut by_job: HashMap<i64, Vec<JobItem>> = HashMap::new();
    if job_ids.is_empty() {
        return Ok(by_job);
    }

    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT job_id, item_name, qty FROM workshop_job_items WHERE job_id IN (");
    let mut ids = query.separated(", ");
    for id in job_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY id");

    let rows: Vec<(i64, String, i32)> = query.build_query_as().fetch_all(pool).await?;

    for (job_id, item_name, qty) in rows {
        by_job
            .entry(job_id)
            .or_default()
            .push(JobItem { item_name, qty });
    }

    Ok(by_job)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct WorkshopJobRow {
    id: i64,
    forklift_id: i64,
    eq_no: String,
    brand: String,
    forklift_type: String,
    date: NaiveDate,
    report_no: String,
    job_desc: String,
    notes: Option<String>,
}

impl WorkshopJobRow {
    fn into_job(
        self,
        assignees: &mut HashMap<i64, Vec<Assignee>>,
        items: &mut HashMap<i64, Vec<JobItem>>,
    ) -> WorkshopJob {
        WorkshopJob {
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
            notes: self.notes,
            assigned: assignees.remove(&self.id).unwrap_or_default(),
            items: items.remove(&self.id).unwrap_or_default(),
        }
    }
}
