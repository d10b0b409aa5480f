//! Repository Module
//!
//! Data access layer. Each repository handles database operations for one
//! domain entity.

pub mod forklift;
pub mod pm_job;
pub mod user;
pub mod workshop_job;

// Re-export for convenience
pub use forklift as forklift_repository;
pub use pm_job as pm_job_repository;
pub use user as user_repository;
pub use workshop_job as workshop_job_repository;

use std::collections::HashMap;

use forklift_core::domain::Assignee;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Load assigned technicians for a set of jobs, keyed by job id.
///
/// `table` is one of the assignment tables; it is never user input.
pub(crate) async fn load_assignees(
    pool: &SqlitePool,
    table: &'static str,
    job_ids: &[i64],
) -> Result<HashMap<i64, Vec<Assignee>>, sqlx::Error> {
    let mut by_job: HashMap<i64, Vec<Assignee>> = HashMap::new();
    if job_ids.is_empty() {
        return Ok(by_job);
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT a.job_id, a.user_id, u.name FROM {table} a \
         JOIN users u ON u.id = a.user_id WHERE a.job_id IN ("
    ));
    let mut ids = query.separated(", ");
    for id in job_ids {
        ids.push_bind(*id);
    }
    ids.push_unseparated(") ORDER BY a.id");

    let rows: Vec<(i64, i64, String)> = query.build_query_as().fetch_all(pool).await?;

    for (job_id, user_id, name) in rows {
        by_job
            .entry(job_id)
            .or_default()
            .push(Assignee { user_id, name });
    }

    Ok(by_job)
}
