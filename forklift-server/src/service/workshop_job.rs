//! Workshop Job Service
//!
//! Business logic for workshop repairs and the items they consume. Editing
//! and deleting follow the same assignment rule as PM jobs.

use forklift_core::authz::{self, CurrentUser};
use forklift_core::domain::workshop_job::{NewWorkshopJob, WorkshopJob};
use forklift_core::dto::non_empty;
use forklift_core::dto::workshop_job::WorkshopJobForm;
use forklift_core::pagination::Pagination;
use forklift_core::schedule::parse_date;
use sqlx::SqlitePool;
use thiserror::Error;

use super::{NO_TECHNICIANS, is_foreign_key_violation, require};
use crate::repository::workshop_job_repository;

/// Service error type
#[derive(Debug, Error)]
pub enum WorkshopJobError {
    #[error("Workshop job {0} not found")]
    NotFound(i64),

    #[error("Not allowed to modify workshop job {0}")]
    Forbidden(i64),

    #[error("{}", NO_TECHNICIANS)]
    NoTechnicians,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for WorkshopJobError {
    fn from(err: sqlx::Error) -> Self {
        if is_foreign_key_violation(&err) {
            WorkshopJobError::ValidationError("Unknown forklift or technician".to_string())
        } else {
            WorkshopJobError::DatabaseError(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkshopJobError>;

/// One page of workshop jobs, newest first
pub async fn list_page(
    pool: &SqlitePool,
    page: Option<i64>,
    size: Option<i64>,
) -> Result<(Vec<WorkshopJob>, Pagination)> {
    let total = workshop_job_repository::count(pool).await?;
    let pagination = Pagination::new(page, size, total);
    let jobs =
        workshop_job_repository::list_page(pool, pagination.limit(), pagination.offset()).await?;
    Ok((jobs, pagination))
}

/// Get a workshop job by ID
pub async fn get_job(pool: &SqlitePool, id: i64) -> Result<WorkshopJob> {
    workshop_job_repository::find_by_id(pool, id)
        .await?
        .ok_or(WorkshopJobError::NotFound(id))
}

/// Get a workshop job the current user is allowed to modify
pub async fn get_job_for_edit(
    pool: &SqlitePool,
    id: i64,
    user: &CurrentUser,
) -> Result<WorkshopJob> {
    let job = get_job(pool, id).await?;

    if !authz::is_assigned(Some(user), &job) {
        tracing::warn!("User {} denied access to workshop job {}", user.id, id);
        return Err(WorkshopJobError::Forbidden(id));
    }

    Ok(job)
}

/// Log a new workshop job
pub async fn create_job(
    pool: &SqlitePool,
    req: WorkshopJobForm,
    user: &CurrentUser,
) -> Result<i64> {
    let job = build_job(req)?;
    let id = workshop_job_repository::create(pool, &job).await?;

    tracing::info!(
        "Workshop job created: {} ({}) with {} item(s) by user {}",
        job.report_no,
        id,
        job.items.len(),
        user.id
    );

    Ok(id)
}

/// Update a workshop job, replacing its technicians and items
pub async fn update_job(
    pool: &SqlitePool,
    id: i64,
    req: WorkshopJobForm,
    user: &CurrentUser,
) -> Result<()> {
    get_job_for_edit(pool, id, user).await?;

    let job = build_job(req)?;
    let updated = workshop_job_repository::update(pool, id, &job).await?;

    if !updated {
        return Err(WorkshopJobError::NotFound(id));
    }

    tracing::info!("Workshop job updated: {} by user {}", id, user.id);

    Ok(())
}

/// Delete a workshop job with its items
pub async fn delete_job(pool: &SqlitePool, id: i64, user: &CurrentUser) -> Result<()> {
    get_job_for_edit(pool, id, user).await?;

    let deleted = workshop_job_repository::delete(pool, id).await?;

    if !deleted {
        return Err(WorkshopJobError::NotFound(id));
    }

    tracing::info!("Workshop job deleted: {} by user {}", id, user.id);

    Ok(())
}

// =============================================================================
// Validation
// =============================================================================

/// Turn a submitted form into the fields to store
pub fn build_job(req: WorkshopJobForm) -> Result<NewWorkshopJob> {
    if req.technicians.is_empty() {
        return Err(WorkshopJobError::NoTechnicians);
    }

    require(&req.report_no, "Report No").map_err(WorkshopJobError::ValidationError)?;
    require(&req.job_desc, "Job description").map_err(WorkshopJobError::ValidationError)?;

    let date = parse_date(&req.date)
        .ok_or_else(|| WorkshopJobError::ValidationError(format!("Invalid date '{}'", req.date)))?;

    let items = req.items();
    if let Some(bad) = items.iter().find(|i| i.qty < 0) {
        return Err(WorkshopJobError::ValidationError(format!(
            "Quantity for '{}' cannot be negative",
            bad.item_name
        )));
    }

    let mut technicians = req.technicians;
    technicians.sort_unstable();
    technicians.dedup();

    Ok(NewWorkshopJob {
        forklift_id: req.forklift_id,
        date,
        report_no: req.report_no.trim().to_string(),
        job_desc: req.job_desc.trim().to_string(),
        notes: non_empty(req.notes),
        technicians,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::repository::{forklift_repository, user_repository};
    use forklift_core::domain::Role;
    use forklift_core::domain::workshop_job::JobItem;
    use forklift_core::dto::forklift::ForkliftForm;

    fn form(technicians: Vec<i64>, items: &[(&str, &str)]) -> WorkshopJobForm {
        WorkshopJobForm {
            forklift_id: 1,
            date: "2024-03-02".to_string(),
            technicians,
            report_no: "WS-001".to_string(),
            job_desc: "Replace mast chain".to_string(),
            notes: Some("  ".to_string()),
            item_name: items.iter().map(|(n, _)| n.to_string()).collect(),
            qty: items.iter().map(|(_, q)| q.to_string()).collect(),
        }
    }

    fn current(id: i64, role: Role) -> CurrentUser {
        CurrentUser {
            id,
            name: "tester".to_string(),
            email: None,
            role,
        }
    }

    async fn seeded_pool() -> SqlitePool {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();

        forklift_repository::create(
            &pool,
            &ForkliftForm {
                brand: "Komatsu".to_string(),
                forklift_type: "FD30".to_string(),
                eq_no: "FL-07".to_string(),
                serial_number: "SN-07".to_string(),
                location: "Yard".to_string(),
                powertrain: "Diesel".to_string(),
                owner: "PT Maju".to_string(),
                mfg_year: 2015,
                status: "Breakdown".to_string(),
            },
        )
        .await
        .unwrap();

        for name in ["Budi", "Andi"] {
            user_repository::create(&pool, name, None, None, Role::Technician)
                .await
                .unwrap();
        }

        pool
    }

    #[test]
    fn test_build_requires_technicians() {
        assert!(matches!(
            build_job(form(vec![], &[])),
            Err(WorkshopJobError::NoTechnicians)
        ));
    }

    #[test]
    fn test_build_rejects_negative_qty() {
        assert!(matches!(
            build_job(form(vec![1], &[("Chain", "-1")])),
            Err(WorkshopJobError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_stores_items_and_skips_blank_rows() {
        let pool = seeded_pool().await;
        let id = create_job(
            &pool,
            form(vec![1], &[("Chain", "2"), ("", "5"), ("Bolt", "x")]),
            &current(1, Role::Technician),
        )
        .await
        .unwrap();

        let job = get_job(&pool, id).await.unwrap();
        assert_eq!(job.notes, None);
        assert_eq!(
            job.items,
            vec![
                JobItem { item_name: "Chain".to_string(), qty: 2 },
                JobItem { item_name: "Bolt".to_string(), qty: 0 },
            ]
        );
    }

    #[tokio::test]
    async fn test_update_replaces_items_and_technicians() {
        let pool = seeded_pool().await;
        let tech = current(1, Role::Technician);
        let id = create_job(&pool, form(vec![1], &[("Chain", "2")]), &tech)
            .await
            .unwrap();

        update_job(&pool, id, form(vec![1, 2], &[("Seal", "3")]), &tech)
            .await
            .unwrap();

        let job = get_job(&pool, id).await.unwrap();
        assert_eq!(job.assigned.len(), 2);
        assert_eq!(job.items.len(), 1);
        assert_eq!(job.items[0].item_name, "Seal");
    }

    #[tokio::test]
    async fn test_outsider_is_forbidden_and_missing_job_not_found() {
        let pool = seeded_pool().await;
        let id = create_job(&pool, form(vec![1], &[]), &current(1, Role::Technician))
            .await
            .unwrap();

        assert!(matches!(
            delete_job(&pool, id, &current(2, Role::Technician)).await,
            Err(WorkshopJobError::Forbidden(_))
        ));
        assert!(matches!(
            delete_job(&pool, 999, &current(1, Role::Admin)).await,
            Err(WorkshopJobError::NotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_deleting_forklift_cascades_to_jobs() {
        let pool = seeded_pool().await;
        let id = create_job(&pool, form(vec![1], &[("Chain", "1")]), &current(1, Role::Admin))
            .await
            .unwrap();

        forklift_repository::delete(&pool, 1).await.unwrap();

        assert!(matches!(
            get_job(&pool, id).await,
            Err(WorkshopJobError::NotFound(_))
        ));
    }
}
