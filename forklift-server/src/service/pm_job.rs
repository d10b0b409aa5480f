//! PM Job Service
//!
//! Business logic for preventive maintenance jobs. Editing and deleting a job
//! is limited to admins, supervisors and the technicians assigned to it.

use forklift_core::authz::{self, CurrentUser};
use forklift_core::domain::pm_job::{NewPmJob, PmJob};
use forklift_core::dto::non_empty;
use forklift_core::dto::pm_job::PmJobForm;
use forklift_core::pagination::Pagination;
use forklift_core::schedule::{NextPmOption, parse_date, resolve_next_pm};
use sqlx::SqlitePool;
use thiserror::Error;

use super::{NO_TECHNICIANS, is_foreign_key_violation, require};
use crate::repository::pm_job_repository;

/// Service error type
#[derive(Debug, Error)]
pub enum PmJobError {
    #[error("PM job {0} not found")]
    NotFound(i64),

    #[error("Not allowed to modify PM job {0}")]
    Forbidden(i64),

    #[error("{}", NO_TECHNICIANS)]
    NoTechnicians,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for PmJobError {
    fn from(err: sqlx::Error) -> Self {
        if is_foreign_key_violation(&err) {
            PmJobError::ValidationError("Unknown forklift or technician".to_string())
        } else {
            PmJobError::DatabaseError(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, PmJobError>;

/// One page of PM jobs, newest first
pub async fn list_page(
    pool: &SqlitePool,
    page: Option<i64>,
    size: Option<i64>,
) -> Result<(Vec<PmJob>, Pagination)> {
    let total = pm_job_repository::count(pool).await?;
    let pagination = Pagination::new(page, size, total);
    let jobs = pm_job_repository::list_page(pool, pagination.limit(), pagination.offset()).await?;
    Ok((jobs, pagination))
}

/// Get a PM job by ID
pub async fn get_job(pool: &SqlitePool, id: i64) -> Result<PmJob> {
    pm_job_repository::find_by_id(pool, id)
        .await?
        .ok_or(PmJobError::NotFound(id))
}

/// Get a PM job the current user is allowed to modify
pub async fn get_job_for_edit(pool: &SqlitePool, id: i64, user: &CurrentUser) -> Result<PmJob> {
    let job = get_job(pool, id).await?;

    if !authz::is_assigned(Some(user), &job) {
        tracing::warn!("User {} denied access to PM job {}", user.id, id);
        return Err(PmJobError::Forbidden(id));
    }

    Ok(job)
}

/// Log a new PM job on behalf of `user`
pub async fn create_job(pool: &SqlitePool, req: PmJobForm, user: &CurrentUser) -> Result<i64> {
    let job = build_job(req)?;
    let id = pm_job_repository::create(pool, &job, user.id).await?;

    tracing::info!(
        "PM job created: {} ({}) by user {}",
        job.report_no,
        id,
        user.id
    );

    Ok(id)
}

/// Update a PM job and replace its technicians
pub async fn update_job(
    pool: &SqlitePool,
    id: i64,
    req: PmJobForm,
    user: &CurrentUser,
) -> Result<()> {
    get_job_for_edit(pool, id, user).await?;

    let job = build_job(req)?;
    let updated = pm_job_repository::update(pool, id, &job).await?;

    if !updated {
        return Err(PmJobError::NotFound(id));
    }

    tracing::info!("PM job updated: {} by user {}", id, user.id);

    Ok(())
}

/// Delete a PM job
pub async fn delete_job(pool: &SqlitePool, id: i64, user: &CurrentUser) -> Result<()> {
    get_job_for_edit(pool, id, user).await?;

    let deleted = pm_job_repository::delete(pool, id).await?;

    if !deleted {
        return Err(PmJobError::NotFound(id));
    }

    tracing::info!("PM job deleted: {} by user {}", id, user.id);

    Ok(())
}

// =============================================================================
// Validation
// =============================================================================

/// Turn a submitted form into the fields to store
pub fn build_job(req: PmJobForm) -> Result<NewPmJob> {
    if req.technicians.is_empty() {
        return Err(PmJobError::NoTechnicians);
    }

    require(&req.report_no, "Report No").map_err(PmJobError::ValidationError)?;
    require(&req.job_desc, "Job description").map_err(PmJobError::ValidationError)?;

    let date = parse_date(&req.date)
        .ok_or_else(|| PmJobError::ValidationError(format!("Invalid date '{}'", req.date)))?;

    let option = non_empty(req.next_pm_option);

    // A month option ignores the explicit date entirely
    let uses_months = matches!(
        option.as_deref().and_then(NextPmOption::parse),
        Some(NextPmOption::Months(_))
    );
    let explicit = match non_empty(req.next_pm_date).filter(|_| !uses_months) {
        Some(raw) => Some(parse_date(&raw).ok_or_else(|| {
            PmJobError::ValidationError(format!("Invalid next PM date '{}'", raw))
        })?),
        None => None,
    };

    let mut technicians = req.technicians;
    technicians.sort_unstable();
    technicians.dedup();

    Ok(NewPmJob {
        forklift_id: req.forklift_id,
        date,
        report_no: req.report_no.trim().to_string(),
        job_desc: req.job_desc.trim().to_string(),
        recommendation: non_empty(req.recommendation),
        next_pm_date: resolve_next_pm(date, option.as_deref(), explicit),
        technicians,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::repository::{forklift_repository, user_repository};
    use forklift_core::domain::Role;
    use forklift_core::dto::forklift::ForkliftForm;

    fn form(technicians: Vec<i64>) -> PmJobForm {
        PmJobForm {
            forklift_id: 1,
            date: "2024-01-15".to_string(),
            technicians,
            report_no: "PM-001".to_string(),
            job_desc: "Monthly service".to_string(),
            recommendation: Some("".to_string()),
            next_pm_option: Some("1bulan".to_string()),
            next_pm_date: None,
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

    /// Pool with one forklift (id 1) and technicians 1 and 2
    async fn seeded_pool() -> SqlitePool {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();

        forklift_repository::create(
            &pool,
            &ForkliftForm {
                brand: "Toyota".to_string(),
                forklift_type: "8FD25".to_string(),
                eq_no: "FL-01".to_string(),
                serial_number: "SN-01".to_string(),
                location: "Warehouse A".to_string(),
                powertrain: "Diesel".to_string(),
                owner: "PT Maju".to_string(),
                mfg_year: 2019,
                status: "Active".to_string(),
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
        assert!(matches!(build_job(form(vec![])), Err(PmJobError::NoTechnicians)));
    }

    #[test]
    fn test_build_resolves_next_pm_and_blank_fields() {
        let job = build_job(form(vec![2, 1, 2])).unwrap();
        assert_eq!(job.next_pm_date, parse_date("2024-02-14"));
        assert_eq!(job.recommendation, None);
        assert_eq!(job.technicians, vec![1, 2]);
    }

    #[test]
    fn test_build_rejects_bad_dates() {
        let mut req = form(vec![1]);
        req.date = "15-01-2024".to_string();
        assert!(matches!(build_job(req), Err(PmJobError::ValidationError(_))));

        let mut req = form(vec![1]);
        req.next_pm_option = Some("date".to_string());
        req.next_pm_date = Some("soon".to_string());
        assert!(matches!(build_job(req), Err(PmJobError::ValidationError(_))));
    }

    #[test]
    fn test_month_option_ignores_next_pm_date() {
        let mut req = form(vec![1]);
        req.next_pm_option = Some("2bulan".to_string());
        req.next_pm_date = Some("soon".to_string());

        let job = build_job(req).unwrap();
        assert_eq!(job.next_pm_date, parse_date("2024-03-15"));
    }

    #[tokio::test]
    async fn test_create_records_creator_and_assignments() {
        let pool = seeded_pool().await;
        let id = create_job(&pool, form(vec![1, 2]), &current(1, Role::Technician))
            .await
            .unwrap();

        let job = get_job(&pool, id).await.unwrap();
        assert_eq!(job.created_by, 1);
        assert_eq!(job.forklift.eq_no, "FL-01");
        assert_eq!(job.assigned.len(), 2);
    }

    #[tokio::test]
    async fn test_unassigned_technician_cannot_edit_or_delete() {
        let pool = seeded_pool().await;
        let id = create_job(&pool, form(vec![1]), &current(1, Role::Technician))
            .await
            .unwrap();
        let outsider = current(2, Role::Technician);

        assert!(matches!(
            update_job(&pool, id, form(vec![2]), &outsider).await,
            Err(PmJobError::Forbidden(_))
        ));
        assert!(matches!(
            delete_job(&pool, id, &outsider).await,
            Err(PmJobError::Forbidden(_))
        ));

        delete_job(&pool, id, &current(99, Role::Supervisor))
            .await
            .unwrap();
        assert!(matches!(get_job(&pool, id).await, Err(PmJobError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_replaces_assignments() {
        let pool = seeded_pool().await;
        let assigned = current(1, Role::Technician);
        let id = create_job(&pool, form(vec![1]), &assigned).await.unwrap();

        let mut edit = form(vec![2]);
        edit.next_pm_option = Some("date".to_string());
        edit.next_pm_date = Some("2024-06-01".to_string());
        update_job(&pool, id, edit, &assigned).await.unwrap();

        let job = get_job(&pool, id).await.unwrap();
        assert_eq!(job.assigned.iter().map(|a| a.user_id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(job.next_pm_date, parse_date("2024-06-01"));
    }

    #[tokio::test]
    async fn test_unknown_forklift_is_a_validation_error() {
        let pool = seeded_pool().await;
        let mut req = form(vec![1]);
        req.forklift_id = 404;

        assert!(matches!(
            create_job(&pool, req, &current(1, Role::Admin)).await,
            Err(PmJobError::ValidationError(_))
        ));
    }
}
