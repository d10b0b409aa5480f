//! Forklift Service
//!
//! Business logic for the forklift fleet.

use chrono::Datelike;
use forklift_core::domain::forklift::Forklift;
use forklift_core::dto::forklift::ForkliftForm;
use forklift_core::pagination::Pagination;
use sqlx::SqlitePool;
use thiserror::Error;

use super::{is_unique_violation, require};
use crate::repository::forklift_repository;

/// Service error type
#[derive(Debug, Error)]
pub enum ForkliftError {
    #[error("Forklift {0} not found")]
    NotFound(i64),

    #[error("EQ No atau Serial Number sudah ada!")]
    Duplicate,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for ForkliftError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            ForkliftError::Duplicate
        } else {
            ForkliftError::DatabaseError(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ForkliftError>;

/// One page of the fleet
pub async fn list_page(
    pool: &SqlitePool,
    page: Option<i64>,
    size: Option<i64>,
) -> Result<(Vec<Forklift>, Pagination)> {
    let total = forklift_repository::count(pool).await?;
    let pagination = Pagination::new(page, size, total);
    let forklifts =
        forklift_repository::list_page(pool, pagination.limit(), pagination.offset()).await?;
    Ok((forklifts, pagination))
}

/// Every forklift, for job forms
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Forklift>> {
    Ok(forklift_repository::list_all(pool).await?)
}

/// Get a forklift by ID
pub async fn get_forklift(pool: &SqlitePool, id: i64) -> Result<Forklift> {
    forklift_repository::find_by_id(pool, id)
        .await?
        .ok_or(ForkliftError::NotFound(id))
}

/// Add a forklift to the fleet
pub async fn create_forklift(pool: &SqlitePool, req: ForkliftForm) -> Result<Forklift> {
    let req = normalize(req);
    validate_forklift_request(&req)?;

    let forklift = forklift_repository::create(pool, &req).await?;

    tracing::info!("Forklift created: {} ({})", forklift.eq_no, forklift.id);

    Ok(forklift)
}

/// Update a forklift
pub async fn update_forklift(pool: &SqlitePool, id: i64, req: ForkliftForm) -> Result<()> {
    let req = normalize(req);
    validate_forklift_request(&req)?;

    let updated = forklift_repository::update(pool, id, &req).await?;

    if !updated {
        return Err(ForkliftError::NotFound(id));
    }

    tracing::info!("Forklift updated: {} ({})", req.eq_no, id);

    Ok(())
}

/// Delete a forklift and every job logged against it
pub async fn delete_forklift(pool: &SqlitePool, id: i64) -> Result<()> {
    let deleted = forklift_repository::delete(pool, id).await?;

    if !deleted {
        return Err(ForkliftError::NotFound(id));
    }

    tracing::info!("Forklift deleted: {}", id);

    Ok(())
}

/// Delete a selection of forklifts; unknown ids are skipped
pub async fn delete_forklifts(pool: &SqlitePool, ids: &[i64]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let deleted = forklift_repository::delete_many(pool, ids).await?;

    tracing::info!("Bulk delete removed {} of {} forklifts", deleted, ids.len());

    Ok(deleted)
}

// =============================================================================
// Validation
// =============================================================================

fn normalize(mut req: ForkliftForm) -> ForkliftForm {
    for field in [
        &mut req.brand,
        &mut req.forklift_type,
        &mut req.eq_no,
        &mut req.serial_number,
        &mut req.location,
        &mut req.powertrain,
        &mut req.owner,
        &mut req.status,
    ] {
        *field = field.trim().to_string();
    }
    req
}

fn validate_forklift_request(req: &ForkliftForm) -> Result<()> {
    let required = [
        (&req.brand, "Brand"),
        (&req.forklift_type, "Type"),
        (&req.eq_no, "EQ No"),
        (&req.serial_number, "Serial Number"),
        (&req.location, "Location"),
        (&req.powertrain, "Powertrain"),
        (&req.owner, "Owner"),
        (&req.status, "Status"),
    ];

    for (value, field) in required {
        require(value, field).map_err(ForkliftError::ValidationError)?;
    }

    let max_year = chrono::Utc::now().year() + 1;
    if req.mfg_year < 1900 || req.mfg_year > max_year {
        return Err(ForkliftError::ValidationError(format!(
            "Manufacturing year must be between 1900 and {}",
            max_year
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn form(eq_no: &str, serial: &str) -> ForkliftForm {
        ForkliftForm {
            brand: "Toyota".to_string(),
            forklift_type: "8FD25".to_string(),
            eq_no: eq_no.to_string(),
            serial_number: serial.to_string(),
            location: "Warehouse A".to_string(),
            powertrain: "Diesel".to_string(),
            owner: "PT Maju".to_string(),
            mfg_year: 2019,
            status: "Active".to_string(),
        }
    }

    async fn pool() -> SqlitePool {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    #[test]
    fn test_validate_blank_field() {
        let mut req = form("FL-01", "SN-01");
        req.owner = "   ".to_string();
        let result = validate_forklift_request(&normalize(req));
        assert!(matches!(result, Err(ForkliftError::ValidationError(_))));
    }

    #[test]
    fn test_validate_mfg_year() {
        let mut req = form("FL-01", "SN-01");
        req.mfg_year = 1850;
        assert!(validate_forklift_request(&req).is_err());

        req.mfg_year = 2020;
        assert!(validate_forklift_request(&req).is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_eq_no_or_serial_is_rejected() {
        let pool = pool().await;
        create_forklift(&pool, form("FL-01", "SN-01")).await.unwrap();

        let dup_eq = create_forklift(&pool, form("FL-01", "SN-02")).await;
        assert!(matches!(dup_eq, Err(ForkliftError::Duplicate)));

        let dup_serial = create_forklift(&pool, form("FL-02", "SN-01")).await;
        assert!(matches!(dup_serial, Err(ForkliftError::Duplicate)));

        assert_eq!(forklift_repository::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = pool().await;
        let created = create_forklift(&pool, form("FL-01", "SN-01")).await.unwrap();

        let mut edit = form("FL-01", "SN-01");
        edit.location = "Workshop".to_string();
        update_forklift(&pool, created.id, edit).await.unwrap();
        assert_eq!(get_forklift(&pool, created.id).await.unwrap().location, "Workshop");

        assert!(matches!(
            update_forklift(&pool, 999, form("X", "Y")).await,
            Err(ForkliftError::NotFound(999))
        ));

        delete_forklift(&pool, created.id).await.unwrap();
        assert!(matches!(
            get_forklift(&pool, created.id).await,
            Err(ForkliftError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_bulk_delete_skips_unknown_ids() {
        let pool = pool().await;
        let a = create_forklift(&pool, form("FL-01", "SN-01")).await.unwrap();
        let b = create_forklift(&pool, form("FL-02", "SN-02")).await.unwrap();
        create_forklift(&pool, form("FL-03", "SN-03")).await.unwrap();

        let deleted = delete_forklifts(&pool, &[a.id, b.id, 404]).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(forklift_repository::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_page_clamps_and_slices() {
        let pool = pool().await;
        for i in 0..25 {
            create_forklift(&pool, form(&format!("FL-{i:02}"), &format!("SN-{i:02}")))
                .await
                .unwrap();
        }

        let (page, pagination) = list_page(&pool, Some(2), None).await.unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(pagination.total_pages, 2);
        assert!(!pagination.has_next);
    }
}
