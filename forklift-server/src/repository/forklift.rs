//! Forklift Repository
//!
//! Handles all database operations related to the forklift fleet.

use forklift_core::domain::forklift::Forklift;
use forklift_core::dto::forklift::ForkliftForm;
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, brand, type, eq_no, serial_number, location, powertrain, owner, mfg_year, status";

/// Create a new forklift in the database
pub async fn create(pool: &SqlitePool, req: &ForkliftForm) -> Result<Forklift, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO forklifts (
            brand, type, eq_no, serial_number, location,
            powertrain, owner, mfg_year, status
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&req.brand)
    .bind(&req.forklift_type)
    .bind(&req.eq_no)
    .bind(&req.serial_number)
    .bind(&req.location)
    .bind(&req.powertrain)
    .bind(&req.owner)
    .bind(req.mfg_year)
    .bind(&req.status)
    .execute(pool)
    .await?;

    Ok(Forklift {
        id: result.last_insert_rowid(),
        brand: req.brand.clone(),
        forklift_type: req.forklift_type.clone(),
        eq_no: req.eq_no.clone(),
        serial_number: req.serial_number.clone(),
        location: req.location.clone(),
        powertrain: req.powertrain.clone(),
        owner: req.owner.clone(),
        mfg_year: req.mfg_year,
        status: req.status.clone(),
    })
}

/// Find a forklift by ID
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Forklift>, sqlx::Error> {
    let row = sqlx::query_as::<_, ForkliftRow>(&format!(
        "SELECT {COLUMNS} FROM forklifts WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List one page of forklifts in insertion order
pub async fn list_page(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Forklift>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ForkliftRow>(&format!(
        "SELECT {COLUMNS} FROM forklifts ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// List every forklift, ordered for select boxes
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Forklift>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ForkliftRow>(&format!(
        "SELECT {COLUMNS} FROM forklifts ORDER BY eq_no"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forklifts")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Update a forklift
pub async fn update(pool: &SqlitePool, id: i64, req: &ForkliftForm) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE forklifts
        SET brand = ?, type = ?, eq_no = ?, serial_number = ?, location = ?,
            powertrain = ?, owner = ?, mfg_year = ?, status = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.brand)
    .bind(&req.forklift_type)
    .bind(&req.eq_no)
    .bind(&req.serial_number)
    .bind(&req.location)
    .bind(&req.powertrain)
    .bind(&req.owner)
    .bind(req.mfg_year)
    .bind(&req.status)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a forklift by ID; its jobs go with it
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM forklifts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete several forklifts in one transaction.
/// Returns the number of forklifts removed; unknown ids are skipped.
pub async fn delete_many(pool: &SqlitePool, ids: &[i64]) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut deleted = 0;

    for id in ids {
        deleted += sqlx::query("DELETE FROM forklifts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;
    Ok(deleted)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct ForkliftRow {
    id: i64,
    brand: String,
    #[sqlx(rename = "type")]
    forklift_type: String,
    eq_no: String,
    serial_number: String,
    location: String,
    powertrain: String,
    owner: String,
    mfg_year: i32,
    status: String,
}

impl From<ForkliftRow> for Forklift {
    fn from(row: ForkliftRow) -> Self {
        Forklift {
            id: row.id,
            brand: row.brand,
            forklift_type: row.forklift_type,
            eq_no: row.eq_no,
            serial_number: row.serial_number,
            location: row.location,
            powertrain: row.powertrain,
            owner: row.owner,
            mfg_year: row.mfg_year,
            status: row.status,
        }
    }
}
