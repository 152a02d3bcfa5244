//! Check-In Repository

use super::{RepoError, RepoResult};
use shared::models::{CheckInRecord, CheckInStatus};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, staff_id, register_id, date, check_in_time, check_out_time, \
    status, notes, created_at, updated_at";

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<CheckInRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM check_in WHERE id = ?");
    let record = sqlx::query_as::<_, CheckInRecord>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(record)
}

/// The staff member's ACTIVE check-in, if any (unique by index)
pub async fn find_active_by_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
) -> RepoResult<Option<CheckInRecord>> {
    let sql = format!("SELECT {COLUMNS} FROM check_in WHERE staff_id = ? AND status = 'ACTIVE'");
    let record = sqlx::query_as::<_, CheckInRecord>(&sql)
        .bind(staff_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(record)
}

/// STALE placeholder for the given business date, eligible for recycling
pub async fn find_stale_for_date(
    conn: &mut SqliteConnection,
    staff_id: i64,
    date: &str,
) -> RepoResult<Option<CheckInRecord>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM check_in \
         WHERE staff_id = ? AND date = ? AND status = 'STALE' LIMIT 1"
    );
    let record = sqlx::query_as::<_, CheckInRecord>(&sql)
        .bind(staff_id)
        .bind(date)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(record)
}

/// Every ACTIVE check-in belonging to a restaurant, directly through the
/// staff roster or transitively through the linked register.
pub async fn find_active_by_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
) -> RepoResult<Vec<CheckInRecord>> {
    let sql = format!(
        "SELECT ci.{} FROM check_in ci \
         JOIN staff s ON s.id = ci.staff_id \
         LEFT JOIN cash_register r ON r.id = ci.register_id \
         WHERE ci.status = 'ACTIVE' AND (s.restaurant_id = ?1 OR r.restaurant_id = ?1)",
        COLUMNS.replace(", ", ", ci.")
    );
    let records = sqlx::query_as::<_, CheckInRecord>(&sql)
        .bind(restaurant_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(records)
}

/// Insert a fresh ACTIVE record. The partial unique index on
/// (staff_id) WHERE status = 'ACTIVE' rejects concurrent double check-ins.
pub async fn create(
    conn: &mut SqliteConnection,
    staff_id: i64,
    register_id: i64,
    date: &str,
    notes: Option<String>,
    now: i64,
) -> RepoResult<CheckInRecord> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO check_in \
         (id, staff_id, register_id, date, check_in_time, status, notes, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, 'ACTIVE', ?, ?, ?)",
    )
    .bind(id)
    .bind(staff_id)
    .bind(register_id)
    .bind(date)
    .bind(now)
    .bind(notes)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create check-in".into()))
}

/// Recycle a STALE placeholder into a fresh ACTIVE record instead of
/// inserting a new row.
pub async fn recycle(
    conn: &mut SqliteConnection,
    id: i64,
    register_id: i64,
    date: &str,
    notes: Option<String>,
    now: i64,
) -> RepoResult<CheckInRecord> {
    let rows = sqlx::query(
        "UPDATE check_in SET status = 'ACTIVE', register_id = ?, date = ?, \
         check_in_time = ?, check_out_time = NULL, notes = ?, updated_at = ? \
         WHERE id = ? AND status = 'STALE'",
    )
    .bind(register_id)
    .bind(date)
    .bind(now)
    .bind(notes)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Check-in {id} is not a recyclable placeholder"
        )));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Check-in {id} not found")))
}

/// Terminal transition out of ACTIVE (COMPLETED or FORCE_CLOSED)
async fn finish(
    conn: &mut SqliteConnection,
    id: i64,
    status: CheckInStatus,
    notes: Option<String>,
    now: i64,
) -> RepoResult<CheckInRecord> {
    let rows = sqlx::query(
        "UPDATE check_in SET status = ?, check_out_time = ?, \
         notes = COALESCE(?, notes), updated_at = ? \
         WHERE id = ? AND status = 'ACTIVE'",
    )
    .bind(status)
    .bind(now)
    .bind(notes)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Check-in {id} not found or not active"
        )));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Check-in {id} not found")))
}

pub async fn complete(
    conn: &mut SqliteConnection,
    id: i64,
    notes: Option<String>,
    now: i64,
) -> RepoResult<CheckInRecord> {
    finish(conn, id, CheckInStatus::Completed, notes, now).await
}

pub async fn force_close(
    conn: &mut SqliteConnection,
    id: i64,
    note: &str,
    now: i64,
) -> RepoResult<CheckInRecord> {
    finish(conn, id, CheckInStatus::ForceClosed, Some(note.to_string()), now).await
}
