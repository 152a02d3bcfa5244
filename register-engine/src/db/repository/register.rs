//! Cash Register Repository

use super::{RepoError, RepoResult};
use shared::models::{CashRegister, Operator, RegisterStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, restaurant_id, opened_by, opened_by_kind, status, \
    opening_balance, opening_cash_balance, opening_upi_balance, opening_card_balance, \
    closing_balance, closing_cash_balance, closing_upi_balance, closing_card_balance, \
    actual_balance, discrepancies, opening_notes, closing_notes, \
    opened_at, closed_at, created_at, updated_at";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<CashRegister>> {
    let sql = format!("SELECT {COLUMNS} FROM cash_register WHERE id = ?");
    let register = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(register)
}

/// The operator's OPEN register for a restaurant, if any
pub async fn find_open_for_operator(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    operator: Operator,
) -> RepoResult<Option<CashRegister>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM cash_register \
         WHERE restaurant_id = ? AND opened_by = ? AND opened_by_kind = ? AND status = 'OPEN'"
    );
    let register = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(restaurant_id)
        .bind(operator.id())
        .bind(operator.kind())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(register)
}

/// A staff member's OPEN register in any restaurant (check-out path)
pub async fn find_open_for_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
) -> RepoResult<Option<CashRegister>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM cash_register \
         WHERE opened_by = ? AND opened_by_kind = 'STAFF' AND status = 'OPEN'"
    );
    let register = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(staff_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(register)
}

/// Every OPEN register of a restaurant (status view, EOD sweep)
pub async fn find_open_by_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
) -> RepoResult<Vec<CashRegister>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM cash_register \
         WHERE restaurant_id = ? AND status = 'OPEN' ORDER BY opened_at"
    );
    let registers = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(restaurant_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(registers)
}

/// Register history for audit display, newest first
pub async fn find_by_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<CashRegister>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM cash_register \
         WHERE restaurant_id = ? ORDER BY opened_at DESC LIMIT ? OFFSET ?"
    );
    let registers = sqlx::query_as::<_, CashRegister>(&sql)
        .bind(restaurant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;
    Ok(registers)
}

/// Insert a fresh OPEN register.
///
/// The partial unique index on (restaurant_id, opened_by_kind, opened_by)
/// turns a concurrent double-open into `RepoError::Duplicate`.
pub async fn create(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    operator: Operator,
    opening_balance: f64,
    opening_notes: Option<String>,
    now: i64,
) -> RepoResult<CashRegister> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO cash_register (id, restaurant_id, opened_by, opened_by_kind, status, \
         opening_balance, opening_cash_balance, opening_upi_balance, opening_card_balance, \
         opening_notes, opened_at, created_at, updated_at) \
         VALUES (?, ?, ?, ?, 'OPEN', ?, ?, 0, 0, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(operator.id())
    .bind(operator.kind())
    .bind(opening_balance)
    .bind(opening_balance)
    .bind(opening_notes)
    .bind(now)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create register".into()))
}

/// Closing fields written exactly once when a register leaves OPEN
#[derive(Debug, Clone)]
pub struct RegisterClosePatch {
    pub status: RegisterStatus,
    pub closing_balance: f64,
    pub closing_cash_balance: f64,
    pub closing_upi_balance: f64,
    pub closing_card_balance: f64,
    pub actual_balance: f64,
    /// JSON-encoded per-method discrepancy map
    pub discrepancies: String,
    pub closing_notes: Option<String>,
    pub closed_at: i64,
}

/// Flip an OPEN register to CLOSED/FORCE_CLOSED and record closing balances.
///
/// The `status = 'OPEN'` guard makes close idempotence-safe: a second close
/// attempt affects zero rows and surfaces as NotFound.
pub async fn close(
    conn: &mut SqliteConnection,
    id: i64,
    patch: RegisterClosePatch,
) -> RepoResult<CashRegister> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE cash_register SET status = ?, closing_balance = ?, closing_cash_balance = ?, \
         closing_upi_balance = ?, closing_card_balance = ?, actual_balance = ?, \
         discrepancies = ?, closing_notes = COALESCE(?, closing_notes), closed_at = ?, \
         updated_at = ? WHERE id = ? AND status = 'OPEN'",
    )
    .bind(patch.status)
    .bind(patch.closing_balance)
    .bind(patch.closing_cash_balance)
    .bind(patch.closing_upi_balance)
    .bind(patch.closing_card_balance)
    .bind(patch.actual_balance)
    .bind(patch.discrepancies)
    .bind(patch.closing_notes)
    .bind(patch.closed_at)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Register {id} not found or already closed"
        )));
    }
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Register {id} not found")))
}
