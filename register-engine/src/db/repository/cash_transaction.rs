//! Cash Transaction Repository
//!
//! Append-only: this module exposes INSERT and SELECT only. Closing
//! discrepancies become new rows, never updates to existing ones.

use super::{RepoError, RepoResult};
use shared::models::{CashTransaction, TransactionCreate};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

const COLUMNS: &str =
    "id, register_id, tx_type, amount, payment_method, source, description, performed_by, created_at";

pub async fn insert(
    conn: &mut SqliteConnection,
    register_id: i64,
    data: TransactionCreate,
    performed_by: i64,
    now: i64,
) -> RepoResult<CashTransaction> {
    if data.amount <= 0.0 {
        return Err(RepoError::Validation(format!(
            "Transaction amount must be positive: {}",
            data.amount
        )));
    }

    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO cash_transaction \
         (id, register_id, tx_type, amount, payment_method, source, description, performed_by, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(register_id)
    .bind(data.tx_type)
    .bind(data.amount)
    .bind(data.payment_method)
    .bind(data.source)
    .bind(&data.description)
    .bind(performed_by)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(CashTransaction {
        id,
        register_id,
        tx_type: data.tx_type,
        amount: data.amount,
        payment_method: data.payment_method,
        source: data.source,
        description: data.description,
        performed_by,
        created_at: now,
    })
}

/// Full ledger of one register, oldest first
pub async fn find_by_register(
    conn: &mut SqliteConnection,
    register_id: i64,
) -> RepoResult<Vec<CashTransaction>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM cash_transaction WHERE register_id = ? ORDER BY created_at, id"
    );
    let transactions = sqlx::query_as::<_, CashTransaction>(&sql)
        .bind(register_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(transactions)
}
