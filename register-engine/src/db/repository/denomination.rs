//! Denomination Repository
//!
//! One breakdown row per register, rewritten at open and at close
//! (UNIQUE index on register_id, upsert semantics).

use super::RepoResult;
use shared::models::{DenominationInput, Denominations};
use shared::util::snowflake_id;
use sqlx::SqliteConnection;

pub async fn upsert(
    conn: &mut SqliteConnection,
    register_id: i64,
    data: &DenominationInput,
    now: i64,
) -> RepoResult<()> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO denomination \
         (id, register_id, note500, note200, note100, note50, note20, note10, \
          coins, coins2, coins5, total, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT (register_id) DO UPDATE SET \
         note500 = excluded.note500, note200 = excluded.note200, note100 = excluded.note100, \
         note50 = excluded.note50, note20 = excluded.note20, note10 = excluded.note10, \
         coins = excluded.coins, coins2 = excluded.coins2, coins5 = excluded.coins5, \
         total = excluded.total, updated_at = excluded.updated_at",
    )
    .bind(id)
    .bind(register_id)
    .bind(data.note500)
    .bind(data.note200)
    .bind(data.note100)
    .bind(data.note50)
    .bind(data.note20)
    .bind(data.note10)
    .bind(data.coins)
    .bind(data.coins2)
    .bind(data.coins5)
    .bind(data.total())
    .bind(now)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_by_register(
    conn: &mut SqliteConnection,
    register_id: i64,
) -> RepoResult<Option<Denominations>> {
    let denominations = sqlx::query_as::<_, Denominations>(
        "SELECT id, register_id, note500, note200, note100, note50, note20, note10, \
         coins, coins2, coins5, total, updated_at \
         FROM denomination WHERE register_id = ?",
    )
    .bind(register_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(denominations)
}
