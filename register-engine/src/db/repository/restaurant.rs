//! Restaurant / Staff Repository
//!
//! Tenant rows, the staff roster projection and the operator authorization
//! predicate. Roster management itself lives outside the engine; create
//! helpers exist for provisioning and tests.

use super::{RepoError, RepoResult};
use shared::models::{Operator, Restaurant, Staff};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, name, timezone, business_day_cutoff, created_at";

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<Restaurant>> {
    let sql = format!("SELECT {COLUMNS} FROM restaurant WHERE id = ?");
    let restaurant = sqlx::query_as::<_, Restaurant>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(restaurant)
}

/// Every tenant, for the EOD sweep loop
pub async fn find_all(conn: &mut SqliteConnection) -> RepoResult<Vec<Restaurant>> {
    let sql = format!("SELECT {COLUMNS} FROM restaurant ORDER BY id");
    let restaurants = sqlx::query_as::<_, Restaurant>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    Ok(restaurants)
}

pub async fn create(
    conn: &mut SqliteConnection,
    name: &str,
    timezone: &str,
    business_day_cutoff: &str,
) -> RepoResult<Restaurant> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO restaurant (id, name, timezone, business_day_cutoff, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(timezone)
    .bind(business_day_cutoff)
    .bind(now_millis())
    .execute(&mut *conn)
    .await?;

    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create restaurant".into()))
}

pub async fn find_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
) -> RepoResult<Option<Staff>> {
    let staff = sqlx::query_as::<_, Staff>(
        "SELECT id, restaurant_id, display_name, active FROM staff WHERE id = ?",
    )
    .bind(staff_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(staff)
}

pub async fn create_staff(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    display_name: &str,
) -> RepoResult<Staff> {
    let id = snowflake_id();
    sqlx::query("INSERT INTO staff (id, restaurant_id, display_name, active) VALUES (?, ?, ?, 1)")
        .bind(id)
        .bind(restaurant_id)
        .bind(display_name)
        .execute(&mut *conn)
        .await?;

    find_staff(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create staff".into()))
}

pub async fn grant_admin_access(
    conn: &mut SqliteConnection,
    user_id: i64,
    restaurant_id: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO admin_access (user_id, restaurant_id) VALUES (?, ?)",
    )
    .bind(user_id)
    .bind(restaurant_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Opaque authorization predicate: may this operator act for this restaurant?
///
/// Admins need an `admin_access` grant; staff must be an active roster member
/// of the restaurant.
pub async fn is_authorized_operator(
    conn: &mut SqliteConnection,
    operator: Operator,
    restaurant_id: i64,
) -> RepoResult<bool> {
    let authorized: Option<i64> = match operator {
        Operator::Admin(user_id) => {
            sqlx::query_scalar(
                "SELECT 1 FROM admin_access WHERE user_id = ? AND restaurant_id = ?",
            )
            .bind(user_id)
            .bind(restaurant_id)
            .fetch_optional(&mut *conn)
            .await?
        }
        Operator::Staff(staff_id) => {
            sqlx::query_scalar(
                "SELECT 1 FROM staff WHERE id = ? AND restaurant_id = ? AND active = 1",
            )
            .bind(staff_id)
            .bind(restaurant_id)
            .fetch_optional(&mut *conn)
            .await?
        }
    };
    Ok(authorized.is_some())
}
