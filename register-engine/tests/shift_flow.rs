//! Staff shift flow: check-in, check-out, stale-shift recovery, recycling.

mod common;

use register_engine::db::repository::{cash_transaction, register};
use register_engine::services::{registers, shifts};
use register_engine::utils::AppError;
use shared::models::{
    CheckInStatus, Operator, PaymentMethod, RegisterStatus, ShiftCheckIn, ShiftCheckOut,
    TransactionCreate, TxSource, TxType,
};
use shared::util::{now_millis, snowflake_id};

fn check_in_payload(opening_balance: f64) -> ShiftCheckIn {
    ShiftCheckIn {
        opening_balance,
        notes: None,
        denominations: None,
    }
}

fn check_out_payload(actual_balance: f64) -> ShiftCheckOut {
    ShiftCheckOut {
        actual_balance,
        notes: None,
        denominations: None,
    }
}

#[tokio::test]
async fn clean_check_in_and_check_out() {
    let t = common::engine().await;
    let rest = common::seed_restaurant(&t.state, "Chai Point").await;
    let staff = common::seed_staff(&t.state, rest.id, "Priya").await;

    let outcome = shifts::check_in(&t.state, staff.id, rest.id, check_in_payload(1000.0))
        .await
        .expect("check in");
    assert_eq!(outcome.check_in.status, CheckInStatus::Active);
    assert_eq!(outcome.check_in.register_id, Some(outcome.register.id));
    assert_eq!(outcome.check_in.date, common::today());
    assert!(outcome.recovered_check_in.is_none());
    assert_eq!(outcome.register.status, RegisterStatus::Open);

    let shift = shifts::current_shift(&t.state, staff.id)
        .await
        .expect("query")
        .expect("active shift");
    assert_eq!(shift.id, outcome.check_in.id);

    // Work the drawer a bit during the shift
    registers::record_transaction(
        &t.state,
        Operator::Staff(staff.id),
        outcome.register.id,
        TransactionCreate {
            tx_type: TxType::CashIn,
            amount: 450.0,
            payment_method: PaymentMethod::Cash,
            source: TxSource::Order,
            description: None,
        },
    )
    .await
    .expect("sale");

    let out = shifts::check_out(&t.state, staff.id, check_out_payload(1450.0))
        .await
        .expect("check out");
    assert_eq!(out.check_in.status, CheckInStatus::Completed);
    assert!(out.check_in.check_out_time.is_some());
    assert_eq!(out.register.status, RegisterStatus::Closed);
    assert_eq!(out.summary.discrepancy.cash, 0.0);
    assert!(!out.summary.forced);

    assert!(
        shifts::current_shift(&t.state, staff.id)
            .await
            .expect("query")
            .is_none()
    );
}

#[tokio::test]
async fn double_check_in_same_day_is_rejected() {
    let t = common::engine().await;
    let rest = common::seed_restaurant(&t.state, "Chai Point").await;
    let staff = common::seed_staff(&t.state, rest.id, "Priya").await;

    shifts::check_in(&t.state, staff.id, rest.id, check_in_payload(500.0))
        .await
        .expect("first check in");
    let err = shifts::check_in(&t.state, staff.id, rest.id, check_in_payload(500.0))
        .await
        .expect_err("second check in same day");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn prior_day_shift_is_recovered_at_next_check_in() {
    let t = common::engine().await;
    let rest = common::seed_restaurant(&t.state, "Chai Point").await;
    let staff = common::seed_staff(&t.state, rest.id, "Priya").await;

    let day1 = shifts::check_in(&t.state, staff.id, rest.id, check_in_payload(1000.0))
        .await
        .expect("day 1 check in");
    let old_register = day1.register.id;

    // Simulate the forgotten checkout: backdate the shift one business day
    let yesterday = (register_engine::utils::time::parse_date(&common::today()).expect("date")
        - chrono::Duration::days(1))
    .format("%Y-%m-%d")
    .to_string();
    sqlx::query("UPDATE check_in SET date = ? WHERE id = ?")
        .bind(&yesterday)
        .bind(day1.check_in.id)
        .execute(t.state.pool())
        .await
        .expect("backdate");

    let day2 = shifts::check_in(&t.state, staff.id, rest.id, check_in_payload(800.0))
        .await
        .expect("day 2 check in proceeds");

    let recovered = day2.recovered_check_in.expect("old shift recovered");
    assert_eq!(recovered.id, day1.check_in.id);
    assert_eq!(recovered.status, CheckInStatus::ForceClosed);
    assert_eq!(recovered.notes.as_deref(), Some(shifts::STALE_SHIFT_NOTE));

    // Old register was settled with zero discrepancy, new one is open
    let mut conn = t.state.pool().acquire().await.expect("conn");
    let old = register::find_by_id(&mut conn, old_register)
        .await
        .expect("query")
        .expect("old register");
    assert_eq!(old.status, RegisterStatus::ForceClosed);
    assert_eq!(old.closing_cash_balance, Some(1000.0));
    assert_eq!(old.closing_notes.as_deref(), Some(shifts::STALE_SHIFT_NOTE));
    let ledger = cash_transaction::find_by_register(&mut conn, old_register)
        .await
        .expect("ledger");
    assert_eq!(ledger.len(), 1); // float only, no correction

    assert_ne!(day2.register.id, old_register);
    assert_eq!(day2.register.status, RegisterStatus::Open);
    assert_eq!(day2.check_in.date, common::today());
}

#[tokio::test]
async fn stale_placeholder_is_recycled_not_duplicated() {
    let t = common::engine().await;
    let rest = common::seed_restaurant(&t.state, "Chai Point").await;
    let staff = common::seed_staff(&t.state, rest.id, "Priya").await;

    // Placeholder row for today, as left behind by an aborted flow
    let stale_id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO check_in \
         (id, staff_id, register_id, date, check_in_time, status, notes, created_at, updated_at) \
         VALUES (?, ?, NULL, ?, ?, 'STALE', NULL, ?, ?)",
    )
    .bind(stale_id)
    .bind(staff.id)
    .bind(common::today())
    .bind(now)
    .bind(now)
    .bind(now)
    .execute(t.state.pool())
    .await
    .expect("insert placeholder");

    let outcome = shifts::check_in(&t.state, staff.id, rest.id, check_in_payload(300.0))
        .await
        .expect("check in");
    assert_eq!(outcome.check_in.id, stale_id, "placeholder row was reused");
    assert_eq!(outcome.check_in.status, CheckInStatus::Active);
    assert_eq!(outcome.check_in.register_id, Some(outcome.register.id));

    let mut conn = t.state.pool().acquire().await.expect("conn");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM check_in WHERE staff_id = ?")
        .bind(staff.id)
        .fetch_one(&mut *conn)
        .await
        .expect("count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn check_out_without_active_shift_fails() {
    let t = common::engine().await;
    let rest = common::seed_restaurant(&t.state, "Chai Point").await;
    let staff = common::seed_staff(&t.state, rest.id, "Priya").await;

    let err = shifts::check_out(&t.state, staff.id, check_out_payload(100.0))
        .await
        .expect_err("nothing to check out of");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn check_in_requires_active_roster_membership() {
    let t = common::engine().await;
    let rest = common::seed_restaurant(&t.state, "Chai Point").await;
    let other_rest = common::seed_restaurant(&t.state, "Dosa Corner").await;
    let staff = common::seed_staff(&t.state, other_rest.id, "Priya").await;

    let err = shifts::check_in(&t.state, staff.id, rest.id, check_in_payload(100.0))
        .await
        .expect_err("wrong restaurant");
    assert!(matches!(err, AppError::Unauthorized(_)), "got {err:?}");

    sqlx::query("UPDATE staff SET active = 0 WHERE id = ?")
        .bind(staff.id)
        .execute(t.state.pool())
        .await
        .expect("deactivate");
    let err = shifts::check_in(&t.state, staff.id, other_rest.id, check_in_payload(100.0))
        .await
        .expect_err("inactive staff");
    assert!(matches!(err, AppError::Unauthorized(_)), "got {err:?}");
}
