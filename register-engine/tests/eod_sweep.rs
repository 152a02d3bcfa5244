//! End-of-day sweep: forced closures across restaurants, idempotency.

mod common;

use register_engine::db::repository::{cash_transaction, check_in, register};
use register_engine::eod;
use register_engine::services::{registers, shifts};
use register_engine::utils::AppError;
use shared::models::{
    CheckInStatus, Operator, RegisterOpen, RegisterStatus, ShiftCheckIn,
};

fn open_payload(opening_balance: f64) -> RegisterOpen {
    RegisterOpen {
        opening_balance,
        notes: None,
        denominations: None,
    }
}

#[tokio::test]
async fn sweep_closes_everything_left_open() {
    let t = common::engine().await;
    let rest = common::seed_restaurant(&t.state, "Chai Point").await;
    let staff = common::seed_staff(&t.state, rest.id, "Priya").await;
    let admin = Operator::Admin(common::seed_admin(&t.state, rest.id).await);

    // Staff forgot to check out, admin forgot to close
    let shift = shifts::check_in(
        &t.state,
        staff.id,
        rest.id,
        ShiftCheckIn {
            opening_balance: 1000.0,
            notes: None,
            denominations: None,
        },
    )
    .await
    .expect("check in");
    let admin_reg = registers::open_register(&t.state, admin, rest.id, open_payload(500.0))
        .await
        .expect("admin open");

    let report = eod::process_end_of_day(&t.state, rest.id)
        .await
        .expect("sweep");
    assert_eq!(report.closed_check_ins, 1);
    assert_eq!(report.closed_registers, 2);

    let mut conn = t.state.pool().acquire().await.expect("conn");
    let swept_shift = check_in::find_by_id(&mut conn, shift.check_in.id)
        .await
        .expect("query")
        .expect("row");
    assert_eq!(swept_shift.status, CheckInStatus::ForceClosed);
    assert_eq!(swept_shift.notes.as_deref(), Some(eod::EOD_NOTE));

    for id in [shift.register.id, admin_reg.id] {
        let reg = register::find_by_id(&mut conn, id)
            .await
            .expect("query")
            .expect("row");
        assert_eq!(reg.status, RegisterStatus::ForceClosed);
        assert_eq!(reg.closing_notes.as_deref(), Some(eod::EOD_NOTE));
        // counted := expected, so no correction entry exists
        let ledger = cash_transaction::find_by_register(&mut conn, id)
            .await
            .expect("ledger");
        assert_eq!(ledger.len(), 1);
        assert_eq!(reg.closing_cash_balance, reg.actual_balance);
    }
}

#[tokio::test]
async fn sweep_is_idempotent_and_isolated_per_restaurant() {
    let t = common::engine().await;
    let rest_a = common::seed_restaurant(&t.state, "Chai Point").await;
    let rest_b = common::seed_restaurant(&t.state, "Dosa Corner").await;
    let admin_a = Operator::Admin(common::seed_admin(&t.state, rest_a.id).await);
    let admin_b = Operator::Admin(common::seed_admin(&t.state, rest_b.id).await);

    registers::open_register(&t.state, admin_a, rest_a.id, open_payload(100.0))
        .await
        .expect("open in A");
    // B is already clean: open and close properly
    let reg_b = registers::open_register(&t.state, admin_b, rest_b.id, open_payload(100.0))
        .await
        .expect("open in B");
    registers::close_register(
        &t.state,
        admin_b,
        reg_b.id,
        shared::models::RegisterClose {
            actual_balance: 100.0,
            notes: None,
            denominations: None,
        },
    )
    .await
    .expect("close in B");

    let summary = eod::sweep_all(&t.state).await;
    assert_eq!(summary.restaurants, 2);
    assert_eq!(summary.closed_registers, 1);
    assert_eq!(summary.closed_check_ins, 0);
    assert_eq!(summary.failures, 0);

    // Second pass finds nothing left to do
    let summary = eod::sweep_all(&t.state).await;
    assert_eq!(summary.restaurants, 2);
    assert_eq!(summary.closed_registers, 0);
    assert_eq!(summary.closed_check_ins, 0);
    assert_eq!(summary.failures, 0);

    // B's properly closed register kept its original closing state
    let mut conn = t.state.pool().acquire().await.expect("conn");
    let reg_b = register::find_by_id(&mut conn, reg_b.id)
        .await
        .expect("query")
        .expect("row");
    assert_eq!(reg_b.status, RegisterStatus::Closed);
}

#[tokio::test]
async fn sweep_of_unknown_restaurant_fails() {
    let t = common::engine().await;
    let err = eod::process_end_of_day(&t.state, 424242)
        .await
        .expect_err("no such restaurant");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}
