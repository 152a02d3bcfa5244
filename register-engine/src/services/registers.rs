//! Register lifecycle service (收银钱箱生命周期)
//!
//! Owns the OPEN → CLOSED/FORCE_CLOSED state machine and the closing
//! discrepancy computation. Every mutating operation executes inside one
//! store transaction; the close path reads the ledger and flips the status
//! within the same transaction boundary, so a late transaction insert can
//! never land after `closed_at`.

use sqlx::SqliteConnection;

use shared::models::{
    ActiveRegisterView, BalanceBreakdown, CashRegister, CashTransaction, Operator,
    PaymentMethod, RegisterClose, RegisterCloseSummary, RegisterOpen, RegisterStatus,
    RegisterStatusView, TransactionCreate, TxSource, TxType,
};
use shared::util::now_millis;

use crate::balance::{self, to_decimal, to_f64};
use crate::core::EngineState;
use crate::db::repository::register::RegisterClosePatch;
use crate::db::repository::{cash_transaction, denomination, register, restaurant};
use crate::utils::validation::{
    MAX_NOTE_LEN, validate_amount, validate_cash, validate_denominations, validate_optional_text,
};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "register";

/// Description of the seed ledger row recording the opening float
pub const OPENING_FLOAT_DESCRIPTION: &str = "Opening cash float";

/// Open a register for an operator.
///
/// Writes the register row, the optional denomination breakdown and the
/// seed CASH_IN recording the float, all in one transaction.
pub async fn open_register(
    state: &EngineState,
    operator: Operator,
    restaurant_id: i64,
    payload: RegisterOpen,
) -> AppResult<CashRegister> {
    validate_cash(payload.opening_balance, "opening_balance")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    validate_denominations(&payload.denominations)?;

    let mut tx = state.pool().begin().await?;
    if !restaurant::is_authorized_operator(&mut tx, operator, restaurant_id).await? {
        return Err(AppError::unauthorized(format!(
            "Operator {operator} has no access to restaurant {restaurant_id}"
        )));
    }
    let register = open_register_on(&mut tx, operator, restaurant_id, &payload, now_millis()).await?;
    tx.commit().await?;

    state.broadcast_sync(restaurant_id, RESOURCE, "opened", register.id);
    tracing::info!(
        register_id = register.id,
        operator = %operator,
        opening_balance = register.opening_balance,
        "Register opened"
    );
    Ok(register)
}

/// Open-register body, for composing into a larger transaction (check-in).
/// Caller is responsible for authorization and for broadcasting.
pub(crate) async fn open_register_on(
    conn: &mut SqliteConnection,
    operator: Operator,
    restaurant_id: i64,
    payload: &RegisterOpen,
    now: i64,
) -> AppResult<CashRegister> {
    if register::find_open_for_operator(conn, restaurant_id, operator)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(format!(
            "Operator {operator} already has an open register"
        )));
    }

    let register = register::create(
        conn,
        restaurant_id,
        operator,
        payload.opening_balance,
        payload.notes.clone(),
        now,
    )
    .await?;

    if let Some(denominations) = &payload.denominations {
        denomination::upsert(conn, register.id, denominations, now).await?;
    }

    // Seed ledger row for the float; a zero float leaves the ledger empty
    if payload.opening_balance > 0.0 {
        cash_transaction::insert(
            conn,
            register.id,
            TransactionCreate {
                tx_type: TxType::CashIn,
                amount: payload.opening_balance,
                payment_method: PaymentMethod::Cash,
                source: TxSource::Manual,
                description: Some(OPENING_FLOAT_DESCRIPTION.to_string()),
            },
            operator.id(),
            now,
        )
        .await?;
    }

    Ok(register)
}

/// Close a register with a physical cash count.
///
/// Returns the closed register plus a reconciliation summary for
/// receipt/audit display.
pub async fn close_register(
    state: &EngineState,
    operator: Operator,
    register_id: i64,
    payload: RegisterClose,
) -> AppResult<(CashRegister, RegisterCloseSummary)> {
    validate_cash(payload.actual_balance, "actual_balance")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    validate_denominations(&payload.denominations)?;

    let mut tx = state.pool().begin().await?;
    let register = register::find_by_id(&mut tx, register_id)
        .await?
        .filter(|r| {
            r.is_open() && r.opened_by == operator.id() && r.opened_by_kind == operator.kind()
        })
        .ok_or_else(|| {
            AppError::not_found(format!(
                "No open register {register_id} for operator {operator}"
            ))
        })?;
    let restaurant_id = register.restaurant_id;
    let now = now_millis();

    let (register, summary) = settle_register(
        &mut tx,
        register,
        Some(payload.actual_balance),
        payload.notes.clone(),
        operator.id(),
        now,
    )
    .await?;
    if let Some(denominations) = &payload.denominations {
        denomination::upsert(&mut tx, register.id, denominations, now).await?;
    }
    tx.commit().await?;

    state.broadcast_sync(restaurant_id, RESOURCE, "closed", register.id);
    tracing::info!(
        register_id = register.id,
        operator = %operator,
        counted_cash = summary.counted_cash,
        discrepancy = summary.discrepancy.total,
        "Register closed"
    );
    Ok((register, summary))
}

/// System-initiated closure (EOD sweep, stale-shift recovery).
///
/// Nobody is present to count cash, so the counted balance is defined
/// equal to the expected balance and the discrepancy is always zero.
pub async fn force_close_register(
    state: &EngineState,
    register_id: i64,
    reason: &str,
) -> AppResult<CashRegister> {
    let mut tx = state.pool().begin().await?;
    let register = register::find_by_id(&mut tx, register_id)
        .await?
        .filter(|r| r.is_open())
        .ok_or_else(|| {
            AppError::not_found(format!("Register {register_id} not found or already closed"))
        })?;
    let restaurant_id = register.restaurant_id;
    let performed_by = register.opened_by;

    let (register, _) = settle_register(
        &mut tx,
        register,
        None,
        Some(reason.to_string()),
        performed_by,
        now_millis(),
    )
    .await?;
    tx.commit().await?;

    state.broadcast_sync(restaurant_id, RESOURCE, "force_closed", register.id);
    tracing::info!(register_id = register.id, reason, "Register force-closed");
    Ok(register)
}

/// Closing reconciliation, shared by close, force-close, check-out and EOD.
///
/// Reads the full ledger, derives expected balances, appends corrective
/// entries for non-zero per-method discrepancies, and flips the register
/// out of OPEN — all on the caller's transaction. UPI/card cannot be
/// physically counted, so they close at ledger values and only the cash
/// bucket can diverge. `counted_cash = None` marks a forced closure.
pub(crate) async fn settle_register(
    conn: &mut SqliteConnection,
    register: CashRegister,
    counted_cash: Option<f64>,
    closing_notes: Option<String>,
    performed_by: i64,
    now: i64,
) -> AppResult<(CashRegister, RegisterCloseSummary)> {
    let transactions = cash_transaction::find_by_register(conn, register.id).await?;
    let expected = balance::expected_balances(&transactions);

    let forced = counted_cash.is_none();
    let counted = counted_cash.unwrap_or(expected.cash);
    let cash_diff = to_f64(to_decimal(counted) - to_decimal(expected.cash));
    let closing_balance =
        to_f64(to_decimal(counted) + to_decimal(expected.upi) + to_decimal(expected.card));
    let discrepancy = BalanceBreakdown {
        total: cash_diff,
        cash: cash_diff,
        upi: 0.0,
        card: 0.0,
    };

    // Discrepancies become ledger rows, never silent balance overwrites,
    // so Σ(transactions) always equals the recorded closing state.
    let mut appended = 0usize;
    if cash_diff != 0.0 {
        let (tx_type, amount) = if cash_diff > 0.0 {
            (TxType::CashIn, cash_diff)
        } else {
            (TxType::CashOut, -cash_diff)
        };
        cash_transaction::insert(
            conn,
            register.id,
            TransactionCreate {
                tx_type,
                amount,
                payment_method: PaymentMethod::Cash,
                source: TxSource::Manual,
                description: Some(format!("Closing discrepancy adjustment (CASH): {cash_diff:+.2}")),
            },
            performed_by,
            now,
        )
        .await?;
        appended += 1;
    }

    let patch = RegisterClosePatch {
        status: if forced {
            RegisterStatus::ForceClosed
        } else {
            RegisterStatus::Closed
        },
        closing_balance,
        closing_cash_balance: counted,
        closing_upi_balance: expected.upi,
        closing_card_balance: expected.card,
        actual_balance: expected.total,
        discrepancies: serde_json::to_string(&discrepancy)?,
        closing_notes,
        closed_at: now,
    };
    let closed = register::close(conn, register.id, patch).await?;

    let summary = RegisterCloseSummary {
        register_id: closed.id,
        opening: BalanceBreakdown {
            total: closed.opening_balance,
            cash: closed.opening_cash_balance,
            upi: closed.opening_upi_balance,
            card: closed.opening_card_balance,
        },
        expected,
        counted_cash: counted,
        closing_balance,
        discrepancy,
        transaction_count: transactions.len() + appended,
        forced,
    };
    Ok((closed, summary))
}

/// Append one ledger entry to an OPEN register.
///
/// Status check and insert share a transaction, so an entry can never be
/// appended concurrently with that register's close.
pub async fn record_transaction(
    state: &EngineState,
    operator: Operator,
    register_id: i64,
    payload: TransactionCreate,
) -> AppResult<CashTransaction> {
    validate_amount(payload.amount, "amount")?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let mut tx = state.pool().begin().await?;
    let register = register::find_by_id(&mut tx, register_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Register {register_id} not found")))?;
    if !register.is_open() {
        return Err(AppError::conflict(format!(
            "Register {register_id} is already closed"
        )));
    }
    if !restaurant::is_authorized_operator(&mut tx, operator, register.restaurant_id).await? {
        return Err(AppError::unauthorized(format!(
            "Operator {operator} has no access to restaurant {}",
            register.restaurant_id
        )));
    }
    let entry = cash_transaction::insert(&mut tx, register_id, payload, operator.id(), now_millis())
        .await?;
    tx.commit().await?;

    state.broadcast_sync(register.restaurant_id, RESOURCE, "transaction_added", entry.id);
    Ok(entry)
}

/// Live register status: the caller's open register plus every open
/// register of the restaurant, with ledger-derived balances per method.
pub async fn register_status(
    state: &EngineState,
    operator: Operator,
    restaurant_id: i64,
) -> AppResult<RegisterStatusView> {
    let mut conn = state.pool().acquire().await?;
    if !restaurant::is_authorized_operator(&mut conn, operator, restaurant_id).await? {
        return Err(AppError::unauthorized(format!(
            "Operator {operator} has no access to restaurant {restaurant_id}"
        )));
    }

    let open = register::find_open_by_restaurant(&mut conn, restaurant_id).await?;
    let mut views = Vec::with_capacity(open.len());
    for reg in &open {
        let transactions = cash_transaction::find_by_register(&mut conn, reg.id).await?;
        views.push(ActiveRegisterView {
            register_id: reg.id,
            opened_by: reg.opened_by,
            opened_by_kind: reg.opened_by_kind,
            opened_at: reg.opened_at,
            opening_balance: reg.opening_balance,
            balances: balance::expected_balances(&transactions),
        });
    }
    let active = open
        .iter()
        .position(|r| r.opened_by == operator.id() && r.opened_by_kind == operator.kind())
        .map(|i| views[i].clone());

    Ok(RegisterStatusView {
        active,
        open_registers: views,
    })
}

/// Register history for the audit display, newest first
pub async fn register_history(
    state: &EngineState,
    operator: Operator,
    restaurant_id: i64,
    limit: i32,
    offset: i32,
) -> AppResult<Vec<CashRegister>> {
    let mut conn = state.pool().acquire().await?;
    if !restaurant::is_authorized_operator(&mut conn, operator, restaurant_id).await? {
        return Err(AppError::unauthorized(format!(
            "Operator {operator} has no access to restaurant {restaurant_id}"
        )));
    }
    Ok(register::find_by_restaurant(&mut conn, restaurant_id, limit, offset).await?)
}
