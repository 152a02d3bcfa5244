//! Staff shift service (员工上下班打卡)
//!
//! Check-in opens a register for the staff member; check-out counts the
//! drawer and closes it. A staff member who never checked out gets their
//! dangling shift and register settled automatically at the next check-in,
//! so every day starts from a clean state.

use serde::Serialize;

use shared::models::{
    CashRegister, CheckInRecord, Operator, RegisterCloseSummary, RegisterOpen, ShiftCheckIn,
    ShiftCheckOut,
};
use shared::util::now_millis;

use crate::core::EngineState;
use crate::db::repository::{check_in, denomination, register, restaurant};
use crate::services::registers;
use crate::utils::time;
use crate::utils::validation::{
    MAX_NOTE_LEN, validate_cash, validate_denominations, validate_optional_text,
};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "check_in";

/// Note recorded on shifts (and their registers) settled automatically
/// because the staff member never checked out.
pub const STALE_SHIFT_NOTE: &str = "auto-closed due to missing checkout";

#[derive(Debug, Clone, Serialize)]
pub struct CheckInOutcome {
    pub check_in: CheckInRecord,
    pub register: CashRegister,
    /// The prior-day shift that was force-closed on the way in, if any
    pub recovered_check_in: Option<CheckInRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutOutcome {
    pub check_in: CheckInRecord,
    pub register: CashRegister,
    pub summary: RegisterCloseSummary,
}

/// Staff check-in: settle any dangling prior-day shift, then open a fresh
/// register and an ACTIVE check-in record, all in one transaction.
pub async fn check_in(
    state: &EngineState,
    staff_id: i64,
    restaurant_id: i64,
    payload: ShiftCheckIn,
) -> AppResult<CheckInOutcome> {
    validate_cash(payload.opening_balance, "opening_balance")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    validate_denominations(&payload.denominations)?;

    let mut tx = state.pool().begin().await?;
    let staff = restaurant::find_staff(&mut tx, staff_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff {staff_id} not found")))?;
    if staff.restaurant_id != restaurant_id || !staff.active {
        return Err(AppError::unauthorized(format!(
            "Staff {staff_id} is not an active member of restaurant {restaurant_id}"
        )));
    }
    let rest = restaurant::find_by_id(&mut tx, restaurant_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {restaurant_id} not found")))?;
    let tz = time::parse_timezone(&rest.timezone, state.config.timezone);
    let cutoff = time::parse_cutoff(&rest.business_day_cutoff);
    let today = time::current_business_date_string(cutoff, tz);
    let now = now_millis();

    // Dangling shift handling: same business day is a hard conflict, a
    // prior-day leftover gets settled here and the check-in proceeds.
    let mut recovered = None;
    if let Some(active) = check_in::find_active_by_staff(&mut tx, staff_id).await? {
        if active.date == today {
            return Err(AppError::conflict(format!(
                "Staff {staff_id} is already checked in for {today}"
            )));
        }
        tracing::warn!(
            staff_id,
            check_in_id = active.id,
            date = %active.date,
            "Recovering shift with missing checkout"
        );
        let closed = check_in::force_close(&mut tx, active.id, STALE_SHIFT_NOTE, now).await?;
        if let Some(register_id) = active.register_id {
            let reg = register::find_by_id(&mut tx, register_id).await?;
            if let Some(reg) = reg.filter(|r| r.is_open()) {
                registers::settle_register(
                    &mut tx,
                    reg,
                    None,
                    Some(STALE_SHIFT_NOTE.to_string()),
                    staff_id,
                    now,
                )
                .await?;
            }
        }
        recovered = Some(closed);
    }

    // Defensive cross-restaurant check; open_register_on enforces the
    // per-restaurant invariant on its own
    if let Some(reg) = register::find_open_for_staff(&mut tx, staff_id).await? {
        return Err(AppError::conflict(format!(
            "Staff {staff_id} already owns open register {}",
            reg.id
        )));
    }

    let register = registers::open_register_on(
        &mut tx,
        Operator::Staff(staff_id),
        restaurant_id,
        &RegisterOpen {
            opening_balance: payload.opening_balance,
            notes: payload.notes.clone(),
            denominations: payload.denominations,
        },
        now,
    )
    .await?;

    let record = match check_in::find_stale_for_date(&mut tx, staff_id, &today).await? {
        Some(stale) => {
            check_in::recycle(&mut tx, stale.id, register.id, &today, payload.notes, now).await?
        }
        None => check_in::create(&mut tx, staff_id, register.id, &today, payload.notes, now).await?,
    };
    tx.commit().await?;

    if let Some(old) = &recovered {
        state.broadcast_sync(restaurant_id, RESOURCE, "force_closed", old.id);
        if let Some(old_register) = old.register_id {
            state.broadcast_sync(restaurant_id, "register", "force_closed", old_register);
        }
    }
    state.broadcast_sync(restaurant_id, "register", "opened", register.id);
    state.broadcast_sync(restaurant_id, RESOURCE, "created", record.id);
    tracing::info!(
        staff_id,
        check_in_id = record.id,
        register_id = register.id,
        date = %record.date,
        "Staff checked in"
    );
    Ok(CheckInOutcome {
        check_in: record,
        register,
        recovered_check_in: recovered,
    })
}

/// Staff check-out: count the drawer, close the bound register and complete
/// the check-in, returning the combined reconciliation summary.
pub async fn check_out(
    state: &EngineState,
    staff_id: i64,
    payload: ShiftCheckOut,
) -> AppResult<CheckOutOutcome> {
    validate_cash(payload.actual_balance, "actual_balance")?;
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
    validate_denominations(&payload.denominations)?;

    let mut tx = state.pool().begin().await?;
    let active = check_in::find_active_by_staff(&mut tx, staff_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No active check-in for staff {staff_id}")))?;
    let register_id = active.register_id.ok_or_else(|| {
        AppError::internal(format!("Check-in {} has no register bound", active.id))
    })?;
    let reg = register::find_by_id(&mut tx, register_id)
        .await?
        .filter(|r| r.is_open())
        .ok_or_else(|| {
            AppError::conflict(format!("Register {register_id} is already closed"))
        })?;
    let restaurant_id = reg.restaurant_id;
    let now = now_millis();

    let (register, summary) = registers::settle_register(
        &mut tx,
        reg,
        Some(payload.actual_balance),
        payload.notes.clone(),
        staff_id,
        now,
    )
    .await?;
    if let Some(denominations) = &payload.denominations {
        denomination::upsert(&mut tx, register.id, denominations, now).await?;
    }
    let record = check_in::complete(&mut tx, active.id, payload.notes, now).await?;
    tx.commit().await?;

    state.broadcast_sync(restaurant_id, "register", "closed", register.id);
    state.broadcast_sync(restaurant_id, RESOURCE, "completed", record.id);
    tracing::info!(
        staff_id,
        check_in_id = record.id,
        register_id = register.id,
        discrepancy = summary.discrepancy.total,
        "Staff checked out"
    );
    Ok(CheckOutOutcome {
        check_in: record,
        register,
        summary,
    })
}

/// The staff member's current shift, if any
pub async fn current_shift(
    state: &EngineState,
    staff_id: i64,
) -> AppResult<Option<CheckInRecord>> {
    let mut conn = state.pool().acquire().await?;
    Ok(check_in::find_active_by_staff(&mut conn, staff_id).await?)
}
