//! End-of-day sweep (日结扫描)
//!
//! At the business-day cutoff every restaurant gets swept: dangling ACTIVE
//! check-ins are force-closed and every still-open register is settled with
//! zero discrepancy. The sweep is idempotent; a second pass over an already
//! clean restaurant closes nothing.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use shared::util::now_millis;

use crate::core::EngineState;
use crate::db::repository::{check_in, register, restaurant};
use crate::services::registers;
use crate::utils::{time, AppError, AppResult};

/// Note recorded on check-ins and registers closed by the sweep
pub const EOD_NOTE: &str = "Auto-closed during EOD process";

/// Per-restaurant sweep result
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EodReport {
    pub closed_check_ins: u32,
    pub closed_registers: u32,
}

/// Aggregate result of one sweep pass over all restaurants
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EodSweepSummary {
    pub restaurants: u32,
    pub closed_check_ins: u32,
    pub closed_registers: u32,
    pub failures: u32,
}

/// Force-close everything left open for one restaurant, in one transaction.
pub async fn process_end_of_day(
    state: &EngineState,
    restaurant_id: i64,
) -> AppResult<EodReport> {
    let mut tx = state.pool().begin().await?;
    restaurant::find_by_id(&mut tx, restaurant_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Restaurant {restaurant_id} not found")))?;
    let now = now_millis();

    let dangling = check_in::find_active_by_restaurant(&mut tx, restaurant_id).await?;
    for record in &dangling {
        check_in::force_close(&mut tx, record.id, EOD_NOTE, now).await?;
    }

    let open = register::find_open_by_restaurant(&mut tx, restaurant_id).await?;
    for reg in &open {
        let performed_by = reg.opened_by;
        registers::settle_register(
            &mut tx,
            reg.clone(),
            None,
            Some(EOD_NOTE.to_string()),
            performed_by,
            now,
        )
        .await?;
    }
    tx.commit().await?;

    for record in &dangling {
        state.broadcast_sync(restaurant_id, "check_in", "force_closed", record.id);
    }
    for reg in &open {
        state.broadcast_sync(restaurant_id, "register", "force_closed", reg.id);
    }

    let report = EodReport {
        closed_check_ins: dangling.len() as u32,
        closed_registers: open.len() as u32,
    };
    if report.closed_check_ins > 0 || report.closed_registers > 0 {
        tracing::info!(
            restaurant_id,
            closed_check_ins = report.closed_check_ins,
            closed_registers = report.closed_registers,
            "EOD sweep closed leftovers"
        );
    }
    Ok(report)
}

/// Sweep every restaurant. One restaurant failing must not block the rest,
/// so errors are logged and counted instead of propagated.
pub async fn sweep_all(state: &EngineState) -> EodSweepSummary {
    let restaurants = {
        let mut conn = match state.pool().acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!("EOD sweep cannot acquire connection: {}", e);
                return EodSweepSummary {
                    failures: 1,
                    ..Default::default()
                };
            }
        };
        match restaurant::find_all(&mut conn).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("EOD sweep cannot enumerate restaurants: {}", e);
                return EodSweepSummary {
                    failures: 1,
                    ..Default::default()
                };
            }
        }
    };

    let mut summary = EodSweepSummary::default();
    for rest in restaurants {
        match process_end_of_day(state, rest.id).await {
            Ok(report) => {
                summary.restaurants += 1;
                summary.closed_check_ins += report.closed_check_ins;
                summary.closed_registers += report.closed_registers;
            }
            Err(e) => {
                summary.failures += 1;
                tracing::error!(restaurant_id = rest.id, "EOD sweep failed: {}", e);
            }
        }
    }
    summary
}

/// 日结调度器
///
/// Sleeps until the configured cutoff, runs one sweep pass, re-arms for the
/// next day. Wakes early on config change to recalculate the trigger time.
pub struct EodScheduler {
    state: EngineState,
    shutdown: CancellationToken,
}

impl EodScheduler {
    pub fn new(state: EngineState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    pub async fn run(self) {
        tracing::info!("EOD scheduler started");
        loop {
            let cutoff = time::parse_cutoff(&self.state.config.eod_cutoff);
            let tz = self.state.config.timezone;
            let sleep_duration = time::duration_until_next_cutoff(cutoff, tz);
            tracing::info!(
                "Next EOD sweep in {} minutes (cutoff {} {})",
                sleep_duration.as_secs() / 60,
                cutoff.format("%H:%M"),
                tz.name()
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {
                    let summary = sweep_all(&self.state).await;
                    tracing::info!(
                        restaurants = summary.restaurants,
                        closed_check_ins = summary.closed_check_ins,
                        closed_registers = summary.closed_registers,
                        failures = summary.failures,
                        "EOD sweep pass finished"
                    );
                }
                _ = self.state.config_notify.notified() => {
                    tracing::info!("Config changed, recalculating next EOD cutoff");
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("EOD scheduler received shutdown signal");
                    return;
                }
            }
        }
    }
}
