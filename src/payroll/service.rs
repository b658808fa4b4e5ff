//! Payroll runs against the store.
//!
//! A run covers one month and either a single driver or every driver with a
//! completed session in that month. Each driver is handled independently: a
//! failure for one is recorded and the run carries on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{CompensationConfig, ConfigLoader};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, PayrollPeriod, PayrollRecord, PayrollStatus, RunOutcome};
use crate::store::{InsertOutcome, WorkStore};

use super::aggregator::compute_payroll;

/// What happened to one driver in a payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverPayrollStatus {
    /// A new statement was stored.
    Created,
    /// Nothing was written for the driver.
    Skipped,
    /// The driver's statement could not be produced.
    Failed,
}

/// Why a driver was skipped.
pub const SKIP_ALREADY_EXISTS: &str = "already_exists";
/// Why a driver was skipped.
pub const SKIP_NO_COMPLETED_SESSIONS: &str = "no_completed_sessions";

/// The per-driver entry of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverPayrollResult {
    /// The driver.
    pub driver_id: String,
    /// What happened.
    pub status: DriverPayrollStatus,
    /// The stored statement, when one was created.
    pub payroll_record: Option<PayrollRecord>,
    /// Skip reason or failure message.
    pub reason: Option<String>,
    /// For failures, whether retrying the driver may succeed.
    pub retryable: bool,
    /// How the statement was calculated, when one was created.
    pub audit_trace: Option<AuditTrace>,
}

impl DriverPayrollResult {
    fn skipped(driver_id: &str, reason: &str) -> Self {
        Self {
            driver_id: driver_id.to_string(),
            status: DriverPayrollStatus::Skipped,
            payroll_record: None,
            reason: Some(reason.to_string()),
            retryable: false,
            audit_trace: None,
        }
    }

    fn failed(driver_id: &str, error: &EngineError) -> Self {
        Self {
            driver_id: driver_id.to_string(),
            status: DriverPayrollStatus::Failed,
            payroll_record: None,
            reason: Some(error.to_string()),
            retryable: error.is_retryable(),
            audit_trace: None,
        }
    }
}

/// The summary of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollRunReport {
    /// The month covered.
    pub period: PayrollPeriod,
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Statements created.
    pub processed: usize,
    /// Drivers skipped.
    pub skipped: usize,
    /// Drivers that failed.
    pub failed: usize,
    /// One entry per driver, sorted by driver ID.
    pub results: Vec<DriverPayrollResult>,
}

/// Produces and stores one driver's statement for a month.
///
/// Skips when a statement already exists or the driver has no completed
/// session in the month. The existence check is only a shortcut; the store's
/// uniqueness constraint decides when two runs race.
pub fn aggregate_driver_payroll(
    store: &dyn WorkStore,
    config: &CompensationConfig,
    driver_id: &str,
    period: PayrollPeriod,
    now: DateTime<Utc>,
) -> EngineResult<DriverPayrollResult> {
    if store.payroll_record(driver_id, period)?.is_some() {
        debug!(driver_id = %driver_id, period = %period, "Payroll already exists");
        return Ok(DriverPayrollResult::skipped(driver_id, SKIP_ALREADY_EXISTS));
    }

    let sessions = store.completed_sessions(driver_id, period)?;
    if sessions.is_empty() {
        return Ok(DriverPayrollResult::skipped(
            driver_id,
            SKIP_NO_COMPLETED_SESSIONS,
        ));
    }

    let session_ids: Vec<String> = sessions.iter().map(|s| s.id.clone()).collect();
    let revenue = store.freight_revenue_for_sessions(&session_ids)?;
    let fuel = store.fuel_expenses(driver_id, period)?;

    let computation = compute_payroll(driver_id, period, &sessions, &revenue, &fuel, config, now);

    match store.insert_payroll(&computation.record)? {
        InsertOutcome::Inserted => {
            info!(
                driver_id = %driver_id,
                period = %period,
                sessions = sessions.len(),
                gross_total = %computation.record.gross_total,
                "Payroll computed"
            );
            Ok(DriverPayrollResult {
                driver_id: driver_id.to_string(),
                status: DriverPayrollStatus::Created,
                payroll_record: Some(computation.record),
                reason: None,
                retryable: false,
                audit_trace: Some(computation.audit_trace),
            })
        }
        InsertOutcome::AlreadyExists => {
            debug!(driver_id = %driver_id, period = %period, "Payroll inserted concurrently");
            Ok(DriverPayrollResult::skipped(driver_id, SKIP_ALREADY_EXISTS))
        }
    }
}

/// Runs payroll for a month.
///
/// With `driver_id`, only that driver is processed and an unknown driver is
/// an error. Without it, every driver with a completed session in the month
/// is processed. Per-driver failures are collected in the report.
pub fn run_payroll_aggregation(
    store: &dyn WorkStore,
    config: &ConfigLoader,
    period: PayrollPeriod,
    driver_id: Option<&str>,
    now: DateTime<Utc>,
) -> EngineResult<PayrollRunReport> {
    let driver_id = driver_id.map(str::trim);
    if driver_id == Some("") {
        return Err(EngineError::InvalidRequest {
            field: "driverId".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    let compensation = config.compensation_for_period(period)?;

    let drivers = match driver_id {
        Some(id) => {
            if !store.driver_exists(id)? {
                return Err(EngineError::DriverNotFound {
                    driver_id: id.to_string(),
                });
            }
            vec![id.to_string()]
        }
        None => store.drivers_with_completed_sessions(period)?,
    };

    let mut results = Vec::with_capacity(drivers.len());
    for driver in &drivers {
        let result = aggregate_driver_payroll(store, compensation, driver, period, now)
            .unwrap_or_else(|err| {
                warn!(
                    driver_id = %driver,
                    period = %period,
                    error = %err,
                    "Payroll failed for driver"
                );
                DriverPayrollResult::failed(driver, &err)
            });
        results.push(result);
    }

    let count = |status: DriverPayrollStatus| results.iter().filter(|r| r.status == status).count();
    let processed = count(DriverPayrollStatus::Created);
    let skipped = count(DriverPayrollStatus::Skipped);
    let failed = count(DriverPayrollStatus::Failed);
    let outcome = RunOutcome::from_counts(processed, failed);

    info!(
        period = %period,
        drivers = drivers.len(),
        processed,
        skipped,
        failed,
        outcome = %outcome,
        "Payroll run finished"
    );

    Ok(PayrollRunReport {
        period,
        outcome,
        processed,
        skipped,
        failed,
        results,
    })
}

/// Moves a statement to the next status.
///
/// Only `computed → approved` and `approved → paid` are allowed. If another
/// caller changed the status first, the move is rejected against the status
/// found in the store.
pub fn advance_payroll_status(
    store: &dyn WorkStore,
    payroll_id: Uuid,
    target: PayrollStatus,
) -> EngineResult<PayrollRecord> {
    let not_found = || EngineError::PayrollNotFound {
        payroll_id: payroll_id.to_string(),
    };

    let record = store.payroll_record_by_id(payroll_id)?.ok_or_else(not_found)?;
    let current = record.status;
    current.transition(target)?;

    if !store.advance_payroll_status(payroll_id, current, target)? {
        let latest = store.payroll_record_by_id(payroll_id)?.ok_or_else(not_found)?;
        return Err(EngineError::InvalidStatusTransition {
            from: latest.status.as_str().to_string(),
            to: target.as_str().to_string(),
        });
    }

    info!(
        payroll_id = %payroll_id,
        driver_id = %record.driver_id,
        from = %current,
        to = %target,
        "Payroll status advanced"
    );

    Ok(PayrollRecord {
        status: target,
        ..record
    })
}
