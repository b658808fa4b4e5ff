//! Monthly compensation aggregation.
//!
//! Builds a [`PayrollRecord`] from a driver's completed sessions, freight
//! revenue and fuel expenses for one month. Pure: the caller loads the inputs
//! and persists the result.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::compliance::thresholds::normal_minutes;
use crate::config::CompensationConfig;
use crate::models::{
    AuditStep, AuditTrace, FreightRevenue, FuelExpense, PayrollPeriod, PayrollRecord,
    PayrollStatus, WorkSession,
};

use super::gratification::calculate_gratification;
use super::hourly_pay::{PayKind, calculate_hourly_pay};

/// Minutes accumulated across a month's sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyMinutes {
    /// Normal journey minutes, capped per session.
    pub normal: i64,
    /// Overtime minutes as stored on each session.
    pub overtime: i64,
    /// Waiting minutes.
    pub waiting: i64,
}

/// Sums the paid minutes of a month's sessions.
///
/// Normal minutes are capped at the normal journey per session; overtime is
/// read from the session's stored overtime field.
pub fn accumulate_minutes(sessions: &[WorkSession]) -> MonthlyMinutes {
    sessions
        .iter()
        .fold(MonthlyMinutes::default(), |mut acc, session| {
            acc.normal += normal_minutes(session.totals.total_worked_minutes);
            acc.overtime += session.overtime_minutes.max(0);
            acc.waiting += session.totals.total_waiting_minutes.max(0);
            acc
        })
}

/// A computed statement and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollComputation {
    /// The statement, in status `computed`.
    pub record: PayrollRecord,
    /// The calculation steps.
    pub audit_trace: AuditTrace,
}

/// Computes a driver's statement for one month.
///
/// `sessions` must be the driver's completed sessions starting in the
/// period; `revenue` the entries linked to those sessions; `fuel` the
/// driver's expenses in the period.
pub fn compute_payroll(
    driver_id: &str,
    period: PayrollPeriod,
    sessions: &[WorkSession],
    revenue: &[FreightRevenue],
    fuel: &[FuelExpense],
    config: &CompensationConfig,
    now: DateTime<Utc>,
) -> PayrollComputation {
    let started = Instant::now();
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut step_number: u32 = 1;

    let minutes = accumulate_minutes(sessions);
    steps.push(AuditStep {
        step_number,
        rule_id: "monthly_minutes".to_string(),
        rule_name: "Monthly Minute Accumulation".to_string(),
        legal_ref: crate::compliance::thresholds::JOURNEY_REF.to_string(),
        input: serde_json::json!({
            "period": period.to_string(),
            "sessions": sessions.len()
        }),
        output: serde_json::json!({
            "normal_minutes": minutes.normal,
            "overtime_minutes": minutes.overtime,
            "waiting_minutes": minutes.waiting
        }),
        reasoning: format!(
            "{} completed session(s): {} normal, {} overtime, {} waiting minutes",
            sessions.len(),
            minutes.normal,
            minutes.overtime,
            minutes.waiting
        ),
    });
    step_number += 1;

    let rates = &config.hourly_rates;
    let mut price = |kind: PayKind, minutes: i64, rate: Decimal| {
        let result = calculate_hourly_pay(kind, minutes, rate, step_number);
        steps.push(result.audit_step);
        step_number += 1;
        result.component
    };
    let normal = price(PayKind::Normal, minutes.normal, rates.normal);
    let overtime = price(PayKind::Overtime, minutes.overtime, rates.overtime);
    let waiting = price(PayKind::Waiting, minutes.waiting, rates.waiting);

    let total_freight_revenue: Decimal = revenue.iter().map(|r| r.amount).sum();
    let total_fuel: Decimal = fuel.iter().map(|f| f.amount).sum();

    let gratification = calculate_gratification(
        total_freight_revenue,
        config.levy_percent,
        total_fuel,
        config.bonus_percent,
        step_number,
    );
    steps.push(gratification.audit_step);

    let gross_total = config.base_salary
        + normal.amount
        + overtime.amount
        + waiting.amount
        + gratification.bonus;

    let record = PayrollRecord {
        id: Uuid::new_v4(),
        driver_id: driver_id.to_string(),
        month: period.month,
        year: period.year,
        session_count: sessions.len(),
        normal,
        overtime,
        waiting,
        base_salary: config.base_salary,
        total_freight_revenue,
        total_fuel,
        levy_amount: gratification.levy,
        bonus_base: gratification.bonus_base,
        bonus_amount: gratification.bonus,
        gross_total,
        net_total: gross_total,
        status: PayrollStatus::Computed,
        levy_percent: config.levy_percent,
        bonus_percent: config.bonus_percent,
        config_effective_date: config.effective_date,
        computed_at: now,
    };

    PayrollComputation {
        record,
        audit_trace: AuditTrace {
            steps,
            warnings: Vec::new(),
            duration_us: started.elapsed().as_micros() as u64,
        },
    }
}
