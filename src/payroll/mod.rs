//! Monthly compensation.
//!
//! This module turns a driver's completed sessions, freight revenue and fuel
//! expenses into a [`PayrollRecord`](crate::models::PayrollRecord): minute
//! based pay, the freight gratification and the totals. Every amount is a
//! [`Decimal`] rounded to cents.

mod aggregator;
mod gratification;
mod hourly_pay;
mod service;

use rust_decimal::{Decimal, RoundingStrategy};

pub use aggregator::{MonthlyMinutes, PayrollComputation, accumulate_minutes, compute_payroll};
pub use gratification::{GRATIFICATION_REF, Gratification, calculate_gratification};
pub use hourly_pay::{HourlyPayResult, PayKind, WAITING_TIME_REF, calculate_hourly_pay};
pub use service::{
    DriverPayrollResult, DriverPayrollStatus, PayrollRunReport, SKIP_ALREADY_EXISTS,
    SKIP_NO_COMPLETED_SESSIONS, advance_payroll_status, aggregate_driver_payroll,
    run_payroll_aggregation,
};

/// Rounds a monetary amount to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
