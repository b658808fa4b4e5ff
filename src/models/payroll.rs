//! Payroll models.
//!
//! This module defines the monthly [`PayrollRecord`] statement, the
//! [`PayrollPeriod`] it covers and its forward-only [`PayrollStatus`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Earliest year accepted for a payroll period.
pub const MIN_PAYROLL_YEAR: i32 = 2000;

/// Latest year accepted for a payroll period.
pub const MAX_PAYROLL_YEAR: i32 = 2100;

/// A calendar month for which payroll is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Month, 1 to 12.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
}

impl PayrollPeriod {
    /// Creates a period, rejecting months outside 1 to 12 and implausible years.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleet_compliance_engine::models::PayrollPeriod;
    ///
    /// assert!(PayrollPeriod::new(3, 2025).is_ok());
    /// assert!(PayrollPeriod::new(13, 2025).is_err());
    /// ```
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) || !(MIN_PAYROLL_YEAR..=MAX_PAYROLL_YEAR).contains(&year) {
            return Err(EngineError::InvalidPeriod { month, year });
        }
        Ok(Self { month, year })
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // Validated in `new`; the fallback is unreachable for constructed periods.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The first day of the following month.
    pub fn next_first_day(&self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
    }

    /// The half-open UTC interval `[start, end)` covering the month.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.from_utc_datetime(&self.first_day().and_time(chrono::NaiveTime::MIN));
        let end = Utc.from_utc_datetime(&self.next_first_day().and_time(chrono::NaiveTime::MIN));
        (start, end)
    }

    /// Returns true if the instant falls inside the month.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds();
        instant >= start && instant < end
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Payroll record status. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Produced by the aggregator.
    Computed,
    /// Reviewed and approved.
    Approved,
    /// Paid out.
    Paid,
}

impl PayrollStatus {
    /// Returns the string representation for storage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Computed => "computed",
            Self::Approved => "approved",
            Self::Paid => "paid",
        }
    }

    /// The status that follows this one, if any.
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Computed => Some(Self::Approved),
            Self::Approved => Some(Self::Paid),
            Self::Paid => None,
        }
    }

    /// Validates a move to `target`. Only the immediate next status is allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleet_compliance_engine::models::PayrollStatus;
    ///
    /// assert!(PayrollStatus::Computed.transition(PayrollStatus::Approved).is_ok());
    /// assert!(PayrollStatus::Paid.transition(PayrollStatus::Computed).is_err());
    /// ```
    pub fn transition(self, target: Self) -> EngineResult<Self> {
        if self.next() == Some(target) {
            Ok(target)
        } else {
            Err(EngineError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayrollStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "computed" => Ok(Self::Computed),
            "approved" => Ok(Self::Approved),
            "paid" => Ok(Self::Paid),
            _ => Err(format!("invalid payroll status: {s}")),
        }
    }
}

/// One time-based pay component of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayComponent {
    /// Minutes accumulated across the month's sessions.
    pub minutes: i64,
    /// The same quantity in hours, to 2 decimal places.
    pub hours: Decimal,
    /// Hourly rate snapshotted from the compensation config.
    pub rate: Decimal,
    /// Amount paid for this component.
    pub amount: Decimal,
}

/// One driver's compensation statement for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The driver being paid.
    pub driver_id: String,
    /// Month of the period.
    pub month: u32,
    /// Year of the period.
    pub year: i32,
    /// Completed sessions included in the statement.
    pub session_count: usize,
    /// Normal journey pay.
    pub normal: PayComponent,
    /// Overtime pay.
    pub overtime: PayComponent,
    /// Waiting-time pay.
    pub waiting: PayComponent,
    /// Fixed monthly salary.
    pub base_salary: Decimal,
    /// Freight revenue linked to the period's sessions.
    pub total_freight_revenue: Decimal,
    /// Fuel expense of the driver in the period.
    pub total_fuel: Decimal,
    /// Freight levy deducted from revenue.
    pub levy_amount: Decimal,
    /// Revenue net of levy and fuel, floored at zero.
    pub bonus_base: Decimal,
    /// Gratification paid.
    pub bonus_amount: Decimal,
    /// Base salary plus every pay component plus bonus.
    pub gross_total: Decimal,
    /// Equal to gross; withholding is handled outside this engine.
    pub net_total: Decimal,
    /// Lifecycle state.
    pub status: PayrollStatus,
    /// Levy percentage snapshotted from the config.
    pub levy_percent: Decimal,
    /// Bonus percentage snapshotted from the config.
    pub bonus_percent: Decimal,
    /// Effective date of the config used.
    pub config_effective_date: NaiveDate,
    /// When the statement was produced.
    pub computed_at: DateTime<Utc>,
}

impl PayrollRecord {
    /// The period this statement covers.
    pub fn period(&self) -> PayrollPeriod {
        PayrollPeriod {
            month: self.month,
            year: self.year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_rejects_month_zero_and_thirteen() {
        assert!(matches!(
            PayrollPeriod::new(0, 2025),
            Err(EngineError::InvalidPeriod { month: 0, year: 2025 })
        ));
        assert!(PayrollPeriod::new(13, 2025).is_err());
        assert!(PayrollPeriod::new(12, 2025).is_ok());
    }

    #[test]
    fn test_period_rejects_implausible_year() {
        assert!(PayrollPeriod::new(1, 1999).is_err());
        assert!(PayrollPeriod::new(1, 2101).is_err());
    }

    #[test]
    fn test_december_bounds_roll_into_next_year() {
        let period = PayrollPeriod::new(12, 2025).unwrap();
        let (start, end) = period.bounds();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_contains_is_half_open() {
        let period = PayrollPeriod::new(2, 2024).unwrap();
        assert!(period.contains(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
        assert!(period.contains(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
        assert!(!period.contains(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_period_display() {
        assert_eq!(PayrollPeriod::new(3, 2025).unwrap().to_string(), "03/2025");
    }

    #[test]
    fn test_status_moves_forward_one_step() {
        assert_eq!(
            PayrollStatus::Computed.transition(PayrollStatus::Approved).unwrap(),
            PayrollStatus::Approved
        );
        assert_eq!(
            PayrollStatus::Approved.transition(PayrollStatus::Paid).unwrap(),
            PayrollStatus::Paid
        );
    }

    #[test]
    fn test_status_rejects_backwards_skips_and_repeats() {
        assert!(PayrollStatus::Approved.transition(PayrollStatus::Computed).is_err());
        assert!(PayrollStatus::Computed.transition(PayrollStatus::Paid).is_err());
        assert!(PayrollStatus::Paid.transition(PayrollStatus::Paid).is_err());
    }
}
