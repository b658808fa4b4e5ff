//! Minute-based pay components.

use rust_decimal::Decimal;

use crate::compliance::thresholds::JOURNEY_REF;
use crate::models::{AuditStep, PayComponent};

use super::round_money;

/// Reference for waiting-time pay.
pub const WAITING_TIME_REF: &str = "CLT art. 235-C §9";

/// Which kind of minutes a component pays for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayKind {
    /// Normal journey minutes.
    Normal,
    /// Minutes beyond the normal journey.
    Overtime,
    /// Waiting minutes.
    Waiting,
}

impl PayKind {
    /// Returns the identifier used in audit steps.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal_pay",
            Self::Overtime => "overtime_pay",
            Self::Waiting => "waiting_pay",
        }
    }

    const fn rule_name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal Journey Pay",
            Self::Overtime => "Overtime Pay",
            Self::Waiting => "Waiting Time Pay",
        }
    }

    const fn legal_ref(&self) -> &'static str {
        match self {
            Self::Normal | Self::Overtime => JOURNEY_REF,
            Self::Waiting => WAITING_TIME_REF,
        }
    }
}

/// The result of pricing one kind of minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyPayResult {
    /// The priced component.
    pub component: PayComponent,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Converts minutes to an amount at an hourly rate.
///
/// `amount = minutes / 60 × rate`, computed from the exact minutes and
/// rounded to cents. Hours are reported to 2 decimal places.
///
/// # Examples
///
/// ```
/// use fleet_compliance_engine::payroll::{PayKind, calculate_hourly_pay};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_hourly_pay(PayKind::Overtime, 270, Decimal::from_str("22.50").unwrap(), 1);
/// assert_eq!(result.component.hours, Decimal::from_str("4.50").unwrap());
/// assert_eq!(result.component.amount, Decimal::from_str("101.25").unwrap());
/// ```
pub fn calculate_hourly_pay(
    kind: PayKind,
    minutes: i64,
    rate: Decimal,
    step_number: u32,
) -> HourlyPayResult {
    let minutes = minutes.max(0);
    let exact_hours = Decimal::from(minutes) / Decimal::from(60);
    let hours = round_money(exact_hours);
    let amount = round_money(exact_hours * rate);

    HourlyPayResult {
        audit_step: AuditStep {
            step_number,
            rule_id: kind.as_str().to_string(),
            rule_name: kind.rule_name().to_string(),
            legal_ref: kind.legal_ref().to_string(),
            input: serde_json::json!({
                "minutes": minutes,
                "rate": rate.to_string()
            }),
            output: serde_json::json!({
                "hours": hours.to_string(),
                "amount": amount.to_string()
            }),
            reasoning: format!(
                "{} minutes ({} h) x {} per hour = {}",
                minutes,
                hours,
                rate.normalize(),
                amount
            ),
        },
        component: PayComponent {
            minutes,
            hours,
            rate,
            amount,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_full_hours() {
        let result = calculate_hourly_pay(PayKind::Normal, 480, dec("15.00"), 1);
        assert_eq!(result.component.hours, dec("8.00"));
        assert_eq!(result.component.amount, dec("120.00"));
        assert_eq!(result.audit_step.rule_id, "normal_pay");
    }

    #[test]
    fn test_amount_uses_exact_minutes() {
        // 10 minutes = 0.1666.. h; rounded hours would give 2.55
        let result = calculate_hourly_pay(PayKind::Waiting, 10, dec("15.00"), 1);
        assert_eq!(result.component.hours, dec("0.17"));
        assert_eq!(result.component.amount, dec("2.50"));
    }

    #[test]
    fn test_zero_minutes_pay_nothing() {
        let result = calculate_hourly_pay(PayKind::Overtime, 0, dec("22.50"), 1);
        assert_eq!(result.component.amount, Decimal::ZERO);
        assert_eq!(result.component.minutes, 0);
    }

    #[test]
    fn test_waiting_cites_waiting_time_rule() {
        let result = calculate_hourly_pay(PayKind::Waiting, 60, dec("4.50"), 3);
        assert_eq!(result.audit_step.legal_ref, WAITING_TIME_REF);
        assert_eq!(result.audit_step.step_number, 3);
    }
}
