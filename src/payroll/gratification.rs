//! Gratification (freight bonus) calculation.
//!
//! The bonus is a share of freight revenue after the freight levy and the
//! driver's fuel cost have been taken out:
//!
//! ```text
//! levy       = revenue × levy%
//! bonus_base = max(0, revenue − levy − fuel)
//! bonus      = bonus_base × bonus%
//! ```

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::round_money;

/// Reference for the bonus formula.
pub const GRATIFICATION_REF: &str = "Fleet compensation policy, freight gratification";

/// The result of calculating the gratification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gratification {
    /// Levy withheld from revenue.
    pub levy: Decimal,
    /// Revenue net of levy and fuel, floored at zero.
    pub bonus_base: Decimal,
    /// Bonus paid.
    pub bonus: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the freight gratification.
///
/// Amounts are rounded to cents. Zero revenue yields a zero bonus, and more
/// fuel never increases the bonus.
///
/// # Examples
///
/// ```
/// use fleet_compliance_engine::payroll::calculate_gratification;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let result = calculate_gratification(dec("10000"), dec("0.17"), dec("2000"), dec("0.03"), 1);
///
/// assert_eq!(result.levy, dec("1700.00"));
/// assert_eq!(result.bonus_base, dec("6300.00"));
/// assert_eq!(result.bonus, dec("189.00"));
/// ```
pub fn calculate_gratification(
    revenue: Decimal,
    levy_percent: Decimal,
    fuel: Decimal,
    bonus_percent: Decimal,
    step_number: u32,
) -> Gratification {
    let levy = round_money(revenue * levy_percent);
    let bonus_base = round_money((revenue - levy - fuel).max(Decimal::ZERO));
    let bonus = round_money(bonus_base * bonus_percent);

    let reasoning = if bonus_base.is_zero() {
        format!(
            "Revenue {} less levy {} and fuel {} leaves nothing to share, no bonus",
            revenue.normalize(),
            levy.normalize(),
            fuel.normalize()
        )
    } else {
        format!(
            "({} - {} levy - {} fuel) x {} = {}",
            revenue.normalize(),
            levy.normalize(),
            fuel.normalize(),
            bonus_percent.normalize(),
            bonus
        )
    };

    Gratification {
        audit_step: AuditStep {
            step_number,
            rule_id: "gratification".to_string(),
            rule_name: "Freight Gratification".to_string(),
            legal_ref: GRATIFICATION_REF.to_string(),
            input: serde_json::json!({
                "revenue": revenue.to_string(),
                "levy_percent": levy_percent.to_string(),
                "fuel": fuel.to_string(),
                "bonus_percent": bonus_percent.to_string()
            }),
            output: serde_json::json!({
                "levy": levy.to_string(),
                "bonus_base": bonus_base.to_string(),
                "bonus": bonus.to_string()
            }),
            reasoning,
        },
        levy,
        bonus_base,
        bonus,
    }
}
