//! Meal break rule.
//!
//! Every closed meal event must last at least [`MIN_MEAL_BREAK_MINUTES`].
//! A meal still in progress is not judged yet.

use crate::models::{ActivityType, AuditStep, Violation, ViolationKind, WorkEvent, WorkSession};

use super::thresholds::{MEAL_BREAK_REF, MIN_MEAL_BREAK_MINUTES};

/// The result of applying the meal break rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealBreakResult {
    /// One violation per short meal break.
    pub violations: Vec<Violation>,
    /// Meal events still open, skipped by the rule.
    pub open_meals: usize,
    /// The audit step recording this rule.
    pub audit_step: AuditStep,
}

/// Checks each closed meal event against the minimum meal break.
pub fn evaluate_meal_breaks(
    session: &WorkSession,
    events: &[WorkEvent],
    step_number: u32,
) -> MealBreakResult {
    let meals: Vec<&WorkEvent> = events
        .iter()
        .filter(|e| e.activity == ActivityType::Meal)
        .collect();
    let open_meals = meals.iter().filter(|e| e.is_open()).count();

    let mut measured = Vec::new();
    let mut violations = Vec::new();
    for meal in meals.iter().filter(|e| !e.is_open()) {
        // Closed events ignore the clock.
        let minutes = meal.measured_minutes(meal.start_time);
        measured.push(minutes);
        if minutes < MIN_MEAL_BREAK_MINUTES {
            violations.push(Violation::new(
                &session.id,
                &session.driver_id,
                ViolationKind::MealBreakInsufficient,
                minutes,
                MIN_MEAL_BREAK_MINUTES,
                meal.start_time,
            ));
        }
    }

    let reasoning = if measured.is_empty() {
        "No closed meal breaks to check".to_string()
    } else if violations.is_empty() {
        format!(
            "All {} meal break(s) meet the {} minute minimum",
            measured.len(),
            MIN_MEAL_BREAK_MINUTES
        )
    } else {
        format!(
            "{} of {} meal break(s) are under the {} minute minimum",
            violations.len(),
            measured.len(),
            MIN_MEAL_BREAK_MINUTES
        )
    };

    MealBreakResult {
        audit_step: AuditStep {
            step_number,
            rule_id: "meal_break".to_string(),
            rule_name: "Minimum Meal Break".to_string(),
            legal_ref: MEAL_BREAK_REF.to_string(),
            input: serde_json::json!({
                "meal_minutes": measured,
                "open_meals": open_meals,
                "min_meal_break_minutes": MIN_MEAL_BREAK_MINUTES
            }),
            output: serde_json::json!({ "violations": violations.len() }),
            reasoning,
        },
        violations,
        open_meals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverCategory, SessionStatus, SessionTotals};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn mins(m: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap() + Duration::minutes(m)
    }

    fn session() -> WorkSession {
        WorkSession {
            id: "ses_001".to_string(),
            driver_id: "drv_001".to_string(),
            start_time: mins(0),
            end_time: None,
            status: SessionStatus::Active,
            category: DriverCategory::Cargo,
            totals: SessionTotals::default(),
            overtime_minutes: 0,
        }
    }

    fn meal(from: i64, to: Option<i64>) -> WorkEvent {
        WorkEvent {
            id: format!("meal_{from}"),
            session_id: "ses_001".to_string(),
            activity: ActivityType::Meal,
            start_time: mins(from),
            end_time: to.map(mins),
            duration_minutes: to.map(|to| to - from),
        }
    }

    // ==========================================================================
    // Scenario C: 45 minute meal
    // ==========================================================================
    #[test]
    fn test_scenario_c_45_minute_meal() {
        let result = evaluate_meal_breaks(&session(), &[meal(240, Some(285))], 1);

        assert_eq!(result.violations.len(), 1);
        let violation = &result.violations[0];
        assert_eq!(violation.kind, ViolationKind::MealBreakInsufficient);
        assert_eq!(violation.measured_value, 45);
        assert_eq!(violation.allowed_value, 60);
        assert_eq!(violation.occurred_at, mins(240));
    }

    #[test]
    fn test_60_minute_meal_is_enough() {
        let result = evaluate_meal_breaks(&session(), &[meal(240, Some(300))], 1);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_each_short_meal_is_flagged() {
        let events = vec![meal(120, Some(150)), meal(400, Some(420)), meal(600, Some(670))];
        let result = evaluate_meal_breaks(&session(), &events, 1);
        assert_eq!(result.violations.len(), 2);
        assert_eq!(result.audit_step.input["meal_minutes"], serde_json::json!([30, 20, 70]));
    }

    #[test]
    fn test_open_meal_is_not_judged() {
        let result = evaluate_meal_breaks(&session(), &[meal(240, None)], 1);
        assert!(result.violations.is_empty());
        assert_eq!(result.open_meals, 1);
    }
}
