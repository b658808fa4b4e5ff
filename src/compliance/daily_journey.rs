//! Daily journey and overtime rules.
//!
//! The normal journey is 8 hours and up to 4 hours of overtime may be added.
//! Two rules read the same total: the journey ceiling (12 hours) and the
//! overtime allowance (4 hours beyond the normal journey).

use chrono::{DateTime, Utc};

use crate::models::{AuditStep, Violation, ViolationKind, WorkSession};

use super::thresholds::{
    JOURNEY_REF, MAX_JOURNEY_MINUTES, MAX_OVERTIME_MINUTES, NORMAL_JOURNEY_MINUTES,
    overtime_minutes,
};

/// The result of applying one of the journey rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyRuleResult {
    /// The violation, if the rule was breached.
    pub violation: Option<Violation>,
    /// The audit step recording this rule.
    pub audit_step: AuditStep,
}

/// Flags a journey longer than the normal journey plus allowed overtime.
///
/// The breach is stamped at the session end, or `now` while active.
pub fn evaluate_daily_journey(
    session: &WorkSession,
    total_worked_minutes: i64,
    now: DateTime<Utc>,
    step_number: u32,
) -> JourneyRuleResult {
    let exceeded = total_worked_minutes > MAX_JOURNEY_MINUTES;

    let violation = exceeded.then(|| {
        Violation::new(
            &session.id,
            &session.driver_id,
            ViolationKind::DailyJourneyExceeded,
            total_worked_minutes,
            MAX_JOURNEY_MINUTES,
            session.effective_end(now),
        )
    });

    let reasoning = if exceeded {
        format!(
            "{} worked minutes exceed the {} minute journey ceiling by {} minutes",
            total_worked_minutes,
            MAX_JOURNEY_MINUTES,
            total_worked_minutes - MAX_JOURNEY_MINUTES
        )
    } else {
        format!(
            "{} worked minutes are within the {} minute journey ceiling",
            total_worked_minutes, MAX_JOURNEY_MINUTES
        )
    };

    JourneyRuleResult {
        violation,
        audit_step: AuditStep {
            step_number,
            rule_id: "daily_journey".to_string(),
            rule_name: "Maximum Daily Journey".to_string(),
            legal_ref: JOURNEY_REF.to_string(),
            input: serde_json::json!({
                "total_worked_minutes": total_worked_minutes,
                "max_journey_minutes": MAX_JOURNEY_MINUTES
            }),
            output: serde_json::json!({ "exceeded": exceeded }),
            reasoning,
        },
    }
}

/// Flags overtime beyond the daily allowance.
pub fn evaluate_overtime(
    session: &WorkSession,
    total_worked_minutes: i64,
    now: DateTime<Utc>,
    step_number: u32,
) -> JourneyRuleResult {
    let overtime = overtime_minutes(total_worked_minutes);
    let exceeded = overtime > MAX_OVERTIME_MINUTES;

    let violation = exceeded.then(|| {
        Violation::new(
            &session.id,
            &session.driver_id,
            ViolationKind::OvertimeExceeded,
            overtime,
            MAX_OVERTIME_MINUTES,
            session.effective_end(now),
        )
    });

    let reasoning = if overtime == 0 {
        format!(
            "{} worked minutes do not exceed the {} minute normal journey, no overtime",
            total_worked_minutes, NORMAL_JOURNEY_MINUTES
        )
    } else if exceeded {
        format!(
            "{} overtime minutes exceed the {} minute daily allowance",
            overtime, MAX_OVERTIME_MINUTES
        )
    } else {
        format!(
            "{} overtime minutes are within the {} minute daily allowance",
            overtime, MAX_OVERTIME_MINUTES
        )
    };

    JourneyRuleResult {
        violation,
        audit_step: AuditStep {
            step_number,
            rule_id: "overtime".to_string(),
            rule_name: "Maximum Daily Overtime".to_string(),
            legal_ref: JOURNEY_REF.to_string(),
            input: serde_json::json!({
                "total_worked_minutes": total_worked_minutes,
                "normal_journey_minutes": NORMAL_JOURNEY_MINUTES
            }),
            output: serde_json::json!({
                "overtime_minutes": overtime,
                "exceeded": exceeded
            }),
            reasoning,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverCategory, SessionStatus, SessionTotals, Severity};
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap()
    }

    fn session() -> WorkSession {
        WorkSession {
            id: "ses_001".to_string(),
            driver_id: "drv_001".to_string(),
            start_time: at(5),
            end_time: Some(at(18)),
            status: SessionStatus::Completed,
            category: DriverCategory::Cargo,
            totals: SessionTotals::default(),
            overtime_minutes: 0,
        }
    }

    // ==========================================================================
    // DJ-001: exactly 720 minutes is allowed
    // ==========================================================================
    #[test]
    fn test_dj_001_exactly_720_is_allowed() {
        let result = evaluate_daily_journey(&session(), 720, at(20), 1);
        assert!(result.violation.is_none());
        assert_eq!(result.audit_step.output["exceeded"], false);
    }

    // ==========================================================================
    // Scenario B: 750 minutes exceeds the journey ceiling
    // ==========================================================================
    #[test]
    fn test_scenario_b_750_minutes_exceeds_journey() {
        let result = evaluate_daily_journey(&session(), 750, at(20), 1);
        let violation = result.violation.unwrap();
        assert_eq!(violation.kind, ViolationKind::DailyJourneyExceeded);
        assert_eq!(violation.severity, Severity::High);
        assert_eq!(violation.measured_value, 750);
        assert_eq!(violation.allowed_value, 720);
        assert_eq!(violation.occurred_at, at(18));
    }

    #[test]
    fn test_scenario_b_750_minutes_exceeds_overtime_allowance() {
        let result = evaluate_overtime(&session(), 750, at(20), 2);
        let violation = result.violation.unwrap();
        assert_eq!(violation.kind, ViolationKind::OvertimeExceeded);
        assert_eq!(violation.severity, Severity::Medium);
        assert_eq!(violation.measured_value, 270);
        assert_eq!(violation.allowed_value, 240);
        assert_eq!(result.audit_step.output["overtime_minutes"], 270);
    }

    #[test]
    fn test_overtime_within_allowance() {
        let result = evaluate_overtime(&session(), 600, at(20), 1);
        assert!(result.violation.is_none());
        assert_eq!(result.audit_step.output["overtime_minutes"], 120);
    }

    #[test]
    fn test_no_overtime_under_normal_journey() {
        let result = evaluate_overtime(&session(), 300, at(20), 1);
        assert!(result.violation.is_none());
        assert!(result.audit_step.reasoning.contains("no overtime"));
    }

    #[test]
    fn test_active_session_breach_is_stamped_now() {
        let mut active = session();
        active.end_time = None;
        active.status = SessionStatus::Active;
        let result = evaluate_daily_journey(&active, 800, at(19), 1);
        assert_eq!(result.violation.unwrap().occurred_at, at(19));
    }
}
