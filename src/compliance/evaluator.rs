//! Session evaluation.
//!
//! Runs every rule over one session's events and collects the totals,
//! violations and audit trace. Nothing here touches storage.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, AuditTrace, AuditWarning, SessionTotals, Violation, WorkEvent, WorkSession};

use super::continuous_driving::evaluate_continuous_driving;
use super::daily_journey::{evaluate_daily_journey, evaluate_overtime};
use super::interjourney_rest::evaluate_interjourney_rest;
use super::journey_totals::aggregate_journey;
use super::meal_break::evaluate_meal_breaks;
use super::thresholds::overtime_minutes;

/// Everything an evaluation derives from one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEvaluation {
    /// The evaluated session.
    pub session_id: String,
    /// The driver the session belongs to.
    pub driver_id: String,
    /// Minute totals derived from the events.
    pub totals: SessionTotals,
    /// Minutes worked beyond the normal journey.
    pub overtime_minutes: i64,
    /// Longest uninterrupted driving reached.
    pub peak_continuous_driving_minutes: i64,
    /// Every rule breach found, in rule order.
    pub violations: Vec<Violation>,
    /// The rule-by-rule audit trace.
    pub audit_trace: AuditTrace,
}

/// Evaluates a session against all work-time rules.
///
/// Events may arrive in any order; they are sorted by start time first.
/// `previous_session_end` is the end of the driver's latest earlier closed
/// session, if any. Open events are measured up to `now`.
pub fn evaluate_session(
    session: &WorkSession,
    events: &[WorkEvent],
    previous_session_end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> SessionEvaluation {
    let started = Instant::now();

    let mut ordered = events.to_vec();
    ordered.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut violations: Vec<Violation> = Vec::new();
    let mut step_number: u32 = 1;

    let journey = aggregate_journey(&ordered, now, step_number);
    let totals = journey.totals;
    if journey.open_events > 0 {
        warnings.push(AuditWarning {
            code: "OPEN_EVENTS".to_string(),
            message: format!(
                "{} event(s) still open, measured up to {}",
                journey.open_events,
                now.to_rfc3339()
            ),
        });
    }
    steps.push(journey.audit_step);
    step_number += 1;

    let continuous = evaluate_continuous_driving(session, &ordered, now, step_number);
    let peak_continuous_driving_minutes = continuous.peak_minutes;
    violations.extend(continuous.violations);
    steps.push(continuous.audit_step);
    step_number += 1;

    let daily = evaluate_daily_journey(session, totals.total_worked_minutes, now, step_number);
    violations.extend(daily.violation);
    steps.push(daily.audit_step);
    step_number += 1;

    let overtime = evaluate_overtime(session, totals.total_worked_minutes, now, step_number);
    violations.extend(overtime.violation);
    steps.push(overtime.audit_step);
    step_number += 1;

    let meals = evaluate_meal_breaks(session, &ordered, step_number);
    if meals.open_meals > 0 {
        warnings.push(AuditWarning {
            code: "OPEN_MEAL_BREAK".to_string(),
            message: format!(
                "{} meal break(s) still open, not checked against the minimum",
                meals.open_meals
            ),
        });
    }
    violations.extend(meals.violations);
    steps.push(meals.audit_step);
    step_number += 1;

    let rest = evaluate_interjourney_rest(session, previous_session_end, step_number);
    violations.extend(rest.violation);
    steps.push(rest.audit_step);

    SessionEvaluation {
        session_id: session.id.clone(),
        driver_id: session.driver_id.clone(),
        totals,
        overtime_minutes: overtime_minutes(totals.total_worked_minutes),
        peak_continuous_driving_minutes,
        violations,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: started.elapsed().as_micros() as u64,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityType, DriverCategory, SessionStatus, ViolationKind};
    use chrono::{Duration, TimeZone};

    fn mins(m: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap() + Duration::minutes(m)
    }

    fn session(end: Option<i64>) -> WorkSession {
        WorkSession {
            id: "ses_001".to_string(),
            driver_id: "drv_001".to_string(),
            start_time: mins(0),
            end_time: end.map(mins),
            status: if end.is_some() {
                SessionStatus::Completed
            } else {
                SessionStatus::Active
            },
            category: DriverCategory::Cargo,
            totals: SessionTotals::default(),
            overtime_minutes: 0,
        }
    }

    fn event(id: &str, activity: ActivityType, from: i64, to: Option<i64>) -> WorkEvent {
        WorkEvent {
            id: id.to_string(),
            session_id: "ses_001".to_string(),
            activity,
            start_time: mins(from),
            end_time: to.map(mins),
            duration_minutes: to.map(|to| to - from),
        }
    }

    fn kinds(evaluation: &SessionEvaluation) -> Vec<ViolationKind> {
        evaluation.violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_clean_session_has_no_violations() {
        let events = vec![
            event("e1", ActivityType::Driving, 0, Some(240)),
            event("e2", ActivityType::Meal, 240, Some(300)),
            event("e3", ActivityType::Driving, 300, Some(480)),
        ];
        let evaluation = evaluate_session(&session(Some(480)), &events, None, mins(600));

        assert!(evaluation.violations.is_empty());
        assert_eq!(evaluation.totals.total_worked_minutes, 480);
        assert_eq!(evaluation.overtime_minutes, 0);
        assert_eq!(evaluation.audit_trace.steps.len(), 6);
        assert!(evaluation.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_steps_are_numbered_in_rule_order() {
        let evaluation = evaluate_session(&session(Some(10)), &[], None, mins(20));
        let ids: Vec<&str> = evaluation
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "journey_totals",
                "continuous_driving",
                "daily_journey",
                "overtime",
                "meal_break",
                "interjourney_rest"
            ]
        );
        let numbers: Vec<u32> = evaluation.audit_trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_unsorted_events_are_evaluated_chronologically() {
        // 200 + 29 minute stop + 140 only breaches when read in order.
        let events = vec![
            event("e2", ActivityType::Driving, 229, Some(369)),
            event("e1", ActivityType::Driving, 0, Some(200)),
        ];
        let evaluation = evaluate_session(&session(Some(369)), &events, None, mins(400));
        assert_eq!(kinds(&evaluation), vec![ViolationKind::ContinuousDrivingExceeded]);
        assert_eq!(evaluation.peak_continuous_driving_minutes, 340);
    }

    #[test]
    fn test_long_day_reports_journey_and_overtime() {
        let events = vec![
            event("e1", ActivityType::Waiting, 0, Some(300)),
            event("e2", ActivityType::Meal, 300, Some(360)),
            event("e3", ActivityType::Waiting, 360, Some(750)),
        ];
        let evaluation = evaluate_session(&session(Some(750)), &events, None, mins(800));
        assert_eq!(
            kinds(&evaluation),
            vec![ViolationKind::DailyJourneyExceeded, ViolationKind::OvertimeExceeded]
        );
        assert_eq!(evaluation.overtime_minutes, 270);
    }

    #[test]
    fn test_open_events_produce_warnings() {
        let events = vec![
            event("e1", ActivityType::Driving, 0, Some(120)),
            event("e2", ActivityType::Meal, 120, None),
        ];
        let evaluation = evaluate_session(&session(None), &events, None, mins(150));
        let codes: Vec<&str> = evaluation
            .audit_trace
            .warnings
            .iter()
            .map(|w| w.code.as_str())
            .collect();
        assert_eq!(codes, vec!["OPEN_EVENTS", "OPEN_MEAL_BREAK"]);
        assert_eq!(evaluation.totals.total_rest_minutes, 30);
        assert!(evaluation.violations.is_empty());
    }

    #[test]
    fn test_short_rest_since_previous_session() {
        let evaluation = evaluate_session(
            &session(Some(60)),
            &[],
            Some(mins(-600)),
            mins(100),
        );
        assert_eq!(kinds(&evaluation), vec![ViolationKind::InterjourneyRestInsufficient]);
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let events = vec![
            event("e1", ActivityType::Driving, 0, Some(400)),
            event("e2", ActivityType::Meal, 400, Some(430)),
        ];
        let first = evaluate_session(&session(Some(430)), &events, None, mins(500));
        let second = evaluate_session(&session(Some(430)), &events, None, mins(500));
        assert_eq!(first.totals, second.totals);
        assert_eq!(first.violations.len(), second.violations.len());
        for (a, b) in first.violations.iter().zip(&second.violations) {
            assert_eq!((a.kind, a.measured_value, a.occurred_at), (b.kind, b.measured_value, b.occurred_at));
        }
    }
}
