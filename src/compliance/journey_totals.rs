//! Journey aggregation.
//!
//! Sums a session's events into [`SessionTotals`]. Purely additive: the
//! result does not depend on event order and re-aggregating the same events
//! gives the same totals.

use chrono::{DateTime, Utc};

use crate::models::{ActivityType, AuditStep, SessionTotals, WorkEvent};

use super::thresholds::JOURNEY_REF;

/// The result of aggregating a session's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyAggregation {
    /// The minute totals.
    pub totals: SessionTotals,
    /// Events that were still open and measured up to the evaluation clock.
    pub open_events: usize,
    /// The audit step recording the aggregation.
    pub audit_step: AuditStep,
}

/// Sums event durations per activity.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use fleet_compliance_engine::compliance::aggregate_journey;
/// use fleet_compliance_engine::models::{ActivityType, WorkEvent};
///
/// let t0 = Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap();
/// let event = |activity, from: i64, to: i64| WorkEvent {
///     id: format!("evt_{from}"),
///     session_id: "ses_001".to_string(),
///     activity,
///     start_time: t0 + Duration::minutes(from),
///     end_time: Some(t0 + Duration::minutes(to)),
///     duration_minutes: Some(to - from),
/// };
/// let events = vec![
///     event(ActivityType::Driving, 0, 240),
///     event(ActivityType::Meal, 240, 300),
///     event(ActivityType::Waiting, 300, 330),
/// ];
///
/// let result = aggregate_journey(&events, t0 + Duration::minutes(400), 1);
/// assert_eq!(result.totals.total_worked_minutes, 330);
/// assert_eq!(result.totals.total_rest_minutes, 60);
/// ```
pub fn aggregate_journey(
    events: &[WorkEvent],
    now: DateTime<Utc>,
    step_number: u32,
) -> JourneyAggregation {
    let mut totals = SessionTotals::default();
    let mut open_events = 0;

    for event in events {
        if event.is_open() {
            open_events += 1;
        }
        let minutes = event.measured_minutes(now);
        totals.total_worked_minutes += minutes;
        match event.activity {
            ActivityType::Driving => totals.total_driving_minutes += minutes,
            ActivityType::Waiting => totals.total_waiting_minutes += minutes,
            ActivityType::Rest | ActivityType::Meal => totals.total_rest_minutes += minutes,
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "journey_totals".to_string(),
        rule_name: "Journey Aggregation".to_string(),
        legal_ref: JOURNEY_REF.to_string(),
        input: serde_json::json!({
            "events": events.len(),
            "open_events": open_events
        }),
        output: serde_json::json!({
            "total_worked_minutes": totals.total_worked_minutes,
            "total_driving_minutes": totals.total_driving_minutes,
            "total_waiting_minutes": totals.total_waiting_minutes,
            "total_rest_minutes": totals.total_rest_minutes
        }),
        reasoning: format!(
            "{} events add up to {} worked minutes ({} driving, {} waiting, {} rest)",
            events.len(),
            totals.total_worked_minutes,
            totals.total_driving_minutes,
            totals.total_waiting_minutes,
            totals.total_rest_minutes
        ),
    };

    JourneyAggregation {
        totals,
        open_events,
        audit_step,
    }
}
