//! Continuous driving tracking.
//!
//! This module provides the [`ContinuousDrivingTracker`] state machine and
//! the continuous-driving rule built on top of it.
//!
//! The tracker keeps two pieces of state: the minutes driven since the last
//! qualifying stop and the time the previous driving period ended. A driving
//! period that starts at least [`QUALIFYING_BREAK_MINUTES`] after the previous
//! one ended resets the accumulator. Non-driving events never touch the
//! state; only the gap between two driving periods counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ActivityType, AuditStep, Violation, ViolationKind, WorkEvent, WorkSession};

use super::thresholds::{CONTINUOUS_DRIVING_REF, QUALIFYING_BREAK_MINUTES};

/// One stretch of uninterrupted driving that went over the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousDrivingBreach {
    /// Start of the driving period in which the ceiling was first crossed.
    pub anchored_at: DateTime<Utc>,
    /// Highest accumulated driving reached in the stretch.
    pub peak_minutes: i64,
}

/// Accumulates uninterrupted driving across a session's events.
///
/// # Example
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use fleet_compliance_engine::compliance::ContinuousDrivingTracker;
///
/// let mut tracker = ContinuousDrivingTracker::new(330);
/// let t0 = Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap();
///
/// tracker.record_driving(t0, t0 + Duration::minutes(200));
/// // A 29 minute stop does not reset the accumulator.
/// let resumed = t0 + Duration::minutes(229);
/// tracker.record_driving(resumed, resumed + Duration::minutes(140));
///
/// assert_eq!(tracker.accumulated_minutes(), 340);
/// assert_eq!(tracker.finish().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ContinuousDrivingTracker {
    ceiling_minutes: i64,
    break_minutes: i64,
    accumulated_minutes: i64,
    peak_minutes: i64,
    last_stop: Option<DateTime<Utc>>,
    resets: u32,
    open_breach: Option<ContinuousDrivingBreach>,
    breaches: Vec<ContinuousDrivingBreach>,
}

impl ContinuousDrivingTracker {
    /// Creates a tracker with the standard qualifying break.
    pub fn new(ceiling_minutes: i64) -> Self {
        Self::with_break(ceiling_minutes, QUALIFYING_BREAK_MINUTES)
    }

    /// Creates a tracker with an explicit qualifying break length.
    pub fn with_break(ceiling_minutes: i64, break_minutes: i64) -> Self {
        Self {
            ceiling_minutes,
            break_minutes,
            accumulated_minutes: 0,
            peak_minutes: 0,
            last_stop: None,
            resets: 0,
            open_breach: None,
            breaches: Vec::new(),
        }
    }

    /// Minutes driven since the last qualifying stop.
    pub fn accumulated_minutes(&self) -> i64 {
        self.accumulated_minutes
    }

    /// Highest accumulated value seen so far.
    pub fn peak_minutes(&self) -> i64 {
        self.peak_minutes
    }

    /// Number of qualifying stops observed.
    pub fn resets(&self) -> u32 {
        self.resets
    }

    /// Returns true if a stop from `last_stop` to `start` resets the accumulator.
    pub fn is_qualifying_gap(&self, start: DateTime<Utc>) -> bool {
        self.last_stop
            .is_some_and(|stop| (start - stop).num_minutes() >= self.break_minutes)
    }

    /// Feeds one driving period. Returns true if it began after a qualifying stop.
    pub fn record_driving(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.record_period(start, end, (end - start).num_minutes())
    }

    /// Feeds any event; only driving events affect the state.
    ///
    /// The event's length is [`WorkEvent::measured_minutes`], the same length
    /// the journey totals use. Open events are measured up to `now`.
    pub fn record_event(&mut self, event: &WorkEvent, now: DateTime<Utc>) -> bool {
        if event.activity != ActivityType::Driving {
            return false;
        }
        self.record_period(
            event.start_time,
            event.effective_end(now),
            event.measured_minutes(now),
        )
    }

    /// Gaps are measured on timestamps; `minutes` is what the period adds.
    fn record_period(&mut self, start: DateTime<Utc>, end: DateTime<Utc>, minutes: i64) -> bool {
        let reset = self.is_qualifying_gap(start);
        if reset {
            self.reset();
        }

        self.accumulated_minutes += minutes.max(0);
        self.peak_minutes = self.peak_minutes.max(self.accumulated_minutes);

        if self.accumulated_minutes > self.ceiling_minutes {
            match self.open_breach.as_mut() {
                Some(breach) => breach.peak_minutes = self.accumulated_minutes,
                None => {
                    self.open_breach = Some(ContinuousDrivingBreach {
                        anchored_at: start,
                        peak_minutes: self.accumulated_minutes,
                    });
                }
            }
        }

        self.last_stop = Some(end.max(start));
        reset
    }

    fn reset(&mut self) {
        self.accumulated_minutes = 0;
        self.resets += 1;
        if let Some(breach) = self.open_breach.take() {
            self.breaches.push(breach);
        }
    }

    /// Closes the current stretch and returns every breach, one per stretch.
    pub fn finish(mut self) -> Vec<ContinuousDrivingBreach> {
        if let Some(breach) = self.open_breach.take() {
            self.breaches.push(breach);
        }
        self.breaches
    }
}

/// The result of applying the continuous-driving rule to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContinuousDrivingResult {
    /// Highest uninterrupted driving reached in the session.
    pub peak_minutes: i64,
    /// The ceiling that applied.
    pub ceiling_minutes: i64,
    /// One violation per stretch over the ceiling.
    pub violations: Vec<Violation>,
    /// The audit step recording this rule.
    pub audit_step: AuditStep,
}

/// Applies the continuous-driving ceiling for the session's category.
///
/// `events` must be in chronological order.
pub fn evaluate_continuous_driving(
    session: &WorkSession,
    events: &[WorkEvent],
    now: DateTime<Utc>,
    step_number: u32,
) -> ContinuousDrivingResult {
    let ceiling_minutes = session.category.continuous_driving_limit();
    let mut tracker = ContinuousDrivingTracker::new(ceiling_minutes);

    let driving_periods = events
        .iter()
        .filter(|e| e.activity == ActivityType::Driving)
        .count();
    for event in events {
        tracker.record_event(event, now);
    }

    let peak_minutes = tracker.peak_minutes();
    let resets = tracker.resets();
    let violations: Vec<Violation> = tracker
        .finish()
        .into_iter()
        .map(|breach| {
            Violation::new(
                &session.id,
                &session.driver_id,
                ViolationKind::ContinuousDrivingExceeded,
                breach.peak_minutes,
                ceiling_minutes,
                breach.anchored_at,
            )
        })
        .collect();

    let reasoning = if violations.is_empty() {
        format!(
            "Longest uninterrupted driving of {} minutes stays within the {} minute {} ceiling",
            peak_minutes,
            ceiling_minutes,
            session.category
        )
    } else {
        format!(
            "{} driving stretch(es) exceeded the {} minute {} ceiling, peaking at {} minutes",
            violations.len(),
            ceiling_minutes,
            session.category,
            peak_minutes
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "continuous_driving".to_string(),
        rule_name: "Maximum Continuous Driving".to_string(),
        legal_ref: CONTINUOUS_DRIVING_REF.to_string(),
        input: serde_json::json!({
            "category": session.category.as_str(),
            "driving_periods": driving_periods,
            "ceiling_minutes": ceiling_minutes,
            "qualifying_break_minutes": QUALIFYING_BREAK_MINUTES
        }),
        output: serde_json::json!({
            "peak_minutes": peak_minutes,
            "qualifying_stops": resets,
            "violations": violations.len()
        }),
        reasoning,
    };

    ContinuousDrivingResult {
        peak_minutes,
        ceiling_minutes,
        violations,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverCategory, SessionStatus, SessionTotals};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap()
    }

    fn mins(m: i64) -> DateTime<Utc> {
        t0() + Duration::minutes(m)
    }

    fn session(category: DriverCategory) -> WorkSession {
        WorkSession {
            id: "ses_001".to_string(),
            driver_id: "drv_001".to_string(),
            start_time: t0(),
            end_time: None,
            status: SessionStatus::Active,
            category,
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

    // ==========================================================================
    // CD-001: 29 minute gap does not reset
    // ==========================================================================
    #[test]
    fn test_cd_001_29_minute_gap_does_not_reset() {
        let mut tracker = ContinuousDrivingTracker::new(330);
        assert!(!tracker.record_driving(mins(0), mins(100)));
        assert!(!tracker.record_driving(mins(129), mins(229)));
        assert_eq!(tracker.accumulated_minutes(), 200);
        assert_eq!(tracker.resets(), 0);
    }

    // ==========================================================================
    // CD-002: 30 minute gap resets
    // ==========================================================================
    #[test]
    fn test_cd_002_30_minute_gap_resets() {
        let mut tracker = ContinuousDrivingTracker::new(330);
        tracker.record_driving(mins(0), mins(100));
        assert!(tracker.record_driving(mins(130), mins(230)));
        assert_eq!(tracker.accumulated_minutes(), 100);
        assert_eq!(tracker.peak_minutes(), 100);
        assert_eq!(tracker.resets(), 1);
    }

    // ==========================================================================
    // CD-003: first period never resets
    // ==========================================================================
    #[test]
    fn test_cd_003_first_period_has_no_previous_stop() {
        let mut tracker = ContinuousDrivingTracker::new(330);
        assert!(!tracker.is_qualifying_gap(mins(500)));
        assert!(!tracker.record_driving(mins(500), mins(510)));
    }

    // ==========================================================================
    // CD-004: one breach per stretch, carrying the peak
    // ==========================================================================
    #[test]
    fn test_cd_004_one_breach_per_stretch_with_peak() {
        let mut tracker = ContinuousDrivingTracker::new(330);
        tracker.record_driving(mins(0), mins(300));
        tracker.record_driving(mins(310), mins(350)); // 340, crosses
        tracker.record_driving(mins(360), mins(380)); // 360, same stretch
        let breaches = tracker.finish();

        assert_eq!(breaches.len(), 1);
        assert_eq!(breaches[0].anchored_at, mins(310));
        assert_eq!(breaches[0].peak_minutes, 360);
    }

    // ==========================================================================
    // CD-005: a reset re-arms the breach detection
    // ==========================================================================
    #[test]
    fn test_cd_005_separate_stretches_give_separate_breaches() {
        let mut tracker = ContinuousDrivingTracker::new(240);
        tracker.record_driving(mins(0), mins(250));
        tracker.record_driving(mins(300), mins(545));
        let breaches = tracker.finish();

        assert_eq!(breaches.len(), 2);
        assert_eq!(breaches[0].peak_minutes, 250);
        assert_eq!(breaches[1].peak_minutes, 245);
    }

    // ==========================================================================
    // CD-006: exactly at the ceiling is allowed
    // ==========================================================================
    #[test]
    fn test_cd_006_exactly_at_ceiling_is_not_a_breach() {
        let mut tracker = ContinuousDrivingTracker::new(330);
        tracker.record_driving(mins(0), mins(330));
        assert!(tracker.finish().is_empty());
    }

    #[test]
    fn test_non_driving_events_do_not_reset_or_advance() {
        let mut tracker = ContinuousDrivingTracker::new(330);
        let now = mins(1_000);
        tracker.record_event(&event("e1", ActivityType::Driving, 0, Some(100)), now);
        tracker.record_event(&event("e2", ActivityType::Rest, 100, Some(200)), now);
        assert_eq!(tracker.accumulated_minutes(), 100);
        assert_eq!(tracker.resets(), 0);
    }

    #[test]
    fn test_open_event_is_measured_to_now() {
        let mut tracker = ContinuousDrivingTracker::new(330);
        let open = event("e1", ActivityType::Driving, 0, None);
        tracker.record_event(&open, mins(90));
        assert_eq!(tracker.accumulated_minutes(), 90);
        assert!(open.end_time.is_none());
    }

    // ==========================================================================
    // Scenario A: 340 continuous cargo minutes give exactly one violation
    // ==========================================================================
    #[test]
    fn test_scenario_a_340_minutes_cargo_single_violation() {
        let events = vec![
            event("e1", ActivityType::Driving, 0, Some(200)),
            event("e2", ActivityType::Waiting, 200, Some(215)),
            event("e3", ActivityType::Driving, 215, Some(355)),
        ];

        let result = evaluate_continuous_driving(&session(DriverCategory::Cargo), &events, mins(400), 1);

        assert_eq!(result.violations.len(), 1);
        let violation = &result.violations[0];
        assert_eq!(violation.kind, ViolationKind::ContinuousDrivingExceeded);
        assert_eq!(violation.measured_value, 340);
        assert_eq!(violation.allowed_value, 330);
        assert_eq!(violation.occurred_at, mins(215));
        assert_eq!(result.audit_step.rule_id, "continuous_driving");
        assert_eq!(result.audit_step.output["peak_minutes"], 340);
    }

    #[test]
    fn test_passenger_ceiling_is_lower() {
        let events = vec![event("e1", ActivityType::Driving, 0, Some(300))];

        let cargo = evaluate_continuous_driving(&session(DriverCategory::Cargo), &events, mins(400), 1);
        let passenger =
            evaluate_continuous_driving(&session(DriverCategory::Passenger), &events, mins(400), 1);

        assert!(cargo.violations.is_empty());
        assert_eq!(passenger.violations.len(), 1);
        assert_eq!(passenger.ceiling_minutes, 240);
    }

    #[test]
    fn test_stored_duration_matches_journey_totals() {
        // Interval says 300 minutes, the stored duration says 340.
        let mut driving = event("e1", ActivityType::Driving, 0, Some(300));
        driving.duration_minutes = Some(340);
        let events = vec![driving];

        let result =
            evaluate_continuous_driving(&session(DriverCategory::Cargo), &events, mins(400), 1);
        let totals = crate::compliance::aggregate_journey(&events, mins(400), 1).totals;

        assert_eq!(result.peak_minutes, 340);
        assert_eq!(result.peak_minutes, totals.total_driving_minutes);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].measured_value, 340);
    }
}
