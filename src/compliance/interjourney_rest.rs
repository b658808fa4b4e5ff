//! Inter-journey rest rule.
//!
//! A driver must rest at least [`MIN_INTERJOURNEY_REST_MINUTES`] between the
//! end of one session and the start of the next.

use chrono::{DateTime, Utc};

use crate::models::{AuditStep, Violation, ViolationKind, WorkSession};

use super::thresholds::{INTERJOURNEY_REST_REF, MIN_INTERJOURNEY_REST_MINUTES};

/// The result of applying the inter-journey rest rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterjourneyRestResult {
    /// Rest measured since the previous session, if there was one.
    pub rest_minutes: Option<i64>,
    /// The violation, if the rest was too short.
    pub violation: Option<Violation>,
    /// The audit step recording this rule.
    pub audit_step: AuditStep,
}

/// Compares the rest since `previous_session_end` against the minimum.
///
/// Overlapping sessions are measured as zero rest.
pub fn evaluate_interjourney_rest(
    session: &WorkSession,
    previous_session_end: Option<DateTime<Utc>>,
    step_number: u32,
) -> InterjourneyRestResult {
    let rest_minutes =
        previous_session_end.map(|end| (session.start_time - end).num_minutes().max(0));

    let violation = rest_minutes
        .filter(|rest| *rest < MIN_INTERJOURNEY_REST_MINUTES)
        .map(|rest| {
            Violation::new(
                &session.id,
                &session.driver_id,
                ViolationKind::InterjourneyRestInsufficient,
                rest,
                MIN_INTERJOURNEY_REST_MINUTES,
                session.start_time,
            )
        });

    let reasoning = match rest_minutes {
        None => "No earlier closed session for this driver, nothing to compare".to_string(),
        Some(rest) if violation.is_some() => format!(
            "{} minutes of rest before this session are under the {} minute minimum",
            rest, MIN_INTERJOURNEY_REST_MINUTES
        ),
        Some(rest) => format!(
            "{} minutes of rest before this session meet the {} minute minimum",
            rest, MIN_INTERJOURNEY_REST_MINUTES
        ),
    };

    InterjourneyRestResult {
        rest_minutes,
        audit_step: AuditStep {
            step_number,
            rule_id: "interjourney_rest".to_string(),
            rule_name: "Minimum Inter-Journey Rest".to_string(),
            legal_ref: INTERJOURNEY_REST_REF.to_string(),
            input: serde_json::json!({
                "previous_session_end": previous_session_end,
                "session_start": session.start_time,
                "min_rest_minutes": MIN_INTERJOURNEY_REST_MINUTES
            }),
            output: serde_json::json!({
                "rest_minutes": rest_minutes,
                "insufficient": violation.is_some()
            }),
            reasoning,
        },
        violation,
    }
}
