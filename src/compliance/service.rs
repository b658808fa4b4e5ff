//! Compliance check entry point.
//!
//! Loads a session from the store, evaluates it and records the result.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::RunOutcome;
use crate::store::WorkStore;

use super::evaluator::{SessionEvaluation, evaluate_session};
use super::recorder::{RecordOutcome, record_evaluation};

/// The result of one compliance check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceReport {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// The evaluation that was recorded.
    pub evaluation: SessionEvaluation,
    /// What was written back to the store.
    pub record: RecordOutcome,
}

/// Evaluates one session and records its violations and overtime.
///
/// The session ID is validated before anything is read. Read failures abort
/// the check; write failures are listed in the report and make the outcome
/// [`RunOutcome::Partial`]. A session without events still has its stale
/// results cleared and reports [`RunOutcome::NothingToDo`].
pub fn run_compliance_check(
    store: &dyn WorkStore,
    session_id: &str,
    now: DateTime<Utc>,
) -> EngineResult<ComplianceReport> {
    let session_id = session_id.trim();
    if session_id.is_empty() {
        return Err(EngineError::InvalidRequest {
            field: "sessionId".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    let session = store
        .session(session_id)?
        .ok_or_else(|| EngineError::SessionNotFound {
            session_id: session_id.to_string(),
        })?;
    let events = store.session_events(session_id)?;
    let previous_end =
        store.previous_session_end(&session.driver_id, session.start_time, &session.id)?;

    debug!(
        session_id = %session.id,
        driver_id = %session.driver_id,
        events = events.len(),
        has_previous_session = previous_end.is_some(),
        "Evaluating session"
    );

    let evaluation = evaluate_session(&session, &events, previous_end, now);
    let record = record_evaluation(store, &evaluation);
    let outcome = RunOutcome::from_counts(events.len(), record.failures.len());

    if record.is_complete() {
        info!(
            session_id = %session.id,
            driver_id = %session.driver_id,
            violation_count = evaluation.violations.len(),
            overtime_minutes = evaluation.overtime_minutes,
            outcome = %outcome,
            "Compliance check recorded"
        );
    } else {
        warn!(
            session_id = %session.id,
            failures = record.failures.len(),
            "Compliance check partially recorded"
        );
    }

    Ok(ComplianceReport {
        outcome,
        evaluation,
        record,
    })
}
