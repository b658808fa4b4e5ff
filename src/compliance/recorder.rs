//! Violation recorder.
//!
//! Writes an evaluation back to the store: the session's violation set and
//! its derived minute totals with overtime. The two writes are independent;
//! a failure in one is reported and the other is still attempted.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{StoreError, WorkStore};

use super::evaluator::SessionEvaluation;

/// A write that failed while recording an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFailure {
    /// The write that failed (`replace_violations` or `update_totals`).
    pub operation: String,
    /// The store's error message.
    pub message: String,
    /// Whether retrying the same write may succeed.
    pub retryable: bool,
}

impl RecordFailure {
    fn new(operation: &str, error: &StoreError) -> Self {
        Self {
            operation: operation.to_string(),
            message: error.to_string(),
            retryable: !matches!(error, StoreError::Corrupt { .. }),
        }
    }
}

/// What was written for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// Violations written, or `None` if the batch write failed.
    pub violations_written: Option<usize>,
    /// Whether the session totals and overtime were updated.
    pub totals_updated: bool,
    /// Every write that failed.
    pub failures: Vec<RecordFailure>,
}

impl RecordOutcome {
    /// Returns true when both writes went through.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Persists an evaluation's violations, totals and overtime.
pub fn record_evaluation(store: &dyn WorkStore, evaluation: &SessionEvaluation) -> RecordOutcome {
    let mut outcome = RecordOutcome::default();

    match store.replace_violations(&evaluation.session_id, &evaluation.violations) {
        Ok(written) => outcome.violations_written = Some(written),
        Err(err) => {
            warn!(
                session_id = %evaluation.session_id,
                error = %err,
                "Failed to record violations"
            );
            outcome
                .failures
                .push(RecordFailure::new("replace_violations", &err));
        }
    }

    match store.update_session_totals(
        &evaluation.session_id,
        &evaluation.totals,
        evaluation.overtime_minutes,
    ) {
        Ok(()) => outcome.totals_updated = true,
        Err(err) => {
            warn!(
                session_id = %evaluation.session_id,
                error = %err,
                "Failed to update session totals"
            );
            outcome
                .failures
                .push(RecordFailure::new("update_totals", &err));
        }
    }

    outcome
}
