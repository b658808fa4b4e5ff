//! Run outcome reported to callers of batch-style operations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a run ended.
///
/// Callers never get a bare boolean: a run either had nothing to do, did
/// everything, or finished with some failed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// There was no work to perform.
    NothingToDo,
    /// Every item was handled.
    Succeeded,
    /// At least one item failed.
    Partial,
}

impl RunOutcome {
    /// Derives the outcome from the number of attempted and failed items.
    ///
    /// # Example
    ///
    /// ```
    /// use fleet_compliance_engine::models::RunOutcome;
    ///
    /// assert_eq!(RunOutcome::from_counts(0, 0), RunOutcome::NothingToDo);
    /// assert_eq!(RunOutcome::from_counts(3, 0), RunOutcome::Succeeded);
    /// assert_eq!(RunOutcome::from_counts(3, 1), RunOutcome::Partial);
    /// ```
    pub fn from_counts(attempted: usize, failed: usize) -> Self {
        if failed > 0 {
            Self::Partial
        } else if attempted == 0 {
            Self::NothingToDo
        } else {
            Self::Succeeded
        }
    }

    /// Returns the wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NothingToDo => "nothing_to_do",
            Self::Succeeded => "succeeded",
            Self::Partial => "partial",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
