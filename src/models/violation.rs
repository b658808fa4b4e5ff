//! Violation model.
//!
//! A [`Violation`] records one breach of a work-time rule, with the measured
//! value next to the allowed limit.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The rule that was breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Uninterrupted driving beyond the category ceiling.
    ContinuousDrivingExceeded,
    /// Total journey beyond the normal journey plus allowed overtime.
    DailyJourneyExceeded,
    /// Overtime beyond the daily overtime allowance.
    OvertimeExceeded,
    /// A meal break shorter than the minimum.
    MealBreakInsufficient,
    /// Too little rest since the previous session ended.
    InterjourneyRestInsufficient,
}

impl ViolationKind {
    /// Returns the string representation for storage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ContinuousDrivingExceeded => "continuous_driving_exceeded",
            Self::DailyJourneyExceeded => "daily_journey_exceeded",
            Self::OvertimeExceeded => "overtime_exceeded",
            Self::MealBreakInsufficient => "meal_break_insufficient",
            Self::InterjourneyRestInsufficient => "interjourney_rest_insufficient",
        }
    }

    /// The severity assigned to every breach of this rule.
    pub const fn severity(&self) -> Severity {
        match self {
            Self::ContinuousDrivingExceeded
            | Self::DailyJourneyExceeded
            | Self::InterjourneyRestInsufficient => Severity::High,
            Self::OvertimeExceeded | Self::MealBreakInsufficient => Severity::Medium,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViolationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continuous_driving_exceeded" => Ok(Self::ContinuousDrivingExceeded),
            "daily_journey_exceeded" => Ok(Self::DailyJourneyExceeded),
            "overtime_exceeded" => Ok(Self::OvertimeExceeded),
            "meal_break_insufficient" => Ok(Self::MealBreakInsufficient),
            "interjourney_rest_insufficient" => Ok(Self::InterjourneyRestInsufficient),
            _ => Err(format!("invalid violation kind: {s}")),
        }
    }
}

/// How serious a breach is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Low,
    /// Must be reviewed.
    Medium,
    /// Legal exposure.
    High,
}

impl Severity {
    /// Returns the string representation for storage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("invalid severity: {s}")),
        }
    }
}

/// One detected regulatory breach.
///
/// Measured and allowed values are in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Unique identifier for the violation.
    pub id: Uuid,
    /// The session the breach happened in.
    pub session_id: String,
    /// The driver responsible.
    pub driver_id: String,
    /// Which rule was breached.
    pub kind: ViolationKind,
    /// How serious the breach is.
    pub severity: Severity,
    /// The measured quantity.
    pub measured_value: i64,
    /// The regulatory maximum or minimum.
    pub allowed_value: i64,
    /// When the breach happened.
    pub occurred_at: DateTime<Utc>,
}

impl Violation {
    /// Creates a violation with a fresh ID and the kind's default severity.
    pub fn new(
        session_id: &str,
        driver_id: &str,
        kind: ViolationKind,
        measured_value: i64,
        allowed_value: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            driver_id: driver_id.to_string(),
            kind,
            severity: kind.severity(),
            measured_value,
            allowed_value,
            occurred_at,
        }
    }
}
