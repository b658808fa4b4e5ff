//! Work event model.
//!
//! A [`WorkEvent`] is one activity interval inside a work session.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the driver was doing during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Behind the wheel.
    Driving,
    /// Resting.
    Rest,
    /// Meal break.
    Meal,
    /// Waiting for loading, unloading or inspection.
    Waiting,
}

impl ActivityType {
    /// Returns the string representation for storage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Rest => "rest",
            Self::Meal => "meal",
            Self::Waiting => "waiting",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driving" => Ok(Self::Driving),
            "rest" => Ok(Self::Rest),
            "meal" => Ok(Self::Meal),
            "waiting" => Ok(Self::Waiting),
            _ => Err(format!("invalid activity type: {s}")),
        }
    }
}

/// One activity interval within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkEvent {
    /// Unique identifier for the event.
    pub id: String,
    /// The owning session.
    pub session_id: String,
    /// The activity performed.
    #[serde(rename = "type")]
    pub activity: ActivityType,
    /// When the activity started.
    pub start_time: DateTime<Utc>,
    /// When the activity ended; `None` while still open.
    pub end_time: Option<DateTime<Utc>>,
    /// Stored duration, populated when the event is closed.
    #[serde(default)]
    pub duration_minutes: Option<i64>,
}

impl WorkEvent {
    /// Returns true while the activity has no end time.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// The end of the event, with open events ending at `now`.
    ///
    /// Never earlier than the start time.
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end_time.unwrap_or(now).max(self.start_time)
    }

    /// The duration used for measurement, in minutes.
    ///
    /// Closed events prefer the stored duration; open events are measured up
    /// to `now` without being modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use fleet_compliance_engine::models::{ActivityType, WorkEvent};
    ///
    /// let event = WorkEvent {
    ///     id: "evt_001".to_string(),
    ///     session_id: "ses_001".to_string(),
    ///     activity: ActivityType::Driving,
    ///     start_time: Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap(),
    ///     end_time: None,
    ///     duration_minutes: None,
    /// };
    /// let now = Utc.with_ymd_and_hms(2025, 3, 10, 7, 15, 0).unwrap();
    /// assert_eq!(event.measured_minutes(now), 75);
    /// assert!(event.is_open());
    /// ```
    pub fn measured_minutes(&self, now: DateTime<Utc>) -> i64 {
        match (self.end_time, self.duration_minutes) {
            (Some(_), Some(stored)) => stored.max(0),
            _ => (self.effective_end(now) - self.start_time).num_minutes(),
        }
    }
}
