//! Work session model and related types.
//!
//! A [`WorkSession`] is one driver's continuous duty period. Its totals are
//! derived from the session's [`WorkEvent`](super::WorkEvent)s.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compliance::thresholds::{
    CONTINUOUS_DRIVING_LIMIT_CARGO, CONTINUOUS_DRIVING_LIMIT_PASSENGER,
};

/// Lifecycle state of a work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The driver is still on duty.
    Active,
    /// The driver ended the shift.
    Completed,
}

impl SessionStatus {
    /// Returns the string representation for storage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("invalid session status: {s}")),
        }
    }
}

/// The kind of transport the driver operates.
///
/// The category selects the continuous-driving ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverCategory {
    /// Road freight.
    Cargo,
    /// Collective passenger transport.
    Passenger,
}

impl DriverCategory {
    /// Returns the string representation for storage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Passenger => "passenger",
        }
    }

    /// Maximum uninterrupted driving, in minutes, for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleet_compliance_engine::models::DriverCategory;
    ///
    /// assert_eq!(DriverCategory::Cargo.continuous_driving_limit(), 330);
    /// assert_eq!(DriverCategory::Passenger.continuous_driving_limit(), 240);
    /// ```
    pub const fn continuous_driving_limit(&self) -> i64 {
        match self {
            Self::Cargo => CONTINUOUS_DRIVING_LIMIT_CARGO,
            Self::Passenger => CONTINUOUS_DRIVING_LIMIT_PASSENGER,
        }
    }
}

impl fmt::Display for DriverCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cargo" => Ok(Self::Cargo),
            "passenger" => Ok(Self::Passenger),
            _ => Err(format!("invalid driver category: {s}")),
        }
    }
}

/// Minute totals derived from a session's events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    /// Sum of every event's duration.
    pub total_worked_minutes: i64,
    /// Minutes spent driving.
    pub total_driving_minutes: i64,
    /// Minutes spent waiting (loading, unloading, inspections).
    pub total_waiting_minutes: i64,
    /// Minutes spent resting, meal breaks included.
    pub total_rest_minutes: i64,
}

/// One driver's continuous duty period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSession {
    /// Unique identifier for the session.
    pub id: String,
    /// The driver on duty.
    pub driver_id: String,
    /// When the shift started.
    pub start_time: DateTime<Utc>,
    /// When the shift ended; `None` while active.
    pub end_time: Option<DateTime<Utc>>,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// Transport category of the driver for this session.
    pub category: DriverCategory,
    /// Stored minute totals.
    #[serde(default)]
    pub totals: SessionTotals,
    /// Minutes worked beyond the normal daily journey.
    #[serde(default)]
    pub overtime_minutes: i64,
}

impl WorkSession {
    /// Returns true once the driver has ended the shift.
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// The session end, or `now` while the session is still active.
    pub fn effective_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end_time.unwrap_or(now).max(self.start_time)
    }
}
