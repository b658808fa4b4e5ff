//! Error types for the compliance and payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can surface to a caller.

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;

/// The main error type for the compliance and payroll engine.
///
/// Variants fall into four groups: configuration problems, rejected input,
/// lookups that found nothing, and storage failures. Only storage failures
/// are worth retrying; see [`EngineError::is_retryable`].
///
/// # Example
///
/// ```
/// use fleet_compliance_engine::error::EngineError;
///
/// let error = EngineError::SessionNotFound {
///     session_id: "ses_404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Work session not found: ses_404");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was outside its allowed range.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// No compensation config was in effect on the given date.
    #[error("No compensation configuration in effect on {date}")]
    CompensationConfigNotFound {
        /// The date the config was requested for.
        date: NaiveDate,
    },

    /// A request field was missing or malformed.
    #[error("Invalid request field '{field}': {message}")]
    InvalidRequest {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The requested payroll period does not exist on the calendar.
    #[error("Invalid payroll period {month}/{year}")]
    InvalidPeriod {
        /// The requested month.
        month: u32,
        /// The requested year.
        year: i32,
    },

    /// The work session does not exist.
    #[error("Work session not found: {session_id}")]
    SessionNotFound {
        /// The ID that was looked up.
        session_id: String,
    },

    /// The driver has no work sessions on record.
    #[error("Driver not found: {driver_id}")]
    DriverNotFound {
        /// The ID that was looked up.
        driver_id: String,
    },

    /// The payroll record does not exist.
    #[error("Payroll record not found: {payroll_id}")]
    PayrollNotFound {
        /// The ID that was looked up.
        payroll_id: String,
    },

    /// A payroll status change would move the record backwards.
    #[error("Payroll status cannot move from '{from}' to '{to}'")]
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Returns true when the failure came from infrastructure and the caller
    /// may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Store(_))
    }

    /// Returns true for lookups that found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::SessionNotFound { .. }
                | EngineError::DriverNotFound { .. }
                | EngineError::PayrollNotFound { .. }
                | EngineError::CompensationConfigNotFound { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_compensation_config_not_found_displays_date() {
        let error = EngineError::CompensationConfigNotFound {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No compensation configuration in effect on 2020-01-01"
        );
    }

    #[test]
    fn test_invalid_period_displays_month_and_year() {
        let error = EngineError::InvalidPeriod {
            month: 13,
            year: 2025,
        };
        assert_eq!(error.to_string(), "Invalid payroll period 13/2025");
    }

    #[test]
    fn test_invalid_status_transition_displays_both_states() {
        let error = EngineError::InvalidStatusTransition {
            from: "paid".to_string(),
            to: "computed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Payroll status cannot move from 'paid' to 'computed'"
        );
    }

    #[test]
    fn test_only_store_errors_are_retryable() {
        let store = EngineError::Store(StoreError::Unavailable {
            message: "disk full".to_string(),
        });
        assert!(store.is_retryable());

        let not_found = EngineError::SessionNotFound {
            session_id: "ses_1".to_string(),
        };
        assert!(!not_found.is_retryable());
        assert!(not_found.is_not_found());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_store_error() -> Result<(), StoreError> {
            Err(StoreError::Unavailable {
                message: "offline".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_store_error()?;
            Ok(())
        }

        assert!(matches!(propagates_error(), Err(EngineError::Store(_))));
    }
}
