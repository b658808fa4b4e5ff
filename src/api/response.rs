//! Response types for the compliance and payroll API.
//!
//! This module defines the success bodies of each endpoint and the error
//! response structures, including the mapping from [`EngineError`] to HTTP
//! status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::compliance::{ComplianceReport, RecordFailure};
use crate::error::EngineError;
use crate::models::{AuditTrace, PayrollRecord, RunOutcome, SessionTotals, Violation};
use crate::payroll::{DriverPayrollResult, DriverPayrollStatus, PayrollRunReport};

/// Response body for `POST /compliance/evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResponse {
    /// True when every write went through.
    pub success: bool,
    /// How the run ended.
    pub outcome: RunOutcome,
    /// The evaluated session.
    pub session_id: String,
    /// The session's driver.
    pub driver_id: String,
    /// Number of violations found.
    pub violation_count: usize,
    /// The violations found.
    pub details: Vec<Violation>,
    /// Minutes beyond the normal journey.
    pub overtime_minutes: i64,
    /// Longest uninterrupted driving.
    pub peak_continuous_driving_minutes: i64,
    /// Minute totals.
    pub totals: SessionTotals,
    /// Rule-by-rule trace.
    pub audit_trace: AuditTrace,
    /// Writes that failed.
    pub failures: Vec<RecordFailure>,
}

impl From<ComplianceReport> for ComplianceResponse {
    fn from(report: ComplianceReport) -> Self {
        let evaluation = report.evaluation;
        Self {
            success: report.record.is_complete(),
            outcome: report.outcome,
            session_id: evaluation.session_id,
            driver_id: evaluation.driver_id,
            violation_count: evaluation.violations.len(),
            details: evaluation.violations,
            overtime_minutes: evaluation.overtime_minutes,
            peak_continuous_driving_minutes: evaluation.peak_continuous_driving_minutes,
            totals: evaluation.totals,
            audit_trace: evaluation.audit_trace,
            failures: report.record.failures,
        }
    }
}

/// One driver's entry in a payroll run response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPayrollBody {
    /// The driver.
    pub driver: String,
    /// What happened.
    pub status: DriverPayrollStatus,
    /// The stored statement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payroll_record: Option<PayrollRecord>,
    /// Skip reason or failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Whether a failed driver may be retried.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
    /// How the statement was calculated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_trace: Option<AuditTrace>,
}

impl From<DriverPayrollResult> for DriverPayrollBody {
    fn from(result: DriverPayrollResult) -> Self {
        Self {
            driver: result.driver_id,
            status: result.status,
            payroll_record: result.payroll_record,
            reason: result.reason,
            retryable: result.retryable,
            audit_trace: result.audit_trace,
        }
    }
}

/// Response body for `POST /payroll/aggregate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollAggregateResponse {
    /// True when no driver failed.
    pub success: bool,
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Month covered.
    pub month: u32,
    /// Year covered.
    pub year: i32,
    /// Statements created.
    pub processed: usize,
    /// Drivers skipped.
    pub skipped: usize,
    /// Drivers that failed.
    pub failed: usize,
    /// One entry per driver.
    pub results: Vec<DriverPayrollBody>,
}

impl From<PayrollRunReport> for PayrollAggregateResponse {
    fn from(report: PayrollRunReport) -> Self {
        Self {
            success: report.failed == 0,
            outcome: report.outcome,
            month: report.period.month,
            year: report.period.year,
            processed: report.processed,
            skipped: report.skipped,
            failed: report.failed,
            results: report.results.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response body for `POST /payroll/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollStatusResponse {
    /// Always true; failures use the error body.
    pub success: bool,
    /// The statement after the change.
    pub payroll_record: PayrollRecord,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// True when the same request may succeed if retried.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an internal error response.
    pub fn internal(details: impl Into<String>) -> Self {
        Self::with_details("INTERNAL_ERROR", "Internal error", details)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidConfig { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::CompensationConfigNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "COMPENSATION_CONFIG_NOT_FOUND",
                    message,
                    "No compensation parameters cover the requested period",
                ),
            ),
            EngineError::InvalidRequest { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::validation_error(message))
            }
            EngineError::InvalidPeriod { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_PERIOD",
                    message,
                    "Month must be 1 to 12 and year a four-digit year",
                ),
            ),
            EngineError::SessionNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("SESSION_NOT_FOUND", message),
            ),
            EngineError::DriverNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("DRIVER_NOT_FOUND", message),
            ),
            EngineError::PayrollNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("PAYROLL_NOT_FOUND", message),
            ),
            EngineError::InvalidStatusTransition { .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "INVALID_STATUS_TRANSITION",
                    message,
                    "Payroll status moves computed -> approved -> paid, one step at a time",
                ),
            ),
            EngineError::Store(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError {
                    retryable: true,
                    ..ApiError::with_details("STORE_UNAVAILABLE", "Work store unavailable", message)
                },
            ),
        };
        ApiErrorResponse { status, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
        assert!(!json.contains("retryable"));
    }

    #[test]
    fn test_session_not_found_is_404() {
        let api_error: ApiErrorResponse = EngineError::SessionNotFound {
            session_id: "ses_404".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "SESSION_NOT_FOUND");
        assert!(api_error.error.message.contains("ses_404"));
    }

    #[test]
    fn test_invalid_period_is_400() {
        let api_error: ApiErrorResponse = EngineError::InvalidPeriod {
            month: 13,
            year: 2025,
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_PERIOD");
    }

    #[test]
    fn test_store_failure_is_retryable_503() {
        let api_error: ApiErrorResponse = EngineError::Store(StoreError::Unavailable {
            message: "database is locked".to_string(),
        })
        .into();
        assert_eq!(api_error.status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(api_error.error.retryable);
        let json = serde_json::to_string(&api_error.error).unwrap();
        assert!(json.contains("\"retryable\":true"));
    }

    #[test]
    fn test_backwards_status_is_conflict() {
        let api_error: ApiErrorResponse = EngineError::InvalidStatusTransition {
            from: "paid".to_string(),
            to: "approved".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
    }
}
