//! Request types for the compliance and payroll API.
//!
//! Bodies use camelCase field names on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PayrollStatus;

/// Request body for `POST /compliance/evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRequest {
    /// The session to evaluate.
    pub session_id: String,
}

/// Request body for `POST /payroll/aggregate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollAggregateRequest {
    /// Month, 1 to 12.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
    /// Restricts the run to one driver. Omit to run every driver with a
    /// completed session in the month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
}

/// Request body for `POST /payroll/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollStatusRequest {
    /// The statement to update.
    pub payroll_id: Uuid,
    /// The requested status.
    pub status: PayrollStatus,
}
