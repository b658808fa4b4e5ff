//! HTTP API module for the compliance and payroll engine.
//!
//! This module provides the REST API endpoints for evaluating work sessions,
//! running monthly payroll and advancing payroll status.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ComplianceRequest, PayrollAggregateRequest, PayrollStatusRequest};
pub use response::{
    ApiError, ApiErrorResponse, ComplianceResponse, DriverPayrollBody, PayrollAggregateResponse,
    PayrollStatusResponse,
};
pub use state::AppState;
