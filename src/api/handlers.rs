//! HTTP request handlers for the compliance and payroll API.
//!
//! This module contains the handler functions for all API endpoints. Engine
//! calls hit the store synchronously, so they run on the blocking pool.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::compliance::run_compliance_check;
use crate::error::EngineResult;
use crate::models::PayrollPeriod;
use crate::payroll::{advance_payroll_status, run_payroll_aggregation};

use super::request::{ComplianceRequest, PayrollAggregateRequest, PayrollStatusRequest};
use super::response::{
    ApiError, ApiErrorResponse, ComplianceResponse, PayrollAggregateResponse,
    PayrollStatusResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/compliance/evaluate", post(evaluate_compliance_handler))
        .route("/payroll/aggregate", post(aggregate_payroll_handler))
        .route("/payroll/status", post(payroll_status_handler))
        .with_state(state)
}

/// Handler for POST /compliance/evaluate.
async fn evaluate_compliance_handler(
    State(state): State<AppState>,
    payload: Result<Json<ComplianceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing compliance request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let (_, store) = state.handles();
    let session_id = request.session_id;
    let result = run_blocking(move || {
        run_compliance_check(store.as_ref(), &session_id, Utc::now())
    })
    .await;

    match result {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                session_id = %report.evaluation.session_id,
                violation_count = report.evaluation.violations.len(),
                outcome = %report.outcome,
                "Compliance evaluation completed"
            );
            json_response(StatusCode::OK, ComplianceResponse::from(report))
        }
        Err(api_error) => error_response(correlation_id, api_error),
    }
}

/// Handler for POST /payroll/aggregate.
async fn aggregate_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollAggregateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let period = match PayrollPeriod::new(request.month, request.year) {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err.into()),
    };

    let (config, store) = state.handles();
    let driver_id = request.driver_id;
    let result = run_blocking(move || {
        run_payroll_aggregation(
            store.as_ref(),
            &config,
            period,
            driver_id.as_deref(),
            Utc::now(),
        )
    })
    .await;

    match result {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                period = %report.period,
                processed = report.processed,
                skipped = report.skipped,
                failed = report.failed,
                "Payroll aggregation completed"
            );
            json_response(StatusCode::OK, PayrollAggregateResponse::from(report))
        }
        Err(api_error) => error_response(correlation_id, api_error),
    }
}

/// Handler for POST /payroll/status.
async fn payroll_status_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollStatusRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll status request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let (_, store) = state.handles();
    let result = run_blocking(move || {
        advance_payroll_status(store.as_ref(), request.payroll_id, request.status)
    })
    .await;

    match result {
        Ok(record) => json_response(
            StatusCode::OK,
            PayrollStatusResponse {
                success: true,
                payroll_record: record,
            },
        ),
        Err(api_error) => error_response(correlation_id, api_error),
    }
}

/// Runs an engine call on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, ApiErrorResponse>
where
    F: FnOnce() -> EngineResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result.map_err(ApiErrorResponse::from),
        Err(join_error) => Err(ApiErrorResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::internal(join_error.to_string()),
        }),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, api_error: ApiErrorResponse) -> Response {
    warn!(
        correlation_id = %correlation_id,
        status = api_error.status.as_u16(),
        code = %api_error.error.code,
        error = %api_error.error.message,
        "Request failed"
    );
    json_response(api_error.status, api_error.error)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}
