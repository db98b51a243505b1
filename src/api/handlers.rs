//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    build_payroll_line, compute_tax_breakdown, compute_trial_balance,
    compute_trial_balance_for_period, run_payroll,
};
use crate::error::EngineError;

use super::request::{PayRunRequest, PayrollLineRequest, TrialBalanceRequest};
use super::response::{ApiError, ApiErrorResponse, PayrollLineResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/line", post(payroll_line_handler))
        .route("/payroll/run", post(pay_run_handler))
        .route("/trial-balance", post(trial_balance_handler))
        .with_state(state)
}

/// Handler for POST /payroll/line.
///
/// Computes one employee's payroll line and the tax breakdown behind it.
async fn payroll_line_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollLineRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll line request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let config = state.config();
    let result = compute_tax_breakdown(request.gross_salary, request.residency, config.tax_tables())
        .and_then(|tax_breakdown| {
            build_payroll_line(request.gross_salary, request.residency, config).map(|line| {
                PayrollLineResponse {
                    jurisdiction: state.jurisdiction().code.clone(),
                    line,
                    tax_breakdown,
                }
            })
        });

    match result {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                gross = %response.line.gross_salary,
                net = %response.line.net_pay,
                "Payroll line calculated"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /payroll/run.
///
/// Runs payroll for every employee in the request. Per-employee failures are
/// part of a successful response; only an invalid period fails the request.
async fn pay_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing pay run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match run_payroll(&request.pay_period, &request.employees, state.config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                pay_run_id = %result.pay_run_id,
                employees = request.employees.len(),
                failures = result.failures.len(),
                "Pay run request completed"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /trial-balance.
async fn trial_balance_handler(
    payload: Result<Json<TrialBalanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing trial balance request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = match &request.period {
        Some(period) => compute_trial_balance_for_period(&request.entries, period),
        None => compute_trial_balance(&request.entries),
    };

    match result {
        Ok(balance) => {
            info!(
                correlation_id = %correlation_id,
                entries = request.entries.len(),
                is_balanced = balance.is_balanced,
                duration_us = start_time.elapsed().as_micros() as u64,
                "Trial balance computed"
            );
            json_response(StatusCode::OK, balance)
        }
        Err(err) => engine_error_response(correlation_id, err),
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

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        code = err.code(),
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // serde's message names the offending field
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
    ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::{
        accounts, bracket, contribution_rates, illustrative_config, metadata, money,
    };
    use crate::config::{PayrollConfig, TaxTables};
    use crate::models::{Money, PayRunResult, TrialBalance};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        AppState::new(illustrative_config())
    }

    async fn post_json(router: Router, uri: &str, body: impl Into<Body>) -> Response {
        router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn read_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_payroll_line_returns_200() {
        let router = create_router(create_test_state());
        let response = post_json(
            router,
            "/payroll/line",
            r#"{"gross_salary": "1000.00", "residency": "resident"}"#,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let result: PayrollLineResponse = read_body(response).await;
        assert_eq!(result.jurisdiction, "TL");
        assert_eq!(result.line.tax_withheld, money("50.00"));
        assert_eq!(result.line.net_pay, money("910.00"));
        assert_eq!(result.tax_breakdown.portions.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let response = post_json(router, "/payroll/line", "{invalid json").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_400() {
        let router = create_router(create_test_state());
        let response = post_json(router, "/payroll/line", r#"{"residency": "resident"}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(
            error.message.contains("missing field"),
            "Expected a missing field message, got: {}",
            error.message
        );
    }

    #[tokio::test]
    async fn test_negative_gross_returns_400() {
        let router = create_router(create_test_state());
        let response = post_json(
            router,
            "/payroll/line",
            r#"{"gross_salary": "-1.00", "residency": "resident"}"#,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_negative_net_pay_returns_422() {
        let config = PayrollConfig::new(
            metadata(),
            TaxTables {
                resident: vec![bracket("0", None, "0.70")],
                non_resident: vec![bracket("0", None, "0.70")],
            },
            contribution_rates("0.40", "0.06"),
            accounts(),
        )
        .unwrap();
        let router = create_router(AppState::new(config));
        let response = post_json(
            router,
            "/payroll/line",
            r#"{"gross_salary": "1000.00", "residency": "resident"}"#,
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "NEGATIVE_NET_PAY");
    }

    #[tokio::test]
    async fn test_pay_run_returns_entry_and_failures() {
        let router = create_router(create_test_state());
        let body = r#"{
            "pay_period": {"start_date": "2026-01-01", "end_date": "2026-01-31"},
            "employees": [
                {"employee_id": "emp_001", "gross_salary": "1000.00", "residency": "resident"},
                {"employee_id": "emp_002", "gross_salary": "-5.00", "residency": "resident"}
            ]
        }"#;
        let response = post_json(router, "/payroll/run", body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let result: PayRunResult = read_body(response).await;
        assert_eq!(result.payslips.len(), 1);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].employee_id, "emp_002");
        assert!(result.journal_entry.unwrap().is_balanced());
    }

    #[tokio::test]
    async fn test_pay_run_with_reversed_period_returns_400() {
        let router = create_router(create_test_state());
        let body = r#"{
            "pay_period": {"start_date": "2026-01-31", "end_date": "2026-01-01"},
            "employees": []
        }"#;
        let response = post_json(router, "/payroll/run", body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_trial_balance_of_empty_ledger() {
        let router = create_router(create_test_state());
        let response = post_json(router, "/trial-balance", r#"{"entries": []}"#).await;

        assert_eq!(response.status(), StatusCode::OK);
        let balance: TrialBalance = read_body(response).await;
        assert_eq!(balance.total_debits, Money::ZERO);
        assert!(balance.is_balanced);
    }

    #[tokio::test]
    async fn test_trial_balance_overflow_returns_500() {
        let router = create_router(create_test_state());
        let entry = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "entry_date": "2026-01-31",
            "description": "Large",
            "lines": [
                {"account_name": "Salary Expense", "debit_amount": "50000000000000000.00", "credit_amount": "0.00"},
                {"account_name": "Cash", "debit_amount": "0.00", "credit_amount": "50000000000000000.00"}
            ]
        }"#;
        let body = format!(r#"{{"entries": [{}, {}]}}"#, entry, entry);
        let response = post_json(router, "/trial-balance", body).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: ApiError = read_body(response).await;
        assert_eq!(error.code, "CALCULATION_ERROR");
    }

    #[tokio::test]
    async fn test_trial_balance_flags_unbalanced_entry() {
        let router = create_router(create_test_state());
        let body = r#"{
            "entries": [{
                "id": "00000000-0000-0000-0000-000000000000",
                "entry_date": "2026-01-31",
                "description": "Manual",
                "lines": [
                    {"account_name": "Salary Expense", "debit_amount": "100.00", "credit_amount": "0.00"},
                    {"account_name": "Cash", "debit_amount": "0.00", "credit_amount": "99.00"}
                ]
            }]
        }"#;
        let response = post_json(router, "/trial-balance", body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let balance: TrialBalance = read_body(response).await;
        assert_eq!(balance.total_debits, money("100.00"));
        assert_eq!(balance.total_credits, money("99.00"));
        assert!(!balance.is_balanced);
    }
}
