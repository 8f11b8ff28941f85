//! HTTP request handlers for the manday engine API.
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
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::reconcile;
use crate::sources::{HolidayProvider, StaticHolidays};

use super::request::{ReconcileRequest, ValidatedRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reconcile", post(reconcile_handler))
        .with_state(state)
}

/// Handler for POST /reconcile endpoint.
///
/// Accepts raw progress and leave rows and returns the reconciliation report.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing reconcile request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    ApiError::validation_error(body_text)
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
            return ApiErrorResponse::bad_request(error).into_response();
        }
    };

    let validated = match ValidatedRequest::try_from(request) {
        Ok(validated) => validated,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Request failed validation"
            );
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let config = state.config();
    let request_holidays = validated.public_holidays.map(StaticHolidays::new);
    let holidays: &dyn HolidayProvider = match &request_holidays {
        Some(provider) => provider,
        None => config.holiday_provider(),
    };

    let start_time = Instant::now();
    match reconcile(&validated.input, config.schemas(), holidays) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                people = report.summary.len(),
                dropped_rows = report.diagnostics.dropped_total(),
                duration_us = start_time.elapsed().as_micros() as u64,
                "Reconciliation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(report),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Reconciliation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::request::RawRowInput;
    use crate::config::ConfigLoader;
    use crate::models::{RawValue, Report};
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        AppState::new(config)
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn keyed(cells: &[(&str, RawValue)]) -> RawRowInput {
        RawRowInput::Keyed(
            cells
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn create_valid_request() -> ReconcileRequest {
        ReconcileRequest {
            start_date: Some(make_date("2024-01-08")),
            end_date: Some(make_date("2024-01-14")),
            progress_rows: Some(vec![keyed(&[
                ("Date", RawValue::from("2024-01-09")),
                ("Duration", RawValue::Number(8.0)),
                ("Firstname", RawValue::from("Ada")),
                ("Lastname", RawValue::from("Lovelace")),
                ("EmployeeID", RawValue::from("E-1")),
                ("ActivityName", RawValue::from("Engine design")),
            ])]),
            leave_rows: Some(vec![]),
            ..ReconcileRequest::default()
        }
    }

    async fn post_json(body: String) -> Response {
        create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/reconcile")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_request_returns_200() {
        let body = serde_json::to_string(&create_valid_request()).unwrap();
        let response = post_json(body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let report: Report = serde_json::from_slice(&body).unwrap();

        assert_eq!(report.summary.len(), 1);
        assert_eq!(report.summary[0].mandays, Decimal::ONE);
        assert_eq!(report.daily[0].days.len(), 7);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let response = post_json("{invalid json".to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_start_date_returns_400() {
        let mut request = create_valid_request();
        request.start_date = None;
        let response = post_json(serde_json::to_string(&request).unwrap()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MISSING_PARAMETER");
        assert!(error.message.contains("start_date"));
    }

    #[tokio::test]
    async fn test_reversed_range_returns_400() {
        let mut request = create_valid_request();
        request.end_date = Some(make_date("2024-01-01"));
        let response = post_json(serde_json::to_string(&request).unwrap()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INVALID_DATE_RANGE");
    }

    #[tokio::test]
    async fn test_wrong_date_type_is_validation_error() {
        let body = r#"{"start_date": 5, "end_date": "2024-01-14", "progress_rows": [], "leave_rows": []}"#;
        let response = post_json(body.to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_request_holidays_replace_configured_ones() {
        let mut request = create_valid_request();
        request.public_holidays = Some(vec![crate::api::request::PublicHolidayRequest {
            date: make_date("2024-01-09"),
            name: "Company Day".to_string(),
            region: "national".to_string(),
        }]);
        let response = post_json(serde_json::to_string(&request).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let report: Report = serde_json::from_slice(&body).unwrap();
        assert_eq!(report.summary[0].mandays, Decimal::ZERO);
        assert_eq!(report.summary[0].overtime, Decimal::ONE);
    }
}
