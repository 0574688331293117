//! HTTP request handlers for the billing engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::GenerationOptions;

use super::request::{
    AdHocRequest, GenerateRequest, ItemsQuery, ResolveRateRequest, StatusChangeRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rates/resolve", post(resolve_handler))
        .route("/billing/generate", post(generate_handler))
        .route("/billing/ad-hoc", post(ad_hoc_handler))
        .route("/billing/items", get(list_items_handler))
        .route("/billing/items/:id/status", post(status_handler))
        .route("/payrolls/:id/bill", post(bill_payroll_handler))
        .route("/clients/:id/assignments", get(client_assignments_handler))
        .route("/staff/:id/rates", get(staff_rates_handler))
        .with_state(state)
}

/// Turns a body rejection into an API error.
fn rejection_error(correlation_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries the detailed serde error
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => ApiError::new(
            "MISSING_CONTENT_TYPE",
            "Content-Type must be application/json",
        ),
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Handler for POST /rates/resolve.
///
/// Resolves the effective rate for a (client, service, date) tuple and
/// returns it with provenance.
async fn resolve_handler(
    State(state): State<AppState>,
    payload: Result<Json<ResolveRateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_error(correlation_id, rejection);
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    info!(
        correlation_id = %correlation_id,
        client_id = %request.client_id,
        service_id = %request.service_id,
        as_of = %request.as_of,
        "Processing rate resolution request"
    );

    match state.engine().resolve_rate(
        request.client_id,
        request.service_id,
        request.as_of,
        request.staff_id,
        request.mode,
    ) {
        Ok(resolution) => {
            info!(
                correlation_id = %correlation_id,
                amount = %resolution.amount,
                source = ?resolution.source,
                "Rate resolved"
            );
            (StatusCode::OK, Json(resolution)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Rate resolution failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /billing/generate.
///
/// Runs billing generation for a period. Per-assignment failures do not
/// fail the request; they come back inside the report.
async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_error(correlation_id, rejection);
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    info!(
        correlation_id = %correlation_id,
        period = %request.period,
        dry_run = request.dry_run,
        "Processing generation request"
    );

    let options = GenerationOptions {
        client_ids: request.client_ids,
        dry_run: request.dry_run,
    };

    match state.engine().generate(request.period, &options) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Generation run failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /billing/ad-hoc.
async fn ad_hoc_handler(
    State(state): State<AppState>,
    payload: Result<Json<AdHocRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_error(correlation_id, rejection);
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    info!(
        correlation_id = %correlation_id,
        client_id = %request.client_id,
        service_id = %request.service_id,
        "Processing ad-hoc billing request"
    );

    match state.engine().bill_ad_hoc(
        request.client_id,
        request.service_id,
        request.date,
        request.quantity,
    ) {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Ad-hoc billing failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /billing/items.
async fn list_items_handler(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> impl IntoResponse {
    match state
        .engine()
        .ledger
        .query(query.period, query.client_id, query.status)
    {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for POST /billing/items/:id/status.
///
/// Moves a billing item through the approval workflow. Illegal
/// transitions come back as 409.
async fn status_handler(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    payload: Result<Json<StatusChangeRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_error(correlation_id, rejection);
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    match state.engine().ledger.transition(item_id, request.status) {
        Ok(item) => {
            info!(
                correlation_id = %correlation_id,
                item_id = %item_id,
                status = ?item.status,
                "Billing item transitioned"
            );
            (StatusCode::OK, Json(item)).into_response()
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Status transition failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payrolls/:id/bill.
async fn bill_payroll_handler(
    State(state): State<AppState>,
    Path(payroll_id): Path<Uuid>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, payroll_id = %payroll_id, "Billing processed payroll");

    match state.engine().bill_processed_payroll(payroll_id) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Payroll billing failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /clients/:id/assignments.
async fn client_assignments_handler(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.engine().assignments.list_for_client(client_id) {
        Ok(assignments) => (StatusCode::OK, Json(assignments)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Handler for GET /staff/:id/rates.
async fn staff_rates_handler(
    State(state): State<AppState>,
    Path(staff_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.engine().staff_rates.history(staff_id) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}
