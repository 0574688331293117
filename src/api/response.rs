//! Response types for the billing engine API.
//!
//! This module defines the error response structures and the mapping
//! from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::BillingError;

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
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
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
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<BillingError> for ApiErrorResponse {
    fn from(error: BillingError) -> Self {
        let message = error.to_string();
        match error {
            BillingError::ServiceNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("SERVICE_NOT_FOUND", message),
            ),
            BillingError::RateUndefined { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "RATE_UNDEFINED",
                    message,
                    "Neither the assignment nor the catalogue defines a rate for this service",
                ),
            ),
            BillingError::NoActiveAssignment { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("NO_ACTIVE_ASSIGNMENT", message),
            ),
            BillingError::OverlappingAssignments { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "OVERLAPPING_ASSIGNMENTS",
                    message,
                    "Conflicting assignment records must be corrected before resolution can proceed",
                ),
            ),
            BillingError::AssignmentNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("ASSIGNMENT_NOT_FOUND", message),
            ),
            BillingError::NoStaffRate { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("NO_STAFF_RATE", message),
            ),
            BillingError::OverlappingStaffRates { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::new("OVERLAPPING_STAFF_RATES", message),
            ),
            BillingError::DuplicateBillingItem { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_BILLING_ITEM", message),
            ),
            BillingError::ItemNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("ITEM_NOT_FOUND", message),
            ),
            BillingError::InvalidStatusTransition { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::new("INVALID_STATUS_TRANSITION", message),
            ),
            BillingError::ClientNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("CLIENT_NOT_FOUND", message),
            ),
            BillingError::PayrollNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("PAYROLL_NOT_FOUND", message),
            ),
            BillingError::InvalidBillingPeriod { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_BILLING_PERIOD", message),
            ),
            BillingError::SeedNotFound { .. } | BillingError::SeedParseError { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("SEED_ERROR", "Catalogue seed error", message),
            ),
            BillingError::StoreUnavailable { .. } => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::new("STORE_UNAVAILABLE", message),
            ),
        }
    }
}
