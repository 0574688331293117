//! HTTP API module for the billing engine.
//!
//! This module provides the REST endpoints for rate resolution, billing
//! generation, the billing ledger, and the read-only directory views.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AdHocRequest, GenerateRequest, ItemsQuery, ResolveRateRequest, StatusChangeRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
