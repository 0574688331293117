//! Request types for the billing engine API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BillingPeriod, BillingStatus};
use crate::resolution::ResolveMode;

/// Request body for POST /rates/resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRateRequest {
    /// The client whose assignment should be priced.
    pub client_id: Uuid,
    /// The service to price.
    pub service_id: Uuid,
    /// The date the rate should be effective on.
    pub as_of: NaiveDate,
    /// Staff member for time-and-seniority pricing; omitted otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<Uuid>,
    /// Resolution mode; defaults to current-state resolution.
    #[serde(default)]
    pub mode: ResolveMode,
}

/// Request body for POST /billing/generate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The billing period to generate for, as "YYYY-MM".
    pub period: BillingPeriod,
    /// Restrict the run to these clients; omitted bills everyone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ids: Option<Vec<Uuid>>,
    /// Compute and report without persisting anything.
    #[serde(default)]
    pub dry_run: bool,
}

/// Request body for POST /billing/items/:id/status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    /// The status to move the item to.
    pub status: BillingStatus,
}

/// Request body for POST /billing/ad-hoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdHocRequest {
    /// The client to charge.
    pub client_id: Uuid,
    /// The ad-hoc service performed.
    pub service_id: Uuid,
    /// The date the work was performed; determines the rate and period.
    pub date: NaiveDate,
    /// Units of work performed.
    pub quantity: Decimal,
}

/// Query parameters for GET /billing/items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsQuery {
    /// Filter to a billing period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BillingPeriod>,
    /// Filter to a client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,
    /// Filter to a workflow status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BillingStatus>,
}
