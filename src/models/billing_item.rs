//! Billing ledger entry models.
//!
//! A [`BillingItem`] is one generated line in the billing ledger. Items
//! are created as drafts and move through the approval workflow
//! ([`BillingStatus`]) before being invoiced by the surrounding
//! application.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BillingPeriod;

/// Approval state of a billing item.
///
/// Legal transitions: `Draft -> Pending`, `Pending -> Approved`,
/// `Pending -> Rejected`. The generator only ever creates drafts; it
/// never auto-approves and never touches non-draft items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    /// Freshly generated, not yet submitted for approval.
    Draft,
    /// Submitted, awaiting an approval decision.
    Pending,
    /// Approved for invoicing. Terminal.
    Approved,
    /// Rejected by an approver. Terminal.
    Rejected,
}

impl BillingStatus {
    /// Returns true if moving from `self` to `next` is a legal workflow
    /// transition.
    pub fn can_transition_to(self, next: BillingStatus) -> bool {
        matches!(
            (self, next),
            (BillingStatus::Draft, BillingStatus::Pending)
                | (BillingStatus::Pending, BillingStatus::Approved)
                | (BillingStatus::Pending, BillingStatus::Rejected)
        )
    }
}

/// One generated billing line item.
///
/// For period-based charge bases at most one item exists per
/// (client, service, billing period) — the idempotency key preventing
/// duplicate generation. Event-driven items additionally carry the
/// triggering payroll run so the same run is never billed twice.
///
/// `amount = quantity * unit_price` holds exactly for per-unit items.
/// For blended time-based items the amount is the exact priced total of
/// the period's time entries and `unit_price` is the quotient, rounded
/// at `Decimal` precision when the division does not terminate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingItem {
    /// Unique identifier for the item.
    pub id: Uuid,
    /// The billed client.
    pub client_id: Uuid,
    /// The billed service.
    pub service_id: Uuid,
    /// The staff member, for single-staff time charges.
    pub staff_id: Option<Uuid>,
    /// The triggering payroll run, for event-driven charges.
    pub payroll_id: Option<Uuid>,
    /// Units billed (months, payrolls, employees, or hours).
    pub quantity: Decimal,
    /// The resolved rate per unit.
    pub unit_price: Decimal,
    /// Total charge: `quantity * unit_price`.
    pub amount: Decimal,
    /// Approval workflow state.
    pub status: BillingStatus,
    /// The month the item was generated for.
    pub billing_period: BillingPeriod,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

impl BillingItem {
    /// Creates a draft item, computing `amount` from quantity and unit
    /// price.
    pub fn draft(
        client_id: Uuid,
        service_id: Uuid,
        billing_period: BillingPeriod,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            service_id,
            staff_id: None,
            payroll_id: None,
            quantity,
            unit_price,
            amount: quantity * unit_price,
            status: BillingStatus::Draft,
            billing_period,
            created_at: Utc::now(),
        }
    }

    /// Creates a draft item carrying an externally priced amount.
    ///
    /// The amount is stored exactly as given; `unit_price` is the
    /// blended `amount / quantity`, which may round when the division
    /// does not terminate. `quantity` must be non-zero.
    pub fn draft_with_amount(
        client_id: Uuid,
        service_id: Uuid,
        billing_period: BillingPeriod,
        quantity: Decimal,
        amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            service_id,
            staff_id: None,
            payroll_id: None,
            quantity,
            unit_price: amount / quantity,
            amount,
            status: BillingStatus::Draft,
            billing_period,
            created_at: Utc::now(),
        }
    }
}
