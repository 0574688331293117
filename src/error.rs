//! Error types for the billing engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during rate resolution and
//! billing generation.
//!
//! The variants fall into four groups with different handling policies:
//!
//! - **Configuration** ([`ServiceNotFound`](BillingError::ServiceNotFound),
//!   [`RateUndefined`](BillingError::RateUndefined), seed-file errors):
//!   the catalogue is missing data needed to price a service. Surfaced to
//!   an administrator, never silently defaulted to zero.
//! - **Integrity** ([`OverlappingAssignments`](BillingError::OverlappingAssignments),
//!   [`OverlappingStaffRates`](BillingError::OverlappingStaffRates),
//!   [`DuplicateBillingItem`](BillingError::DuplicateBillingItem)):
//!   corrupt or conflicting records. Resolution halts for the affected
//!   entity; the engine never picks an arbitrary match.
//! - **Missing reference** ([`NoActiveAssignment`](BillingError::NoActiveAssignment),
//!   [`NoStaffRate`](BillingError::NoStaffRate), lookup misses): expected
//!   in normal operation and downgraded to report entries by the generator.
//! - **Whole-run** ([`InvalidBillingPeriod`](BillingError::InvalidBillingPeriod),
//!   [`StoreUnavailable`](BillingError::StoreUnavailable)): abort a
//!   generation run entirely.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BillingPeriod, BillingStatus};

/// The main error type for the billing engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use billing_engine::error::BillingError;
/// use uuid::Uuid;
///
/// let error = BillingError::ServiceNotFound { service_id: Uuid::nil() };
/// assert_eq!(
///     error.to_string(),
///     "Service not found: 00000000-0000-0000-0000-000000000000"
/// );
/// ```
#[derive(Debug, Error)]
pub enum BillingError {
    /// The referenced service does not exist in the catalogue, or is
    /// inactive and the resolution is not an audit replay.
    #[error("Service not found: {service_id}")]
    ServiceNotFound {
        /// The service id that was not found.
        service_id: Uuid,
    },

    /// Neither the assignment nor the catalogue entry defines a monetary
    /// rate for a charge basis that requires one.
    #[error("No rate defined for client {client_id} on service {service_id}")]
    RateUndefined {
        /// The client whose assignment was priced.
        client_id: Uuid,
        /// The service being priced.
        service_id: Uuid,
    },

    /// No active assignment covers the requested date for the
    /// (client, service) pair.
    #[error("No active assignment for client {client_id} on service {service_id} covering {date}")]
    NoActiveAssignment {
        /// The client looked up.
        client_id: Uuid,
        /// The service looked up.
        service_id: Uuid,
        /// The date that no assignment covered.
        date: NaiveDate,
    },

    /// More than one active assignment covers the same date for a
    /// (client, service) pair. Data-integrity violation.
    #[error(
        "Overlapping active assignments for client {client_id} on service {service_id} at {date}"
    )]
    OverlappingAssignments {
        /// The client with conflicting assignments.
        client_id: Uuid,
        /// The service with conflicting assignments.
        service_id: Uuid,
        /// A date inside the conflicting range.
        date: NaiveDate,
    },

    /// The referenced assignment does not exist.
    #[error("Assignment not found: {assignment_id}")]
    AssignmentNotFound {
        /// The assignment id that was not found.
        assignment_id: Uuid,
    },

    /// No active staff rate record covers the requested date.
    #[error("No staff rate for staff member {staff_id} covering {date}")]
    NoStaffRate {
        /// The staff member looked up.
        staff_id: Uuid,
        /// The date that no record covered.
        date: NaiveDate,
    },

    /// More than one active staff rate record covers the same date for a
    /// staff member. Data-integrity violation.
    #[error("Overlapping active rate records for staff member {staff_id} at {date}")]
    OverlappingStaffRates {
        /// The staff member with conflicting records.
        staff_id: Uuid,
        /// A date inside the conflicting range.
        date: NaiveDate,
    },

    /// A billing item already exists for the idempotency key.
    #[error(
        "Billing item already exists for client {client_id}, service {service_id}, period {period}"
    )]
    DuplicateBillingItem {
        /// The client on the existing item.
        client_id: Uuid,
        /// The service on the existing item.
        service_id: Uuid,
        /// The billing period on the existing item.
        period: BillingPeriod,
    },

    /// The referenced billing item does not exist in the ledger.
    #[error("Billing item not found: {item_id}")]
    ItemNotFound {
        /// The item id that was not found.
        item_id: Uuid,
    },

    /// The requested status change is not a legal workflow transition.
    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        /// The item's current status.
        from: BillingStatus,
        /// The requested status.
        to: BillingStatus,
    },

    /// The referenced client does not exist in the client directory.
    #[error("Client not found: {client_id}")]
    ClientNotFound {
        /// The client id that was not found.
        client_id: Uuid,
    },

    /// The referenced payroll run does not exist in the payroll directory.
    #[error("Payroll run not found: {payroll_id}")]
    PayrollNotFound {
        /// The payroll run id that was not found.
        payroll_id: Uuid,
    },

    /// A billing period string could not be parsed.
    #[error("Invalid billing period '{value}': expected YYYY-MM")]
    InvalidBillingPeriod {
        /// The rejected input.
        value: String,
    },

    /// Catalogue seed file was not found at the specified path.
    #[error("Catalogue seed file not found: {path}")]
    SeedNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Catalogue seed file could not be parsed.
    #[error("Failed to parse catalogue seed '{path}': {message}")]
    SeedParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A store could not be read or written. Fatal for the whole run.
    #[error("Store unavailable: {store}")]
    StoreUnavailable {
        /// The store that could not be accessed.
        store: &'static str,
    },
}

/// A type alias for Results that return BillingError.
pub type BillingResult<T> = Result<T, BillingError>;
