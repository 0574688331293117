//! Generation run reporting.
//!
//! A [`GenerationReport`] is the sole way callers learn what a billing
//! run did: items created, items skipped as already billed, and
//! per-assignment failures with reasons. The generator never raises for
//! a single bad assignment; it downgrades the error into the report and
//! keeps going.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BillingItem, BillingPeriod};

/// One assignment that could not be billed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationFailure {
    /// The assignment that failed.
    pub assignment_id: Uuid,
    /// The client on the assignment.
    pub client_id: Uuid,
    /// The service on the assignment.
    pub service_id: Uuid,
    /// Why the assignment could not be billed.
    pub reason: String,
}

/// The structured outcome of one billing-generation run.
///
/// # Example
///
/// ```
/// use billing_engine::generation::GenerationReport;
///
/// let report = GenerationReport::new("2024-03".parse().unwrap(), false);
/// assert_eq!(report.items_created, 0);
/// assert!(report.errors.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// The period the run generated for.
    pub period: BillingPeriod,
    /// Whether the run was a dry run (nothing persisted).
    pub dry_run: bool,
    /// Number of items created (or, on a dry run, that would be).
    pub items_created: u32,
    /// Number of assignments skipped: already billed, or nothing to bill.
    pub items_skipped: u32,
    /// Sum of the amounts of all created items.
    pub total_amount: Decimal,
    /// Per-assignment failures. Never aborts the run.
    pub errors: Vec<GenerationFailure>,
    /// The created items (not persisted when `dry_run` is set).
    pub items: Vec<BillingItem>,
}

impl GenerationReport {
    /// Creates an empty report for a run.
    pub fn new(period: BillingPeriod, dry_run: bool) -> Self {
        Self {
            period,
            dry_run,
            items_created: 0,
            items_skipped: 0,
            total_amount: Decimal::ZERO,
            errors: Vec::new(),
            items: Vec::new(),
        }
    }

    /// Records a created item.
    pub fn record_created(&mut self, item: BillingItem) {
        self.items_created += 1;
        self.total_amount += item.amount;
        self.items.push(item);
    }

    /// Records a skip (already billed or nothing to bill).
    pub fn record_skipped(&mut self) {
        self.items_skipped += 1;
    }

    /// Records a per-assignment failure.
    pub fn record_failure(
        &mut self,
        assignment_id: Uuid,
        client_id: Uuid,
        service_id: Uuid,
        reason: impl Into<String>,
    ) {
        self.errors.push(GenerationFailure {
            assignment_id,
            client_id,
            service_id,
            reason: reason.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_record_created_accumulates_total() {
        let mut report = GenerationReport::new("2024-03".parse().unwrap(), false);
        let item = BillingItem::draft(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "2024-03".parse().unwrap(),
            dec("1"),
            dec("800.00"),
        );
        report.record_created(item.clone());
        report.record_created(item);

        assert_eq!(report.items_created, 2);
        assert_eq!(report.total_amount, dec("1600.00"));
        assert_eq!(report.items.len(), 2);
    }

    #[test]
    fn test_record_failure_keeps_assignment_identity() {
        let mut report = GenerationReport::new("2024-03".parse().unwrap(), false);
        let assignment_id = Uuid::new_v4();
        report.record_failure(assignment_id, Uuid::new_v4(), Uuid::new_v4(), "no staff rate");

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].assignment_id, assignment_id);
        assert_eq!(report.errors[0].reason, "no staff rate");
    }

    #[test]
    fn test_report_serializes_period_as_string() {
        let report = GenerationReport::new("2024-03".parse().unwrap(), true);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"period\":\"2024-03\""));
        assert!(json.contains("\"dry_run\":true"));
    }
}
