//! The billing engine: stores plus the operations exposed to callers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::BillingResult;
use crate::generation::{self, GenerationOptions, GenerationReport};
use crate::models::{BillingItem, BillingPeriod};
use crate::resolution::{RateResolution, ResolveMode, resolve_rate};
use crate::store::{
    AssignmentStore, BillingLedger, ClientDirectory, PayrollDirectory, ServiceCatalogue,
    StaffRateHistory, TimeEntryStore,
};

/// The engine's stores and entry points, bundled for sharing.
///
/// All stores use interior locking, so a `BillingEngine` wrapped in an
/// `Arc` can serve concurrent callers; the ledger's unique insert is the
/// only synchronization the generation run relies on.
///
/// # Example
///
/// ```
/// use billing_engine::BillingEngine;
/// use billing_engine::generation::GenerationOptions;
///
/// let engine = BillingEngine::new();
/// let report = engine
///     .generate("2024-03".parse().unwrap(), &GenerationOptions::default())
///     .unwrap();
/// assert_eq!(report.items_created, 0);
/// ```
#[derive(Debug, Default)]
pub struct BillingEngine {
    /// Service definitions and default multiplier tables.
    pub catalogue: ServiceCatalogue,
    /// Client subscriptions with overrides and effective ranges.
    pub assignments: AssignmentStore,
    /// Effective-dated staff hourly rates.
    pub staff_rates: StaffRateHistory,
    /// Generated billing items and their approval state.
    pub ledger: BillingLedger,
    /// Client directory (external collaborator).
    pub clients: ClientDirectory,
    /// Payroll directory (external collaborator).
    pub payrolls: PayrollDirectory,
    /// Recorded time entries (external collaborator).
    pub time_entries: TimeEntryStore,
}

impl BillingEngine {
    /// Creates an engine with empty stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine around a pre-populated service catalogue.
    pub fn with_catalogue(catalogue: ServiceCatalogue) -> Self {
        Self {
            catalogue,
            ..Self::default()
        }
    }

    /// Resolves the effective rate for a (client, service, date) tuple.
    ///
    /// See [`resolve_rate`] for the algorithm and error contract.
    pub fn resolve_rate(
        &self,
        client_id: Uuid,
        service_id: Uuid,
        as_of: NaiveDate,
        staff_id: Option<Uuid>,
        mode: ResolveMode,
    ) -> BillingResult<RateResolution> {
        resolve_rate(
            &self.catalogue,
            &self.assignments,
            &self.staff_rates,
            client_id,
            service_id,
            as_of,
            staff_id,
            mode,
        )
    }

    /// Runs billing generation for a period.
    ///
    /// See [`generation::generate`] for the contract.
    pub fn generate(
        &self,
        period: BillingPeriod,
        options: &GenerationOptions,
    ) -> BillingResult<GenerationReport> {
        generation::generate(self, period, options)
    }

    /// Bills a processed payroll run for every event-driven assignment
    /// the run's client holds.
    ///
    /// See [`generation::bill_processed_payroll`].
    pub fn bill_processed_payroll(&self, payroll_id: Uuid) -> BillingResult<GenerationReport> {
        generation::bill_processed_payroll(self, payroll_id)
    }

    /// Raises a one-off ad-hoc charge.
    ///
    /// See [`generation::bill_ad_hoc`].
    pub fn bill_ad_hoc(
        &self,
        client_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
        quantity: Decimal,
    ) -> BillingResult<BillingItem> {
        generation::bill_ad_hoc(self, client_id, service_id, date, quantity)
    }
}
