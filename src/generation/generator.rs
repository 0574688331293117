//! The billing generation run.
//!
//! [`generate`] walks the active assignments whose charge basis the
//! monthly job owns, computes quantities, resolves rates, and emits
//! draft billing items idempotently. [`bill_processed_payroll`] and
//! [`bill_ad_hoc`] cover the event-driven charge bases the monthly job
//! deliberately leaves alone.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::BillingEngine;
use crate::error::{BillingError, BillingResult};
use crate::models::{
    BillingItem, BillingPeriod, ChargeBasis, ClientServiceAssignment, Service,
};
use crate::resolution::ResolveMode;

use super::report::GenerationReport;

/// Options for a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Restrict the run to these clients; `None` bills everyone.
    pub client_ids: Option<Vec<Uuid>>,
    /// Compute and report without persisting anything.
    pub dry_run: bool,
}

/// Outcome of billing one assignment.
enum Outcome {
    Created(BillingItem),
    /// Already billed, or nothing to bill this period.
    Skipped,
    /// Event-driven basis; not this job's concern.
    NotPeriodic,
    /// Could not be billed; reason goes in the report.
    Failed(String),
}

/// Generates billing items for every active, periodically-billed
/// assignment in the period.
///
/// Per assignment: compute the quantity for the charge basis, skip if an
/// item already exists for (client, service, period), resolve the rate
/// as of the first day of the period (or per time entry for time-based
/// bases), and persist a draft item. Any per-assignment failure is
/// recorded in the report and the run continues; only infrastructure
/// failures abort the whole run.
///
/// Running the same period twice is safe: the second run creates nothing
/// and reports every assignment as skipped.
pub fn generate(
    engine: &BillingEngine,
    period: BillingPeriod,
    options: &GenerationOptions,
) -> BillingResult<GenerationReport> {
    info!(period = %period, dry_run = options.dry_run, "Starting billing generation run");
    let mut report = GenerationReport::new(period, options.dry_run);

    let assignments = engine.assignments.active_snapshot()?;
    for assignment in assignments {
        if let Some(filter) = &options.client_ids {
            if !filter.contains(&assignment.client_id) {
                continue;
            }
        }

        match bill_assignment(engine, &assignment, period, options.dry_run) {
            Ok(Outcome::Created(item)) => report.record_created(item),
            Ok(Outcome::Skipped) => report.record_skipped(),
            Ok(Outcome::NotPeriodic) => {}
            Ok(Outcome::Failed(reason)) => {
                warn!(
                    assignment_id = %assignment.id,
                    client_id = %assignment.client_id,
                    service_id = %assignment.service_id,
                    reason,
                    "Assignment could not be billed"
                );
                report.record_failure(
                    assignment.id,
                    assignment.client_id,
                    assignment.service_id,
                    reason,
                );
            }
            // Infrastructure failures abort the run; everything else is
            // downgraded to a report entry.
            Err(err @ BillingError::StoreUnavailable { .. }) => return Err(err),
            Err(err) => {
                warn!(
                    assignment_id = %assignment.id,
                    error = %err,
                    "Assignment could not be billed"
                );
                report.record_failure(
                    assignment.id,
                    assignment.client_id,
                    assignment.service_id,
                    err.to_string(),
                );
            }
        }
    }

    info!(
        period = %period,
        items_created = report.items_created,
        items_skipped = report.items_skipped,
        errors = report.errors.len(),
        total_amount = %report.total_amount,
        "Billing generation run complete"
    );
    Ok(report)
}

fn bill_assignment(
    engine: &BillingEngine,
    assignment: &ClientServiceAssignment,
    period: BillingPeriod,
    dry_run: bool,
) -> BillingResult<Outcome> {
    let service = engine.catalogue.get(assignment.service_id)?;
    if !service.charge_basis.is_periodic() {
        return Ok(Outcome::NotPeriodic);
    }

    // An active assignment whose range misses the period entirely has
    // nothing to bill.
    if assignment.effective_from > period.last_day()
        || assignment
            .effective_to
            .is_some_and(|to| to < period.first_day())
    {
        return Ok(Outcome::Skipped);
    }

    let client = engine.clients.get(assignment.client_id)?;
    if !client.is_active {
        return Ok(Outcome::Failed(format!(
            "client '{}' is inactive but still holds an active assignment",
            client.name
        )));
    }

    // Shortcut only; insert_unique below is the correctness mechanism.
    if engine
        .ledger
        .exists(assignment.client_id, assignment.service_id, period)?
    {
        debug!(
            assignment_id = %assignment.id,
            period = %period,
            "Already generated, skipping"
        );
        return Ok(Outcome::Skipped);
    }

    // Assignments starting mid-month resolve from their first covered day.
    let as_of = if assignment.covers(period.first_day()) {
        period.first_day()
    } else {
        assignment.effective_from
    };

    let item = match service.charge_basis {
        ChargeBasis::PerClientMonthly => {
            let resolved = engine.resolve_rate(
                assignment.client_id,
                assignment.service_id,
                as_of,
                None,
                ResolveMode::Current,
            )?;
            BillingItem::draft(
                assignment.client_id,
                assignment.service_id,
                period,
                Decimal::ONE,
                resolved.amount,
            )
        }
        ChargeBasis::PerPayrollMonthly => {
            let runs = engine.payrolls.runs_for(assignment.client_id, period)?;
            if runs.is_empty() {
                return Ok(Outcome::Skipped);
            }
            let resolved = engine.resolve_rate(
                assignment.client_id,
                assignment.service_id,
                as_of,
                None,
                ResolveMode::Current,
            )?;
            BillingItem::draft(
                assignment.client_id,
                assignment.service_id,
                period,
                Decimal::from(runs.len() as u64),
                resolved.amount,
            )
        }
        ChargeBasis::PerPayrollPerEmployee => {
            let runs = engine.payrolls.runs_for(assignment.client_id, period)?;
            let employees: u32 = runs.iter().map(|run| run.employee_count).sum();
            if employees == 0 {
                return Ok(Outcome::Skipped);
            }
            let resolved = engine.resolve_rate(
                assignment.client_id,
                assignment.service_id,
                as_of,
                None,
                ResolveMode::Current,
            )?;
            BillingItem::draft(
                assignment.client_id,
                assignment.service_id,
                period,
                Decimal::from(employees),
                resolved.amount,
            )
        }
        ChargeBasis::PerClientByTimeAndSeniority => {
            let amount = time_entry_total(engine, assignment, period)?;
            if amount.is_zero() {
                return Ok(Outcome::Skipped);
            }
            BillingItem::draft(
                assignment.client_id,
                assignment.service_id,
                period,
                Decimal::ONE,
                amount,
            )
        }
        ChargeBasis::PerPayrollByTimeAndSeniority => {
            let amount = time_entry_total(engine, assignment, period)?;
            if amount.is_zero() {
                return Ok(Outcome::Skipped);
            }
            let runs = engine.payrolls.runs_for(assignment.client_id, period)?;
            if runs.is_empty() {
                return Ok(Outcome::Failed(
                    "time recorded but no payrolls in period".to_string(),
                ));
            }
            // The priced time-entry total is persisted exactly; the
            // blended per-payroll unit price may round.
            BillingItem::draft_with_amount(
                assignment.client_id,
                assignment.service_id,
                period,
                Decimal::from(runs.len() as u64),
                amount,
            )
        }
        ChargeBasis::AdHoc
        | ChargeBasis::PerPayrollProcessed
        | ChargeBasis::PerPayrollProcessedPerEmployee => return Ok(Outcome::NotPeriodic),
    };

    if dry_run {
        return Ok(Outcome::Created(item));
    }
    match engine.ledger.insert_unique(item.clone()) {
        Ok(()) => Ok(Outcome::Created(item)),
        // Lost a race with a concurrent run for the same key.
        Err(BillingError::DuplicateBillingItem { .. }) => Ok(Outcome::Skipped),
        Err(err) => Err(err),
    }
}

/// Prices the period's time entries for an assignment: each entry's
/// hours times the rate resolved for its staff member on its date.
fn time_entry_total(
    engine: &BillingEngine,
    assignment: &ClientServiceAssignment,
    period: BillingPeriod,
) -> BillingResult<Decimal> {
    let entries =
        engine
            .time_entries
            .entries_for(assignment.client_id, assignment.service_id, period)?;

    let mut total = Decimal::ZERO;
    for entry in &entries {
        let resolved = engine.resolve_rate(
            assignment.client_id,
            assignment.service_id,
            entry.date,
            Some(entry.staff_id),
            ResolveMode::Current,
        )?;
        total += entry.hours * resolved.amount;
    }
    Ok(total)
}

/// Bills a completed payroll run against the client's event-driven
/// assignments (`per_payroll_processed` and
/// `per_payroll_processed_per_employee`).
///
/// Idempotent per (client, service, period, payroll run): re-billing the
/// same run reports skips instead of creating duplicates. Fails only if
/// the payroll run itself is unknown or a store is unavailable.
pub fn bill_processed_payroll(
    engine: &BillingEngine,
    payroll_id: Uuid,
) -> BillingResult<GenerationReport> {
    let payroll = engine.payrolls.get(payroll_id)?;
    let period = payroll.period;
    info!(payroll_id = %payroll_id, period = %period, "Billing processed payroll run");

    let mut report = GenerationReport::new(period, false);
    let assignments = engine.assignments.active_snapshot()?;

    for assignment in assignments
        .iter()
        .filter(|a| a.client_id == payroll.client_id)
    {
        let service = match engine.catalogue.get(assignment.service_id) {
            Ok(service) => service,
            Err(err @ BillingError::StoreUnavailable { .. }) => return Err(err),
            Err(err) => {
                report.record_failure(
                    assignment.id,
                    assignment.client_id,
                    assignment.service_id,
                    err.to_string(),
                );
                continue;
            }
        };

        let quantity = match service.charge_basis {
            ChargeBasis::PerPayrollProcessed => Decimal::ONE,
            ChargeBasis::PerPayrollProcessedPerEmployee => {
                if payroll.employee_count == 0 {
                    report.record_skipped();
                    continue;
                }
                Decimal::from(payroll.employee_count)
            }
            _ => continue,
        };

        match bill_payroll_assignment(engine, assignment, &service, period, payroll_id, quantity) {
            Ok(Some(item)) => report.record_created(item),
            Ok(None) => report.record_skipped(),
            Err(err @ BillingError::StoreUnavailable { .. }) => return Err(err),
            Err(err) => {
                warn!(
                    assignment_id = %assignment.id,
                    error = %err,
                    "Processed payroll could not be billed"
                );
                report.record_failure(
                    assignment.id,
                    assignment.client_id,
                    assignment.service_id,
                    err.to_string(),
                );
            }
        }
    }

    Ok(report)
}

/// Returns the created item, or `None` when the run was already billed.
fn bill_payroll_assignment(
    engine: &BillingEngine,
    assignment: &ClientServiceAssignment,
    service: &Service,
    period: BillingPeriod,
    payroll_id: Uuid,
    quantity: Decimal,
) -> BillingResult<Option<BillingItem>> {
    let as_of = if assignment.covers(period.first_day()) {
        period.first_day()
    } else {
        assignment.effective_from
    };
    let resolved = engine.resolve_rate(
        assignment.client_id,
        service.id,
        as_of,
        None,
        ResolveMode::Current,
    )?;

    let mut item = BillingItem::draft(
        assignment.client_id,
        service.id,
        period,
        quantity,
        resolved.amount,
    );
    item.payroll_id = Some(payroll_id);

    match engine.ledger.insert_unique(item.clone()) {
        Ok(()) => Ok(Some(item)),
        Err(BillingError::DuplicateBillingItem { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Raises a one-off charge for an ad-hoc service.
///
/// Resolves the rate as of `date` and records a draft item in the
/// period containing the date. Ad-hoc items carry no idempotency key;
/// every call creates a new item. Resolution errors propagate to the
/// caller — there is no report to downgrade into.
pub fn bill_ad_hoc(
    engine: &BillingEngine,
    client_id: Uuid,
    service_id: Uuid,
    date: chrono::NaiveDate,
    quantity: Decimal,
) -> BillingResult<BillingItem> {
    let resolved = engine.resolve_rate(client_id, service_id, date, None, ResolveMode::Current)?;
    let item = BillingItem::draft(
        client_id,
        service_id,
        BillingPeriod::containing(date),
        quantity,
        resolved.amount,
    );
    engine.ledger.insert(item.clone())?;
    info!(
        client_id = %client_id,
        service_id = %service_id,
        amount = %item.amount,
        "Recorded ad-hoc billing item"
    );
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, PayrollRun, StaffRateRecord, TimeEntry};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn period(s: &str) -> BillingPeriod {
        s.parse().unwrap()
    }

    /// Engine with one active client, returning (engine, client_id).
    fn engine_with_client() -> (BillingEngine, Uuid) {
        let engine = BillingEngine::new();
        let client = Client::new("Acme");
        let client_id = client.id;
        engine.clients.insert(client).unwrap();
        (engine, client_id)
    }

    fn add_service(
        engine: &BillingEngine,
        charge_basis: ChargeBasis,
        base_rate: Option<&str>,
    ) -> Uuid {
        let service = Service::new("Test Service", charge_basis, base_rate.map(dec));
        let id = service.id;
        engine.catalogue.insert(service).unwrap();
        id
    }

    fn subscribe(engine: &BillingEngine, client_id: Uuid, service_id: Uuid) -> Uuid {
        let assignment =
            ClientServiceAssignment::new(client_id, service_id, date("2024-01-01"));
        let id = assignment.id;
        engine.assignments.insert(assignment).unwrap();
        id
    }

    #[test]
    fn test_monthly_charge_creates_one_draft_item() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::PerClientMonthly, Some("800.00"));
        subscribe(&engine, client_id, service_id);

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();

        assert_eq!(report.items_created, 1);
        assert_eq!(report.items_skipped, 0);
        assert!(report.errors.is_empty());
        assert_eq!(report.total_amount, dec("800.00"));

        let items = engine.ledger.query(Some(period("2024-03")), None, None).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, dec("800.00"));
        assert_eq!(items[0].status, crate::models::BillingStatus::Draft);
    }

    #[test]
    fn test_second_run_skips_everything() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::PerClientMonthly, Some("800.00"));
        subscribe(&engine, client_id, service_id);

        let first = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();
        assert_eq!(first.items_created, 1);

        let second = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();
        assert_eq!(second.items_created, 0);
        assert_eq!(second.items_skipped, 1);
        assert_eq!(engine.ledger.len().unwrap(), 1);
    }

    #[test]
    fn test_dry_run_persists_nothing() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::PerClientMonthly, Some("800.00"));
        subscribe(&engine, client_id, service_id);

        let options = GenerationOptions {
            dry_run: true,
            ..Default::default()
        };
        let report = generate(&engine, period("2024-03"), &options).unwrap();

        assert_eq!(report.items_created, 1);
        assert_eq!(report.items[0].amount, dec("800.00"));
        assert!(engine.ledger.is_empty().unwrap());
    }

    #[test]
    fn test_per_payroll_quantity_counts_runs() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::PerPayrollMonthly, Some("150.00"));
        subscribe(&engine, client_id, service_id);

        engine.payrolls.insert(PayrollRun::new(client_id, 10, period("2024-03"))).unwrap();
        engine.payrolls.insert(PayrollRun::new(client_id, 12, period("2024-03"))).unwrap();

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();

        assert_eq!(report.items_created, 1);
        assert_eq!(report.items[0].quantity, dec("2"));
        assert_eq!(report.total_amount, dec("300.00"));
    }

    #[test]
    fn test_per_payroll_with_no_runs_skips() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::PerPayrollMonthly, Some("150.00"));
        subscribe(&engine, client_id, service_id);

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();
        assert_eq!(report.items_created, 0);
        assert_eq!(report.items_skipped, 1);
    }

    #[test]
    fn test_per_employee_quantity_sums_across_runs() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::PerPayrollPerEmployee, Some("5.00"));
        subscribe(&engine, client_id, service_id);

        engine.payrolls.insert(PayrollRun::new(client_id, 10, period("2024-03"))).unwrap();
        engine.payrolls.insert(PayrollRun::new(client_id, 12, period("2024-03"))).unwrap();

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();
        assert_eq!(report.items[0].quantity, dec("22"));
        assert_eq!(report.total_amount, dec("110.00"));
    }

    #[test]
    fn test_time_based_sums_entries_at_per_staff_rates() {
        let (engine, client_id) = engine_with_client();
        let service_id =
            add_service(&engine, ChargeBasis::PerClientByTimeAndSeniority, None);
        subscribe(&engine, client_id, service_id);

        let junior = Uuid::new_v4();
        let senior = Uuid::new_v4();
        engine
            .staff_rates
            .append(StaffRateRecord::new(junior, dec("80.00"), "junior", date("2023-01-01")))
            .unwrap();
        engine
            .staff_rates
            .append(StaffRateRecord::new(senior, dec("100.00"), "senior", date("2023-01-01")))
            .unwrap();

        engine
            .time_entries
            .insert(TimeEntry::new(junior, client_id, service_id, date("2024-03-05"), dec("2")))
            .unwrap();
        engine
            .time_entries
            .insert(TimeEntry::new(senior, client_id, service_id, date("2024-03-12"), dec("3")))
            .unwrap();

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();

        // 2h * 80 * 1.0 + 3h * 100 * 1.3 = 160 + 390 = 550
        assert_eq!(report.items_created, 1);
        assert_eq!(report.items[0].quantity, dec("1"));
        assert_eq!(report.total_amount, dec("550.00"));
    }

    #[test]
    fn test_time_based_with_no_entries_skips() {
        let (engine, client_id) = engine_with_client();
        let service_id =
            add_service(&engine, ChargeBasis::PerClientByTimeAndSeniority, None);
        subscribe(&engine, client_id, service_id);

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();
        assert_eq!(report.items_created, 0);
        assert_eq!(report.items_skipped, 1);
    }

    #[test]
    fn test_per_payroll_time_based_blends_unit_price() {
        let (engine, client_id) = engine_with_client();
        let service_id =
            add_service(&engine, ChargeBasis::PerPayrollByTimeAndSeniority, None);
        subscribe(&engine, client_id, service_id);

        engine.payrolls.insert(PayrollRun::new(client_id, 10, period("2024-03"))).unwrap();
        engine.payrolls.insert(PayrollRun::new(client_id, 10, period("2024-03"))).unwrap();

        let staff = Uuid::new_v4();
        engine
            .staff_rates
            .append(StaffRateRecord::new(staff, dec("100.00"), "junior", date("2023-01-01")))
            .unwrap();
        engine
            .time_entries
            .insert(TimeEntry::new(staff, client_id, service_id, date("2024-03-05"), dec("4")))
            .unwrap();

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();

        // 4h * 100 = 400 across 2 payrolls: quantity 2, unit price 200.
        let item = &report.items[0];
        assert_eq!(item.quantity, dec("2"));
        assert_eq!(item.unit_price, dec("200.00"));
        assert_eq!(item.amount, dec("400.00"));
    }

    #[test]
    fn test_per_payroll_time_based_uneven_split_keeps_exact_amount() {
        let (engine, client_id) = engine_with_client();
        let service_id =
            add_service(&engine, ChargeBasis::PerPayrollByTimeAndSeniority, None);
        subscribe(&engine, client_id, service_id);

        for _ in 0..3 {
            engine.payrolls.insert(PayrollRun::new(client_id, 10, period("2024-03"))).unwrap();
        }

        let staff = Uuid::new_v4();
        engine
            .staff_rates
            .append(StaffRateRecord::new(staff, dec("100.00"), "junior", date("2023-01-01")))
            .unwrap();
        engine
            .time_entries
            .insert(TimeEntry::new(staff, client_id, service_id, date("2024-03-05"), dec("4")))
            .unwrap();

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();

        // 400 / 3 does not terminate; the item must still carry the
        // exact priced total, not quantity times the rounded quotient.
        let item = &report.items[0];
        assert_eq!(item.quantity, dec("3"));
        assert_eq!(item.amount, dec("400.00"));
        assert_eq!(item.unit_price.round_dp(2), dec("133.33"));
        assert_eq!(report.total_amount, dec("400.00"));
    }

    #[test]
    fn test_time_recorded_with_no_payrolls_is_reported() {
        let (engine, client_id) = engine_with_client();
        let service_id =
            add_service(&engine, ChargeBasis::PerPayrollByTimeAndSeniority, None);
        subscribe(&engine, client_id, service_id);

        let staff = Uuid::new_v4();
        engine
            .staff_rates
            .append(StaffRateRecord::new(staff, dec("100.00"), "junior", date("2023-01-01")))
            .unwrap();
        engine
            .time_entries
            .insert(TimeEntry::new(staff, client_id, service_id, date("2024-03-05"), dec("4")))
            .unwrap();

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();

        assert_eq!(report.items_created, 0);
        assert_eq!(report.items_skipped, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].reason.contains("no payrolls"));
    }

    #[test]
    fn test_failure_on_one_assignment_does_not_abort_run() {
        let (engine, client_id) = engine_with_client();

        let flat = add_service(&engine, ChargeBasis::PerClientMonthly, Some("800.00"));
        subscribe(&engine, client_id, flat);

        // Time-based service with recorded hours but no staff rate.
        let timed = add_service(&engine, ChargeBasis::PerClientByTimeAndSeniority, None);
        subscribe(&engine, client_id, timed);
        engine
            .time_entries
            .insert(TimeEntry::new(Uuid::new_v4(), client_id, timed, date("2024-03-05"), dec("2")))
            .unwrap();

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();

        assert_eq!(report.items_created, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].reason.contains("No staff rate"));
    }

    #[test]
    fn test_event_driven_bases_are_not_billed_monthly() {
        let (engine, client_id) = engine_with_client();
        let ad_hoc = add_service(&engine, ChargeBasis::AdHoc, Some("100.00"));
        subscribe(&engine, client_id, ad_hoc);
        let processed = add_service(&engine, ChargeBasis::PerPayrollProcessed, Some("50.00"));
        subscribe(&engine, client_id, processed);

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();
        assert_eq!(report.items_created, 0);
        assert_eq!(report.items_skipped, 0);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_client_filter_restricts_run() {
        let (engine, billed_client) = engine_with_client();
        let other = Client::new("Other");
        let other_id = other.id;
        engine.clients.insert(other).unwrap();

        let service_id = add_service(&engine, ChargeBasis::PerClientMonthly, Some("800.00"));
        subscribe(&engine, billed_client, service_id);
        subscribe(&engine, other_id, service_id);

        let options = GenerationOptions {
            client_ids: Some(vec![billed_client]),
            ..Default::default()
        };
        let report = generate(&engine, period("2024-03"), &options).unwrap();

        assert_eq!(report.items_created, 1);
        assert_eq!(report.items[0].client_id, billed_client);
    }

    #[test]
    fn test_inactive_client_is_reported_not_billed() {
        let engine = BillingEngine::new();
        let mut client = Client::new("Gone");
        client.is_active = false;
        let client_id = client.id;
        engine.clients.insert(client).unwrap();

        let service_id = add_service(&engine, ChargeBasis::PerClientMonthly, Some("800.00"));
        subscribe(&engine, client_id, service_id);

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();
        assert_eq!(report.items_created, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].reason.contains("inactive"));
    }

    #[test]
    fn test_assignment_starting_mid_month_resolves_from_its_start() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::PerClientMonthly, Some("800.00"));
        let assignment =
            ClientServiceAssignment::new(client_id, service_id, date("2024-03-15"));
        engine.assignments.insert(assignment).unwrap();

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();
        assert_eq!(report.items_created, 1);
    }

    #[test]
    fn test_assignment_not_yet_effective_is_skipped() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::PerClientMonthly, Some("800.00"));
        let assignment =
            ClientServiceAssignment::new(client_id, service_id, date("2024-05-01"));
        engine.assignments.insert(assignment).unwrap();

        let report = generate(&engine, period("2024-03"), &GenerationOptions::default()).unwrap();
        assert_eq!(report.items_created, 0);
        assert_eq!(report.items_skipped, 1);
    }

    #[test]
    fn test_bill_processed_payroll_per_run_and_per_employee() {
        let (engine, client_id) = engine_with_client();
        let per_run = add_service(&engine, ChargeBasis::PerPayrollProcessed, Some("50.00"));
        subscribe(&engine, client_id, per_run);
        let per_employee =
            add_service(&engine, ChargeBasis::PerPayrollProcessedPerEmployee, Some("4.00"));
        subscribe(&engine, client_id, per_employee);

        let payroll = PayrollRun::new(client_id, 25, period("2024-03"));
        let payroll_id = payroll.id;
        engine.payrolls.insert(payroll).unwrap();

        let report = bill_processed_payroll(&engine, payroll_id).unwrap();
        assert_eq!(report.items_created, 2);
        assert_eq!(report.total_amount, dec("150.00")); // 50 + 25 * 4

        // Re-billing the same run is idempotent.
        let again = bill_processed_payroll(&engine, payroll_id).unwrap();
        assert_eq!(again.items_created, 0);
        assert_eq!(again.items_skipped, 2);
        assert_eq!(engine.ledger.len().unwrap(), 2);
    }

    #[test]
    fn test_bill_processed_payroll_unknown_run_fails() {
        let engine = BillingEngine::new();
        assert!(matches!(
            bill_processed_payroll(&engine, Uuid::new_v4()),
            Err(BillingError::PayrollNotFound { .. })
        ));
    }

    #[test]
    fn test_bill_ad_hoc_creates_item_every_call() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::AdHoc, Some("100.00"));
        subscribe(&engine, client_id, service_id);

        let first = bill_ad_hoc(&engine, client_id, service_id, date("2024-03-10"), dec("2")).unwrap();
        assert_eq!(first.amount, dec("200.00"));
        assert_eq!(first.billing_period, period("2024-03"));

        bill_ad_hoc(&engine, client_id, service_id, date("2024-03-10"), dec("2")).unwrap();
        assert_eq!(engine.ledger.len().unwrap(), 2);
    }

    #[test]
    fn test_bill_ad_hoc_without_assignment_fails() {
        let (engine, client_id) = engine_with_client();
        let service_id = add_service(&engine, ChargeBasis::AdHoc, Some("100.00"));

        assert!(matches!(
            bill_ad_hoc(&engine, client_id, service_id, date("2024-03-10"), dec("1")),
            Err(BillingError::NoActiveAssignment { .. })
        ));
    }
}
