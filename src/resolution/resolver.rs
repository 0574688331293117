//! Rate resolution.
//!
//! [`resolve_rate`] is the single pricing decision point: given the
//! store snapshots and a (client, service, date, staff?) tuple it
//! computes the one effective rate, with provenance, or fails with a
//! typed error. It holds no state of its own, so identical inputs over
//! an unchanged store always produce identical results.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::{ClientServiceAssignment, Service};
use crate::store::{AssignmentStore, ServiceCatalogue, StaffRateHistory};

/// Where the resolved amount came from, for audit display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateSource {
    /// The assignment's custom rate overrode the catalogue.
    CustomRate,
    /// The catalogue base rate applied unchanged.
    BaseRate,
    /// A staff hourly rate multiplied by a seniority multiplier.
    TimeAndSeniority,
}

/// Whether the resolution prices new work or replays history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// Normal operation: inactive services and discontinued assignments
    /// do not resolve.
    #[default]
    Current,
    /// Audit replay of an already-billed date: deactivated services and
    /// discontinued-but-covering assignments still resolve, so historical
    /// items can be re-priced and verified.
    AuditReplay,
}

/// A non-fatal problem observed while resolving, e.g. a seniority tier
/// missing from every multiplier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
}

/// The outcome of a successful rate resolution.
///
/// Carries the provenance (`source`) of the amount so callers can audit
/// why a price was charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateResolution {
    /// The effective monetary rate.
    pub amount: Decimal,
    /// The seniority multiplier applied; `1` for flat-rate sources.
    pub seniority_multiplier: Decimal,
    /// Where the amount came from.
    pub source: RateSource,
    /// Non-fatal problems observed while resolving.
    pub warnings: Vec<ResolutionWarning>,
}

/// Code attached to warnings about a seniority tier absent from every
/// multiplier table.
pub const UNKNOWN_TIER_WARNING: &str = "unknown_seniority_tier";

/// Resolves the effective rate for a (client, service, date) tuple.
///
/// # Algorithm
///
/// 1. Look up the service; inactive services fail unless `mode` is
///    [`ResolveMode::AuditReplay`].
/// 2. Find the single assignment covering `as_of`. Zero matches is
///    [`BillingError::NoActiveAssignment`]; more than one is
///    [`BillingError::OverlappingAssignments`] — never a silent pick.
/// 3. Base amount: the assignment's custom rate, else the service base
///    rate.
/// 4. For time-based charge bases with a staff member supplied, the
///    amount is the staff member's hourly rate on `as_of` multiplied by
///    the seniority multiplier for their tier. The multiplier comes from
///    the assignment's custom table, falling back per tier to the
///    service table, then to `1` with a warning.
/// 5. Otherwise the amount is the base amount from step 3; if no base
///    amount exists the service is mispriced and resolution fails with
///    [`BillingError::RateUndefined`].
///
/// # Example
///
/// ```
/// use billing_engine::models::{ChargeBasis, ClientServiceAssignment, Service};
/// use billing_engine::resolution::{resolve_rate, RateSource, ResolveMode};
/// use billing_engine::store::{AssignmentStore, ServiceCatalogue, StaffRateHistory};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let catalogue = ServiceCatalogue::new();
/// let assignments = AssignmentStore::new();
/// let staff_rates = StaffRateHistory::new();
///
/// let service = Service::new("Payroll Processing", ChargeBasis::PerClientMonthly, Some(Decimal::new(80000, 2)));
/// let service_id = service.id;
/// catalogue.insert(service).unwrap();
///
/// let client_id = Uuid::new_v4();
/// let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assignments.insert(ClientServiceAssignment::new(client_id, service_id, from)).unwrap();
///
/// let resolved = resolve_rate(
///     &catalogue,
///     &assignments,
///     &staff_rates,
///     client_id,
///     service_id,
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     None,
///     ResolveMode::Current,
/// )
/// .unwrap();
/// assert_eq!(resolved.amount, Decimal::new(80000, 2));
/// assert_eq!(resolved.source, RateSource::BaseRate);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn resolve_rate(
    catalogue: &ServiceCatalogue,
    assignments: &AssignmentStore,
    staff_rates: &StaffRateHistory,
    client_id: Uuid,
    service_id: Uuid,
    as_of: NaiveDate,
    staff_id: Option<Uuid>,
    mode: ResolveMode,
) -> BillingResult<RateResolution> {
    let service = catalogue.get(service_id)?;
    if !service.is_active && mode == ResolveMode::Current {
        return Err(BillingError::ServiceNotFound { service_id });
    }

    let include_inactive = mode == ResolveMode::AuditReplay;
    let assignment = assignments
        .find_covering(client_id, service_id, as_of, include_inactive)?
        .ok_or(BillingError::NoActiveAssignment {
            client_id,
            service_id,
            date: as_of,
        })?;

    if service.charge_basis.is_time_based() {
        if let Some(staff_id) = staff_id {
            return resolve_time_and_seniority(
                staff_rates,
                &service,
                &assignment,
                staff_id,
                as_of,
            );
        }
    }

    let (amount, source) = match (assignment.custom_rate, service.base_rate) {
        (Some(custom), _) => (custom, RateSource::CustomRate),
        (None, Some(base)) => (base, RateSource::BaseRate),
        (None, None) => {
            return Err(BillingError::RateUndefined {
                client_id,
                service_id,
            });
        }
    };

    Ok(RateResolution {
        amount,
        seniority_multiplier: Decimal::ONE,
        source,
        warnings: Vec::new(),
    })
}

fn resolve_time_and_seniority(
    staff_rates: &StaffRateHistory,
    service: &Service,
    assignment: &ClientServiceAssignment,
    staff_id: Uuid,
    as_of: NaiveDate,
) -> BillingResult<RateResolution> {
    let staff_rate = staff_rates
        .find_covering(staff_id, as_of)?
        .ok_or(BillingError::NoStaffRate {
            staff_id,
            date: as_of,
        })?;

    let tier = staff_rate.seniority_level.as_str();
    let mut warnings = Vec::new();

    // Per-tier fallback: custom table, then catalogue table, then 1.0.
    let multiplier = assignment
        .custom_seniority_multipliers
        .as_ref()
        .and_then(|table| table.get(tier))
        .or_else(|| service.seniority_multipliers.get(tier))
        .copied()
        .unwrap_or_else(|| {
            warn!(
                staff_id = %staff_id,
                service_id = %service.id,
                tier,
                "Unknown seniority tier, defaulting multiplier to 1"
            );
            warnings.push(ResolutionWarning {
                code: UNKNOWN_TIER_WARNING.to_string(),
                message: format!(
                    "Seniority tier '{}' has no multiplier in any table; defaulted to 1",
                    tier
                ),
            });
            Decimal::ONE
        });

    Ok(RateResolution {
        amount: staff_rate.hourly_rate * multiplier,
        seniority_multiplier: multiplier,
        source: RateSource::TimeAndSeniority,
        warnings,
    })
}
