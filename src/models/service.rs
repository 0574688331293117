//! Service catalogue entry and charge basis models.
//!
//! A [`Service`] is a catalogue entry describing something the firm can
//! bill a client for, and its [`ChargeBasis`] governs how the quantity of
//! a billing item is computed.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The billing model governing how quantity is computed for a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeBasis {
    /// One flat charge per client per month.
    PerClientMonthly,
    /// One charge per payroll the client has active in the month.
    PerPayrollMonthly,
    /// One charge per payroll run actually processed; billed when the run
    /// completes, not by the monthly job.
    PerPayrollProcessed,
    /// One-off charge raised manually; never generated by the monthly job.
    AdHoc,
    /// Charged per employee across the client's payrolls in the month.
    PerPayrollPerEmployee,
    /// Charged per employee on a processed payroll run; billed when the
    /// run completes.
    PerPayrollProcessedPerEmployee,
    /// Time-based: recorded hours priced by staff rate and seniority,
    /// billed once per payroll in the month.
    PerPayrollByTimeAndSeniority,
    /// Time-based: recorded hours priced by staff rate and seniority,
    /// billed as one monthly charge per client.
    PerClientByTimeAndSeniority,
}

impl ChargeBasis {
    /// Returns true if the monthly generation job bills this basis.
    ///
    /// Ad-hoc and processed-payroll bases are event-driven: they are
    /// billed when the triggering event happens, never by the period walk.
    pub fn is_periodic(&self) -> bool {
        !matches!(
            self,
            ChargeBasis::AdHoc
                | ChargeBasis::PerPayrollProcessed
                | ChargeBasis::PerPayrollProcessedPerEmployee
        )
    }

    /// Returns true if pricing depends on staff hourly rates and
    /// seniority multipliers rather than a flat monetary rate.
    pub fn is_time_based(&self) -> bool {
        matches!(
            self,
            ChargeBasis::PerPayrollByTimeAndSeniority | ChargeBasis::PerClientByTimeAndSeniority
        )
    }
}

/// A service catalogue entry.
///
/// Services are never deleted, only deactivated, because historical
/// billing items keep referencing them.
///
/// # Example
///
/// ```
/// use billing_engine::models::{ChargeBasis, Service};
/// use rust_decimal::Decimal;
///
/// let service = Service::new(
///     "Payroll Processing",
///     ChargeBasis::PerClientMonthly,
///     Some(Decimal::new(80000, 2)),
/// );
/// assert!(service.is_active);
/// assert_eq!(service.seniority_multipliers.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier for the service.
    pub id: Uuid,
    /// Human-readable service name.
    pub name: String,
    /// How quantities are computed when billing this service.
    pub charge_basis: ChargeBasis,
    /// Flat monetary rate; absent for purely time-based services.
    pub base_rate: Option<Decimal>,
    /// Seniority tier -> multiplier table used by time-based pricing.
    pub seniority_multipliers: HashMap<String, Decimal>,
    /// Whether the service can be newly assigned and billed.
    pub is_active: bool,
}

impl Service {
    /// Creates an active service with the default seniority multiplier
    /// table.
    pub fn new(name: impl Into<String>, charge_basis: ChargeBasis, base_rate: Option<Decimal>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            charge_basis,
            base_rate,
            seniority_multipliers: default_seniority_multipliers(),
            is_active: true,
        }
    }
}

/// The firm-wide default seniority multiplier table.
///
/// Used when neither the assignment nor the service supplies its own
/// table, and as the per-tier fallback when a custom table only
/// partially overrides tiers.
pub fn default_seniority_multipliers() -> HashMap<String, Decimal> {
    HashMap::from([
        ("junior".to_string(), Decimal::new(10, 1)),
        ("senior".to_string(), Decimal::new(13, 1)),
        ("manager".to_string(), Decimal::new(16, 1)),
        ("partner".to_string(), Decimal::new(20, 1)),
    ])
}
