//! Seed file types for the service catalogue.
//!
//! These are the strongly-typed structures deserialized from the YAML
//! catalogue seed.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::ChargeBasis;

/// Metadata about the catalogue seed.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueMetadata {
    /// Human-readable name of the catalogue (e.g., "Standard services 2024").
    pub name: String,
    /// Version or effective date of the seed.
    pub version: String,
}

/// One service definition in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSeed {
    /// The service name shown on billing items.
    pub name: String,
    /// How the service is charged.
    pub charge_basis: ChargeBasis,
    /// Catalogue base rate; absent for services priced purely from
    /// overrides or time and seniority.
    pub base_rate: Option<Decimal>,
    /// Service-specific multiplier table. Falls back to the seed's
    /// `default_seniority_multipliers`, then the built-in defaults.
    pub seniority_multipliers: Option<HashMap<String, Decimal>>,
    /// Whether the service is offered to new assignments.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// The complete catalogue seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueSeed {
    /// Seed metadata.
    pub catalogue: CatalogueMetadata,
    /// Seed-wide multiplier table applied to services that do not carry
    /// their own.
    pub default_seniority_multipliers: Option<HashMap<String, Decimal>>,
    /// The services to load.
    pub services: Vec<ServiceSeed>,
}
