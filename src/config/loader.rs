//! Catalogue seed loading.
//!
//! This module provides the [`CatalogueLoader`] type for loading a
//! service catalogue from a YAML seed file.

use std::fs;
use std::path::Path;

use crate::error::{BillingError, BillingResult};
use crate::models::Service;
use crate::store::ServiceCatalogue;

use super::types::{CatalogueMetadata, CatalogueSeed};

/// Loads a service catalogue from a YAML seed file.
///
/// # File Structure
///
/// ```text
/// catalogue:
///   name: Standard services
///   version: "2024-01-01"
/// default_seniority_multipliers:
///   junior: "1.0"
///   senior: "1.3"
/// services:
///   - name: Monthly payroll processing
///     charge_basis: per_client_monthly
///     base_rate: "800.00"
/// ```
///
/// # Example
///
/// ```no_run
/// use billing_engine::config::CatalogueLoader;
///
/// let loader = CatalogueLoader::load("./config/services.yaml").unwrap();
/// let catalogue = loader.into_catalogue().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CatalogueLoader {
    seed: CatalogueSeed,
}

impl CatalogueLoader {
    /// Loads a catalogue seed from the specified YAML file.
    ///
    /// Fails with `SeedNotFound` if the file is missing, or
    /// `SeedParseError` if it is not valid YAML for the seed schema.
    pub fn load<P: AsRef<Path>>(path: P) -> BillingResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| BillingError::SeedNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses a catalogue seed from a YAML string.
    pub fn parse(content: &str, source: &str) -> BillingResult<Self> {
        let seed: CatalogueSeed =
            serde_yaml::from_str(content).map_err(|e| BillingError::SeedParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { seed })
    }

    /// Returns the seed metadata.
    pub fn metadata(&self) -> &CatalogueMetadata {
        &self.seed.catalogue
    }

    /// Builds a [`ServiceCatalogue`] from the seed.
    ///
    /// Multiplier precedence per service: its own table, then the seed's
    /// default table, then the built-in defaults.
    pub fn into_catalogue(self) -> BillingResult<ServiceCatalogue> {
        let catalogue = ServiceCatalogue::new();
        let seed_defaults = self.seed.default_seniority_multipliers;

        for entry in self.seed.services {
            let mut service = Service::new(&entry.name, entry.charge_basis, entry.base_rate);
            if let Some(table) = entry.seniority_multipliers {
                service.seniority_multipliers = table;
            } else if let Some(defaults) = &seed_defaults {
                service.seniority_multipliers = defaults.clone();
            }
            service.is_active = entry.is_active;
            catalogue.insert(service)?;
        }

        Ok(catalogue)
    }
}
