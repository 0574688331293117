//! Service catalogue seeding from YAML.
//!
//! This module loads the service catalogue from a seed file: service
//! names, charge bases, base rates, and seniority multiplier tables.
//!
//! # Example
//!
//! ```no_run
//! use billing_engine::config::CatalogueLoader;
//!
//! let loader = CatalogueLoader::load("./config/services.yaml").unwrap();
//! println!("Loaded catalogue: {}", loader.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::CatalogueLoader;
pub use types::{CatalogueMetadata, CatalogueSeed, ServiceSeed};
