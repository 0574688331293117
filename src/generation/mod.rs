//! Billing item generation.
//!
//! The monthly run ([`generate`]) walks active assignments and emits
//! draft billing items, idempotently per (client, service, period).
//! Event-driven charges come in through [`bill_processed_payroll`] and
//! [`bill_ad_hoc`].

mod generator;
mod report;

pub use generator::{GenerationOptions, bill_ad_hoc, bill_processed_payroll, generate};
pub use report::{GenerationFailure, GenerationReport};
