//! Core data models for the billing engine.
//!
//! This module contains all the domain models used throughout the engine.

mod assignment;
mod billing_item;
mod collaborators;
mod period;
mod service;
mod staff_rate;

pub use assignment::ClientServiceAssignment;
pub use billing_item::{BillingItem, BillingStatus};
pub use collaborators::{Client, PayrollRun, TimeEntry};
pub use period::BillingPeriod;
pub use service::{ChargeBasis, Service, default_seniority_multipliers};
pub use staff_rate::StaffRateRecord;
