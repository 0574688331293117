//! Billing Engine for Professional Services
//!
//! This crate resolves effective rates for client service assignments and
//! generates recurring billing items: catalogue base rates, client-specific
//! overrides, time-and-seniority pricing, and an idempotent monthly
//! generation run with a structured report.

#![warn(missing_docs)]

pub mod api;
pub mod config;
mod engine;
pub mod error;
pub mod generation;
pub mod models;
pub mod resolution;
pub mod store;

pub use engine::BillingEngine;
