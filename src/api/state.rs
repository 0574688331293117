//! Application state for the billing engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::BillingEngine;

/// Shared application state.
///
/// Holds the engine behind an `Arc`; the stores inside it do their own
/// locking, so handlers never take an outer lock.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<BillingEngine>,
}

impl AppState {
    /// Creates a new application state around an engine.
    pub fn new(engine: BillingEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns a reference to the engine.
    pub fn engine(&self) -> &BillingEngine {
        &self.engine
    }
}
