//! Rate resolution logic for the billing engine.
//!
//! This module decides, for any (client, service, staff-member, date)
//! tuple, what to charge: catalogue base rates, client-specific
//! overrides, and staff-rate-times-seniority-multiplier pricing, with
//! provenance on every answer.

mod resolver;

pub use resolver::{
    RateResolution, RateSource, ResolutionWarning, ResolveMode, UNKNOWN_TIER_WARNING, resolve_rate,
};
