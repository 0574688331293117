//! Client service assignment model.
//!
//! A [`ClientServiceAssignment`] subscribes a client to a catalogue
//! service for an effective date range, optionally overriding the
//! catalogue rate and seniority multiplier table.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A client's subscription to a service, valid over an effective date
/// range.
///
/// For a given (client, service) pair at most one assignment may be
/// active and cover any given date. The stores reject inserts that would
/// violate this, and the resolver treats a violation found at read time
/// as a data-integrity error rather than picking a winner.
///
/// Assignments are never hard-deleted; discontinuing one closes
/// `effective_to` and clears `is_active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientServiceAssignment {
    /// Unique identifier for the assignment.
    pub id: Uuid,
    /// The subscribed client.
    pub client_id: Uuid,
    /// The catalogue service.
    pub service_id: Uuid,
    /// Overrides the service base rate when present.
    pub custom_rate: Option<Decimal>,
    /// Overrides the catalogue multiplier table when present. Tiers the
    /// custom table omits fall back to the catalogue table per tier.
    pub custom_seniority_multipliers: Option<HashMap<String, Decimal>>,
    /// First day the assignment applies.
    pub effective_from: NaiveDate,
    /// Last day the assignment applies; `None` means open-ended.
    pub effective_to: Option<NaiveDate>,
    /// Whether the assignment participates in resolution and generation.
    pub is_active: bool,
}

impl ClientServiceAssignment {
    /// Creates an active, open-ended assignment with no overrides.
    pub fn new(client_id: Uuid, service_id: Uuid, effective_from: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            service_id,
            custom_rate: None,
            custom_seniority_multipliers: None,
            effective_from,
            effective_to: None,
            is_active: true,
        }
    }

    /// Returns true if the date falls inside the effective range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.is_none_or(|to| date <= to)
    }

    /// Returns true if this assignment's effective range intersects
    /// another's. Open-ended ranges extend indefinitely.
    pub fn range_overlaps(&self, other: &ClientServiceAssignment) -> bool {
        let self_ends_before_other = self
            .effective_to
            .is_some_and(|to| to < other.effective_from);
        let other_ends_before_self = other
            .effective_to
            .is_some_and(|to| to < self.effective_from);
        !(self_ends_before_other || other_ends_before_self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn assignment(from: &str, to: Option<&str>) -> ClientServiceAssignment {
        let mut a = ClientServiceAssignment::new(Uuid::new_v4(), Uuid::new_v4(), date(from));
        a.effective_to = to.map(date);
        a
    }

    #[test]
    fn test_open_ended_assignment_covers_future_dates() {
        let a = assignment("2024-01-01", None);
        assert!(a.covers(date("2024-01-01")));
        assert!(a.covers(date("2030-12-31")));
        assert!(!a.covers(date("2023-12-31")));
    }

    #[test]
    fn test_bounded_assignment_covers_inclusive_range() {
        let a = assignment("2024-01-01", Some("2024-06-30"));
        assert!(a.covers(date("2024-01-01")));
        assert!(a.covers(date("2024-06-30")));
        assert!(!a.covers(date("2024-07-01")));
    }

    #[test]
    fn test_disjoint_ranges_do_not_overlap() {
        let a = assignment("2024-01-01", Some("2024-06-30"));
        let b = assignment("2024-07-01", None);
        assert!(!a.range_overlaps(&b));
        assert!(!b.range_overlaps(&a));
    }

    #[test]
    fn test_touching_ranges_overlap() {
        let a = assignment("2024-01-01", Some("2024-06-30"));
        let b = assignment("2024-06-30", None);
        assert!(a.range_overlaps(&b));
    }

    #[test]
    fn test_two_open_ended_ranges_overlap() {
        let a = assignment("2024-01-01", None);
        let b = assignment("2025-01-01", None);
        assert!(a.range_overlaps(&b));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut a = assignment("2024-01-01", Some("2024-12-31"));
        a.custom_rate = Some(Decimal::from_str("500.00").unwrap());
        let json = serde_json::to_string(&a).unwrap();
        let back: ClientServiceAssignment = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }
}
