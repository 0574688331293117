//! Staff rate history model.
//!
//! A [`StaffRateRecord`] is one effective-dated entry in a staff member's
//! rate history. Records are append-only: a rate change appends a new
//! record and closes the previous open one, never mutating history.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One effective-dated hourly-rate record for a staff member.
///
/// The record with `effective_to = None` and `is_active = true` is the
/// staff member's current rate. Active records for the same staff member
/// must not overlap in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRateRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The staff member this record belongs to.
    pub staff_id: Uuid,
    /// The hourly rate in effect over the record's range.
    pub hourly_rate: Decimal,
    /// The staff member's seniority tier over the record's range
    /// (e.g. "junior", "senior", "manager", "partner").
    pub seniority_level: String,
    /// First day the record applies.
    pub effective_from: NaiveDate,
    /// Last day the record applies; `None` means current.
    pub effective_to: Option<NaiveDate>,
    /// Whether the record participates in rate lookups.
    pub is_active: bool,
}

impl StaffRateRecord {
    /// Creates an active, open-ended record.
    pub fn new(
        staff_id: Uuid,
        hourly_rate: Decimal,
        seniority_level: impl Into<String>,
        effective_from: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            staff_id,
            hourly_rate,
            seniority_level: seniority_level.into(),
            effective_from,
            effective_to: None,
            is_active: true,
        }
    }

    /// Returns true if the date falls inside the effective range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.is_none_or(|to| date <= to)
    }

    /// Returns true if this record's effective range intersects another's.
    pub fn range_overlaps(&self, other: &StaffRateRecord) -> bool {
        let self_ends_before_other = self
            .effective_to
            .is_some_and(|to| to < other.effective_from);
        let other_ends_before_self = other
            .effective_to
            .is_some_and(|to| to < self.effective_from);
        !(self_ends_before_other || other_ends_before_self)
    }
}
