//! The staff rate history store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::StaffRateRecord;

/// In-memory, append-only store of effective-dated staff rate records.
///
/// A rate change goes through [`append`](StaffRateHistory::append), which
/// closes the staff member's current open record and inserts the new one
/// in a single operation, preserving the full audit history. Records are
/// never mutated in place otherwise.
#[derive(Debug, Default)]
pub struct StaffRateHistory {
    inner: RwLock<HashMap<Uuid, Vec<StaffRateRecord>>>,
}

impl StaffRateHistory {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BillingResult<RwLockReadGuard<'_, HashMap<Uuid, Vec<StaffRateRecord>>>> {
        self.inner.read().map_err(|_| BillingError::StoreUnavailable {
            store: "staff rate history",
        })
    }

    fn write(&self) -> BillingResult<RwLockWriteGuard<'_, HashMap<Uuid, Vec<StaffRateRecord>>>> {
        self.inner.write().map_err(|_| BillingError::StoreUnavailable {
            store: "staff rate history",
        })
    }

    /// Appends a new rate record, closing the current open record at the
    /// day before the new record's `effective_from`.
    ///
    /// Fails with [`BillingError::OverlappingStaffRates`] if the new
    /// record's range would intersect an already-closed active record —
    /// history is never rewritten to make room.
    pub fn append(&self, record: StaffRateRecord) -> BillingResult<()> {
        let mut guard = self.write()?;
        let records = guard.entry(record.staff_id).or_default();

        // Validate everything before touching any record, so a rejected
        // append leaves the history untouched.
        let open_index = records
            .iter()
            .position(|r| r.is_active && r.effective_to.is_none());
        if let Some(index) = open_index {
            if records[index].effective_from >= record.effective_from {
                return Err(BillingError::OverlappingStaffRates {
                    staff_id: record.staff_id,
                    date: record.effective_from,
                });
            }
        }
        // The open record will be closed at `effective_from - 1`, so only
        // already-closed ranges can still conflict.
        if let Some(conflict) = records.iter().enumerate().find(|(i, existing)| {
            Some(*i) != open_index && existing.is_active && existing.range_overlaps(&record)
        }) {
            return Err(BillingError::OverlappingStaffRates {
                staff_id: record.staff_id,
                date: record.effective_from.max(conflict.1.effective_from),
            });
        }

        if let Some(index) = open_index {
            records[index].effective_to = record
                .effective_from
                .checked_sub_days(Days::new(1))
                .or(Some(records[index].effective_from));
        }
        records.push(record);
        Ok(())
    }

    /// Inserts without closing or checking anything.
    ///
    /// Exists for bulk import of legacy data; the lookup path still
    /// detects overlaps.
    pub fn insert_unchecked(&self, record: StaffRateRecord) -> BillingResult<()> {
        self.write()?
            .entry(record.staff_id)
            .or_default()
            .push(record);
        Ok(())
    }

    /// Finds the single active record covering `date` for the staff
    /// member.
    ///
    /// Returns `Ok(None)` when no record covers the date, and
    /// [`BillingError::OverlappingStaffRates`] when more than one does.
    pub fn find_covering(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
    ) -> BillingResult<Option<StaffRateRecord>> {
        let guard = self.read()?;
        let Some(records) = guard.get(&staff_id) else {
            return Ok(None);
        };

        let mut matches = records.iter().filter(|r| r.is_active && r.covers(date));
        let first = matches.next().cloned();
        if first.is_some() && matches.next().is_some() {
            return Err(BillingError::OverlappingStaffRates { staff_id, date });
        }
        Ok(first)
    }

    /// The staff member's full rate history, oldest first.
    pub fn history(&self, staff_id: Uuid) -> BillingResult<Vec<StaffRateRecord>> {
        let mut records = self
            .read()?
            .get(&staff_id)
            .cloned()
            .unwrap_or_default();
        records.sort_by_key(|r| r.effective_from);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_append_closes_previous_open_record() {
        let history = StaffRateHistory::new();
        let staff_id = Uuid::new_v4();

        history
            .append(StaffRateRecord::new(staff_id, dec("90.00"), "junior", date("2023-01-01")))
            .unwrap();
        history
            .append(StaffRateRecord::new(staff_id, dec("100.00"), "senior", date("2024-01-01")))
            .unwrap();

        let records = history.history(staff_id).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].effective_to, Some(date("2023-12-31")));
        assert!(records[1].effective_to.is_none());
    }

    #[test]
    fn test_append_rejects_backdated_record() {
        let history = StaffRateHistory::new();
        let staff_id = Uuid::new_v4();

        history
            .append(StaffRateRecord::new(staff_id, dec("90.00"), "junior", date("2024-01-01")))
            .unwrap();

        let result = history.append(StaffRateRecord::new(
            staff_id,
            dec("100.00"),
            "senior",
            date("2023-06-01"),
        ));
        match result {
            Err(BillingError::OverlappingStaffRates { .. }) => {}
            other => panic!("Expected OverlappingStaffRates, got {:?}", other),
        }
    }

    #[test]
    fn test_append_rejects_overlap_with_closed_record() {
        let history = StaffRateHistory::new();
        let staff_id = Uuid::new_v4();

        let mut closed = StaffRateRecord::new(staff_id, dec("90.00"), "junior", date("2023-01-01"));
        closed.effective_to = Some(date("2023-12-31"));
        history.insert_unchecked(closed).unwrap();

        let result = history.append(StaffRateRecord::new(
            staff_id,
            dec("100.00"),
            "senior",
            date("2023-06-01"),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_find_covering_picks_correct_record() {
        let history = StaffRateHistory::new();
        let staff_id = Uuid::new_v4();

        history
            .append(StaffRateRecord::new(staff_id, dec("90.00"), "junior", date("2023-01-01")))
            .unwrap();
        history
            .append(StaffRateRecord::new(staff_id, dec("100.00"), "senior", date("2024-01-01")))
            .unwrap();

        let old = history
            .find_covering(staff_id, date("2023-06-15"))
            .unwrap()
            .unwrap();
        assert_eq!(old.hourly_rate, dec("90.00"));
        assert_eq!(old.seniority_level, "junior");

        let current = history
            .find_covering(staff_id, date("2024-06-15"))
            .unwrap()
            .unwrap();
        assert_eq!(current.hourly_rate, dec("100.00"));
        assert_eq!(current.seniority_level, "senior");
    }

    #[test]
    fn test_find_covering_returns_none_before_history() {
        let history = StaffRateHistory::new();
        let staff_id = Uuid::new_v4();
        history
            .append(StaffRateRecord::new(staff_id, dec("90.00"), "junior", date("2023-01-01")))
            .unwrap();

        assert!(
            history
                .find_covering(staff_id, date("2022-12-31"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_find_covering_unknown_staff_returns_none() {
        let history = StaffRateHistory::new();
        assert!(
            history
                .find_covering(Uuid::new_v4(), date("2024-01-01"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_find_covering_detects_unchecked_overlap() {
        let history = StaffRateHistory::new();
        let staff_id = Uuid::new_v4();

        history
            .insert_unchecked(StaffRateRecord::new(staff_id, dec("90.00"), "junior", date("2023-01-01")))
            .unwrap();
        history
            .insert_unchecked(StaffRateRecord::new(staff_id, dec("100.00"), "senior", date("2023-06-01")))
            .unwrap();

        let result = history.find_covering(staff_id, date("2023-07-01"));
        match result {
            Err(BillingError::OverlappingStaffRates { staff_id: s, .. }) => {
                assert_eq!(s, staff_id);
            }
            other => panic!("Expected OverlappingStaffRates, got {:?}", other),
        }
    }

    #[test]
    fn test_history_is_sorted_oldest_first() {
        let history = StaffRateHistory::new();
        let staff_id = Uuid::new_v4();

        history
            .append(StaffRateRecord::new(staff_id, dec("90.00"), "junior", date("2023-01-01")))
            .unwrap();
        history
            .append(StaffRateRecord::new(staff_id, dec("100.00"), "senior", date("2024-01-01")))
            .unwrap();
        history
            .append(StaffRateRecord::new(staff_id, dec("120.00"), "manager", date("2025-01-01")))
            .unwrap();

        let records = history.history(staff_id).unwrap();
        let rates: Vec<_> = records.iter().map(|r| r.hourly_rate).collect();
        assert_eq!(rates, vec![dec("90.00"), dec("100.00"), dec("120.00")]);
    }
}
