//! The client service assignment store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::ClientServiceAssignment;

/// In-memory store of client service assignments.
///
/// The insert path enforces the core invariant: for a given
/// (client, service) pair, at most one active assignment may cover any
/// given date. [`find_covering`](AssignmentStore::find_covering)
/// re-checks the invariant at read time and reports a violation as an
/// integrity error instead of picking a winner, so data imported through
/// [`insert_unchecked`](AssignmentStore::insert_unchecked) is still
/// caught.
#[derive(Debug, Default)]
pub struct AssignmentStore {
    inner: RwLock<HashMap<Uuid, ClientServiceAssignment>>,
}

impl AssignmentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BillingResult<RwLockReadGuard<'_, HashMap<Uuid, ClientServiceAssignment>>> {
        self.inner.read().map_err(|_| BillingError::StoreUnavailable {
            store: "assignment store",
        })
    }

    fn write(&self) -> BillingResult<RwLockWriteGuard<'_, HashMap<Uuid, ClientServiceAssignment>>> {
        self.inner.write().map_err(|_| BillingError::StoreUnavailable {
            store: "assignment store",
        })
    }

    /// Inserts an assignment, rejecting it if its effective range
    /// overlaps an existing active assignment for the same
    /// (client, service) pair.
    pub fn insert(&self, assignment: ClientServiceAssignment) -> BillingResult<()> {
        let mut guard = self.write()?;
        if assignment.is_active {
            let conflict = guard.values().find(|existing| {
                existing.is_active
                    && existing.client_id == assignment.client_id
                    && existing.service_id == assignment.service_id
                    && existing.range_overlaps(&assignment)
            });
            if let Some(existing) = conflict {
                return Err(BillingError::OverlappingAssignments {
                    client_id: assignment.client_id,
                    service_id: assignment.service_id,
                    date: assignment.effective_from.max(existing.effective_from),
                });
            }
        }
        guard.insert(assignment.id, assignment);
        Ok(())
    }

    /// Inserts without the overlap check.
    ///
    /// Exists for bulk import of legacy data whose integrity is not
    /// guaranteed; the resolver still detects overlaps at read time.
    pub fn insert_unchecked(&self, assignment: ClientServiceAssignment) -> BillingResult<()> {
        self.write()?.insert(assignment.id, assignment);
        Ok(())
    }

    /// Finds the single assignment covering `date` for the pair.
    ///
    /// Returns `Ok(None)` when no assignment covers the date, and
    /// [`BillingError::OverlappingAssignments`] when more than one does.
    /// With `include_inactive` set (audit replay), discontinued
    /// assignments whose range covers the date are considered too.
    pub fn find_covering(
        &self,
        client_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
        include_inactive: bool,
    ) -> BillingResult<Option<ClientServiceAssignment>> {
        let guard = self.read()?;
        let mut matches = guard.values().filter(|a| {
            a.client_id == client_id
                && a.service_id == service_id
                && (a.is_active || include_inactive)
                && a.covers(date)
        });

        let first = matches.next().cloned();
        if first.is_some() && matches.next().is_some() {
            return Err(BillingError::OverlappingAssignments {
                client_id,
                service_id,
                date,
            });
        }
        Ok(first)
    }

    /// Closes an assignment: sets `effective_to` and clears `is_active`.
    pub fn discontinue(&self, assignment_id: Uuid, end_date: NaiveDate) -> BillingResult<()> {
        match self.write()?.get_mut(&assignment_id) {
            Some(assignment) => {
                assignment.effective_to = Some(end_date);
                assignment.is_active = false;
                Ok(())
            }
            None => Err(BillingError::AssignmentNotFound { assignment_id }),
        }
    }

    /// All assignments for a client, active or not.
    pub fn list_for_client(&self, client_id: Uuid) -> BillingResult<Vec<ClientServiceAssignment>> {
        let mut assignments: Vec<_> = self
            .read()?
            .values()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.effective_from);
        Ok(assignments)
    }

    /// Snapshot of all active assignments, ordered by (client, service)
    /// so generation runs walk them deterministically.
    pub fn active_snapshot(&self) -> BillingResult<Vec<ClientServiceAssignment>> {
        let mut assignments: Vec<_> = self
            .read()?
            .values()
            .filter(|a| a.is_active)
            .cloned()
            .collect();
        assignments.sort_by_key(|a| (a.client_id, a.service_id, a.effective_from));
        Ok(assignments)
    }
}
