//! The billing ledger store.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::{BillingItem, BillingPeriod, BillingStatus};

/// In-memory store of generated billing items.
///
/// The ledger is the engine's only output and the synchronization point
/// for idempotent generation:
/// [`insert_unique`](BillingLedger::insert_unique) performs the
/// check-then-insert for the (client, service, period) key under a single
/// write lock, so concurrent generation workers cannot both create an
/// item for the same key. Client-side "already exists" checks are a
/// shortcut only; this is the correctness mechanism.
#[derive(Debug, Default)]
pub struct BillingLedger {
    inner: RwLock<Vec<BillingItem>>,
}

impl BillingLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BillingResult<RwLockReadGuard<'_, Vec<BillingItem>>> {
        self.inner.read().map_err(|_| BillingError::StoreUnavailable {
            store: "billing ledger",
        })
    }

    fn write(&self) -> BillingResult<RwLockWriteGuard<'_, Vec<BillingItem>>> {
        self.inner.write().map_err(|_| BillingError::StoreUnavailable {
            store: "billing ledger",
        })
    }

    /// Inserts an item, enforcing the idempotency key.
    ///
    /// The key is (client, service, period, payroll); for monthly items
    /// `payroll_id` is `None` and the key reduces to the period tuple.
    /// Fails with [`BillingError::DuplicateBillingItem`] if an item with
    /// the same key already exists, regardless of its status — an
    /// approved item is never overwritten.
    pub fn insert_unique(&self, item: BillingItem) -> BillingResult<()> {
        let mut guard = self.write()?;
        let exists = guard.iter().any(|existing| {
            existing.client_id == item.client_id
                && existing.service_id == item.service_id
                && existing.billing_period == item.billing_period
                && existing.payroll_id == item.payroll_id
        });
        if exists {
            return Err(BillingError::DuplicateBillingItem {
                client_id: item.client_id,
                service_id: item.service_id,
                period: item.billing_period,
            });
        }
        guard.push(item);
        Ok(())
    }

    /// Inserts an ad-hoc item with no idempotency key.
    pub fn insert(&self, item: BillingItem) -> BillingResult<()> {
        self.write()?.push(item);
        Ok(())
    }

    /// Returns true if a period-keyed item exists for the tuple.
    pub fn exists(
        &self,
        client_id: Uuid,
        service_id: Uuid,
        period: BillingPeriod,
    ) -> BillingResult<bool> {
        Ok(self.read()?.iter().any(|item| {
            item.client_id == client_id
                && item.service_id == service_id
                && item.billing_period == period
                && item.payroll_id.is_none()
        }))
    }

    /// Looks up an item by id.
    pub fn get(&self, item_id: Uuid) -> BillingResult<BillingItem> {
        self.read()?
            .iter()
            .find(|item| item.id == item_id)
            .cloned()
            .ok_or(BillingError::ItemNotFound { item_id })
    }

    /// Moves an item through the approval workflow.
    ///
    /// Fails with [`BillingError::InvalidStatusTransition`] for any move
    /// not allowed by [`BillingStatus::can_transition_to`].
    pub fn transition(&self, item_id: Uuid, to: BillingStatus) -> BillingResult<BillingItem> {
        let mut guard = self.write()?;
        let item = guard
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or(BillingError::ItemNotFound { item_id })?;
        if !item.status.can_transition_to(to) {
            return Err(BillingError::InvalidStatusTransition {
                from: item.status,
                to,
            });
        }
        item.status = to;
        Ok(item.clone())
    }

    /// Filtered read over the ledger. `None` filters match everything.
    pub fn query(
        &self,
        period: Option<BillingPeriod>,
        client_id: Option<Uuid>,
        status: Option<BillingStatus>,
    ) -> BillingResult<Vec<BillingItem>> {
        Ok(self
            .read()?
            .iter()
            .filter(|item| period.is_none_or(|p| item.billing_period == p))
            .filter(|item| client_id.is_none_or(|c| item.client_id == c))
            .filter(|item| status.is_none_or(|s| item.status == s))
            .cloned()
            .collect())
    }

    /// Number of items in the ledger.
    pub fn len(&self) -> BillingResult<usize> {
        Ok(self.read()?.len())
    }

    /// Returns true if the ledger holds no items.
    pub fn is_empty(&self) -> BillingResult<bool> {
        Ok(self.read()?.is_empty())
    }
}
