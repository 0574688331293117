//! Collaborator directories consumed by the engine.
//!
//! Clients, payroll runs, and time entries are owned by the surrounding
//! application; the engine reads them through these narrow directory
//! stores to compute quantities and price time-based work.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::{BillingPeriod, Client, PayrollRun, TimeEntry};

/// Lookup of clients by id.
#[derive(Debug, Default)]
pub struct ClientDirectory {
    inner: RwLock<HashMap<Uuid, Client>>,
}

impl ClientDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BillingResult<RwLockReadGuard<'_, HashMap<Uuid, Client>>> {
        self.inner.read().map_err(|_| BillingError::StoreUnavailable {
            store: "client directory",
        })
    }

    /// Adds or replaces a client record.
    pub fn insert(&self, client: Client) -> BillingResult<()> {
        self.inner
            .write()
            .map_err(|_| BillingError::StoreUnavailable {
                store: "client directory",
            })?
            .insert(client.id, client);
        Ok(())
    }

    /// Looks up a client by id.
    pub fn get(&self, client_id: Uuid) -> BillingResult<Client> {
        self.read()?
            .get(&client_id)
            .cloned()
            .ok_or(BillingError::ClientNotFound { client_id })
    }
}

/// Lookup of payroll runs by id and by (client, period).
#[derive(Debug, Default)]
pub struct PayrollDirectory {
    inner: RwLock<HashMap<Uuid, PayrollRun>>,
}

impl PayrollDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BillingResult<RwLockReadGuard<'_, HashMap<Uuid, PayrollRun>>> {
        self.inner.read().map_err(|_| BillingError::StoreUnavailable {
            store: "payroll directory",
        })
    }

    /// Adds or replaces a payroll run record.
    pub fn insert(&self, run: PayrollRun) -> BillingResult<()> {
        self.inner
            .write()
            .map_err(|_| BillingError::StoreUnavailable {
                store: "payroll directory",
            })?
            .insert(run.id, run);
        Ok(())
    }

    /// Looks up a payroll run by id.
    pub fn get(&self, payroll_id: Uuid) -> BillingResult<PayrollRun> {
        self.read()?
            .get(&payroll_id)
            .cloned()
            .ok_or(BillingError::PayrollNotFound { payroll_id })
    }

    /// All of a client's payroll runs in a period.
    pub fn runs_for(&self, client_id: Uuid, period: BillingPeriod) -> BillingResult<Vec<PayrollRun>> {
        Ok(self
            .read()?
            .values()
            .filter(|run| run.client_id == client_id && run.period == period)
            .cloned()
            .collect())
    }
}

/// Store of recorded time entries.
#[derive(Debug, Default)]
pub struct TimeEntryStore {
    inner: RwLock<Vec<TimeEntry>>,
}

impl TimeEntryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BillingResult<RwLockReadGuard<'_, Vec<TimeEntry>>> {
        self.inner.read().map_err(|_| BillingError::StoreUnavailable {
            store: "time entry store",
        })
    }

    /// Records a time entry.
    pub fn insert(&self, entry: TimeEntry) -> BillingResult<()> {
        self.inner
            .write()
            .map_err(|_| BillingError::StoreUnavailable {
                store: "time entry store",
            })?
            .push(entry);
        Ok(())
    }

    /// All entries for a (client, service) pair dated within the period,
    /// ordered by date then entry id for deterministic pricing.
    pub fn entries_for(
        &self,
        client_id: Uuid,
        service_id: Uuid,
        period: BillingPeriod,
    ) -> BillingResult<Vec<TimeEntry>> {
        let mut entries: Vec<_> = self
            .read()?
            .iter()
            .filter(|entry| {
                entry.client_id == client_id
                    && entry.service_id == service_id
                    && period.contains(entry.date)
            })
            .cloned()
            .collect();
        entries.sort_by_key(|entry| (entry.date, entry.id));
        Ok(entries)
    }
}
