//! The service catalogue store.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::{BillingError, BillingResult};
use crate::models::Service;

/// In-memory store of service catalogue entries.
///
/// Services are only ever deactivated, never removed, because historical
/// billing items reference them.
///
/// # Example
///
/// ```
/// use billing_engine::models::{ChargeBasis, Service};
/// use billing_engine::store::ServiceCatalogue;
/// use rust_decimal::Decimal;
///
/// let catalogue = ServiceCatalogue::new();
/// let service = Service::new("Payroll Processing", ChargeBasis::PerClientMonthly, Some(Decimal::new(80000, 2)));
/// let id = service.id;
/// catalogue.insert(service).unwrap();
/// assert_eq!(catalogue.get(id).unwrap().name, "Payroll Processing");
/// ```
#[derive(Debug, Default)]
pub struct ServiceCatalogue {
    inner: RwLock<HashMap<Uuid, Service>>,
}

impl ServiceCatalogue {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BillingResult<RwLockReadGuard<'_, HashMap<Uuid, Service>>> {
        self.inner.read().map_err(|_| BillingError::StoreUnavailable {
            store: "service catalogue",
        })
    }

    fn write(&self) -> BillingResult<RwLockWriteGuard<'_, HashMap<Uuid, Service>>> {
        self.inner.write().map_err(|_| BillingError::StoreUnavailable {
            store: "service catalogue",
        })
    }

    /// Adds or replaces a catalogue entry.
    pub fn insert(&self, service: Service) -> BillingResult<()> {
        self.write()?.insert(service.id, service);
        Ok(())
    }

    /// Looks up a service by id, active or not.
    ///
    /// Callers decide whether an inactive service is acceptable; audit
    /// replay of historical billing must still resolve deactivated
    /// services.
    pub fn get(&self, service_id: Uuid) -> BillingResult<Service> {
        self.read()?
            .get(&service_id)
            .cloned()
            .ok_or(BillingError::ServiceNotFound { service_id })
    }

    /// Marks a service inactive. Historical items keep resolving it.
    pub fn deactivate(&self, service_id: Uuid) -> BillingResult<()> {
        match self.write()?.get_mut(&service_id) {
            Some(service) => {
                service.is_active = false;
                Ok(())
            }
            None => Err(BillingError::ServiceNotFound { service_id }),
        }
    }

    /// All catalogue entries, in unspecified order.
    pub fn list(&self) -> BillingResult<Vec<Service>> {
        Ok(self.read()?.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChargeBasis;
    use rust_decimal::Decimal;

    fn sample_service() -> Service {
        Service::new(
            "Payroll Processing",
            ChargeBasis::PerClientMonthly,
            Some(Decimal::new(80000, 2)),
        )
    }

    #[test]
    fn test_insert_then_get() {
        let catalogue = ServiceCatalogue::new();
        let service = sample_service();
        let id = service.id;
        catalogue.insert(service.clone()).unwrap();
        assert_eq!(catalogue.get(id).unwrap(), service);
    }

    #[test]
    fn test_get_unknown_service_fails() {
        let catalogue = ServiceCatalogue::new();
        let missing = Uuid::new_v4();
        match catalogue.get(missing) {
            Err(BillingError::ServiceNotFound { service_id }) => assert_eq!(service_id, missing),
            other => panic!("Expected ServiceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_deactivate_keeps_entry_resolvable() {
        let catalogue = ServiceCatalogue::new();
        let service = sample_service();
        let id = service.id;
        catalogue.insert(service).unwrap();
        catalogue.deactivate(id).unwrap();

        let fetched = catalogue.get(id).unwrap();
        assert!(!fetched.is_active);
    }

    #[test]
    fn test_deactivate_unknown_service_fails() {
        let catalogue = ServiceCatalogue::new();
        assert!(catalogue.deactivate(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_list_returns_all_entries() {
        let catalogue = ServiceCatalogue::new();
        catalogue.insert(sample_service()).unwrap();
        catalogue.insert(sample_service()).unwrap();
        assert_eq!(catalogue.list().unwrap().len(), 2);
    }
}
