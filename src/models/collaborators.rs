//! Records consumed from external collaborators.
//!
//! The engine does not own clients, payroll runs, or time entries; it
//! only reads them to compute quantities and to price time-based work.
//! These types mirror the narrow slice of each collaborator the engine
//! needs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BillingPeriod;

/// A client as seen in the client directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier for the client.
    pub id: Uuid,
    /// The client's display name.
    pub name: String,
    /// Whether the client is currently active.
    pub is_active: bool,
}

impl Client {
    /// Creates an active client.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_active: true,
        }
    }
}

/// A payroll run as seen in the payroll directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for the run.
    pub id: Uuid,
    /// The client the payroll belongs to.
    pub client_id: Uuid,
    /// Number of employees on the run.
    pub employee_count: u32,
    /// The month the run belongs to.
    pub period: BillingPeriod,
}

impl PayrollRun {
    /// Creates a payroll run record.
    pub fn new(client_id: Uuid, employee_count: u32, period: BillingPeriod) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            employee_count,
            period,
        }
    }
}

/// A recorded unit of staff time against a client and service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The staff member who recorded the time.
    pub staff_id: Uuid,
    /// The client the time was worked for.
    pub client_id: Uuid,
    /// The service the time was worked under.
    pub service_id: Uuid,
    /// The day the work happened; rates are resolved as of this date.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
}

impl TimeEntry {
    /// Creates a time entry.
    pub fn new(
        staff_id: Uuid,
        client_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
        hours: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            staff_id,
            client_id,
            service_id,
            date,
            hours,
        }
    }
}
