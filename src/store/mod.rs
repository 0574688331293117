//! In-memory stores backing the billing engine.
//!
//! Four stores are owned by the engine — the service catalogue, the
//! assignment store, the staff rate history, and the billing ledger —
//! and three directories mirror external collaborators. Every store uses
//! an interior `RwLock`, so the engine can be shared across threads and
//! the ledger can enforce the generation idempotency key atomically.

mod assignments;
mod catalogue;
mod directories;
mod ledger;
mod staff_rates;

pub use assignments::AssignmentStore;
pub use catalogue::ServiceCatalogue;
pub use directories::{ClientDirectory, PayrollDirectory, TimeEntryStore};
pub use ledger::BillingLedger;
pub use staff_rates::StaffRateHistory;
