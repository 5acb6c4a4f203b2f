// Ledger model and crash-safe persistence

pub mod ledger;
pub mod store;
pub mod tracked;

pub use ledger::{Ledger, ProcessingRecord};
pub use store::{LedgerStore, DEFAULT_LOAD_ATTEMPTS, DEFAULT_LOAD_RETRY_DELAY};
pub use tracked::TrackedLedger;
