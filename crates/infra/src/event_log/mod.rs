//! Stock event log boundary.
//!
//! The log is owned by the persistence side; the ledger engine only reads full
//! snapshots of it. Validation of new and edited events happens here, before
//! anything reaches the engine.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryEventLog;
pub use r#trait::{validate_event, EventLog, EventLogError, NewStockEvent, StockEventPatch};
