//! Infrastructure layer: the stock event log and the query facade over it.

pub mod config;
pub mod event_log;
pub mod ledger;

pub use config::LedgerConfig;
pub use event_log::{EventLog, EventLogError, InMemoryEventLog, NewStockEvent, StockEventPatch};
pub use ledger::StockLedger;
