//! Inventory ledger engine.
//!
//! Derives stock positions from an append-only log of stock movements:
//! per-customer rollups, per-item stock sheets, and a chronological
//! running-balance history. Everything here is a pure function of the log
//! snapshot it is given (no IO, no caching, no interior state), so callers may
//! share a snapshot across threads and query it concurrently.

pub mod balance;
pub mod history;
pub mod movement;
pub mod summary;

pub use balance::{reduce, Balance, BalanceCounters};
pub use history::{project_history, DateRange, HistoryEntry, HistoryOrder, HistoryQuery, RunningBalance};
pub use movement::{
    EventMetadata, GatePass, Movement, ProcessingStatus, StockAction, StockEvent, StockPool, Unit,
    WastageStatus,
};
pub use summary::{
    returnable_stock, site_total, summarize_customers, summarize_item_stock, CustomerSummary,
    ReturnableStock, StockItem, StockSheetQuery,
};
