//! Event and projection traits shared by the ledger crates.
//!
//! Events are facts in an append-only log; projections are pure folds that
//! derive read models from a snapshot of that log.

pub mod event;
pub mod projection;

pub use event::Event;
pub use projection::{project, Projection};
