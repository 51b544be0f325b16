//! Balance reducer: folds stock events into pool balances and cumulative counters.

use serde::{Deserialize, Serialize};

use sheetstock_core::ValueObject;
use sheetstock_events::{project, Projection};

use crate::movement::{Movement, StockEvent, StockPool};

/// Raw cumulative counters for one scope (a customer, or one item of a customer).
///
/// Pure sums, so the fold is order-independent: any permutation of the same
/// events yields the same counters.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BalanceCounters {
    pub total_received: i64,
    pub total_processed: i64,
    pub returned_raw: i64,
    pub returned_cut: i64,
    pub wastage_raw: i64,
    pub wastage_cut: i64,
}

impl BalanceCounters {
    /// Net cut output: processed minus cut returns minus cut wastage.
    ///
    /// Not clamped. A customer can show a negative figure here when more cut
    /// stock left than was produced; the customer rollup reports it as-is.
    pub fn net_cut(&self) -> i64 {
        self.total_processed - self.returned_cut - self.wastage_cut
    }

    /// Net raw stock before clamping.
    pub fn net_raw(&self) -> i64 {
        self.total_received - self.total_processed - self.returned_raw - self.wastage_raw
    }

    pub fn total_returned(&self) -> i64 {
        self.returned_raw + self.returned_cut
    }

    pub fn balance(&self) -> Balance {
        Balance::from(*self)
    }
}

impl Projection for BalanceCounters {
    type Ev = StockEvent;

    fn apply(&mut self, event: &StockEvent) {
        let q = i64::from(event.quantity);
        match event.movement() {
            Movement::Received => self.total_received += q,
            Movement::Processed => self.total_processed += q,
            Movement::StatusOnly => {}
            Movement::Returned(StockPool::Raw) => self.returned_raw += q,
            Movement::Returned(StockPool::Cut) => self.returned_cut += q,
            Movement::Wasted(StockPool::Raw) => self.wastage_raw += q,
            Movement::Wasted(StockPool::Cut) => self.wastage_cut += q,
        }
    }
}

/// Current stock for a scope: cumulative counters plus clamped pool balances.
///
/// Pool balances never go below zero even when the log holds more exits than
/// entries (manual corrections); `total_on_site` is always
/// `balance_raw + balance_cut`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Balance {
    pub total_received: i64,
    pub total_processed: i64,
    pub returned_raw: i64,
    pub returned_cut: i64,
    pub wastage_raw: i64,
    pub wastage_cut: i64,
    pub balance_raw: i64,
    pub balance_cut: i64,
    pub total_on_site: i64,
}

impl ValueObject for Balance {}

impl From<BalanceCounters> for Balance {
    fn from(c: BalanceCounters) -> Self {
        let balance_raw = c.net_raw().max(0);
        let balance_cut = c.net_cut().max(0);
        Self {
            total_received: c.total_received,
            total_processed: c.total_processed,
            returned_raw: c.returned_raw,
            returned_cut: c.returned_cut,
            wastage_raw: c.wastage_raw,
            wastage_cut: c.wastage_cut,
            balance_raw,
            balance_cut,
            total_on_site: balance_raw + balance_cut,
        }
    }
}

impl Balance {
    /// Quantity currently on hand in `pool`, i.e. the most a movement can draw.
    pub fn available(&self, pool: StockPool) -> i64 {
        match pool {
            StockPool::Raw => self.balance_raw,
            StockPool::Cut => self.balance_cut,
        }
    }

    /// Has anything been received, or is anything still on site.
    pub fn is_active(&self) -> bool {
        self.total_on_site > 0 || self.total_received > 0
    }
}

/// Reduce a set of events (already restricted to one scope) into a [`Balance`].
pub fn reduce<'a>(events: impl IntoIterator<Item = &'a StockEvent>) -> Balance {
    let counters: BalanceCounters = project(events);
    counters.balance()
}
