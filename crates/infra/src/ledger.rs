//! Query facade over an [`EventLog`].
//!
//! Each query takes one fresh snapshot of the log and hands it to the pure
//! ledger functions. No derived state is kept between calls.

use chrono::NaiveDate;
use tracing::{debug, instrument};

use sheetstock_core::CustomerName;
use sheetstock_inventory::{
    project_history, summarize_customers, summarize_item_stock, CustomerSummary, HistoryEntry,
    HistoryQuery, StockItem, StockSheetQuery,
};

use crate::config::LedgerConfig;
use crate::event_log::{EventLog, EventLogError};

/// Read side of the stock ledger.
#[derive(Debug)]
pub struct StockLedger<L> {
    log: L,
    config: LedgerConfig,
}

impl<L> StockLedger<L>
where
    L: EventLog,
{
    pub fn new(log: L) -> Self {
        Self::with_config(log, LedgerConfig::default())
    }

    pub fn with_config(log: L, config: LedgerConfig) -> Self {
        Self { log, config }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Stock sheet query built from the configured defaults.
    pub fn default_sheet_query(&self) -> StockSheetQuery {
        StockSheetQuery {
            search: None,
            include_inactive: !self.config.hide_inactive,
        }
    }

    /// History query built from the configured defaults.
    pub fn default_history_query(&self) -> HistoryQuery {
        HistoryQuery {
            range: self.config.date_range,
            search: None,
            order: self.config.history_order,
        }
    }

    /// One rollup per customer, ordered by name.
    #[instrument(level = "debug", skip(self))]
    pub fn customer_summaries(&self) -> Result<Vec<CustomerSummary>, EventLogError> {
        let events = self.log.list_events()?;
        let summaries = summarize_customers(&events);
        debug!(events = events.len(), customers = summaries.len(), "customer summaries computed");
        Ok(summaries)
    }

    /// Stock sheet for `customer`, filtered by `query`.
    #[instrument(level = "debug", skip(self, customer, query), fields(customer = %customer))]
    pub fn item_stock(
        &self,
        customer: &CustomerName,
        query: &StockSheetQuery,
    ) -> Result<Vec<StockItem>, EventLogError> {
        let events = self.log.list_events()?;
        let items = query.apply(summarize_item_stock(&events, customer));
        debug!(events = events.len(), items = items.len(), "item stock computed");
        Ok(items)
    }

    /// Running-balance history for `customer`, filtered and ordered by `query`.
    ///
    /// Balances are computed over the customer's full history before `query`
    /// narrows the rows, so a filtered row still shows its true running total.
    #[instrument(level = "debug", skip(self, customer, query), fields(customer = %customer))]
    pub fn history(
        &self,
        customer: &CustomerName,
        query: &HistoryQuery,
        today: NaiveDate,
    ) -> Result<Vec<HistoryEntry>, EventLogError> {
        let events = self.log.list_events()?;
        let rows = query.apply(project_history(&events, customer), today);
        debug!(events = events.len(), rows = rows.len(), "history projected");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_log::InMemoryEventLog;

    #[test]
    fn default_queries_follow_config() {
        let config = LedgerConfig {
            hide_inactive: false,
            ..LedgerConfig::default()
        };
        let ledger = StockLedger::with_config(InMemoryEventLog::new(), config);
        assert!(ledger.default_sheet_query().include_inactive);
        assert_eq!(ledger.default_history_query(), HistoryQuery::default());
    }

    #[test]
    fn empty_log_yields_empty_views() {
        let ledger = StockLedger::new(InMemoryEventLog::new());
        let acme = CustomerName::new("Acme");
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(ledger.customer_summaries().unwrap().is_empty());
        assert!(ledger.item_stock(&acme, &StockSheetQuery::all()).unwrap().is_empty());
        assert!(ledger.history(&acme, &HistoryQuery::default(), today).unwrap().is_empty());
    }
}
