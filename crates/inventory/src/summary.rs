//! Read-only summary views: per-customer rollup and per-item stock sheet.
//!
//! Both are recomputed from the full log snapshot on every call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sheetstock_core::{CustomerName, ItemKey};
use sheetstock_events::Projection;

use crate::balance::{Balance, BalanceCounters};
use crate::movement::{StockEvent, StockPool};

/// Per-customer rollup.
///
/// `balance` is the clamped reducer output for the whole customer. `total_cut`
/// is net cut output and is deliberately left unclamped, so it can read
/// negative when more cut stock left than was cut. `total_balance` is the
/// headline figure `balance.balance_raw + total_cut`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer: CustomerName,
    #[serde(flatten)]
    pub balance: Balance,
    pub total_cut: i64,
    pub total_returned: i64,
    pub total_balance: i64,
}

impl CustomerSummary {
    fn from_counters(customer: CustomerName, counters: &BalanceCounters) -> Self {
        let balance = counters.balance();
        let total_cut = counters.net_cut();
        Self {
            customer,
            balance,
            total_cut,
            total_returned: counters.total_returned(),
            total_balance: balance.balance_raw + total_cut,
        }
    }
}

/// One row of a customer's stock sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(flatten)]
    pub key: ItemKey,
    #[serde(flatten)]
    pub balance: Balance,
}

impl StockItem {
    pub fn is_active(&self) -> bool {
        self.balance.is_active()
    }

    pub fn available(&self, pool: StockPool) -> i64 {
        self.balance.available(pool)
    }
}

/// Roll every customer in the log up into one summary each, ordered by customer name.
pub fn summarize_customers(events: &[StockEvent]) -> Vec<CustomerSummary> {
    let mut by_customer: BTreeMap<&CustomerName, BalanceCounters> = BTreeMap::new();
    for event in events {
        by_customer.entry(&event.customer).or_default().apply(event);
    }

    by_customer
        .into_iter()
        .map(|(customer, counters)| CustomerSummary::from_counters(customer.clone(), &counters))
        .collect()
}

/// Per-item balances for one customer, ordered by `(code, type)`.
///
/// Unfiltered: every item the customer has any event for is listed, including
/// items whose counters are all zero. Use [`StockSheetQuery`] for the
/// presentation view.
pub fn summarize_item_stock(events: &[StockEvent], customer: &CustomerName) -> Vec<StockItem> {
    let mut by_item: BTreeMap<&ItemKey, BalanceCounters> = BTreeMap::new();
    for event in events.iter().filter(|e| &e.customer == customer) {
        by_item.entry(&event.item).or_default().apply(event);
    }

    by_item
        .into_iter()
        .map(|(key, counters)| StockItem {
            key: key.clone(),
            balance: counters.balance(),
        })
        .collect()
}

/// Presentation filter over a stock sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSheetQuery {
    /// Case-insensitive substring matched against item code or type.
    #[serde(default)]
    pub search: Option<String>,
    /// Keep items with nothing received and nothing on site.
    #[serde(default)]
    pub include_inactive: bool,
}

impl StockSheetQuery {
    /// Active items only, no search.
    pub fn active() -> Self {
        Self::default()
    }

    /// Every item, no search (audit / export).
    pub fn all() -> Self {
        Self {
            search: None,
            include_inactive: true,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn apply(&self, items: Vec<StockItem>) -> Vec<StockItem> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        items
            .into_iter()
            .filter(|item| self.include_inactive || item.is_active())
            .filter(|item| needle.as_deref().is_none_or(|n| item.key.matches_lowercase(n)))
            .collect()
    }
}

/// Total quantity on site across a stock sheet.
pub fn site_total(items: &[StockItem]) -> i64 {
    items.iter().map(|i| i.balance.total_on_site).sum()
}

/// A pool of one item that still has stock able to leave on a gate pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnableStock {
    pub key: ItemKey,
    pub pool: StockPool,
    pub available: i64,
}

/// One row per (item, pool) with a positive balance, RAW before CUT within an item.
pub fn returnable_stock(items: &[StockItem]) -> Vec<ReturnableStock> {
    items
        .iter()
        .flat_map(|item| {
            [StockPool::Raw, StockPool::Cut]
                .into_iter()
                .filter(|pool| item.available(*pool) > 0)
                .map(|pool| ReturnableStock {
                    key: item.key.clone(),
                    pool,
                    available: item.available(pool),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::StockAction;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn ev(id: &str, customer: &str, code: &str, action: StockAction, quantity: u32) -> StockEvent {
        StockEvent::new(
            id,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            customer,
            ItemKey::new(code, "Acrylic 5mm"),
            action,
            quantity,
        )
    }

    fn acme() -> CustomerName {
        CustomerName::new("Acme")
    }

    #[test]
    fn customers_are_rolled_up_separately_and_sorted() {
        let events = vec![
            ev("1", "Zeta", "A", StockAction::Receive, 10),
            ev("2", "Acme", "A", StockAction::Receive, 100),
            ev("3", "Acme", "B", StockAction::Receive, 50),
            ev("4", "Acme", "A", StockAction::process(StockPool::Raw), 20),
            ev("5", "Acme", "A", StockAction::return_from(StockPool::Cut), 5),
        ];

        let summaries = summarize_customers(&events);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].customer, acme());
        assert_eq!(summaries[0].balance.total_received, 150);
        assert_eq!(summaries[0].balance.balance_raw, 130);
        assert_eq!(summaries[0].total_cut, 15);
        assert_eq!(summaries[0].total_returned, 5);
        assert_eq!(summaries[0].total_balance, 145);
        assert_eq!(summaries[1].customer.as_str(), "Zeta");
        assert_eq!(summaries[1].total_balance, 10);
    }

    #[test]
    fn customer_total_cut_can_go_negative() {
        let events = vec![
            ev("1", "Acme", "A", StockAction::Receive, 10),
            ev("2", "Acme", "A", StockAction::process(StockPool::Raw), 2),
            ev("3", "Acme", "A", StockAction::return_from(StockPool::Cut), 5),
        ];

        let summary = &summarize_customers(&events)[0];
        assert_eq!(summary.total_cut, -3);
        assert_eq!(summary.balance.balance_cut, 0);
        assert_eq!(summary.balance.balance_raw, 8);
        assert_eq!(summary.total_balance, 5);
    }

    #[test]
    fn item_sheet_groups_by_code_and_type_within_customer() {
        let mut other_type = ev("4", "Acme", "A", StockAction::Receive, 7);
        other_type.item = ItemKey::new("A", "Steel 2mm");
        let events = vec![
            ev("1", "Acme", "B", StockAction::Receive, 30),
            ev("2", "Acme", "A", StockAction::Receive, 100),
            ev("3", "Other", "A", StockAction::Receive, 999),
            other_type,
            ev("5", "Acme", "A", StockAction::process(StockPool::Raw), 20),
        ];

        let items = summarize_item_stock(&events, &acme());
        let keys: Vec<String> = items.iter().map(|i| i.key.to_string()).collect();
        assert_eq!(keys, vec!["A-Acrylic 5mm", "A-Steel 2mm", "B-Acrylic 5mm"]);
        assert_eq!(items[0].balance.balance_raw, 80);
        assert_eq!(items[0].balance.balance_cut, 20);
        assert_eq!(items[1].balance.total_on_site, 7);
        assert_eq!(site_total(&items), 137);
    }

    #[test]
    fn zero_quantity_item_is_only_in_unfiltered_sheet() {
        let events = vec![
            ev("1", "Acme", "A", StockAction::Receive, 10),
            ev("2", "Acme", "Z", StockAction::Receive, 0),
        ];

        let all = summarize_item_stock(&events, &acme());
        assert_eq!(all.len(), 2);
        let zero = all.iter().find(|i| i.key.code == "Z").unwrap();
        assert_eq!(zero.balance, Balance::default());

        let shown = StockSheetQuery::active().apply(all.clone());
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].key.code, "A");

        assert_eq!(StockSheetQuery::all().apply(all.clone()), all);
    }

    #[test]
    fn fully_returned_item_stays_visible_because_it_was_received() {
        let events = vec![
            ev("1", "Acme", "A", StockAction::Receive, 10),
            ev("2", "Acme", "A", StockAction::return_from(StockPool::Raw), 10),
        ];
        let shown = StockSheetQuery::active().apply(summarize_item_stock(&events, &acme()));
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].balance.total_on_site, 0);
    }

    #[test]
    fn search_matches_code_or_type_ignoring_case() {
        let mut steel = ev("2", "Acme", "S-9", StockAction::Receive, 4);
        steel.item = ItemKey::new("S-9", "Steel 2mm");
        let events = vec![ev("1", "Acme", "A-100", StockAction::Receive, 3), steel];
        let items = summarize_item_stock(&events, &acme());

        let by_type = StockSheetQuery::active().with_search("STEEL").apply(items.clone());
        assert_eq!(by_type.len(), 1);
        assert_eq!(by_type[0].key.code, "S-9");

        let by_code = StockSheetQuery::active().with_search("a-1").apply(items.clone());
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].key.code, "A-100");

        let blank = StockSheetQuery::active().with_search("   ").apply(items.clone());
        assert_eq!(blank, items);
    }

    #[test]
    fn returnable_rows_cover_each_pool_with_stock() {
        let events = vec![
            ev("1", "Acme", "A", StockAction::Receive, 10),
            ev("2", "Acme", "A", StockAction::process(StockPool::Raw), 4),
            ev("3", "Acme", "B", StockAction::Receive, 6),
            ev("4", "Acme", "B", StockAction::return_from(StockPool::Raw), 6),
        ];
        let rows = returnable_stock(&summarize_item_stock(&events, &acme()));
        assert_eq!(
            rows,
            vec![
                ReturnableStock {
                    key: ItemKey::new("A", "Acrylic 5mm"),
                    pool: StockPool::Raw,
                    available: 6,
                },
                ReturnableStock {
                    key: ItemKey::new("A", "Acrylic 5mm"),
                    pool: StockPool::Cut,
                    available: 4,
                },
            ]
        );
    }

    #[test]
    fn unknown_customer_yields_empty_sheet() {
        let events = vec![ev("1", "Acme", "A", StockAction::Receive, 10)];
        assert!(summarize_item_stock(&events, &CustomerName::new("Nobody")).is_empty());
        assert!(summarize_customers(&[]).is_empty());
    }

    fn arb_events() -> impl Strategy<Value = Vec<StockEvent>> {
        let action = prop_oneof![
            Just(StockAction::Receive),
            Just(StockAction::process(StockPool::Raw)),
            Just(StockAction::process(StockPool::Cut)),
            Just(StockAction::return_from(StockPool::Raw)),
            Just(StockAction::return_from(StockPool::Cut)),
            Just(StockAction::wastage(StockPool::Raw)),
            Just(StockAction::wastage(StockPool::Cut)),
        ];
        let customer = prop_oneof![Just("Acme"), Just("Zeta")];
        let code = prop_oneof![Just("A"), Just("B"), Just("C")];
        prop::collection::vec((customer, code, action, 1u32..200), 0..60).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (customer, code, action, q))| ev(&i.to_string(), customer, code, action, q))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: summaries are a pure function of the log.
        #[test]
        fn summaries_are_idempotent(events in arb_events()) {
            prop_assert_eq!(summarize_customers(&events), summarize_customers(&events));
            prop_assert_eq!(
                summarize_item_stock(&events, &acme()),
                summarize_item_stock(&events, &acme())
            );
        }

        /// Property: every stock row satisfies the clamping and on-site identities.
        #[test]
        fn item_rows_hold_balance_invariants(events in arb_events()) {
            for item in summarize_item_stock(&events, &acme()) {
                prop_assert!(item.balance.balance_raw >= 0);
                prop_assert!(item.balance.balance_cut >= 0);
                prop_assert_eq!(item.balance.total_on_site, item.balance.balance_raw + item.balance.balance_cut);
            }
        }

        /// Property: item counters partition the customer's counters.
        #[test]
        fn item_counters_sum_to_customer_counters(events in arb_events()) {
            let items = summarize_item_stock(&events, &acme());
            let received: i64 = items.iter().map(|i| i.balance.total_received).sum();
            let processed: i64 = items.iter().map(|i| i.balance.total_processed).sum();
            let returned: i64 = items.iter().map(|i| i.balance.returned_raw + i.balance.returned_cut).sum();

            match summarize_customers(&events).into_iter().find(|c| c.customer == acme()) {
                Some(summary) => {
                    prop_assert_eq!(summary.balance.total_received, received);
                    prop_assert_eq!(summary.balance.total_processed, processed);
                    prop_assert_eq!(summary.total_returned, returned);
                }
                None => prop_assert!(items.is_empty()),
            }
        }
    }
}
