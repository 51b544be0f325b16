//! Running-balance projector: a customer's movements in chronological order,
//! each annotated with the customer's total on site right after it.

use core::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use sheetstock_core::{CustomerName, DomainError};
use sheetstock_events::Projection;

use crate::movement::StockEvent;

/// Running pool totals during a chronological fold.
///
/// Unlike [`crate::Balance`] these are not clamped: an over-drawn pool carries
/// its negative total forward into later rows.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RunningBalance {
    pub raw: i64,
    pub cut: i64,
}

impl RunningBalance {
    pub fn total(&self) -> i64 {
        self.raw + self.cut
    }
}

impl Projection for RunningBalance {
    type Ev = StockEvent;

    fn apply(&mut self, event: &StockEvent) {
        let (raw, cut) = event.movement().pool_deltas(event.quantity);
        self.raw += raw;
        self.cut += cut;
    }
}

/// A stock event together with the running total on site after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub event: StockEvent,
    pub balance_after: i64,
}

/// Project one customer's history.
///
/// Events are ordered by `(date, id)` before folding. The id only breaks ties
/// between same-day events, by plain string comparison; it is not a causal
/// sequence number, so two movements booked on the same day show in id order
/// whatever order they physically happened in. Log insertion order never
/// matters.
///
/// `balance_after` is fixed here. Re-sorting or filtering the result later
/// (see [`HistoryQuery`]) keeps each row's value.
pub fn project_history(events: &[StockEvent], customer: &CustomerName) -> Vec<HistoryEntry> {
    let mut chronological: Vec<&StockEvent> =
        events.iter().filter(|e| &e.customer == customer).collect();
    chronological.sort_by(|a, b| a.chronological_key().cmp(&b.chronological_key()));

    chronological
        .into_iter()
        .scan(RunningBalance::default(), |running, event| {
            running.apply(event);
            Some(HistoryEntry {
                event: event.clone(),
                balance_after: running.total(),
            })
        })
        .collect()
}

/// Calendar window applied to history rows, relative to an explicit `today`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Today,
    /// Strictly after `today - 7 days`.
    Week,
    /// Strictly after `today - 1 month`.
    Month,
    /// Strictly after `today - 1 year`.
    Year,
    #[default]
    All,
    /// Inclusive on both ends.
    Custom { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let after = |cutoff: Option<NaiveDate>| cutoff.is_none_or(|c| date > c);
        match *self {
            DateRange::All => true,
            DateRange::Today => date == today,
            DateRange::Week => after(today.checked_sub_days(Days::new(7))),
            DateRange::Month => after(today.checked_sub_months(Months::new(1))),
            DateRange::Year => after(today.checked_sub_months(Months::new(12))),
            DateRange::Custom { start, end } => start <= date && date <= end,
        }
    }
}

impl FromStr for DateRange {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "year" => Ok(DateRange::Year),
            "all" => Ok(DateRange::All),
            other => Err(DomainError::validation(format!("unknown date range: {other}"))),
        }
    }
}

/// Display order for history rows.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrder {
    /// Newest first (reverse of the fold order).
    DateDesc,
    /// By item code, then item type; chronological within an item.
    #[default]
    ItemAsc,
}

impl FromStr for HistoryOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date_desc" => Ok(HistoryOrder::DateDesc),
            "item_asc" => Ok(HistoryOrder::ItemAsc),
            other => Err(DomainError::validation(format!("unknown history order: {other}"))),
        }
    }
}

/// Presentation query over a projected history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub range: DateRange,
    /// Case-insensitive substring matched against code, type or details.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub order: HistoryOrder,
}

impl HistoryQuery {
    pub fn apply(&self, entries: Vec<HistoryEntry>, today: NaiveDate) -> Vec<HistoryEntry> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut rows: Vec<HistoryEntry> = entries
            .into_iter()
            .filter(|row| self.range.contains(row.event.date, today))
            .filter(|row| needle.as_deref().is_none_or(|n| matches_search(&row.event, n)))
            .collect();

        match self.order {
            HistoryOrder::DateDesc => rows.reverse(),
            // Stable: rows of the same item keep their chronological order.
            HistoryOrder::ItemAsc => rows.sort_by(|a, b| a.event.item.cmp(&b.event.item)),
        }
        rows
    }
}

fn matches_search(event: &StockEvent, needle: &str) -> bool {
    event.item.matches_lowercase(needle)
        || event
            .metadata
            .details
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}
