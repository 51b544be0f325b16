use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sheetstock_core::{CustomerName, DomainError, DomainResult, EventId, ItemKey};
use sheetstock_inventory::{EventMetadata, GatePass, StockAction, StockEvent};
use std::sync::Arc;

/// A stock movement ready to be appended (not yet assigned an id).
///
/// This is the validation boundary: the ledger engine assumes every stored
/// event passed [`NewStockEvent::validate`] (positive quantity, non-blank
/// customer and item identity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockEvent {
    pub date: NaiveDate,
    pub customer: CustomerName,
    #[serde(flatten)]
    pub item: ItemKey,
    #[serde(flatten)]
    pub action: StockAction,
    pub quantity: u32,
    #[serde(flatten)]
    pub metadata: EventMetadata,
}

impl NewStockEvent {
    pub fn new(
        date: NaiveDate,
        customer: impl Into<CustomerName>,
        item: ItemKey,
        action: StockAction,
        quantity: u32,
    ) -> Self {
        Self {
            date,
            customer: customer.into(),
            item,
            action,
            quantity,
            metadata: EventMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_fields(&self.customer, &self.item, self.quantity)
    }

    /// Assign an id, producing the stored record.
    pub fn into_event(self, id: EventId) -> StockEvent {
        StockEvent {
            id,
            date: self.date,
            customer: self.customer,
            item: self.item,
            action: self.action,
            quantity: self.quantity,
            metadata: self.metadata,
        }
    }
}

/// Validate a stored record (e.g. one restored from a snapshot).
pub fn validate_event(event: &StockEvent) -> DomainResult<()> {
    if event.id.is_blank() {
        return Err(DomainError::invalid_id("event id cannot be empty"));
    }
    validate_fields(&event.customer, &event.item, event.quantity)
}

fn validate_fields(customer: &CustomerName, item: &ItemKey, quantity: u32) -> DomainResult<()> {
    if customer.is_blank() {
        return Err(DomainError::validation("customer cannot be empty"));
    }
    if item.code.trim().is_empty() {
        return Err(DomainError::validation("item code cannot be empty"));
    }
    if item.item_type.trim().is_empty() {
        return Err(DomainError::validation("item type cannot be empty"));
    }
    if quantity == 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}

/// Edit of a stored event.
///
/// Only the editable fields can change; customer, item and action are fixed
/// once an event exists. Every balance derived from the log reflects the edit
/// on its next recomputation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEventPatch {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub details: Option<String>,
    /// Only valid on `RETURN` events.
    #[serde(default)]
    pub gate_pass: Option<GatePass>,
}

impl StockEventPatch {
    /// Apply the patch to a copy of `event`, validating the result.
    pub fn applied_to(&self, event: &StockEvent) -> DomainResult<StockEvent> {
        let mut next = event.clone();
        if let Some(date) = self.date {
            next.date = date;
        }
        if let Some(quantity) = self.quantity {
            next.quantity = quantity;
        }
        if let Some(details) = &self.details {
            next.metadata.details = Some(details.clone());
        }
        if let Some(pass) = &self.gate_pass {
            match &mut next.action {
                StockAction::Return { gate_pass, .. } => *gate_pass = Some(pass.clone()),
                _ => {
                    return Err(DomainError::validation(
                        "gate pass details only apply to RETURN events",
                    ));
                }
            }
        }
        validate_event(&next)?;
        Ok(next)
    }
}

/// Event log operation error.
///
/// Domain rejections (validation, conflicts) are wrapped from [`DomainError`];
/// the remaining variants are storage concerns.
#[derive(Debug, Error)]
pub enum EventLogError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("event not found: {0}")]
    NotFound(EventId),

    #[error("snapshot could not be decoded: {0}")]
    Snapshot(String),

    #[error("event log lock poisoned")]
    Poisoned,
}

/// The persisted log of stock movements.
///
/// The log is the single source of truth. The ledger engine only ever reads a
/// full snapshot through [`EventLog::list_events`]; all mutation happens here.
///
/// ## Semantics
///
/// - `append_event` validates, assigns a fresh [`EventId`] and stores the event.
/// - `update_event` / `delete_event` / `delete_customer` rewrite history in
///   place. No audit trail of the change is kept; derived balances simply
///   differ on the next read.
/// - `list_events` returns an owned snapshot. The order is unspecified; the
///   engine never depends on it.
pub trait EventLog: Send + Sync {
    fn list_events(&self) -> Result<Vec<StockEvent>, EventLogError>;

    fn append_event(&self, event: NewStockEvent) -> Result<StockEvent, EventLogError>;

    fn update_event(&self, id: &EventId, patch: &StockEventPatch) -> Result<StockEvent, EventLogError>;

    /// Remove one event, returning it.
    fn delete_event(&self, id: &EventId) -> Result<StockEvent, EventLogError>;

    /// Remove every event of `customer`, returning how many were removed.
    fn delete_customer(&self, customer: &CustomerName) -> Result<usize, EventLogError>;
}

impl<L> EventLog for Arc<L>
where
    L: EventLog + ?Sized,
{
    fn list_events(&self) -> Result<Vec<StockEvent>, EventLogError> {
        (**self).list_events()
    }

    fn append_event(&self, event: NewStockEvent) -> Result<StockEvent, EventLogError> {
        (**self).append_event(event)
    }

    fn update_event(&self, id: &EventId, patch: &StockEventPatch) -> Result<StockEvent, EventLogError> {
        (**self).update_event(id, patch)
    }

    fn delete_event(&self, id: &EventId) -> Result<StockEvent, EventLogError> {
        (**self).delete_event(id)
    }

    fn delete_customer(&self, customer: &CustomerName) -> Result<usize, EventLogError> {
        (**self).delete_customer(customer)
    }
}
