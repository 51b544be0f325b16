use std::collections::HashSet;
use std::sync::RwLock;

use tracing::{info, warn};

use sheetstock_core::{CustomerName, DomainError, Entity, EventId};
use sheetstock_events::Event;
use sheetstock_inventory::StockEvent;

use super::r#trait::{validate_event, EventLog, EventLogError, NewStockEvent, StockEventPatch};

/// In-memory stock event log.
///
/// Newest appends are kept at the front, matching how the records are listed
/// for editing. Intended for tests/dev and as the snapshot holder for a
/// key-value backed store. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<StockEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from previously stored records, keeping their ids.
    ///
    /// Every record is validated and ids must be unique.
    pub fn from_events(events: Vec<StockEvent>) -> Result<Self, EventLogError> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            validate_event(event)?;
            if !seen.insert(event.id()) {
                return Err(DomainError::conflict(format!("duplicate event id {}", event.id)).into());
            }
        }
        Ok(Self {
            events: RwLock::new(events),
        })
    }

    /// Restore a log from a JSON array snapshot.
    pub fn from_json(json: &str) -> Result<Self, EventLogError> {
        let events: Vec<StockEvent> =
            serde_json::from_str(json).map_err(|e| EventLogError::Snapshot(e.to_string()))?;
        Self::from_events(events)
    }

    /// Dump the whole log as a JSON array snapshot.
    pub fn to_json(&self) -> Result<String, EventLogError> {
        let events = self.events.read().map_err(|_| EventLogError::Poisoned)?;
        serde_json::to_string(&*events).map_err(|e| EventLogError::Snapshot(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventLog for InMemoryEventLog {
    fn list_events(&self) -> Result<Vec<StockEvent>, EventLogError> {
        let events = self.events.read().map_err(|_| EventLogError::Poisoned)?;
        Ok(events.clone())
    }

    fn append_event(&self, event: NewStockEvent) -> Result<StockEvent, EventLogError> {
        if let Err(e) = event.validate() {
            warn!(customer = %event.customer, item = %event.item, "rejected stock event: {e}");
            return Err(e.into());
        }

        let stored = event.into_event(EventId::generate());

        let mut events = self.events.write().map_err(|_| EventLogError::Poisoned)?;
        events.insert(0, stored.clone());

        info!(
            event_id = %stored.id,
            event_type = stored.event_type(),
            customer = %stored.customer,
            item = %stored.item,
            quantity = stored.quantity,
            "stock event appended"
        );
        Ok(stored)
    }

    fn update_event(&self, id: &EventId, patch: &StockEventPatch) -> Result<StockEvent, EventLogError> {
        let mut events = self.events.write().map_err(|_| EventLogError::Poisoned)?;
        let slot = events
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| EventLogError::NotFound(id.clone()))?;

        let updated = patch.applied_to(slot)?;
        *slot = updated.clone();

        info!(event_id = %id, "stock event updated");
        Ok(updated)
    }

    fn delete_event(&self, id: &EventId) -> Result<StockEvent, EventLogError> {
        let mut events = self.events.write().map_err(|_| EventLogError::Poisoned)?;
        let idx = events
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| EventLogError::NotFound(id.clone()))?;

        let removed = events.remove(idx);
        info!(event_id = %id, "stock event deleted");
        Ok(removed)
    }

    fn delete_customer(&self, customer: &CustomerName) -> Result<usize, EventLogError> {
        let mut events = self.events.write().map_err(|_| EventLogError::Poisoned)?;
        let before = events.len();
        events.retain(|e| &e.customer != customer);
        let removed = before - events.len();

        info!(customer = %customer, removed, "customer stock events deleted");
        Ok(removed)
    }
}
