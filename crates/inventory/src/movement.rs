//! Stock movement events: the immutable facts the ledger is derived from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use sheetstock_core::{CustomerName, Entity, EventId, ItemKey};
use sheetstock_events::Event;

/// Named accumulator of quantity for one item within one customer.
///
/// Pools are derived from the log, never stored.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockPool {
    /// Received, unprocessed.
    #[default]
    Raw,
    /// Processed / cut output.
    Cut,
}

impl core::fmt::Display for StockPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockPool::Raw => f.write_str("RAW"),
            StockPool::Cut => f.write_str("CUT"),
        }
    }
}

/// Cutting workflow stage recorded on a `PROCESS` event.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    SizesConfirmed,
    PrintedForCutting,
    CuttingCompleted,
    #[default]
    None,
}

/// Whether a wastage write-off was total or partial.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WastageStatus {
    #[default]
    No,
    Yes,
    Partial,
}

/// Unit the quantity is counted in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Unit {
    Sheet,
    Pcs,
}

/// Courier details for stock physically leaving the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePass {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
}

/// What happened to the stock, with the fields each kind of movement needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE")]
pub enum StockAction {
    /// Stock arrives from the customer into the RAW pool.
    Receive,

    /// Cutting work. Drawing from RAW moves quantity into CUT; drawing from
    /// CUT only records a workflow status update and moves nothing.
    Process {
        #[serde(default)]
        source: StockPool,
        #[serde(default)]
        status: ProcessingStatus,
    },

    /// Stock handed back to the customer (gate pass) out of `destination`.
    Return {
        destination: StockPool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gate_pass: Option<GatePass>,
    },

    /// Stock written off from `source` without being returned.
    Wastage {
        #[serde(default)]
        source: StockPool,
        #[serde(default)]
        status: WastageStatus,
    },
}

impl StockAction {
    pub fn process(source: StockPool) -> Self {
        StockAction::Process {
            source,
            status: ProcessingStatus::None,
        }
    }

    pub fn return_from(destination: StockPool) -> Self {
        StockAction::Return {
            destination,
            gate_pass: None,
        }
    }

    pub fn wastage(source: StockPool) -> Self {
        StockAction::Wastage {
            source,
            status: WastageStatus::No,
        }
    }

    /// How this action moves quantity between pools.
    pub fn movement(&self) -> Movement {
        match self {
            StockAction::Receive => Movement::Received,
            StockAction::Process {
                source: StockPool::Raw,
                ..
            } => Movement::Processed,
            StockAction::Process {
                source: StockPool::Cut,
                ..
            } => Movement::StatusOnly,
            StockAction::Return { destination, .. } => Movement::Returned(*destination),
            StockAction::Wastage { source, .. } => Movement::Wasted(*source),
        }
    }
}

/// Quantity effect of an action, independent of its metadata.
///
/// Both the aggregate reducer and the running history are driven by this, so
/// the two can never disagree on the update rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Movement {
    /// RAW += q
    Received,
    /// RAW -= q, CUT += q
    Processed,
    /// No quantity moves.
    StatusOnly,
    /// pool -= q
    Returned(StockPool),
    /// pool -= q
    Wasted(StockPool),
}

impl Movement {
    /// Signed `(raw, cut)` deltas for `quantity` units.
    pub fn pool_deltas(self, quantity: u32) -> (i64, i64) {
        let q = i64::from(quantity);
        match self {
            Movement::Received => (q, 0),
            Movement::Processed => (-q, q),
            Movement::StatusOnly => (0, 0),
            Movement::Returned(StockPool::Raw) | Movement::Wasted(StockPool::Raw) => (-q, 0),
            Movement::Returned(StockPool::Cut) | Movement::Wasted(StockPool::Cut) => (0, -q),
        }
    }
}

/// Free-form metadata carried through unchanged; never interpreted by the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
    /// Reference to supporting evidence (photo, scan).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

/// One immutable record of a physical stock movement.
///
/// `quantity` is expected to be positive; the event log rejects anything else
/// before it is stored. Folds over malformed events are not guarded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEvent {
    pub id: EventId,
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

impl StockEvent {
    pub fn new(
        id: impl Into<EventId>,
        date: NaiveDate,
        customer: impl Into<CustomerName>,
        item: ItemKey,
        action: StockAction,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
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

    pub fn movement(&self) -> Movement {
        self.action.movement()
    }

    /// Chronological ordering key: date first, then id as a same-day tie-break.
    ///
    /// The id comparison is plain string order. It is a stable, arbitrary
    /// tie-break and says nothing about which same-day movement happened first
    /// unless the ids were minted in creation order.
    pub fn chronological_key(&self) -> (NaiveDate, &EventId) {
        (self.date, &self.id)
    }
}

impl Entity for StockEvent {
    type Id = EventId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Event for StockEvent {
    fn event_type(&self) -> &'static str {
        match self.action {
            StockAction::Receive => "inventory.stock.received",
            StockAction::Process { .. } => "inventory.stock.processed",
            StockAction::Return { .. } => "inventory.stock.returned",
            StockAction::Wastage { .. } => "inventory.stock.wasted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_on(&self) -> NaiveDate {
        self.date
    }
}
