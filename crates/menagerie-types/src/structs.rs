//! Orders, notifications, visual effects and the per-tick broadcast.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::entity::{Entity, METER_MAX, MenuChoice, Position};
use crate::enums::{CoinFlow, OrderStatus, Weather, Zone};
use crate::ids::{EntityId, LedgerEntryId, OrderId};

// ---------------------------------------------------------------------------
// Restaurant orders
// ---------------------------------------------------------------------------

/// A restaurant order. Lives outside the entity store and is dropped
/// once served or once its customer is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Order {
    /// Order id.
    pub id: OrderId,
    /// The customer who placed it.
    pub customer: EntityId,
    /// Where to bring it.
    pub table_id: u8,
    /// The ordered menu item.
    pub item: MenuChoice,
    status: OrderStatus,
    progress: f64,
}

impl Order {
    /// A new pending order.
    pub fn new(customer: EntityId, table_id: u8, item: MenuChoice) -> Self {
        Self {
            id: OrderId::new(),
            customer,
            table_id,
            item,
            status: OrderStatus::Pending,
            progress: 0.0,
        }
    }

    /// Current status.
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Cooking progress in `[0, 100]`.
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Move a pending order onto the stove. Returns `false` for any other
    /// status.
    pub const fn start_cooking(&mut self) -> bool {
        if matches!(self.status, OrderStatus::Pending) {
            self.status = OrderStatus::Cooking;
            true
        } else {
            false
        }
    }

    /// Advance a cooking order by `step`. Progress never exceeds 100 and
    /// the order flips to ready when it gets there. Returns `true` on the
    /// tick it becomes ready.
    pub fn advance_cooking(&mut self, step: f64) -> bool {
        if !matches!(self.status, OrderStatus::Cooking) || step <= 0.0 {
            return false;
        }
        self.progress = (self.progress + step).min(METER_MAX);
        if self.progress >= METER_MAX {
            self.status = OrderStatus::Ready;
            return true;
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Feedback for the presentation layer
// ---------------------------------------------------------------------------

/// What kind of message a notification carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Neutral information (names, facts).
    Info,
    /// An offspring was born.
    Birth,
    /// A predator caught prey.
    Kill,
    /// Coins were earned.
    Reward,
    /// A player action was rejected.
    Warning,
}

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Notification {
    /// Message category.
    pub kind: NotificationKind,
    /// Message text.
    pub message: String,
}

impl Notification {
    /// Build a notification.
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// A one-shot animation cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum VisualEffect {
    /// Sparkles where an offspring appeared.
    Sparkle {
        /// Where to draw it.
        position: Position,
    },
    /// Rising text such as `+30`.
    FloatingText {
        /// Where to draw it.
        position: Position,
        /// The text.
        text: String,
    },
}

/// A random event produced by the text service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RandomEvent {
    /// Flavor text shown to the player.
    pub message: String,
    /// Coins granted.
    pub coins: u64,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// One recorded coin movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LedgerEntry {
    /// Entry id.
    pub id: LedgerEntryId,
    /// Tick during which the movement happened.
    pub tick: u64,
    /// Why coins moved. The kind fixes the direction.
    pub flow: CoinFlow,
    /// Coins moved, always positive.
    pub amount: u64,
    /// Wallet balance right after this entry.
    pub balance_after: u64,
    /// Free-form context, e.g. the species bought.
    pub memo: String,
    /// Wall-clock time of recording.
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Broadcast
// ---------------------------------------------------------------------------

/// Everything the presentation layer needs after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickBroadcast {
    /// The tick that just ran.
    pub tick: u64,
    /// Active zone.
    pub zone: Zone,
    /// Weather in the active habitat.
    pub weather: Weather,
    /// Global speed multiplier.
    pub speed: f64,
    /// Coin balance after the tick.
    pub coins: u64,
    /// Entities in the active zone, in store order.
    pub entities: Vec<Entity>,
    /// Open restaurant orders (empty elsewhere).
    pub orders: Vec<Order>,
    /// At most one notification per tick.
    pub notification: Option<Notification>,
    /// Animation cues raised this tick.
    pub effects: Vec<VisualEffect>,
    /// The selected entity, re-resolved after the tick.
    pub selected: Option<EntityId>,
}
