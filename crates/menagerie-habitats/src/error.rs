//! Error types for the menagerie-habitats crate.
//!
//! Every player action that is refused returns an [`ActionError`] and
//! leaves the store, the wallet and the habitat context untouched. The
//! caller turns the error into a warning notification.

use menagerie_ledger::LedgerError;
use menagerie_types::{EntityId, Habitat, OrderId, OrderStatus, Zone};
use menagerie_world::WorldError;

/// Reasons a player action is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The wallet cannot cover the price.
    #[error("not enough coins: need {needed}, have {available}")]
    InsufficientFunds {
        /// Price of the action.
        needed: u64,
        /// Coins held.
        available: u64,
    },

    /// The zone already holds its maximum population.
    #[error("{zone} is full ({cap} max)")]
    ZoneAtCapacity {
        /// The full zone.
        zone: Zone,
        /// Its cap.
        cap: usize,
    },

    /// No species with this key.
    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    /// No consumable with this key in the active habitat.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The species lives in a different zone than the active one.
    #[error("{species} cannot live in {zone}")]
    WrongZone {
        /// Species key.
        species: String,
        /// The active zone.
        zone: Zone,
    },

    /// The action is not available in the active habitat.
    #[error("cannot {action} in the {habitat:?}")]
    WrongHabitat {
        /// Short action name.
        action: &'static str,
        /// The active habitat.
        habitat: Habitat,
    },

    /// No such entity in the active zone.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The action needs a selected entity.
    #[error("nothing is selected")]
    NothingSelected,

    /// No such open order.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// Nothing to harvest yet.
    #[error("{0} is not ready to harvest")]
    NotReady(String),

    /// The order is in the wrong state for the requested step.
    #[error("order {order} is {status:?}")]
    OrderState {
        /// The order.
        order: OrderId,
        /// Its current status.
        status: OrderStatus,
    },

    /// Customers are guests, not stock.
    #[error("{0} cannot be sold")]
    NotSellable(String),

    /// Speed must be finite and within the accepted range.
    #[error("speed {value} is outside {min}..={max}")]
    InvalidSpeed {
        /// The rejected value.
        value: f64,
        /// Lowest accepted speed.
        min: f64,
        /// Highest accepted speed.
        max: f64,
    },

    /// A wallet operation failed for a reason other than funds.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A store operation failed.
    #[error(transparent)]
    World(#[from] WorldError),
}
