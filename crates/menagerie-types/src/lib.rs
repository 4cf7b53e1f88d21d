//! Shared type definitions for the Menagerie habitat simulator.
//!
//! This crate is the single source of truth for the records that flow
//! between the simulation crates and the presentation layer. Types are
//! exported to `TypeScript` via `ts-rs` for the web front end.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entities, orders, requests
//!   and ledger entries
//! - [`enums`] -- Habitats, zones, diets, weather and lifecycle states
//! - [`entity`] -- The entity record and its per-category [`Lifecycle`]
//! - [`structs`] -- Orders, ledger entries, notifications, effects and the
//!   tick broadcast

pub mod entity;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use entity::{
    CreatureState, CustomerState, Entity, EntityParams, FarmAnimalState, Lifecycle, METER_MAX,
    MenuChoice, Motion, PlantState, Position, Vitals, clamp_meter,
};
pub use enums::{
    CareLevel, Category, CoinFlow, Diet, DiningState, GrowthStage, Habitat, MovementPattern, OrderStatus,
    Weather, Zone,
};
pub use ids::{EntityId, LedgerEntryId, OrderId, RequestId};
pub use structs::{
    LedgerEntry, Notification, NotificationKind, Order, RandomEvent, TickBroadcast, VisualEffect,
};
