//! Catalogs, geography and entity storage for the Menagerie simulator.
//!
//! This crate models the static world: what can be bought and fed, where
//! entities may stand, how weather cycles, and the store that holds every
//! live entity.
//!
//! # Modules
//!
//! - [`catalog`] -- Species, consumable, menu, customer and table tables.
//! - [`environment`] -- Weather cycles and the rate multipliers they imply.
//! - [`error`] -- Error types for store and catalog operations.
//! - [`seed`] -- The starter pets and starting coin balance.
//! - [`store`] -- [`EntityStore`], the ordered collection of live entities.
//! - [`zones`] -- Movement bounds and per-zone population caps.

pub mod catalog;
pub mod environment;
pub mod error;
pub mod seed;
pub mod store;
pub mod zones;

// Re-export primary types at crate root.
pub use catalog::{
    Consumable, CustomerArchetype, MenuItem, MenuKind, PlantSpec, ProduceSpec, SpeciesSpec, Table,
};
pub use environment::{growth_multiplier, movement_multiplier, next_weather, weather_cycle};
pub use error::WorldError;
pub use seed::{STARTING_COINS, starter_entities, starter_store};
pub use store::EntityStore;
pub use zones::{Bounds, VIEWPORT, ZoneCaps, movement_bounds};
