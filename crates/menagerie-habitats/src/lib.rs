//! Habitat simulation for the Menagerie simulator.
//!
//! Each habitat advances its zone through a plain tick function over a
//! per-zone [`HabitatContext`], the shared
//! [`EntityStore`](menagerie_world::EntityStore) and a random number
//! generator. Player actions live in [`actions`] and never run while a
//! tick is in progress.
//!
//! # Modules
//!
//! - [`actions`] -- Buy, sell, feed, pet, harvest, cook and serve.
//! - [`aquarium`] -- Predation, schooling, breeding and pattern movement.
//! - [`config`] -- Every rate, threshold and duration the ticks use.
//! - [`context`] -- [`HabitatContext`], [`TickEnv`] and [`TickOutcome`].
//! - [`error`] -- [`ActionError`] for refused player actions.
//! - [`garden`] -- Plant growth stages.
//! - [`land`] -- Zoo and farm herds, zoo hunting and farm produce.
//! - [`movement`] -- Leader points and motion helpers.
//! - [`restaurant`] -- Customer visits and the kitchen.

pub mod actions;
pub mod aquarium;
pub mod config;
pub mod context;
pub mod error;
pub mod garden;
pub mod land;
pub mod movement;
pub mod restaurant;

pub use actions::{ActionScope, Feeding, Harvest, Purchase, Sale, ServeOutcome};
pub use aquarium::AquariumContext;
pub use config::{
    ActionConfig, AquariumConfig, GardenConfig, HerdConfig, RestaurantConfig, SimConfig,
};
pub use context::{Earning, HabitatContext, TickEnv, TickOutcome};
pub use error::ActionError;
pub use garden::GardenContext;
pub use land::HerdContext;
pub use restaurant::RestaurantContext;
