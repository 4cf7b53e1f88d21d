//! Error types for the `menagerie-world` crate.

use menagerie_types::{EntityId, Zone};

/// Errors raised by catalog lookups and entity-store mutations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No species with this key exists in the catalog.
    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    /// The zone already holds its maximum population.
    #[error("zone {zone} is at capacity ({cap})")]
    ZoneAtCapacity {
        /// The full zone.
        zone: Zone,
        /// Its population cap.
        cap: usize,
    },

    /// The entity is not in the store.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// An entity with this id is already stored.
    #[error("duplicate entity id: {0}")]
    DuplicateEntity(EntityId),
}
