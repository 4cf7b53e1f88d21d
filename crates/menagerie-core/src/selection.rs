//! The entity the player has clicked on.

use menagerie_types::{EntityId, Zone};
use menagerie_world::EntityStore;

/// At most one selected entity of the active zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<EntityId>,
}

impl Selection {
    /// Nothing selected.
    pub const fn none() -> Self {
        Self { current: None }
    }

    /// The selected entity, if any.
    pub const fn current(&self) -> Option<EntityId> {
        self.current
    }

    /// Select an entity. Returns `false` and leaves the selection alone
    /// if the entity is not in `zone`.
    pub fn select(&mut self, store: &EntityStore, zone: Zone, id: EntityId) -> bool {
        if store.get(id).is_some_and(|e| e.zone() == zone) {
            self.current = Some(id);
            true
        } else {
            false
        }
    }

    /// Drop the selection.
    pub const fn clear(&mut self) {
        self.current = None;
    }

    /// Look the selection up again after the store changed. Clears it
    /// silently if the entity is gone. Returns `true` if it was cleared.
    pub fn reresolve(&mut self, store: &EntityStore, zone: Zone) -> bool {
        let stale = self
            .current
            .is_some_and(|id| !store.get(id).is_some_and(|e| e.zone() == zone));
        if stale {
            self.current = None;
        }
        stale
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use menagerie_world::starter_store;

    use super::*;

    #[test]
    fn selection_follows_the_store() {
        let mut store = starter_store();
        let fish = store.ids_in_zone(Zone::CoralReef)[0];
        let dog = store.ids_in_zone(Zone::Jungle)[0];

        let mut selection = Selection::none();
        assert!(!selection.select(&store, Zone::CoralReef, dog));
        assert!(selection.select(&store, Zone::CoralReef, fish));
        assert!(!selection.reresolve(&store, Zone::CoralReef));
        assert_eq!(selection.current(), Some(fish));

        store.remove(fish);
        assert!(selection.reresolve(&store, Zone::CoralReef));
        assert_eq!(selection.current(), None);
        assert!(!selection.reresolve(&store, Zone::CoralReef));
    }
}
