//! The process-wide entity store.
//!
//! Entities are kept in insertion order so ticks visit them in a stable
//! sequence and offspring land after their parents. Zone caps are
//! enforced by [`EntityStore::insert_capped`]; the raw
//! [`EntityStore::insert`] is for seeding.

use menagerie_types::{Entity, EntityId, Zone};
use tracing::debug;

use crate::error::WorldError;

/// All live entities across every habitat.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
}

impl EntityStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    /// Build a store from a list of entities, dropping duplicate ids.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut store = Self::new();
        for entity in entities {
            if let Err(e) = store.insert(entity) {
                debug!(error = %e, "skipping seed entity");
            }
        }
        store
    }

    /// Total entity count.
    pub const fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store is empty.
    pub const fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate all entities in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Iterate the entities of one zone.
    pub fn in_zone(&self, zone: Zone) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.zone() == zone)
    }

    /// Ids of one zone's entities, in store order.
    pub fn ids_in_zone(&self, zone: Zone) -> Vec<EntityId> {
        self.in_zone(zone).map(Entity::id).collect()
    }

    /// Mutably iterate the entities of one zone.
    pub fn in_zone_mut(&mut self, zone: Zone) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter(move |e| e.zone() == zone)
    }

    /// Number of entities living in a zone.
    pub fn population(&self, zone: Zone) -> usize {
        self.in_zone(zone).count()
    }

    /// Look up an entity.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// Look up an entity mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// Whether an entity exists.
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Append an entity without a cap check.
    pub fn insert(&mut self, entity: Entity) -> Result<EntityId, WorldError> {
        let id = entity.id();
        if self.contains(id) {
            return Err(WorldError::DuplicateEntity(id));
        }
        self.entities.push(entity);
        Ok(id)
    }

    /// Append an entity if its zone holds fewer than `cap` entities.
    pub fn insert_capped(&mut self, entity: Entity, cap: usize) -> Result<EntityId, WorldError> {
        let zone = entity.zone();
        if self.population(zone) >= cap {
            return Err(WorldError::ZoneAtCapacity { zone, cap });
        }
        self.insert(entity)
    }

    /// Remove and return an entity.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id() == id)?;
        Some(self.entities.remove(index))
    }

    /// Remove every listed id. Returns how many were present.
    pub fn remove_all(&mut self, ids: &[EntityId]) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| !ids.contains(&e.id()));
        before.saturating_sub(self.entities.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use menagerie_types::{CreatureState, Diet, EntityParams, Lifecycle, Position, Vitals};

    use super::*;

    fn fish(zone: Zone) -> Entity {
        Entity::new(EntityParams {
            name: "Fish".to_owned(),
            glyph: "🐟".to_owned(),
            species: "tropical_fish".to_owned(),
            zone,
            diet: Some(Diet::Herbivore),
            vitals: Vitals::full(),
            position: Position::new(10.0, 10.0),
            lifecycle: Lifecycle::Creature(CreatureState::default()),
        })
    }

    #[test]
    fn insert_and_lookup() {
        let mut store = EntityStore::new();
        let id = store.insert(fish(Zone::CoralReef)).unwrap();
        assert!(store.contains(id));
        assert_eq!(store.population(Zone::CoralReef), 1);
        assert_eq!(store.population(Zone::OpenOcean), 0);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut store = EntityStore::new();
        let f = fish(Zone::CoralReef);
        store.insert(f.clone()).unwrap();
        assert!(matches!(store.insert(f), Err(WorldError::DuplicateEntity(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn cap_is_per_zone() {
        let mut store = EntityStore::new();
        store.insert_capped(fish(Zone::CoralReef), 2).unwrap();
        store.insert_capped(fish(Zone::CoralReef), 2).unwrap();
        let err = store.insert_capped(fish(Zone::CoralReef), 2);
        assert!(matches!(err, Err(WorldError::ZoneAtCapacity { cap: 2, .. })));
        store.insert_capped(fish(Zone::OpenOcean), 2).unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut store = EntityStore::new();
        let a = store.insert(fish(Zone::CoralReef)).unwrap();
        let b = store.insert(fish(Zone::CoralReef)).unwrap();
        let c = store.insert(fish(Zone::CoralReef)).unwrap();
        assert!(store.remove(b).is_some());
        assert!(store.remove(b).is_none());
        assert_eq!(store.ids_in_zone(Zone::CoralReef), vec![a, c]);
        assert_eq!(store.remove_all(&[a, c, b]), 2);
        assert!(store.is_empty());
    }
}
