//! The hard-coded world every session starts from.

use menagerie_types::{
    CreatureState, Diet, Entity, EntityParams, Lifecycle, Position, Vitals, Zone,
};

use crate::store::EntityStore;

/// Coins in the wallet at the start of a session.
pub const STARTING_COINS: u64 = 200;

/// The two starter pets: a goldfish on the reef and a dog in the jungle.
pub fn starter_entities() -> Vec<Entity> {
    let goldie = Entity::new(EntityParams {
        name: "Goldie".to_owned(),
        glyph: "🐠".to_owned(),
        species: "goldfish".to_owned(),
        zone: Zone::CoralReef,
        diet: Some(Diet::Herbivore),
        vitals: Vitals::new(80.0, 90.0),
        position: Position::new(50.0, 50.0),
        lifecycle: Lifecycle::Creature(CreatureState { reproduction: 20.0 }),
    });
    let rex = Entity::new(EntityParams {
        name: "Rex".to_owned(),
        glyph: "🐶".to_owned(),
        species: "dog".to_owned(),
        zone: Zone::Jungle,
        diet: Some(Diet::Herbivore),
        vitals: Vitals::new(70.0, 80.0),
        position: Position::new(20.0, 60.0),
        lifecycle: Lifecycle::Creature(CreatureState::default()),
    });
    vec![goldie, rex]
}

/// A store holding only the starter pets.
pub fn starter_store() -> EntityStore {
    EntityStore::from_entities(starter_entities())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn starters_are_catalog_species_in_their_zones() {
        let store = starter_store();
        assert_eq!(store.len(), 2);
        for entity in store.iter() {
            let spec = catalog::species(entity.species());
            assert!(spec.is_some_and(|s| s.zone == entity.zone()));
        }
        assert_eq!(store.population(Zone::CoralReef), 1);
        assert_eq!(store.population(Zone::Jungle), 1);
    }
}
