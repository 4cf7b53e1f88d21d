//! Bookkeeping for in-flight text-service requests.
//!
//! Every name or fact request gets a [`RequestTicket`] when it is issued.
//! When the answer arrives the ticket is checked: the answer is dropped
//! if the entity is gone, if the player has switched habitat since the
//! request went out, or if a newer request of the same kind for the same
//! entity has been issued.

use std::collections::BTreeMap;

use menagerie_types::{Entity, EntityId, Habitat, RequestId};
use menagerie_world::{EntityStore, catalog};

/// What a request asks the text service for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestKind {
    /// A name for a newly bought entity.
    Name,
    /// A fact about the selected entity.
    Fact,
}

/// Proof of an issued request, handed back with its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    /// Unique request id.
    pub id: RequestId,
    /// What was asked.
    pub kind: RequestKind,
    /// The entity the answer is about.
    pub entity: EntityId,
    /// The entity's name when the request went out.
    pub subject: String,
    /// Display name of its species.
    pub species_name: String,
    /// Habitat active when the request was issued.
    pub habitat: Habitat,
}

/// Why an answer was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Superseded {
    /// The entity no longer exists.
    EntityGone,
    /// The player is in another habitat now.
    HabitatChanged,
    /// A newer request of the same kind replaced this one.
    NewerRequest,
}

/// Latest outstanding request per entity and kind.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: BTreeMap<(EntityId, RequestKind), RequestId>,
}

impl RequestTracker {
    /// An empty tracker.
    pub const fn new() -> Self {
        Self {
            latest: BTreeMap::new(),
        }
    }

    /// Issue a request, replacing any outstanding one of the same kind
    /// for the same entity.
    pub fn issue(
        &mut self,
        kind: RequestKind,
        entity: &Entity,
        habitat: Habitat,
    ) -> RequestTicket {
        let id = RequestId::new();
        self.latest.insert((entity.id(), kind), id);
        let species_name = catalog::species(entity.species())
            .map_or_else(|| entity.species().to_owned(), |s| s.name.to_owned());
        RequestTicket {
            id,
            kind,
            entity: entity.id(),
            subject: entity.name.clone(),
            species_name,
            habitat,
        }
    }

    /// Check a ticket against the current state without settling it.
    pub fn check(
        &self,
        ticket: &RequestTicket,
        store: &EntityStore,
        active: Habitat,
    ) -> Result<(), Superseded> {
        if self.latest.get(&(ticket.entity, ticket.kind)) != Some(&ticket.id) {
            return Err(Superseded::NewerRequest);
        }
        if !store.contains(ticket.entity) {
            return Err(Superseded::EntityGone);
        }
        if ticket.habitat != active {
            return Err(Superseded::HabitatChanged);
        }
        Ok(())
    }

    /// Check a ticket and, whatever the verdict, forget it if it is
    /// still the latest of its kind.
    pub fn settle(
        &mut self,
        ticket: &RequestTicket,
        store: &EntityStore,
        active: Habitat,
    ) -> Result<(), Superseded> {
        let verdict = self.check(ticket, store, active);
        if verdict != Err(Superseded::NewerRequest) {
            self.latest.remove(&(ticket.entity, ticket.kind));
        }
        verdict
    }

    /// Number of outstanding requests.
    pub fn outstanding(&self) -> usize {
        self.latest.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use menagerie_types::{
        CreatureState, Diet, EntityParams, Lifecycle, Position, Vitals, Zone,
    };

    use super::*;

    fn store_with_fish() -> (EntityStore, Entity) {
        let mut store = EntityStore::new();
        let fish = Entity::new(EntityParams {
            name: "Goldfish #1".to_owned(),
            glyph: "🐠".to_owned(),
            species: "goldfish".to_owned(),
            zone: Zone::CoralReef,
            diet: Some(Diet::Herbivore),
            vitals: Vitals::full(),
            position: Position::new(50.0, 50.0),
            lifecycle: Lifecycle::Creature(CreatureState::default()),
        });
        store.insert(fish.clone()).unwrap();
        (store, fish)
    }

    #[test]
    fn fresh_ticket_is_current() {
        let (store, fish) = store_with_fish();
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue(RequestKind::Name, &fish, Habitat::Aquarium);
        assert_eq!(ticket.subject, "Goldfish #1");
        assert_eq!(ticket.species_name, "Goldfish");
        assert_eq!(tracker.settle(&ticket, &store, Habitat::Aquarium), Ok(()));
        assert_eq!(tracker.outstanding(), 0);
    }

    #[test]
    fn newer_request_supersedes_older() {
        let (store, fish) = store_with_fish();
        let mut tracker = RequestTracker::new();
        let old = tracker.issue(RequestKind::Fact, &fish, Habitat::Aquarium);
        let new = tracker.issue(RequestKind::Fact, &fish, Habitat::Aquarium);
        assert_eq!(
            tracker.settle(&old, &store, Habitat::Aquarium),
            Err(Superseded::NewerRequest)
        );
        // The newer one is still outstanding and still valid.
        assert_eq!(tracker.outstanding(), 1);
        assert_eq!(tracker.settle(&new, &store, Habitat::Aquarium), Ok(()));
    }

    #[test]
    fn kinds_do_not_supersede_each_other() {
        let (store, fish) = store_with_fish();
        let mut tracker = RequestTracker::new();
        let name = tracker.issue(RequestKind::Name, &fish, Habitat::Aquarium);
        let _fact = tracker.issue(RequestKind::Fact, &fish, Habitat::Aquarium);
        assert_eq!(tracker.check(&name, &store, Habitat::Aquarium), Ok(()));
    }

    #[test]
    fn habitat_switch_and_removal_supersede() {
        let (mut store, fish) = store_with_fish();
        let mut tracker = RequestTracker::new();
        let ticket = tracker.issue(RequestKind::Name, &fish, Habitat::Aquarium);
        assert_eq!(
            tracker.check(&ticket, &store, Habitat::Zoo),
            Err(Superseded::HabitatChanged)
        );
        store.remove(fish.id());
        assert_eq!(
            tracker.settle(&ticket, &store, Habitat::Aquarium),
            Err(Superseded::EntityGone)
        );
        assert_eq!(tracker.outstanding(), 0);
    }
}
