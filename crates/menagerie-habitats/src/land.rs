//! Zoo and farm ticks: herd movement, zoo predation and farm production.
//!
//! Both habitats share one shape. A pair of leader points drifts across
//! the ground; each animal, when its own move timer elapses, either
//! stays, heads for the first leader, or wanders. Weather scales the
//! effective speed (snow in the zoo, storms on the farm). Hungry zoo
//! carnivores hunt the nearest animal of another species. Farm animals
//! additionally fill a production meter every tick, timer or not.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use tracing::{debug, info};

use menagerie_types::{EntityId, METER_MAX, Notification, NotificationKind, Position, Zone};
use menagerie_world::{EntityStore, catalog, movement_bounds, movement_multiplier};

use crate::config::HerdConfig;
use crate::context::{TickEnv, TickOutcome};
use crate::movement::{Leader, jitter, ms_from_f64};

/// Simulation state of one zoo or farm zone.
#[derive(Debug, Clone)]
pub struct HerdContext {
    zone: Zone,
    leaders: Vec<Leader>,
    next_move_ms: BTreeMap<EntityId, u64>,
}

impl HerdContext {
    /// Fresh context with leaders at their configured starts.
    pub fn new(zone: Zone, config: &HerdConfig) -> Self {
        Self {
            zone,
            leaders: config.leader_starts.iter().copied().map(Leader::from_tuple).collect(),
            next_move_ms: BTreeMap::new(),
        }
    }

    /// The simulated zone.
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Current herd leaders.
    pub fn leaders(&self) -> &[Leader] {
        &self.leaders
    }
}

/// A prey candidate as it stood at the start of the tick.
struct Sighting {
    id: EntityId,
    name: String,
    species: String,
    position: Position,
}

/// Advance one zoo or farm zone by one tick.
pub fn tick<R: Rng + ?Sized>(
    ctx: &mut HerdContext,
    store: &mut EntityStore,
    env: &TickEnv,
    config: &HerdConfig,
    rng: &mut R,
) -> TickOutcome {
    let zone = ctx.zone;
    let habitat = zone.habitat();
    let bounds = movement_bounds(habitat);
    let speed = env.speed;
    let effective = speed * movement_multiplier(habitat, env.weather);
    let mut outcome = TickOutcome::default();

    for leader in &mut ctx.leaders {
        leader.drift(speed, &config.leader_reflect);
    }
    let herd_center = ctx.leaders.first().map(|l| l.position);

    let ids = store.ids_in_zone(zone);
    ctx.next_move_ms.retain(|id, _| ids.contains(id));

    let sightings: Vec<Sighting> = store
        .in_zone(zone)
        .map(|e| Sighting {
            id: e.id(),
            name: e.name.clone(),
            species: e.species().to_owned(),
            position: e.position,
        })
        .collect();

    let mut eaten: BTreeSet<EntityId> = BTreeSet::new();

    for id in &ids {
        if eaten.contains(id) {
            continue;
        }
        let Some(entity) = store.get_mut(*id) else {
            continue;
        };

        // Production runs every tick, independent of the move timer.
        let hunger = entity.vitals.hunger();
        let happiness = entity.vitals.happiness();
        let base_rate = catalog::species(entity.species())
            .and_then(|s| s.produce)
            .map(|p| p.base_rate);
        if let (Some(rate), Some(state)) = (base_rate, entity.farm_animal_mut())
            && !state.ready
        {
            state.production += rate * speed * (happiness / METER_MAX) * (hunger / METER_MAX);
            if state.production >= METER_MAX {
                state.production = METER_MAX;
                state.ready = true;
                debug!(zone = ?zone, entity = %id, "produce ready");
            }
        }

        let next = ctx.next_move_ms.entry(*id).or_default();
        if env.now_ms < *next {
            continue;
        }

        let mut duration_ms = config.base_move_ms / effective;
        entity.vitals.adjust_hunger(-config.hunger_decay * effective);

        let mut target = None;
        if let Some(threshold) = config.hunt_threshold
            && entity.is_carnivore()
            && hunger < threshold
        {
            let here = entity.position;
            let prey = sightings
                .iter()
                .filter(|s| s.id != *id && !eaten.contains(&s.id) && s.species != entity.species())
                .map(|s| (s, here.distance_to(s.position)))
                .filter(|(_, d)| *d < config.hunt_radius)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((prey, dist)) = prey {
                if dist < config.capture_radius {
                    eaten.insert(prey.id);
                    entity.vitals.set_hunger(METER_MAX);
                    info!(zone = ?zone, predator = %id, prey = %prey.id, "prey eaten");
                    outcome.offer(Notification::new(
                        NotificationKind::Kill,
                        format!("{} ate {}!", entity.name, prey.name),
                    ));
                } else {
                    target = Some(prey.position);
                    duration_ms = config.chase_move_ms / effective;
                }
            }
        }

        let target = target.unwrap_or_else(|| {
            let behavior = &config.behavior;
            let roll = rng.random::<f64>();
            match herd_center {
                _ if roll < behavior.stay_below => entity.position,
                Some(center) if roll < behavior.follow_below => Position::new(
                    center.x + jitter(rng, behavior.follow_spread),
                    center.y + jitter(rng, behavior.follow_spread),
                ),
                _ => Position::new(
                    entity.position.x + jitter(rng, behavior.wander_x),
                    entity.position.y + jitter(rng, behavior.wander_y),
                ),
            }
        });

        let (target, clipped) = bounds.clamp(target);
        entity.motion.facing_right = target.x > entity.position.x;
        entity.motion.rotation_deg = 0.0;
        entity.motion.colliding = clipped;
        entity.motion.move_duration_ms = ms_from_f64(duration_ms);
        entity.position = target;
        *next = env.now_ms.saturating_add(entity.motion.move_duration_ms);
    }

    for id in &eaten {
        if store.remove(*id).is_some() {
            ctx.next_move_ms.remove(id);
            outcome.removed.push(*id);
        }
    }

    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use menagerie_types::{
        CreatureState, Diet, Entity, EntityParams, FarmAnimalState, Lifecycle, Vitals, Weather,
    };
    use menagerie_world::ZoneCaps;

    use super::*;

    fn animal(species: &str, zone: Zone, diet: Diet, hunger: f64, position: Position) -> Entity {
        let lifecycle = if zone.habitat() == menagerie_types::Habitat::Farm {
            Lifecycle::FarmAnimal(FarmAnimalState::default())
        } else {
            Lifecycle::Creature(CreatureState::default())
        };
        Entity::new(EntityParams {
            name: species.to_owned(),
            glyph: "🐾".to_owned(),
            species: species.to_owned(),
            zone,
            diet: Some(diet),
            vitals: Vitals::new(hunger, 100.0),
            position,
            lifecycle,
        })
    }

    fn env(now_ms: u64, weather: Weather) -> TickEnv {
        TickEnv {
            now_ms,
            speed: 1.0,
            weather,
            caps: ZoneCaps::default(),
        }
    }

    #[test]
    fn lion_eats_nearby_animal_of_another_species() {
        let config = HerdConfig::zoo();
        let mut store = EntityStore::new();
        let lion = store
            .insert(animal("lion", Zone::Jungle, Diet::Carnivore, 20.0, Position::new(50.0, 60.0)))
            .unwrap();
        let cat = store
            .insert(animal("cat", Zone::Jungle, Diet::Herbivore, 80.0, Position::new(53.0, 60.0)))
            .unwrap();
        let mut ctx = HerdContext::new(Zone::Jungle, &config);
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = tick(&mut ctx, &mut store, &env(0, Weather::Clear), &config, &mut rng);
        assert_eq!(outcome.removed, vec![cat]);
        let lion = store.get(lion).unwrap();
        assert!((lion.vitals.hunger() - METER_MAX).abs() < f64::EPSILON);
        assert_eq!(outcome.notification.unwrap().kind, NotificationKind::Kill);
    }

    #[test]
    fn same_species_is_never_prey() {
        let config = HerdConfig::zoo();
        let mut store = EntityStore::new();
        store
            .insert(animal("lion", Zone::Jungle, Diet::Carnivore, 20.0, Position::new(50.0, 60.0)))
            .unwrap();
        store
            .insert(animal("lion", Zone::Jungle, Diet::Carnivore, 80.0, Position::new(51.0, 60.0)))
            .unwrap();
        let mut ctx = HerdContext::new(Zone::Jungle, &config);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = tick(&mut ctx, &mut store, &env(0, Weather::Clear), &config, &mut rng);
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn distant_prey_is_chased_not_eaten() {
        let config = HerdConfig::zoo();
        let mut store = EntityStore::new();
        let lion = store
            .insert(animal("lion", Zone::Jungle, Diet::Carnivore, 20.0, Position::new(30.0, 60.0)))
            .unwrap();
        store
            .insert(animal("cat", Zone::Jungle, Diet::Herbivore, 80.0, Position::new(50.0, 60.0)))
            .unwrap();
        let mut ctx = HerdContext::new(Zone::Jungle, &config);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = tick(&mut ctx, &mut store, &env(0, Weather::Clear), &config, &mut rng);
        assert!(outcome.removed.is_empty());
        let lion = store.get(lion).unwrap();
        assert_eq!(lion.position, Position::new(50.0, 60.0));
        assert_eq!(lion.motion.move_duration_ms, 1000);
    }

    #[test]
    fn snow_slows_zoo_moves() {
        let config = HerdConfig::zoo();
        let mut store = EntityStore::new();
        let cat = store
            .insert(animal("cat", Zone::Jungle, Diet::Herbivore, 80.0, Position::new(50.0, 60.0)))
            .unwrap();
        let mut ctx = HerdContext::new(Zone::Jungle, &config);
        let mut rng = StdRng::seed_from_u64(1);
        tick(&mut ctx, &mut store, &env(0, Weather::Snow), &config, &mut rng);
        assert_eq!(store.get(cat).unwrap().motion.move_duration_ms, 5000);
    }

    #[test]
    fn farm_production_fills_then_stops() {
        let config = HerdConfig::farm();
        let mut store = EntityStore::new();
        let cow = store
            .insert(animal("dairy_cow", Zone::Field, Diet::Herbivore, 100.0, Position::new(50.0, 70.0)))
            .unwrap();
        let mut ctx = HerdContext::new(Zone::Field, &config);
        let mut rng = StdRng::seed_from_u64(8);

        let mut ready_at = None;
        for n in 0..2000_u64 {
            tick(&mut ctx, &mut store, &env(n * 200, Weather::Clear), &config, &mut rng);
            let state = *store.get(cow).unwrap().farm_animal().unwrap();
            assert!(state.production <= METER_MAX);
            if state.ready && ready_at.is_none() {
                ready_at = Some(n);
            }
        }
        assert!(ready_at.is_some());
        let state = *store.get(cow).unwrap().farm_animal().unwrap();
        assert!(state.ready);
        assert!((state.production - METER_MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn animals_without_produce_never_become_ready() {
        let config = HerdConfig::farm();
        let mut store = EntityStore::new();
        let horse = store
            .insert(animal("horse", Zone::Field, Diet::Herbivore, 100.0, Position::new(50.0, 70.0)))
            .unwrap();
        let mut ctx = HerdContext::new(Zone::Field, &config);
        let mut rng = StdRng::seed_from_u64(8);
        for n in 0..500_u64 {
            tick(&mut ctx, &mut store, &env(n * 200, Weather::Clear), &config, &mut rng);
        }
        let state = store.get(horse).unwrap().farm_animal().unwrap();
        assert!(!state.ready);
        assert!(state.production.abs() < f64::EPSILON);
    }

    #[test]
    fn herds_stay_on_the_ground() {
        for (config, zone) in [(HerdConfig::zoo(), Zone::Desert), (HerdConfig::farm(), Zone::Barn)] {
            let mut store = EntityStore::new();
            for i in 0..5_u32 {
                store
                    .insert(animal("pig", zone, Diet::Omnivore, 100.0, Position::new(f64::from(i) * 20.0 + 5.0, 50.0)))
                    .unwrap();
            }
            let mut ctx = HerdContext::new(zone, &config);
            let mut rng = StdRng::seed_from_u64(77);
            let bounds = movement_bounds(zone.habitat());
            for n in 0..1500_u64 {
                tick(&mut ctx, &mut store, &env(n * 200, Weather::Storm), &config, &mut rng);
                for e in store.in_zone(zone) {
                    assert!(bounds.contains(e.position));
                    assert!((0.0..=100.0).contains(&e.vitals.hunger()));
                }
            }
        }
    }
}
