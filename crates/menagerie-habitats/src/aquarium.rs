//! Aquarium tick: breeding, predation, schooling and pattern leaders.
//!
//! Each creature has its own next-eligible time, so most ticks touch
//! only a few creatures. Per eligible creature, in order:
//!
//! 1. Reproduction accrues while hunger and happiness are high; at 100
//!    an offspring is born if the zone has room, otherwise the meter
//!    stays full.
//! 2. Hunger decays.
//! 3. Hungry carnivores hunt the nearest non-carnivore in sight and eat
//!    it when within capture range.
//! 4. Everyone else schools around a leader or roams freely.
//! 5. The target is clamped to the tank, and facing and tilt follow the
//!    move.
//!
//! Eaten creatures are removed and offspring appended after the pass.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use tracing::{debug, info};

use menagerie_types::{
    CreatureState, Diet, EntityId, Lifecycle, MovementPattern, Notification, NotificationKind,
    METER_MAX, Position, VisualEffect, Vitals, Zone, clamp_meter,
};
use menagerie_world::{EntityStore, VIEWPORT, movement_bounds};

use crate::config::AquariumConfig;
use crate::context::{TickEnv, TickOutcome};
use crate::movement::{SchoolLeaders, jitter, ms_from_f64, tilt_deg};

/// School membership of one creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct School {
    leader: usize,
    until_ms: u64,
}

/// Between-tick memory for one creature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Swimmer {
    next_move_ms: u64,
    school: Option<School>,
}

/// Simulation state of one aquarium zone.
#[derive(Debug, Clone)]
pub struct AquariumContext {
    zone: Zone,
    pattern: MovementPattern,
    waypoints: Vec<Position>,
    leaders: SchoolLeaders,
    swimmers: BTreeMap<EntityId, Swimmer>,
}

impl AquariumContext {
    /// Fresh context in free-roam mode with no waypoints.
    pub fn new(zone: Zone) -> Self {
        Self {
            zone,
            pattern: MovementPattern::default(),
            waypoints: Vec::new(),
            leaders: SchoolLeaders::new(),
            swimmers: BTreeMap::new(),
        }
    }

    /// The simulated zone.
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Active movement pattern.
    pub const fn pattern(&self) -> MovementPattern {
        self.pattern
    }

    /// Switch the movement pattern.
    pub fn set_pattern(&mut self, pattern: MovementPattern) {
        if pattern != self.pattern {
            debug!(zone = ?self.zone, ?pattern, "movement pattern changed");
        }
        self.pattern = pattern;
    }

    /// The player-drawn leader path.
    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    /// Append a point to the leader path, clamped to the viewport.
    pub fn add_waypoint(&mut self, point: Position) {
        self.waypoints.push(VIEWPORT.clamp(point).0);
    }

    /// Erase the leader path.
    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
        self.leaders.reset_cursors();
    }

    /// The school leaders.
    pub const fn leaders(&self) -> &SchoolLeaders {
        &self.leaders
    }
}

/// A prey candidate as it stood at the start of the tick.
struct Sighting {
    id: EntityId,
    name: String,
    position: Position,
    diet: Option<Diet>,
}

/// Advance one aquarium zone by one tick.
pub fn tick<R: Rng + ?Sized>(
    ctx: &mut AquariumContext,
    store: &mut EntityStore,
    env: &TickEnv,
    config: &AquariumConfig,
    rng: &mut R,
) -> TickOutcome {
    let zone = ctx.zone;
    let bounds = movement_bounds(zone.habitat());
    let speed = env.speed;
    let mut outcome = TickOutcome::default();

    ctx.leaders.advance(
        ctx.pattern,
        &ctx.waypoints,
        speed,
        config.pattern_clock_step,
        &config.leader_reflect,
        &bounds,
        rng,
    );

    let ids = store.ids_in_zone(zone);
    ctx.swimmers.retain(|id, _| ids.contains(id));

    let sightings: Vec<Sighting> = store
        .in_zone(zone)
        .map(|e| Sighting {
            id: e.id(),
            name: e.name.clone(),
            position: e.position,
            diet: e.diet(),
        })
        .collect();

    let cap = env.caps.cap_for(zone);
    let population = ids.len();
    let forced = ctx.pattern.forces_schooling();
    let mut eaten: BTreeSet<EntityId> = BTreeSet::new();
    let mut births = Vec::new();

    for id in &ids {
        if eaten.contains(id) {
            continue;
        }
        let swimmer = ctx.swimmers.entry(*id).or_default();
        if env.now_ms < swimmer.next_move_ms {
            continue;
        }
        let Some(entity) = store.get_mut(*id) else {
            continue;
        };

        let mut duration_ms = config.base_move_ms / speed;
        let hunger = entity.vitals.hunger();
        let happiness = entity.vitals.happiness();

        // 1. Reproduction
        if let Some(state) = entity.creature_mut() {
            if hunger > config.breed_threshold && happiness > config.breed_threshold {
                state.reproduction = clamp_meter(state.reproduction + config.reproduction_rate * speed);
            }
            let room = population.saturating_add(births.len()) < cap;
            if state.reproduction >= METER_MAX && room {
                state.reproduction = 0.0;
                let baby = entity.offspring(
                    format!("{} Jr.", entity.name),
                    Vitals::new(config.offspring_hunger, METER_MAX),
                    Lifecycle::Creature(CreatureState::default()),
                );
                outcome.effects.push(VisualEffect::Sparkle {
                    position: entity.position,
                });
                info!(zone = ?zone, parent = %entity.id(), baby = %baby.id(), "offspring born");
                births.push(baby);
            }
        }

        // 2. Hunger decay
        entity.vitals.adjust_hunger(-config.hunger_decay * speed);

        // 3. Predation
        let mut target = None;
        if entity.is_carnivore() && hunger < config.hunt_threshold {
            let here = entity.position;
            let prey = sightings
                .iter()
                .filter(|s| s.id != *id && !eaten.contains(&s.id))
                .filter(|s| !s.diet.is_some_and(Diet::is_carnivore))
                .map(|s| (s, here.distance_to(s.position)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((prey, dist)) = prey
                && dist < config.sight_radius
            {
                target = Some(prey.position);
                if dist < config.capture_radius {
                    eaten.insert(prey.id);
                    entity.vitals.set_hunger(METER_MAX);
                    duration_ms = config.eat_move_ms / speed;
                    info!(zone = ?zone, predator = %entity.id(), prey = %prey.id, "prey eaten");
                    outcome.offer(Notification::new(
                        NotificationKind::Kill,
                        format!("{} ate {}!", entity.name, prey.name),
                    ));
                } else {
                    duration_ms = config.chase_move_ms / speed;
                }
            }
        }

        // 4. Schooling or free roam
        let target = match target {
            Some(prey_at) => prey_at,
            None => {
                if swimmer.school.is_some_and(|s| env.now_ms > s.until_ms) && !forced {
                    swimmer.school = None;
                }
                if swimmer.school.is_none()
                    && !ctx.leaders.is_empty()
                    && (forced || rng.random_bool(config.school_join_chance))
                {
                    let leader = rng.random_range(0..ctx.leaders.len());
                    let stay_ms = config.school_min_ms + rng.random::<f64>() * config.school_extra_ms;
                    swimmer.school = Some(School {
                        leader,
                        until_ms: env.now_ms.saturating_add(ms_from_f64(stay_ms)),
                    });
                }
                match swimmer.school.and_then(|s| ctx.leaders.position(s.leader)) {
                    Some(leader) => {
                        let spread = if forced {
                            config.forced_spread
                        } else {
                            config.school_spread
                        };
                        duration_ms = config.school_move_ms / speed;
                        Position::new(leader.x + jitter(rng, spread), leader.y + jitter(rng, spread))
                    }
                    None => {
                        duration_ms =
                            (config.roam_min_ms + rng.random::<f64>() * config.roam_extra_ms) / speed;
                        Position::new(
                            rng.random::<f64>() * 90.0 + 5.0,
                            rng.random::<f64>() * 90.0 + 5.0,
                        )
                    }
                }
            }
        };

        // 5. Clamp, face and tilt
        let (target, clipped) = bounds.clamp(target);
        let dx = target.x - entity.position.x;
        let dy = target.y - entity.position.y;
        entity.motion.facing_right = dx > 0.0;
        entity.motion.rotation_deg = tilt_deg(dx, dy);
        entity.motion.colliding = clipped;
        entity.motion.move_duration_ms = ms_from_f64(duration_ms);
        entity.position = target;
        swimmer.next_move_ms = env.now_ms.saturating_add(entity.motion.move_duration_ms);
    }

    for id in &eaten {
        if store.remove(*id).is_some() {
            ctx.swimmers.remove(id);
            outcome.removed.push(*id);
        }
    }

    if !births.is_empty() {
        outcome.offer(Notification::new(NotificationKind::Birth, "A baby was born!"));
    }
    for baby in births {
        match store.insert(baby) {
            Ok(id) => outcome.spawned.push(id),
            Err(e) => debug!(error = %e, "offspring dropped"),
        }
    }

    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use menagerie_types::{Entity, EntityParams, Weather};
    use menagerie_world::ZoneCaps;

    use super::*;

    fn fish(name: &str, diet: Diet, hunger: f64, position: Position) -> Entity {
        fish_in(Zone::CoralReef, name, diet, hunger, position)
    }

    fn fish_in(zone: Zone, name: &str, diet: Diet, hunger: f64, position: Position) -> Entity {
        Entity::new(EntityParams {
            name: name.to_owned(),
            glyph: "🐟".to_owned(),
            species: if diet.is_carnivore() { "crab" } else { "goldfish" }.to_owned(),
            zone,
            diet: Some(diet),
            vitals: Vitals::new(hunger, 50.0),
            position,
            lifecycle: Lifecycle::Creature(CreatureState::default()),
        })
    }

    fn env(now_ms: u64) -> TickEnv {
        TickEnv {
            now_ms,
            speed: 1.0,
            weather: Weather::Clear,
            caps: ZoneCaps::default(),
        }
    }

    #[test]
    fn hungry_carnivore_eats_prey_in_reach() {
        let mut store = EntityStore::new();
        let crab = store
            .insert(fish("Snap", Diet::Carnivore, 30.0, Position::new(50.0, 50.0)))
            .unwrap();
        let prey = store
            .insert(fish("Goldie", Diet::Herbivore, 80.0, Position::new(52.0, 51.0)))
            .unwrap();
        let far = store
            .insert(fish("Bubbles", Diet::Herbivore, 80.0, Position::new(90.0, 90.0)))
            .unwrap();

        let mut ctx = AquariumContext::new(Zone::CoralReef);
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = tick(&mut ctx, &mut store, &env(0), &AquariumConfig::default(), &mut rng);

        assert_eq!(outcome.removed, vec![prey]);
        assert!(!store.contains(prey));
        assert!(store.contains(far));
        let crab = store.get(crab).unwrap();
        assert!((crab.vitals.hunger() - METER_MAX).abs() < f64::EPSILON);
        assert_eq!(crab.motion.move_duration_ms, 1000);
        assert_eq!(
            outcome.notification.map(|n| n.kind),
            Some(NotificationKind::Kill)
        );
    }

    #[test]
    fn carnivores_never_eat_carnivores() {
        let mut store = EntityStore::new();
        store
            .insert(fish("A", Diet::Carnivore, 10.0, Position::new(50.0, 50.0)))
            .unwrap();
        store
            .insert(fish("B", Diet::Carnivore, 10.0, Position::new(51.0, 50.0)))
            .unwrap();
        let mut ctx = AquariumContext::new(Zone::CoralReef);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = tick(&mut ctx, &mut store, &env(0), &AquariumConfig::default(), &mut rng);
        assert!(outcome.removed.is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn sated_carnivore_does_not_hunt() {
        let mut store = EntityStore::new();
        store
            .insert(fish("Snap", Diet::Carnivore, 90.0, Position::new(50.0, 50.0)))
            .unwrap();
        store
            .insert(fish("Goldie", Diet::Herbivore, 80.0, Position::new(51.0, 50.0)))
            .unwrap();
        let mut ctx = AquariumContext::new(Zone::CoralReef);
        let mut rng = StdRng::seed_from_u64(9);
        let outcome = tick(&mut ctx, &mut store, &env(0), &AquariumConfig::default(), &mut rng);
        assert!(outcome.removed.is_empty());
    }

    #[test]
    fn full_meter_spawns_one_offspring_and_resets() {
        let mut store = EntityStore::new();
        let mut parent = fish("Goldie", Diet::Herbivore, 90.0, Position::new(40.0, 40.0));
        parent.vitals.set_happiness(90.0);
        parent.creature_mut().unwrap().reproduction = 99.0;
        let parent = store.insert(parent).unwrap();

        let mut ctx = AquariumContext::new(Zone::CoralReef);
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = tick(&mut ctx, &mut store, &env(0), &AquariumConfig::default(), &mut rng);

        assert_eq!(outcome.spawned.len(), 1);
        assert_eq!(store.population(Zone::CoralReef), 2);
        let baby = store.get(outcome.spawned[0]).unwrap();
        assert_eq!(baby.name, "Goldie Jr.");
        assert!((baby.vitals.hunger() - 50.0).abs() < f64::EPSILON);
        assert!((baby.vitals.happiness() - METER_MAX).abs() < f64::EPSILON);
        assert!(baby.creature().unwrap().reproduction.abs() < f64::EPSILON);
        assert_eq!(baby.zone(), Zone::CoralReef);
        assert!(store.get(parent).unwrap().creature().unwrap().reproduction.abs() < f64::EPSILON);
        assert!(matches!(outcome.effects[0], VisualEffect::Sparkle { .. }));
    }

    #[test]
    fn full_zone_saturates_instead_of_spawning() {
        let mut store = EntityStore::new();
        let mut parent = fish("Goldie", Diet::Herbivore, 90.0, Position::new(40.0, 40.0));
        parent.vitals.set_happiness(90.0);
        parent.creature_mut().unwrap().reproduction = 99.0;
        let parent = store.insert(parent).unwrap();

        let mut tick_env = env(0);
        tick_env.caps.aquarium = 1;
        let mut ctx = AquariumContext::new(Zone::CoralReef);
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = tick(&mut ctx, &mut store, &tick_env, &AquariumConfig::default(), &mut rng);

        assert!(outcome.spawned.is_empty());
        assert_eq!(store.len(), 1);
        let meter = store.get(parent).unwrap().creature().unwrap().reproduction;
        assert!((meter - METER_MAX).abs() < f64::EPSILON);
    }

    #[test]
    fn creatures_wait_for_their_timer() {
        let mut store = EntityStore::new();
        let id = store
            .insert(fish("Goldie", Diet::Herbivore, 80.0, Position::new(40.0, 40.0)))
            .unwrap();
        let mut ctx = AquariumContext::new(Zone::CoralReef);
        let mut rng = StdRng::seed_from_u64(11);
        let config = AquariumConfig::default();

        tick(&mut ctx, &mut store, &env(0), &config, &mut rng);
        let after_first = store.get(id).unwrap().clone();
        tick(&mut ctx, &mut store, &env(200), &config, &mut rng);
        assert_eq!(store.get(id).unwrap().position, after_first.position);
        assert!((store.get(id).unwrap().vitals.hunger() - after_first.vitals.hunger()).abs() < f64::EPSILON);
    }

    #[test]
    fn vitals_and_positions_stay_in_range_over_many_ticks() {
        let mut store = EntityStore::new();
        for i in 0..6_u32 {
            let diet = if i % 3 == 0 { Diet::Carnivore } else { Diet::Herbivore };
            store
                .insert(fish("F", diet, 100.0, Position::new(f64::from(i) * 15.0 + 5.0, 50.0)))
                .unwrap();
        }
        let mut ctx = AquariumContext::new(Zone::CoralReef);
        ctx.set_pattern(MovementPattern::Zigzag);
        let mut rng = StdRng::seed_from_u64(2024);
        let config = AquariumConfig::default();
        let mut tick_env = env(0);
        tick_env.speed = 3.0;
        let bounds = movement_bounds(menagerie_types::Habitat::Aquarium);

        for n in 0..3000_u64 {
            tick_env.now_ms = n * 200;
            tick(&mut ctx, &mut store, &tick_env, &config, &mut rng);
            assert!(store.population(Zone::CoralReef) <= ZoneCaps::default().aquarium);
            for e in store.iter() {
                assert!((0.0..=100.0).contains(&e.vitals.hunger()));
                assert!((0.0..=100.0).contains(&e.vitals.happiness()));
                assert!(bounds.contains(e.position));
                assert!(e.motion.rotation_deg.abs() <= 25.0);
            }
        }
    }

    #[test]
    fn other_zones_are_untouched() {
        let mut store = EntityStore::new();
        let whale = store
            .insert(fish_in(Zone::OpenOcean, "Moby", Diet::Carnivore, 10.0, Position::new(50.0, 50.0)))
            .unwrap();
        store
            .insert(fish("Goldie", Diet::Herbivore, 80.0, Position::new(51.0, 50.0)))
            .unwrap();
        let snapshot = store.get(whale).unwrap().clone();

        let mut ctx = AquariumContext::new(Zone::CoralReef);
        let mut rng = StdRng::seed_from_u64(3);
        tick(&mut ctx, &mut store, &env(0), &AquariumConfig::default(), &mut rng);
        assert_eq!(store.get(whale).unwrap(), &snapshot);
    }

    #[test]
    fn waypoints_are_clamped_and_cleared() {
        let mut ctx = AquariumContext::new(Zone::OpenOcean);
        ctx.add_waypoint(Position::new(150.0, -5.0));
        assert_eq!(ctx.waypoints(), &[Position::new(100.0, 0.0)]);
        ctx.clear_waypoints();
        assert!(ctx.waypoints().is_empty());
    }
}
