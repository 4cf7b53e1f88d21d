//! Garden tick: the plant growth-stage machine.
//!
//! A hydrated plant below the harvestable stage gains growth every
//! tick, scaled by weather and speed, and uses a little hydration.
//! At 100 it moves up a stage and starts over, except that reaching
//! the harvestable stage holds growth at 100 until harvest.

use tracing::debug;

use menagerie_types::{GrowthStage, METER_MAX, Zone};
use menagerie_world::{EntityStore, catalog, growth_multiplier};

use crate::config::GardenConfig;
use crate::context::{TickEnv, TickOutcome};

/// Simulation state of one garden zone. Plants keep no between-tick
/// memory outside their own records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GardenContext {
    zone: Zone,
}

impl GardenContext {
    /// Fresh context.
    pub const fn new(zone: Zone) -> Self {
        Self { zone }
    }

    /// The simulated zone.
    pub const fn zone(&self) -> Zone {
        self.zone
    }
}

/// Advance one garden zone by one tick.
pub fn tick(
    ctx: &GardenContext,
    store: &mut EntityStore,
    env: &TickEnv,
    config: &GardenConfig,
) -> TickOutcome {
    let rate = config.growth_rate * env.speed * growth_multiplier(env.weather);
    let use_per_tick = config.hydration_use * env.speed;

    for plant in store.in_zone_mut(ctx.zone) {
        if plant.vitals.hunger() <= 0.0 {
            continue;
        }
        let stages = catalog::species(plant.species()).and_then(|s| s.plant);
        let Some(state) = plant.plant_mut() else {
            continue;
        };
        if state.stage.is_harvestable() {
            continue;
        }

        state.growth += rate;
        let mut advanced = false;
        if state.growth >= METER_MAX {
            state.stage = state.stage.next();
            state.growth = if state.stage == GrowthStage::Harvestable {
                METER_MAX
            } else {
                0.0
            };
            advanced = true;
        }
        let stage = state.stage;

        plant.vitals.adjust_hunger(-use_per_tick);
        if advanced {
            if let Some(spec) = stages {
                plant.glyph = spec.glyph_for_stage(stage.index()).to_owned();
            }
            debug!(zone = ?ctx.zone, plant = %plant.id(), ?stage, "plant grew");
        }
    }

    TickOutcome::default()
}
