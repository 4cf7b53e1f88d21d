//! The entity record shared by every habitat.
//!
//! Category-specific progress lives in [`Lifecycle`], a tagged union, so
//! a reproduction meter can never be read as a growth meter. Vitals are
//! clamped to `[0, 100]` on every mutation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Category, Diet, DiningState, GrowthStage, Habitat, Zone};
use crate::ids::EntityId;

/// Upper bound of every vital and progress meter.
pub const METER_MAX: f64 = 100.0;

/// Clamp a meter value into `[0, 100]`. NaN collapses to 0.
pub const fn clamp_meter(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, METER_MAX)
    }
}

// ---------------------------------------------------------------------------
// Vitals
// ---------------------------------------------------------------------------

/// Hunger and happiness, both in `[0, 100]`.
///
/// For plants hunger reads as hydration and happiness as health.
/// Fields are private so every write goes through the clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vitals {
    hunger: f64,
    happiness: f64,
}

impl Vitals {
    /// Build clamped vitals.
    pub const fn new(hunger: f64, happiness: f64) -> Self {
        Self {
            hunger: clamp_meter(hunger),
            happiness: clamp_meter(happiness),
        }
    }

    /// Fully fed and happy.
    pub const fn full() -> Self {
        Self::new(METER_MAX, METER_MAX)
    }

    /// Current hunger (100 = sated).
    pub const fn hunger(&self) -> f64 {
        self.hunger
    }

    /// Current happiness.
    pub const fn happiness(&self) -> f64 {
        self.happiness
    }

    /// Overwrite hunger.
    pub const fn set_hunger(&mut self, value: f64) {
        self.hunger = clamp_meter(value);
    }

    /// Overwrite happiness.
    pub const fn set_happiness(&mut self, value: f64) {
        self.happiness = clamp_meter(value);
    }

    /// Add a (possibly negative) delta to hunger.
    pub fn adjust_hunger(&mut self, delta: f64) {
        self.set_hunger(self.hunger + delta);
    }

    /// Add a (possibly negative) delta to happiness.
    pub fn adjust_happiness(&mut self, delta: f64) {
        self.set_happiness(self.happiness + delta);
    }
}

impl Default for Vitals {
    fn default() -> Self {
        Self::full()
    }
}

// ---------------------------------------------------------------------------
// Geometry and motion
// ---------------------------------------------------------------------------

/// Percentage coordinates within a habitat viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal position, 0 = left edge.
    pub x: f64,
    /// Vertical position, 0 = top edge.
    pub y: f64,
}

impl Position {
    /// Build a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Presentation hints written by the tick for the animation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Motion {
    /// Whether the glyph faces right.
    pub facing_right: bool,
    /// Banking tilt in degrees, within `[-25, 25]`.
    pub rotation_deg: f64,
    /// How long the current move should take to animate.
    pub move_duration_ms: u64,
    /// Set when the last move target was clipped by a boundary.
    pub colliding: bool,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            facing_right: true,
            rotation_deg: 0.0,
            move_duration_ms: 1000,
            colliding: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle union
// ---------------------------------------------------------------------------

/// Breeding state for aquarium and zoo creatures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CreatureState {
    /// Reproduction meter; an offspring is born at 100.
    pub reproduction: f64,
}

/// Production state for farm animals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FarmAnimalState {
    /// Produce meter; flips `ready` at 100.
    pub production: f64,
    /// Produce is waiting to be harvested. No accrual while set.
    pub ready: bool,
}

/// Growth state for garden plants.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlantState {
    /// Current growth stage.
    pub stage: GrowthStage,
    /// Progress toward the next stage. Held at 100 once harvestable.
    pub growth: f64,
    /// Perennials regrow after harvest, others are removed.
    pub perennial: bool,
}

/// What a customer ordered, copied from the menu at arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MenuChoice {
    /// Menu item key.
    pub item: String,
    /// Menu item glyph.
    pub glyph: String,
    /// Price paid after eating.
    pub price: u64,
    /// Nominal time the dish takes to eat, for display.
    pub eat_ms: u64,
}

/// Dining state for restaurant customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CustomerState {
    /// Where the customer is in the visit.
    pub dining: DiningState,
    /// Assigned table.
    pub table_id: u8,
    /// The dish or drink the customer wants.
    pub order: MenuChoice,
    /// Game time at which an eating customer pays and leaves.
    pub pays_at_ms: Option<u64>,
}

/// Category-specific state of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Lifecycle {
    /// Aquarium or zoo creature.
    Creature(CreatureState),
    /// Farm animal.
    FarmAnimal(FarmAnimalState),
    /// Garden plant.
    Plant(PlantState),
    /// Restaurant customer.
    Customer(CustomerState),
}

impl Lifecycle {
    /// Fresh lifecycle for a newly created entity in `habitat`.
    ///
    /// Returns `None` for the restaurant, whose customers need a table
    /// and an order and are built by the restaurant tick.
    pub const fn fresh(habitat: Habitat, perennial: bool) -> Option<Self> {
        match habitat {
            Habitat::Aquarium | Habitat::Zoo => Some(Self::Creature(CreatureState {
                reproduction: 0.0,
            })),
            Habitat::Farm => Some(Self::FarmAnimal(FarmAnimalState {
                production: 0.0,
                ready: false,
            })),
            Habitat::Garden => Some(Self::Plant(PlantState {
                stage: GrowthStage::Seed,
                growth: 0.0,
                perennial,
            })),
            Habitat::Restaurant => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// Construction parameters for an [`Entity`].
#[derive(Debug, Clone)]
pub struct EntityParams {
    /// Display name.
    pub name: String,
    /// Display glyph.
    pub glyph: String,
    /// Catalog key.
    pub species: String,
    /// Home zone, fixed for life.
    pub zone: Zone,
    /// Diet class; `None` for plants and customers.
    pub diet: Option<Diet>,
    /// Starting vitals.
    pub vitals: Vitals,
    /// Starting position.
    pub position: Position,
    /// Starting lifecycle state.
    pub lifecycle: Lifecycle,
}

/// One creature, plant, or restaurant customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Entity {
    id: EntityId,
    /// Display name.
    pub name: String,
    /// Display glyph.
    pub glyph: String,
    species: String,
    zone: Zone,
    diet: Option<Diet>,
    /// Hunger and happiness.
    pub vitals: Vitals,
    /// Current position.
    pub position: Position,
    /// Animation hints.
    pub motion: Motion,
    /// Category-specific progress.
    pub lifecycle: Lifecycle,
}

impl Entity {
    /// Create an entity with a fresh id.
    pub fn new(params: EntityParams) -> Self {
        Self {
            id: EntityId::new(),
            name: params.name,
            glyph: params.glyph,
            species: params.species,
            zone: params.zone,
            diet: params.diet,
            vitals: params.vitals,
            position: params.position,
            motion: Motion::default(),
            lifecycle: params.lifecycle,
        }
    }

    /// Clone this entity's template into a new entity with a fresh id,
    /// at the parent's position.
    pub fn offspring(&self, name: String, vitals: Vitals, lifecycle: Lifecycle) -> Self {
        Self {
            id: EntityId::new(),
            name,
            glyph: self.glyph.clone(),
            species: self.species.clone(),
            zone: self.zone,
            diet: self.diet,
            vitals,
            position: self.position,
            motion: Motion {
                facing_right: self.motion.facing_right,
                ..Motion::default()
            },
            lifecycle,
        }
    }

    /// Unique id.
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Catalog key of the species.
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Home zone.
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Diet class, if any.
    pub const fn diet(&self) -> Option<Diet> {
        self.diet
    }

    /// Whether this entity hunts.
    pub fn is_carnivore(&self) -> bool {
        self.diet.is_some_and(Diet::is_carnivore)
    }

    /// Category tag derived from the home zone.
    pub const fn category(&self) -> Category {
        self.zone.habitat().category()
    }

    /// Creature breeding state, if this is a creature.
    pub const fn creature(&self) -> Option<&CreatureState> {
        match &self.lifecycle {
            Lifecycle::Creature(state) => Some(state),
            _ => None,
        }
    }

    /// Mutable creature breeding state.
    pub const fn creature_mut(&mut self) -> Option<&mut CreatureState> {
        match &mut self.lifecycle {
            Lifecycle::Creature(state) => Some(state),
            _ => None,
        }
    }

    /// Farm production state, if this is a farm animal.
    pub const fn farm_animal(&self) -> Option<&FarmAnimalState> {
        match &self.lifecycle {
            Lifecycle::FarmAnimal(state) => Some(state),
            _ => None,
        }
    }

    /// Mutable farm production state.
    pub const fn farm_animal_mut(&mut self) -> Option<&mut FarmAnimalState> {
        match &mut self.lifecycle {
            Lifecycle::FarmAnimal(state) => Some(state),
            _ => None,
        }
    }

    /// Plant growth state, if this is a plant.
    pub const fn plant(&self) -> Option<&PlantState> {
        match &self.lifecycle {
            Lifecycle::Plant(state) => Some(state),
            _ => None,
        }
    }

    /// Mutable plant growth state.
    pub const fn plant_mut(&mut self) -> Option<&mut PlantState> {
        match &mut self.lifecycle {
            Lifecycle::Plant(state) => Some(state),
            _ => None,
        }
    }

    /// Customer dining state, if this is a customer.
    pub const fn customer(&self) -> Option<&CustomerState> {
        match &self.lifecycle {
            Lifecycle::Customer(state) => Some(state),
            _ => None,
        }
    }

    /// Mutable customer dining state.
    pub const fn customer_mut(&mut self) -> Option<&mut CustomerState> {
        match &mut self.lifecycle {
            Lifecycle::Customer(state) => Some(state),
            _ => None,
        }
    }
}
