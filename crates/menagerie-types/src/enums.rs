//! Enumeration types for the habitat simulator.
//!
//! Habitats, zones, diets, weather, growth stages and the restaurant
//! state machines. Zones carry their habitat so an entity's affinity
//! is a single value.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Habitats and zones
// ---------------------------------------------------------------------------

/// A play mode. The player views exactly one habitat at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Habitat {
    /// Water creatures with schooling, predation and breeding.
    Aquarium,
    /// Land animals with herding and predation.
    Zoo,
    /// Farm animals with a production cycle.
    Farm,
    /// Plants with a growth-stage state machine.
    Garden,
    /// Customers and the order pipeline.
    Restaurant,
}

impl Habitat {
    /// All habitats in display order.
    pub const ALL: [Self; 5] = [
        Self::Aquarium,
        Self::Zoo,
        Self::Farm,
        Self::Garden,
        Self::Restaurant,
    ];

    /// The zones that make up this habitat.
    pub const fn zones(self) -> &'static [Zone] {
        match self {
            Self::Aquarium => &[Zone::CoralReef, Zone::OpenOcean],
            Self::Zoo => &[Zone::Jungle, Zone::Desert, Zone::Arctic, Zone::Antarctic],
            Self::Farm => &[Zone::Barn, Zone::Field, Zone::Pond],
            Self::Garden => &[Zone::Vegetables, Zone::Orchard, Zone::Flowers],
            Self::Restaurant => &[Zone::Dining, Zone::Bar, Zone::Kitchen],
        }
    }

    /// The category tag carried by entities living in this habitat.
    pub const fn category(self) -> Category {
        match self {
            Self::Aquarium => Category::WaterCreature,
            Self::Zoo | Self::Farm => Category::LandCreature,
            Self::Garden => Category::Plant,
            Self::Restaurant => Category::Customer,
        }
    }

    /// Lowercase name used in logs and console input.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Aquarium => "aquarium",
            Self::Zoo => "zoo",
            Self::Farm => "farm",
            Self::Garden => "garden",
            Self::Restaurant => "restaurant",
        }
    }
}

/// A named sub-area of a habitat with its own entity subset and cap.
///
/// An entity's zone never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Aquarium: shallow reef.
    CoralReef,
    /// Aquarium: deep water.
    OpenOcean,
    /// Zoo: tropical forest.
    Jungle,
    /// Zoo: sand dunes.
    Desert,
    /// Zoo: northern ice.
    Arctic,
    /// Zoo: southern ice.
    Antarctic,
    /// Farm: poultry and pigs.
    Barn,
    /// Farm: grazing land.
    Field,
    /// Farm: waterfowl.
    Pond,
    /// Garden: single-harvest crops.
    Vegetables,
    /// Garden: fruit trees.
    Orchard,
    /// Garden: flower beds.
    Flowers,
    /// Restaurant: main floor.
    Dining,
    /// Restaurant: bar and cafe.
    Bar,
    /// Restaurant: kitchen view.
    Kitchen,
}

impl Zone {
    /// The habitat this zone belongs to.
    pub const fn habitat(self) -> Habitat {
        match self {
            Self::CoralReef | Self::OpenOcean => Habitat::Aquarium,
            Self::Jungle | Self::Desert | Self::Arctic | Self::Antarctic => Habitat::Zoo,
            Self::Barn | Self::Field | Self::Pond => Habitat::Farm,
            Self::Vegetables | Self::Orchard | Self::Flowers => Habitat::Garden,
            Self::Dining | Self::Bar | Self::Kitchen => Habitat::Restaurant,
        }
    }

    /// Lowercase name used in logs and console input.
    pub const fn label(self) -> &'static str {
        match self {
            Self::CoralReef => "coral_reef",
            Self::OpenOcean => "open_ocean",
            Self::Jungle => "jungle",
            Self::Desert => "desert",
            Self::Arctic => "arctic",
            Self::Antarctic => "antarctic",
            Self::Barn => "barn",
            Self::Field => "field",
            Self::Pond => "pond",
            Self::Vegetables => "vegetables",
            Self::Orchard => "orchard",
            Self::Flowers => "flowers",
            Self::Dining => "dining",
            Self::Bar => "bar",
            Self::Kitchen => "kitchen",
        }
    }

    /// Look a zone up by its [`label`](Self::label).
    pub fn from_label(label: &str) -> Option<Self> {
        Habitat::ALL
            .iter()
            .flat_map(|h| h.zones().iter().copied())
            .find(|z| z.label() == label)
    }
}

impl core::fmt::Display for Zone {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Entity category tag, derived from the habitat of the entity's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Aquarium inhabitant.
    WaterCreature,
    /// Zoo or farm animal.
    LandCreature,
    /// Garden plant.
    Plant,
    /// Restaurant guest.
    Customer,
}

// ---------------------------------------------------------------------------
// Species attributes
// ---------------------------------------------------------------------------

/// What a creature eats. Only carnivores hunt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    /// Hunts other creatures when hungry.
    Carnivore,
    /// Plant eater; valid prey.
    Herbivore,
    /// Eats anything; valid prey.
    Omnivore,
}

impl Diet {
    /// Whether this diet hunts.
    pub const fn is_carnivore(self) -> bool {
        matches!(self, Self::Carnivore)
    }
}

/// Shop hint for how demanding a species is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum CareLevel {
    /// Beginner friendly.
    Easy,
    /// Needs some attention.
    Medium,
    /// Needs regular attention.
    Hard,
    /// Needs constant attention.
    VeryHard,
    /// Endgame species.
    Legendary,
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Weather in the active habitat, cycled by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    /// No effect.
    #[default]
    Clear,
    /// Speeds plant growth.
    Rain,
    /// Slows farm animals and plant growth.
    Storm,
    /// Slows zoo animals. Only reachable in the zoo.
    Snow,
}

/// Shared movement pattern for aquarium school leaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    /// Free roam: leaders drift and creatures school by choice.
    #[default]
    Random,
    /// Leaders orbit the tank center.
    Circle,
    /// Leaders sweep back and forth on a sine path.
    Zigzag,
    /// Leaders follow a player-drawn polyline.
    Custom,
}

impl MovementPattern {
    /// Every pattern except free roam forces all creatures into schools.
    pub const fn forces_schooling(self) -> bool {
        !matches!(self, Self::Random)
    }
}

// ---------------------------------------------------------------------------
// Lifecycle state machines
// ---------------------------------------------------------------------------

/// Discrete plant lifecycle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    /// Stage 0.
    #[default]
    Seed,
    /// Stage 1.
    Sprout,
    /// Stage 2.
    Mature,
    /// Stage 3. Ready to harvest; growth no longer accrues.
    Harvestable,
}

impl GrowthStage {
    /// Numeric stage index, 0 through 3.
    pub const fn index(self) -> u8 {
        match self {
            Self::Seed => 0,
            Self::Sprout => 1,
            Self::Mature => 2,
            Self::Harvestable => 3,
        }
    }

    /// The following stage. Harvestable is terminal.
    pub const fn next(self) -> Self {
        match self {
            Self::Seed => Self::Sprout,
            Self::Sprout => Self::Mature,
            Self::Mature | Self::Harvestable => Self::Harvestable,
        }
    }

    /// Whether the plant can be harvested.
    pub const fn is_harvestable(self) -> bool {
        matches!(self, Self::Harvestable)
    }
}

/// Restaurant customer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum DiningState {
    /// Heading from the door to the assigned table.
    WalkingIn,
    /// Seated; an order exists for this customer.
    Waiting,
    /// Served; pays when the meal is over.
    Eating,
    /// Leaving through the exit.
    WalkingOut,
}

/// Restaurant order status. Served orders are removed, not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Waiting for the player to start cooking.
    Pending,
    /// On the stove; progress rises every tick.
    Cooking,
    /// Waiting for the player to serve.
    Ready,
}

// ---------------------------------------------------------------------------
// Coins
// ---------------------------------------------------------------------------

/// Reason a coin movement happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum CoinFlow {
    /// Bought an entity.
    Purchase,
    /// Bought food or a care item.
    Feed,
    /// Sold an entity.
    Sale,
    /// Tip for petting an animal.
    PetReward,
    /// Sold farm produce or a garden crop.
    Harvest,
    /// A restaurant customer paid.
    RestaurantPayout,
    /// A random event granted coins.
    RandomEvent,
}

impl CoinFlow {
    /// Whether this flow takes coins out of the wallet.
    pub const fn is_debit(self) -> bool {
        matches!(self, Self::Purchase | Self::Feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_zone_maps_back_to_its_habitat() {
        for habitat in Habitat::ALL {
            for zone in habitat.zones() {
                assert_eq!(zone.habitat(), habitat);
            }
        }
    }

    #[test]
    fn zone_labels_parse() {
        assert_eq!(Zone::from_label("open_ocean"), Some(Zone::OpenOcean));
        assert_eq!(Zone::from_label("kitchen"), Some(Zone::Kitchen));
        assert_eq!(Zone::from_label("moon"), None);
    }

    #[test]
    fn growth_stage_is_terminal_at_harvestable() {
        assert_eq!(GrowthStage::Seed.next(), GrowthStage::Sprout);
        assert_eq!(GrowthStage::Mature.next(), GrowthStage::Harvestable);
        assert_eq!(GrowthStage::Harvestable.next(), GrowthStage::Harvestable);
        assert_eq!(GrowthStage::Harvestable.index(), 3);
    }

    #[test]
    fn only_free_roam_leaves_schooling_optional() {
        assert!(!MovementPattern::Random.forces_schooling());
        assert!(MovementPattern::Circle.forces_schooling());
        assert!(MovementPattern::Custom.forces_schooling());
    }

    #[test]
    fn habitat_serializes_snake_case() {
        let json = serde_json::to_string(&Zone::CoralReef).unwrap_or_default();
        assert_eq!(json, "\"coral_reef\"");
    }
}
