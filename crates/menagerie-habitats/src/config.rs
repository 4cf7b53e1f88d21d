//! Tunables for the habitat ticks and the interaction layer.
//!
//! Every rate is expressed per tick at speed 1.0 and every duration in
//! game milliseconds at speed 1.0. The tick divides durations and
//! multiplies rates by the effective speed. [`SimConfig`] bundles all of
//! them so tests can override a single value. The garden, restaurant and
//! action sections can also be overridden from the game config file.

use serde::Deserialize;

use menagerie_world::Bounds;

/// Aquarium tick parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AquariumConfig {
    /// Base time between two moves of one creature (default: 3000).
    pub base_move_ms: f64,
    /// Reproduction gained per eligible move (default: 3.0).
    pub reproduction_rate: f64,
    /// Hunger and happiness must both exceed this to breed (default: 60).
    pub breed_threshold: f64,
    /// Hunger lost per move (default: 0.5).
    pub hunger_decay: f64,
    /// Carnivores hunt below this hunger (default: 40).
    pub hunt_threshold: f64,
    /// Prey further than this is ignored (default: 100).
    pub sight_radius: f64,
    /// Prey closer than this is eaten (default: 5).
    pub capture_radius: f64,
    /// Move duration onto a kill site (default: 1000).
    pub eat_move_ms: f64,
    /// Move duration while chasing (default: 1500).
    pub chase_move_ms: f64,
    /// Chance per move of joining a school in free roam (default: 0.3).
    pub school_join_chance: f64,
    /// Minimum school membership (default: 8000).
    pub school_min_ms: f64,
    /// Random extra school membership, up to (default: 6000).
    pub school_extra_ms: f64,
    /// Offset spread around a leader in free roam (default: 12).
    pub school_spread: f64,
    /// Offset spread around a leader under a forced pattern (default: 6).
    pub forced_spread: f64,
    /// Move duration while schooling (default: 2000).
    pub school_move_ms: f64,
    /// Minimum duration of a free-roam move (default: 3000).
    pub roam_min_ms: f64,
    /// Random extra duration of a free-roam move, up to (default: 4000).
    pub roam_extra_ms: f64,
    /// Pattern clock advance per tick (default: 0.01).
    pub pattern_clock_step: f64,
    /// Leaders bounce off this box in the random pattern.
    pub leader_reflect: Bounds,
    /// Offspring start with this hunger (default: 50).
    pub offspring_hunger: f64,
}

impl Default for AquariumConfig {
    fn default() -> Self {
        Self {
            base_move_ms: 3000.0,
            reproduction_rate: 3.0,
            breed_threshold: 60.0,
            hunger_decay: 0.5,
            hunt_threshold: 40.0,
            sight_radius: 100.0,
            capture_radius: 5.0,
            eat_move_ms: 1000.0,
            chase_move_ms: 1500.0,
            school_join_chance: 0.3,
            school_min_ms: 8000.0,
            school_extra_ms: 6000.0,
            school_spread: 12.0,
            forced_spread: 6.0,
            school_move_ms: 2000.0,
            roam_min_ms: 3000.0,
            roam_extra_ms: 4000.0,
            pattern_clock_step: 0.01,
            leader_reflect: Bounds::new(5.0, 95.0, 5.0, 95.0),
            offspring_hunger: 50.0,
        }
    }
}

/// How a herd animal picks its next target when it is not hunting.
///
/// One roll per move: below `stay_below` it stays put, below
/// `follow_below` it heads for the first herd leader, otherwise it
/// wanders relative to where it stands.
#[derive(Debug, Clone, PartialEq)]
pub struct HerdBehavior {
    /// Roll threshold for standing still.
    pub stay_below: f64,
    /// Roll threshold for following the leader.
    pub follow_below: f64,
    /// Full width of the offset around the leader, both axes.
    pub follow_spread: f64,
    /// Full width of a wander step on the x axis.
    pub wander_x: f64,
    /// Full width of a wander step on the y axis.
    pub wander_y: f64,
}

/// Zoo and farm tick parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct HerdConfig {
    /// Base time between two moves of one animal (default: 3000).
    pub base_move_ms: f64,
    /// Hunger lost per move.
    pub hunger_decay: f64,
    /// Carnivores hunt below this hunger. `None` disables hunting.
    pub hunt_threshold: Option<f64>,
    /// Prey further than this is ignored.
    pub hunt_radius: f64,
    /// Prey closer than this is eaten.
    pub capture_radius: f64,
    /// Move duration while chasing.
    pub chase_move_ms: f64,
    /// Target selection weights.
    pub behavior: HerdBehavior,
    /// Herd leaders bounce off this box.
    pub leader_reflect: Bounds,
    /// Leader start positions and velocities as `(x, y, vx, vy)`.
    pub leader_starts: Vec<(f64, f64, f64, f64)>,
}

impl HerdConfig {
    /// Zoo defaults: hunting below 50 hunger within 30 units.
    pub fn zoo() -> Self {
        Self {
            base_move_ms: 3000.0,
            hunger_decay: 0.5,
            hunt_threshold: Some(50.0),
            hunt_radius: 30.0,
            capture_radius: 5.0,
            chase_move_ms: 1000.0,
            behavior: HerdBehavior {
                stay_below: 0.2,
                follow_below: 0.6,
                follow_spread: 10.0,
                wander_x: 30.0,
                wander_y: 20.0,
            },
            leader_reflect: Bounds::new(10.0, 90.0, 40.0, 85.0),
            leader_starts: vec![(30.0, 50.0, 0.3, 0.2), (70.0, 70.0, -0.2, 0.1)],
        }
    }

    /// Farm defaults: no hunting, calmer wandering.
    pub fn farm() -> Self {
        Self {
            base_move_ms: 3000.0,
            hunger_decay: 0.4,
            hunt_threshold: None,
            hunt_radius: 0.0,
            capture_radius: 0.0,
            chase_move_ms: 1000.0,
            behavior: HerdBehavior {
                stay_below: 0.25,
                follow_below: 0.5,
                follow_spread: 15.0,
                wander_x: 20.0,
                wander_y: 20.0,
            },
            leader_reflect: Bounds::new(10.0, 90.0, 45.0, 90.0),
            leader_starts: vec![(30.0, 60.0, 0.3, 0.2), (70.0, 70.0, -0.2, 0.1)],
        }
    }
}

/// Garden tick parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Growth per tick before weather (default: 0.2).
    pub growth_rate: f64,
    /// Hydration used per growing tick (default: 0.05).
    pub hydration_use: f64,
    /// Growth a perennial keeps after harvest (default: 30).
    pub regrowth: f64,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            growth_rate: 0.2,
            hydration_use: 0.05,
            regrowth: 30.0,
        }
    }
}

/// Restaurant tick parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RestaurantConfig {
    /// Chance per tick that a customer arrives (default: 0.05).
    pub spawn_chance: f64,
    /// Where customers appear, off-screen left.
    pub entry_x: f64,
    /// Entry height.
    pub entry_y: f64,
    /// Distance walked per tick at speed 1.0 (default: 3).
    pub walk_step: f64,
    /// Customers closer than this to their table sit down (default: 2).
    pub arrive_distance: f64,
    /// Seated customers sit this far above the table center (default: 5).
    pub seat_offset: f64,
    /// Customers past this x have left (default: 120).
    pub exit_x: f64,
    /// Cooking progress per tick (default: 2).
    pub cook_step: f64,
    /// Game time between serving and paying (default: 3000).
    pub payout_delay_ms: u64,
    /// Animation duration of one walking step (default: 500).
    pub step_move_ms: u64,
    /// Starting happiness of a new customer (default: 50).
    pub customer_happiness: f64,
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.05,
            entry_x: -15.0,
            entry_y: 70.0,
            walk_step: 3.0,
            arrive_distance: 2.0,
            seat_offset: 5.0,
            exit_x: 120.0,
            cook_step: 2.0,
            payout_delay_ms: 3000,
            step_move_ms: 500,
            customer_happiness: 50.0,
        }
    }
}

/// Interaction layer parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Happiness added by petting a zoo animal (default: 10).
    pub zoo_pet_happiness: f64,
    /// Coins earned by petting a zoo animal (default: 5).
    pub zoo_pet_coins: u64,
    /// Happiness added by petting a farm animal (default: 15).
    pub farm_pet_happiness: f64,
    /// Coins earned by petting a farm animal (default: 2).
    pub farm_pet_coins: u64,
    /// Share of a fish food's hunger delta added to reproduction (default: 0.4).
    pub feed_breeding_share: f64,
    /// Columns of the garden planting grid (default: 5).
    pub garden_columns: usize,
    /// Distance between garden grid cells (default: 15).
    pub garden_cell: f64,
    /// Random offset added to a planted position, up to (default: 5).
    pub garden_jitter: f64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            zoo_pet_happiness: 10.0,
            zoo_pet_coins: 5,
            farm_pet_happiness: 15.0,
            farm_pet_coins: 2,
            feed_breeding_share: 0.4,
            garden_columns: 5,
            garden_cell: 15.0,
            garden_jitter: 5.0,
        }
    }
}

/// Every tunable of the habitat layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Aquarium tick.
    #[serde(skip)]
    pub aquarium: AquariumConfig,
    /// Zoo tick.
    #[serde(skip)]
    pub zoo: HerdConfig,
    /// Farm tick.
    #[serde(skip)]
    pub farm: HerdConfig,
    /// Garden tick.
    pub garden: GardenConfig,
    /// Restaurant tick.
    pub restaurant: RestaurantConfig,
    /// Player actions.
    pub actions: ActionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            aquarium: AquariumConfig::default(),
            zoo: HerdConfig::zoo(),
            farm: HerdConfig::farm(),
            garden: GardenConfig::default(),
            restaurant: RestaurantConfig::default(),
            actions: ActionConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_the_zoo_hunts() {
        let config = SimConfig::default();
        assert!(config.zoo.hunt_threshold.is_some());
        assert!(config.farm.hunt_threshold.is_none());
    }

    #[test]
    fn herd_rolls_are_ordered() {
        for herd in [HerdConfig::zoo(), HerdConfig::farm()] {
            assert!(herd.behavior.stay_below < herd.behavior.follow_below);
            assert!(herd.behavior.follow_below <= 1.0);
            assert_eq!(herd.leader_starts.len(), 2);
        }
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let json = r#"{"restaurant": {"spawn_chance": 0.2}, "actions": {"zoo_pet_coins": 9}}"#;
        let config: SimConfig = serde_json::from_str(json).unwrap();
        assert!((config.restaurant.spawn_chance - 0.2).abs() < f64::EPSILON);
        assert!((config.restaurant.cook_step - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.actions.zoo_pet_coins, 9);
        assert_eq!(config.actions.farm_pet_coins, 2);
        assert_eq!(config.zoo, HerdConfig::zoo());
    }
}
