//! Zone geometry and population caps.
//!
//! Coordinates are percentages of the habitat viewport. Each habitat
//! has a rectangle its entities are kept inside and a per-zone cap.

use serde::Deserialize;

use menagerie_types::{Habitat, Position, Zone};

use crate::catalog::TABLES;

/// An axis-aligned rectangle in viewport percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge.
    pub min_x: f64,
    /// Right edge.
    pub max_x: f64,
    /// Top edge.
    pub min_y: f64,
    /// Bottom edge.
    pub max_y: f64,
}

impl Bounds {
    /// Build a rectangle.
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Whether a point lies inside (edges included).
    pub fn contains(&self, p: Position) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Clamp a point inside. The flag is `true` when the point had to move.
    pub fn clamp(&self, p: Position) -> (Position, bool) {
        let clamped = Position::new(
            p.x.clamp(self.min_x, self.max_x),
            p.y.clamp(self.min_y, self.max_y),
        );
        (clamped, !self.contains(p))
    }
}

/// The whole viewport.
pub const VIEWPORT: Bounds = Bounds::new(0.0, 100.0, 0.0, 100.0);

/// Where entities of a habitat may stand.
pub const fn movement_bounds(habitat: Habitat) -> Bounds {
    match habitat {
        Habitat::Aquarium => Bounds::new(2.0, 98.0, 2.0, 98.0),
        Habitat::Zoo => Bounds::new(5.0, 95.0, 40.0, 90.0),
        Habitat::Farm => Bounds::new(5.0, 95.0, 45.0, 95.0),
        Habitat::Garden | Habitat::Restaurant => VIEWPORT,
    }
}

/// Per-zone population caps, one value per habitat.
///
/// The restaurant is capped by its table count and is not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ZoneCaps {
    /// Water creatures per aquarium zone.
    #[serde(default = "default_aquarium_cap")]
    pub aquarium: usize,
    /// Animals per zoo zone.
    #[serde(default = "default_zoo_cap")]
    pub zoo: usize,
    /// Animals per farm zone.
    #[serde(default = "default_farm_cap")]
    pub farm: usize,
    /// Plants per garden zone.
    #[serde(default = "default_garden_cap")]
    pub garden: usize,
}

impl ZoneCaps {
    /// The cap for one zone.
    pub const fn cap_for(&self, zone: Zone) -> usize {
        match zone.habitat() {
            Habitat::Aquarium => self.aquarium,
            Habitat::Zoo => self.zoo,
            Habitat::Farm => self.farm,
            Habitat::Garden => self.garden,
            Habitat::Restaurant => TABLES.len(),
        }
    }
}

impl Default for ZoneCaps {
    fn default() -> Self {
        Self {
            aquarium: default_aquarium_cap(),
            zoo: default_zoo_cap(),
            farm: default_farm_cap(),
            garden: default_garden_cap(),
        }
    }
}

const fn default_aquarium_cap() -> usize {
    25
}

const fn default_zoo_cap() -> usize {
    20
}

const fn default_farm_cap() -> usize {
    30
}

const fn default_garden_cap() -> usize {
    24
}
