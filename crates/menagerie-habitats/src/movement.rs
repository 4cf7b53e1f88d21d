//! Shared movement helpers: leader points, target jitter, tilt and
//! duration conversion.
//!
//! Leaders are invisible points that creatures gather around. The
//! aquarium drives three of them with the player's movement pattern,
//! the zoo and farm drive two with a simple bouncing drift.

use core::f64::consts::TAU;

use rand::Rng;
use serde::Serialize;

use menagerie_types::{MovementPattern, Position};
use menagerie_world::Bounds;

/// Largest banking tilt in degrees, either direction.
pub const MAX_TILT_DEG: f64 = 25.0;

/// Exaggeration applied to the raw heading angle.
const TILT_GAIN: f64 = 1.2;

/// Leaders closer than this to their waypoint move on to the next one.
const WAYPOINT_REACHED: f64 = 2.0;

/// Leader step toward a waypoint at speed 1.0.
const WAYPOINT_STEP: f64 = 0.8;

/// Chance per tick that a drifting aquarium leader changes course.
const PERTURB_CHANCE: f64 = 0.05;

/// Full width of a course change.
const PERTURB_SPREAD: f64 = 0.3;

/// A moving point that creatures gather around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Leader {
    /// Current position.
    pub position: Position,
    /// Horizontal drift per tick at speed 1.0.
    pub vx: f64,
    /// Vertical drift per tick at speed 1.0.
    pub vy: f64,
}

impl Leader {
    /// Build a leader from `(x, y, vx, vy)`.
    pub const fn from_tuple((x, y, vx, vy): (f64, f64, f64, f64)) -> Self {
        Self {
            position: Position::new(x, y),
            vx,
            vy,
        }
    }

    /// Move by the current velocity and flip any component that leaves
    /// `reflect`.
    pub fn drift(&mut self, speed: f64, reflect: &Bounds) {
        self.position.x += self.vx * speed;
        self.position.y += self.vy * speed;
        if self.position.x < reflect.min_x || self.position.x > reflect.max_x {
            self.vx = -self.vx;
        }
        if self.position.y < reflect.min_y || self.position.y > reflect.max_y {
            self.vy = -self.vy;
        }
    }
}

/// The three aquarium leaders plus the state the patterns need.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolLeaders {
    leaders: Vec<Leader>,
    cursors: Vec<usize>,
    clock: f64,
}

impl Default for SchoolLeaders {
    fn default() -> Self {
        Self::new()
    }
}

impl SchoolLeaders {
    /// Leaders at their starting points.
    pub fn new() -> Self {
        let leaders = vec![
            Leader::from_tuple((25.0, 25.0, 0.4, 0.2)),
            Leader::from_tuple((75.0, 75.0, -0.3, -0.15)),
            Leader::from_tuple((50.0, 50.0, 0.2, -0.3)),
        ];
        let cursors = vec![0; leaders.len()];
        Self {
            leaders,
            cursors,
            clock: 0.0,
        }
    }

    /// Current leaders.
    pub fn leaders(&self) -> &[Leader] {
        &self.leaders
    }

    /// Number of leaders.
    pub const fn len(&self) -> usize {
        self.leaders.len()
    }

    /// Whether there are no leaders.
    pub const fn is_empty(&self) -> bool {
        self.leaders.is_empty()
    }

    /// Position of one leader.
    pub fn position(&self, index: usize) -> Option<Position> {
        self.leaders.get(index).map(|l| l.position)
    }

    /// Restart every waypoint walk from the first waypoint.
    pub fn reset_cursors(&mut self) {
        self.cursors.iter_mut().for_each(|c| *c = 0);
    }

    /// Advance the pattern clock and move every leader one tick.
    ///
    /// Leaders always end inside `clamp`.
    #[allow(clippy::too_many_arguments)]
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        pattern: MovementPattern,
        waypoints: &[Position],
        speed: f64,
        clock_step: f64,
        reflect: &Bounds,
        clamp: &Bounds,
        rng: &mut R,
    ) {
        self.clock += clock_step * speed;
        let clock = self.clock;
        let count = self.leaders.len();

        for (index, (leader, cursor)) in self
            .leaders
            .iter_mut()
            .zip(self.cursors.iter_mut())
            .enumerate()
        {
            let i = index_as_f64(index);
            match pattern {
                MovementPattern::Random => {
                    if rng.random_bool(PERTURB_CHANCE) {
                        leader.vx += (rng.random::<f64>() - 0.5) * PERTURB_SPREAD;
                        leader.vy += (rng.random::<f64>() - 0.5) * PERTURB_SPREAD;
                    }
                    leader.drift(speed, reflect);
                }
                MovementPattern::Circle => {
                    let phase = i * TAU / index_as_f64(count.max(1));
                    let angle = clock * speed + phase;
                    leader.position = Position::new(50.0 + 30.0 * angle.cos(), 50.0 + 20.0 * angle.sin());
                }
                MovementPattern::Zigzag => {
                    let phase = i * 20.0;
                    let mut x = (clock * 5.0 * speed + phase).rem_euclid(200.0);
                    if x > 100.0 {
                        x = 200.0 - x;
                    }
                    leader.position = Position::new(x, 50.0 + 35.0 * ((x + phase) * 0.1).sin());
                }
                MovementPattern::Custom => {
                    if waypoints.is_empty() {
                        leader.position = Position::new(
                            50.0 + 10.0 * (clock + i).cos(),
                            50.0 + 10.0 * (clock + i).sin(),
                        );
                    } else {
                        follow_waypoints(leader, cursor, waypoints, speed);
                    }
                }
            }
            leader.position = clamp.clamp(leader.position).0;
        }
    }
}

/// Step one leader along a looping waypoint path.
fn follow_waypoints(leader: &mut Leader, cursor: &mut usize, waypoints: &[Position], speed: f64) {
    let current = *cursor % waypoints.len().max(1);
    let Some(dest) = waypoints.get(current).copied() else {
        return;
    };
    let dist = leader.position.distance_to(dest);
    if dist < WAYPOINT_REACHED {
        *cursor = current.saturating_add(1) % waypoints.len();
    } else {
        leader.position.x += (dest.x - leader.position.x) / dist * WAYPOINT_STEP * speed;
        leader.position.y += (dest.y - leader.position.y) / dist * WAYPOINT_STEP * speed;
    }
}

/// Uniform offset in `[-spread / 2, spread / 2)`.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, spread: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * spread
}

/// Banking tilt for a move by `(dx, dy)`, in degrees.
pub fn tilt_deg(dx: f64, dy: f64) -> f64 {
    (dy.atan2(dx.abs()).to_degrees() * TILT_GAIN).clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
}

/// Convert a non-negative millisecond amount to whole milliseconds.
///
/// Negative and NaN inputs become 0; huge values saturate.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn ms_from_f64(ms: f64) -> u64 {
    if ms.is_nan() || ms <= 0.0 {
        0
    } else {
        // `as` saturates for out-of-range floats.
        ms.round() as u64
    }
}

/// Divide a base duration by an effective speed.
pub fn scaled_ms(base_ms: f64, speed: f64) -> u64 {
    if speed <= 0.0 {
        return ms_from_f64(base_ms);
    }
    ms_from_f64(base_ms / speed)
}

#[allow(clippy::cast_precision_loss)]
pub(crate) const fn index_as_f64(index: usize) -> f64 {
    index as f64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    const AQUARIUM: Bounds = Bounds::new(2.0, 98.0, 2.0, 98.0);
    const REFLECT: Bounds = Bounds::new(5.0, 95.0, 5.0, 95.0);

    #[test]
    fn tilt_is_clamped() {
        assert!((tilt_deg(0.0, 10.0) - MAX_TILT_DEG).abs() < f64::EPSILON);
        assert!((tilt_deg(0.0, -10.0) + MAX_TILT_DEG).abs() < f64::EPSILON);
        assert!(tilt_deg(10.0, 0.0).abs() < f64::EPSILON);
        // 45 degrees times the gain is past the limit.
        assert!((tilt_deg(-5.0, 5.0) - MAX_TILT_DEG).abs() < f64::EPSILON);
        let gentle = tilt_deg(10.0, 1.0);
        assert!(gentle > 0.0 && gentle < MAX_TILT_DEG);
    }

    #[test]
    fn ms_conversion_saturates() {
        assert_eq!(ms_from_f64(-3.0), 0);
        assert_eq!(ms_from_f64(f64::NAN), 0);
        assert_eq!(ms_from_f64(1499.6), 1500);
        assert_eq!(scaled_ms(3000.0, 2.0), 1500);
        assert_eq!(scaled_ms(3000.0, 0.0), 3000);
    }

    #[test]
    fn drifting_leader_bounces() {
        let mut leader = Leader::from_tuple((94.9, 50.0, 1.0, 0.0));
        leader.drift(1.0, &REFLECT);
        assert!(leader.vx < 0.0);
        leader.drift(1.0, &REFLECT);
        assert!(leader.position.x < 95.0);
    }

    #[test]
    fn every_pattern_keeps_leaders_inside() {
        let mut rng = SmallRng::seed_from_u64(7);
        let waypoints = [Position::new(10.0, 10.0), Position::new(90.0, 90.0)];
        for pattern in [
            MovementPattern::Random,
            MovementPattern::Circle,
            MovementPattern::Zigzag,
            MovementPattern::Custom,
        ] {
            let mut pack = SchoolLeaders::new();
            for _ in 0..2000 {
                pack.advance(pattern, &waypoints, 3.0, 0.01, &REFLECT, &AQUARIUM, &mut rng);
                for leader in pack.leaders() {
                    assert!(AQUARIUM.contains(leader.position), "{pattern:?} escaped");
                }
            }
        }
    }

    #[test]
    fn circle_leaders_are_phase_offset() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut pack = SchoolLeaders::new();
        pack.advance(MovementPattern::Circle, &[], 1.0, 0.01, &REFLECT, &AQUARIUM, &mut rng);
        let a = pack.position(0).unwrap();
        let b = pack.position(1).unwrap();
        assert!(a.distance_to(b) > 10.0);
        // Orbit radius 30 on x, 20 on y around the center.
        assert!((a.x - 50.0).abs() <= 30.0 + 1e-9);
        assert!((a.y - 50.0).abs() <= 20.0 + 1e-9);
    }

    #[test]
    fn custom_leaders_walk_to_the_waypoint() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut pack = SchoolLeaders::new();
        let target = Position::new(80.0, 20.0);
        for _ in 0..400 {
            pack.advance(MovementPattern::Custom, &[target], 1.0, 0.01, &REFLECT, &AQUARIUM, &mut rng);
        }
        for leader in pack.leaders() {
            assert!(leader.position.distance_to(target) < 3.0);
        }
    }

    #[test]
    fn jitter_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..500 {
            let j = jitter(&mut rng, 12.0);
            assert!((-6.0..6.0).contains(&j));
        }
    }
}
