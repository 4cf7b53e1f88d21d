//! Weather cycling and its effect on tick rates.
//!
//! Weather is a player toggle, not a random process: each press moves
//! to the next entry of the habitat's cycle. Only the zoo reaches snow
//! and the restaurant is indoors.
//!
//! | Habitat    | Cycle                          |
//! |------------|--------------------------------|
//! | Zoo        | clear, rain, storm, snow       |
//! | Restaurant | clear                          |
//! | others     | clear, rain, storm             |

use menagerie_types::{Habitat, Weather};

/// The ordered weather cycle of a habitat.
pub const fn weather_cycle(habitat: Habitat) -> &'static [Weather] {
    match habitat {
        Habitat::Zoo => &[Weather::Clear, Weather::Rain, Weather::Storm, Weather::Snow],
        Habitat::Restaurant => &[Weather::Clear],
        Habitat::Aquarium | Habitat::Farm | Habitat::Garden => {
            &[Weather::Clear, Weather::Rain, Weather::Storm]
        }
    }
}

/// The weather after one toggle. Weather outside the habitat's cycle
/// resets to clear.
pub fn next_weather(habitat: Habitat, current: Weather) -> Weather {
    let cycle = weather_cycle(habitat);
    cycle
        .iter()
        .position(|w| *w == current)
        .and_then(|i| i.checked_add(1))
        .and_then(|i| cycle.get(i).or_else(|| cycle.first()))
        .copied()
        .unwrap_or(Weather::Clear)
}

/// Movement speed factor applied on top of the global speed.
///
/// Snow slows zoo animals and storms slow farm animals.
pub const fn movement_multiplier(habitat: Habitat, weather: Weather) -> f64 {
    match (habitat, weather) {
        (Habitat::Zoo, Weather::Snow) => 0.6,
        (Habitat::Farm, Weather::Storm) => 0.5,
        _ => 1.0,
    }
}

/// Plant growth factor: rain speeds growth, storms slow it.
pub const fn growth_multiplier(weather: Weather) -> f64 {
    match weather {
        Weather::Rain => 1.5,
        Weather::Storm => 0.8,
        Weather::Clear | Weather::Snow => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoo_cycles_through_snow() {
        let mut w = Weather::Clear;
        let mut seen = Vec::new();
        for _ in 0..5 {
            w = next_weather(Habitat::Zoo, w);
            seen.push(w);
        }
        assert_eq!(
            seen,
            vec![
                Weather::Rain,
                Weather::Storm,
                Weather::Snow,
                Weather::Clear,
                Weather::Rain
            ]
        );
    }

    #[test]
    fn garden_skips_snow() {
        assert_eq!(next_weather(Habitat::Garden, Weather::Storm), Weather::Clear);
        assert_eq!(next_weather(Habitat::Garden, Weather::Snow), Weather::Clear);
    }

    #[test]
    fn restaurant_stays_clear() {
        assert_eq!(next_weather(Habitat::Restaurant, Weather::Clear), Weather::Clear);
    }

    #[test]
    fn multipliers_match_weather() {
        assert!((movement_multiplier(Habitat::Zoo, Weather::Snow) - 0.6).abs() < f64::EPSILON);
        assert!((movement_multiplier(Habitat::Farm, Weather::Storm) - 0.5).abs() < f64::EPSILON);
        assert!((movement_multiplier(Habitat::Zoo, Weather::Storm) - 1.0).abs() < f64::EPSILON);
        assert!((growth_multiplier(Weather::Rain) - 1.5).abs() < f64::EPSILON);
        assert!((growth_multiplier(Weather::Storm) - 0.8).abs() < f64::EPSILON);
    }
}
