//! Configuration loading and typed config structures for the Menagerie
//! simulator.
//!
//! The configuration lives in `menagerie.yaml`. Every section and every
//! field has a default, so an empty file, a partial file and a missing
//! file all load. Two environment variables take precedence over the
//! file:
//!
//! - `MENAGERIE_CONFIG` -- path of the YAML file to load
//! - `MENAGERIE_SEED` -- overrides `world.seed`

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use menagerie_habitats::SimConfig;
use menagerie_types::Zone;
use menagerie_world::{STARTING_COINS, ZoneCaps};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "menagerie.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but makes no sense.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration. Mirrors `menagerie.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Session settings (seed, timing, starting state).
    #[serde(default)]
    pub world: WorldConfig,

    /// Per-zone population caps.
    #[serde(default)]
    pub population: ZoneCaps,

    /// Random-event timer.
    #[serde(default)]
    pub events: EventsConfig,

    /// Text-service settings that are not secrets.
    #[serde(default)]
    pub narrator: NarratorConfig,

    /// Run bounds.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Overrides for habitat tunables.
    #[serde(default)]
    pub habitats: SimConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML and
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML and
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse without looking at the environment.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml rejects a document with no content.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config path (`MENAGERIE_CONFIG`, else
    /// [`DEFAULT_CONFIG_FILE`]) and load it. A missing file yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Any error other than the file not existing.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("MENAGERIE_CONFIG")
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        if path.exists() {
            info!(path = %path.display(), "Loading config");
            Self::from_file(&path)
        } else {
            info!(path = %path.display(), "Config file not found, using defaults");
            let mut config = Self::default();
            config.apply_env_overrides()?;
            Ok(config)
        }
    }

    /// Apply `MENAGERIE_SEED` if it is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the variable is not a `u64`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(raw) = std::env::var("MENAGERIE_SEED") {
            self.world.seed = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                field: "MENAGERIE_SEED",
                reason: format!("{raw:?}: {e}"),
            })?;
            warn!(seed = self.world.seed, "Seed overridden from environment");
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.world.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "world.tick_interval_ms",
                reason: "must be at least 1".to_owned(),
            });
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.world.speed) {
            return Err(ConfigError::Invalid {
                field: "world.speed",
                reason: format!("{} is outside {MIN_SPEED}..={MAX_SPEED}", self.world.speed),
            });
        }
        if self.events.min_coins > self.events.max_coins {
            return Err(ConfigError::Invalid {
                field: "events.min_coins",
                reason: "must not exceed events.max_coins".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&self.events.chance) {
            return Err(ConfigError::Invalid {
                field: "events.chance",
                reason: format!("{} is not a probability", self.events.chance),
            });
        }
        Ok(())
    }
}

/// Slowest accepted global speed.
pub const MIN_SPEED: f64 = 0.5;

/// Fastest accepted global speed.
pub const MAX_SPEED: f64 = 3.0;

/// Session-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable session name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Milliseconds per tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Coins in the wallet at start.
    #[serde(default = "default_starting_coins")]
    pub starting_coins: u64,

    /// Zone shown at start.
    #[serde(default = "default_starting_zone")]
    pub starting_zone: Zone,

    /// Initial global speed multiplier.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            starting_coins: default_starting_coins(),
            starting_zone: default_starting_zone(),
            speed: default_speed(),
        }
    }
}

/// Random-event timer configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventsConfig {
    /// Real seconds between two rolls.
    #[serde(default = "default_event_interval_secs")]
    pub interval_secs: u64,

    /// Chance that a roll requests an event.
    #[serde(default = "default_event_chance")]
    pub chance: f64,

    /// Smallest coin grant.
    #[serde(default = "default_event_min_coins")]
    pub min_coins: u64,

    /// Largest coin grant.
    #[serde(default = "default_event_max_coins")]
    pub max_coins: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_event_interval_secs(),
            chance: default_event_chance(),
            min_coins: default_event_min_coins(),
            max_coins: default_event_max_coins(),
        }
    }
}

/// Text-service settings. Credentials come from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NarratorConfig {
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Run bounds. A value of 0 means unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks.
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop after this many wall-clock seconds.
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether JSON output was requested.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Menagerie".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    200
}

const fn default_starting_coins() -> u64 {
    STARTING_COINS
}

const fn default_starting_zone() -> Zone {
    Zone::CoralReef
}

const fn default_speed() -> f64 {
    1.0
}

const fn default_event_interval_secs() -> u64 {
    60
}

const fn default_event_chance() -> f64 {
    0.10
}

const fn default_event_min_coins() -> u64 {
    10
}

const fn default_event_max_coins() -> u64 {
    100
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_format() -> String {
    "text".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.tick_interval_ms, 200);
        assert_eq!(config.world.starting_coins, 200);
        assert_eq!(config.world.starting_zone, Zone::CoralReef);
        assert_eq!(config.population, ZoneCaps::default());
        assert_eq!(config.events.interval_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test Park"
  seed: 123
  tick_interval_ms: 100
  starting_coins: 1000
  starting_zone: jungle
  speed: 2.0

population:
  aquarium: 10
  zoo: 5

events:
  interval_secs: 30
  chance: 0.5
  min_coins: 20
  max_coins: 50

narrator:
  request_timeout_ms: 2500

simulation:
  max_ticks: 500
  max_real_time_seconds: 60

logging:
  level: "debug"
  format: "json"

habitats:
  restaurant:
    spawn_chance: 0.2
"#;

        let config = GameConfig::parse_without_env(yaml).unwrap();
        assert_eq!(config.world.name, "Test Park");
        assert_eq!(config.world.seed, 123);
        assert_eq!(config.world.starting_zone, Zone::Jungle);
        assert_eq!(config.population.aquarium, 10);
        assert_eq!(config.population.zoo, 5);
        assert_eq!(config.population.farm, 30);
        assert_eq!(config.events.max_coins, 50);
        assert_eq!(config.narrator.request_timeout_ms, 2500);
        assert_eq!(config.simulation.max_ticks, 500);
        assert!(config.logging.is_json());
        assert!((config.habitats.restaurant.spawn_chance - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = GameConfig::parse_without_env("world:\n  seed: 7\n").unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.tick_interval_ms, 200);
        assert_eq!(config.events.min_coins, 10);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(
            GameConfig::parse_without_env("").unwrap(),
            GameConfig::default()
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = GameConfig::parse_without_env("world:\n  speed: 5.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "world.speed", .. }));

        let err = GameConfig::parse_without_env("world:\n  tick_interval_ms: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err =
            GameConfig::parse_without_env("events:\n  min_coins: 90\n  max_coins: 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn bad_yaml_is_a_parse_error() {
        let err = GameConfig::parse_without_env("world: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            let config = GameConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
