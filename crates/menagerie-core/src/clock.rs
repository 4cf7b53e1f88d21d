//! Game clock for the Menagerie simulator.
//!
//! The tick counter is the only stored time. Game time in milliseconds
//! is derived from it and the configured tick interval, so every timer
//! in the habitats (move eligibility, school expiry, payouts) runs on
//! the same clock and freezes while the game is paused.

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid clock configuration.
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Tick counter plus the fixed tick period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    /// Ticks completed so far.
    tick: u64,

    /// Game milliseconds per tick.
    tick_interval_ms: u64,
}

impl GameClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `tick_interval_ms` is 0.
    pub fn new(tick_interval_ms: u64) -> Result<Self, ClockError> {
        Self::from_parts(0, tick_interval_ms)
    }

    /// Create a clock at an arbitrary tick (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `tick_interval_ms` is 0.
    pub fn from_parts(tick: u64, tick_interval_ms: u64) -> Result<Self, ClockError> {
        if tick_interval_ms == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "tick_interval_ms must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            tick,
            tick_interval_ms,
        })
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] past `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Ticks completed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Game milliseconds per tick.
    pub const fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Game time in milliseconds. Saturates instead of overflowing.
    pub const fn now_ms(&self) -> u64 {
        self.tick.saturating_mul(self.tick_interval_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero() {
        let clock = GameClock::new(200).unwrap();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn game_time_follows_ticks() {
        let mut clock = GameClock::new(200).unwrap();
        for _ in 0..15 {
            clock.advance().unwrap();
        }
        assert_eq!(clock.tick(), 15);
        assert_eq!(clock.now_ms(), 3000);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(matches!(
            GameClock::new(0),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = GameClock::from_parts(u64::MAX, 200).unwrap();
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), u64::MAX);
        assert_eq!(clock.now_ms(), u64::MAX);
    }
}
