//! Tick callback that publishes broadcasts and logs what changed.
//!
//! Quiet ticks are logged at `trace`, with a `debug` heartbeat every
//! [`HEARTBEAT_TICKS`] ticks. Ticks that spawn, remove, earn or notify are
//! logged at `info`.

use menagerie_core::observer::Publisher;
use menagerie_core::{GameState, TickCallback, TickSummary};
use tracing::{debug, info, trace};

/// One heartbeat line per minute of game time at the default period.
pub const HEARTBEAT_TICKS: u64 = 300;

/// Publishes each tick to observers and writes the tick log.
#[derive(Debug)]
pub struct TickLog {
    publisher: Publisher,
}

impl TickLog {
    /// Wrap a publisher.
    pub const fn new(publisher: Publisher) -> Self {
        Self { publisher }
    }
}

impl TickCallback for TickLog {
    fn on_tick(&mut self, summary: &TickSummary, state: &GameState) {
        let receivers = self.publisher.publish(state.broadcast(summary));

        if let Some(ref notice) = summary.notification {
            info!(
                tick = summary.tick,
                kind = ?notice.kind,
                message = %notice.message,
                "Notification"
            );
        }

        let eventful =
            !summary.spawned.is_empty() || !summary.removed.is_empty() || summary.earned > 0;
        if eventful {
            info!(
                tick = summary.tick,
                zone = %summary.zone,
                population = summary.population,
                spawned = summary.spawned.len(),
                removed = summary.removed.len(),
                earned = summary.earned,
                coins = summary.coins,
                "Zone changed"
            );
        } else if summary.tick.checked_rem(HEARTBEAT_TICKS) == Some(0) {
            debug!(
                tick = summary.tick,
                zone = %summary.zone,
                weather = ?summary.weather,
                population = summary.population,
                coins = summary.coins,
                receivers,
                "Heartbeat"
            );
        } else {
            trace!(tick = summary.tick, receivers, "Quiet tick");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use menagerie_core::{GameConfig, run_tick};

    use super::*;

    #[test]
    fn every_tick_reaches_subscribers() {
        let publisher = Publisher::new();
        let mut rx = publisher.subscribe();
        let mut log = TickLog::new(publisher);

        let mut state = GameState::new(&GameConfig::default()).unwrap();
        for _ in 0..3 {
            let summary = run_tick(&mut state).unwrap();
            log.on_tick(&summary, &state);
        }

        let ticks: Vec<u64> = (0..3).map(|_| rx.try_recv().unwrap().tick).collect();
        assert_eq!(ticks, vec![1, 2, 3]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn broadcast_carries_the_active_zone() {
        let publisher = Publisher::new();
        let mut rx = publisher.subscribe();
        let mut log = TickLog::new(publisher);

        let config = GameConfig::default();
        let mut state = GameState::new(&config).unwrap();
        let summary = run_tick(&mut state).unwrap();
        log.on_tick(&summary, &state);

        let broadcast = rx.try_recv().unwrap();
        assert_eq!(broadcast.zone, config.world.starting_zone);
        assert_eq!(broadcast.coins, state.coins());
    }
}
