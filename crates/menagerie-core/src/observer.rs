//! Fan-out of tick broadcasts to any number of observers.
//!
//! The scheduler publishes one [`TickBroadcast`] per tick. Observers
//! (a renderer, the console, tests) subscribe and read at their own pace.
//! A subscriber that falls more than [`BROADCAST_CAPACITY`] messages
//! behind receives [`broadcast::error::RecvError::Lagged`] and skips to
//! the newest message. The game never waits on a slow observer.

use menagerie_types::TickBroadcast;
use tokio::sync::broadcast;

use crate::runner::TickCallback;
use crate::state::GameState;
use crate::tick::TickSummary;

/// Capacity of the broadcast channel.
pub const BROADCAST_CAPACITY: usize = 256;

/// Sender side of the tick broadcast channel.
#[derive(Debug, Clone)]
pub struct Publisher {
    tx: broadcast::Sender<TickBroadcast>,
}

impl Publisher {
    /// A publisher with no subscribers yet.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    /// Register a new observer. It sees broadcasts published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<TickBroadcast> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscribers(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Send a broadcast. Returns how many observers received it; zero
    /// observers is not an error.
    pub fn publish(&self, message: TickBroadcast) -> usize {
        self.tx.send(message).unwrap_or(0)
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCallback for Publisher {
    fn on_tick(&mut self, summary: &TickSummary, state: &GameState) {
        let receivers = self.publish(state.broadcast(summary));
        tracing::trace!(tick = summary.tick, receivers, "Tick broadcast sent");
    }
}
