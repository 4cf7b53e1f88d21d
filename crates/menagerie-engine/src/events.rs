//! The random-event timer.
//!
//! Runs on its own task, independent of habitat ticks. Every period it
//! rolls once; a hit asks the narrator for an event and queues it as a
//! [`Command::RandomEvent`]. The game clamps and credits the coins.

use std::sync::Arc;
use std::time::Duration;

use menagerie_core::config::EventsConfig;
use menagerie_core::{Command, GameHandle, HandleError};
use menagerie_narrator::Narrator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

/// Mixed into the world seed so event rolls do not mirror the game rng.
const EVENT_SEED_SALT: u64 = 0x5EED_E7E7;

/// Periodic random-event roller.
#[derive(Debug)]
pub struct EventTimer {
    period: Duration,
    chance: f64,
    rng: StdRng,
}

impl EventTimer {
    /// Build a timer from the `events` config section. A zero interval
    /// is treated as one second.
    pub fn new(config: &EventsConfig, seed: u64) -> Self {
        Self {
            period: Duration::from_secs(config.interval_secs.max(1)),
            chance: config.chance,
            rng: StdRng::seed_from_u64(seed ^ EVENT_SEED_SALT),
        }
    }

    fn roll(&mut self) -> bool {
        self.chance > 0.0 && self.rng.random::<f64>() < self.chance
    }

    /// Start rolling. The task ends once the game stops accepting
    /// commands.
    pub fn spawn(self, narrator: Arc<Narrator>, handle: GameHandle) -> JoinHandle<()> {
        info!(
            period_secs = self.period.as_secs(),
            chance = self.chance,
            "Random event timer started"
        );
        tokio::spawn(self.run(narrator, handle))
    }

    async fn run(mut self, narrator: Arc<Narrator>, handle: GameHandle) {
        let first = Instant::now()
            .checked_add(self.period)
            .unwrap_or_else(Instant::now);
        let mut ticker = tokio::time::interval_at(first, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.roll() {
                trace!("Random event roll missed");
                continue;
            }
            if request_event(&narrator, &handle).await.is_err() {
                debug!("Game closed, event timer stopping");
                break;
            }
        }
    }
}

/// Ask the narrator for an event and queue it. Used by the timer and by
/// the console's manual trigger.
///
/// # Errors
///
/// [`HandleError::Closed`] if the scheduler has stopped.
pub async fn request_event(narrator: &Narrator, handle: &GameHandle) -> Result<(), HandleError> {
    let event = narrator.random_event().await;
    info!(message = %event.message, coins = event.coins, "Random event requested");
    handle.send(Command::RandomEvent { event }).await
}
