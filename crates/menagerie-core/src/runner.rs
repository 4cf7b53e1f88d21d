//! The scheduler loop with operator controls.
//!
//! [`run_simulation`] owns the [`GameState`] for the whole session. It
//! interleaves two sources of work on one task:
//!
//! - **Commands** from the [`GameHandle`](crate::command::GameHandle)
//!   queue, applied in arrival order and always drained before the next
//!   tick.
//! - **Ticks** from a fixed-interval timer, skipped while paused.
//!
//! After each tick the [`TickCallback`] sees the summary and the state,
//! which is where broadcasts are published. The loop ends on operator
//! stop, on a configured bound, or when every command sender is gone.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::operator::{OperatorState, SimulationEndReason};
use crate::state::GameState;
use crate::tick::{self, TickError, TickSummary};

/// Errors that can stop the scheduler early.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of a scheduler run.
#[derive(Debug)]
pub struct SimulationResult {
    /// Why the run ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Ticks executed during this run.
    pub total_ticks: u64,
    /// Commands applied during this run.
    pub total_commands: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &GameState);
}

/// A callback that ignores every tick.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &GameState) {}
}

/// Run the scheduler until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails unrecoverably.
pub async fn run_simulation(
    state: &mut GameState,
    operator: &Arc<OperatorState>,
    commands: &mut mpsc::Receiver<Command>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let mut total_commands: u64 = 0;

    let period = Duration::from_millis(state.clock.tick_interval_ms());
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        max_ticks = operator.max_ticks(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = state.clock.tick_interval_ms(),
        zone = %state.zone(),
        "Scheduler starting"
    );

    let end_reason = loop {
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            break SimulationEndReason::OperatorStop;
        }
        if operator.time_limit_reached() {
            info!(
                max_seconds = operator.max_real_time_seconds(),
                elapsed = operator.elapsed_seconds(),
                "Real-time limit reached"
            );
            break SimulationEndReason::MaxRealTimeReached;
        }

        let paused = operator.is_paused();
        tokio::select! {
            biased;

            () = operator.woken() => {
                debug!("Scheduler woken");
            }

            command = commands.recv() => {
                let Some(command) = command else {
                    info!("Every command sender dropped");
                    break SimulationEndReason::ClientsGone;
                };
                command.apply(state);
                total_commands = total_commands.saturating_add(1);
            }

            _ = ticker.tick(), if !paused => {
                let summary = tick::run_tick(state)?;
                total_ticks = total_ticks.saturating_add(1);
                callback.on_tick(&summary, state);

                if operator.tick_limit_reached(summary.tick) {
                    info!(
                        tick = summary.tick,
                        max_ticks = operator.max_ticks(),
                        "Tick limit reached"
                    );
                    last_summary = Some(summary);
                    break SimulationEndReason::MaxTicksReached;
                }
                last_summary = Some(summary);
            }
        }
    };

    operator.set_end_reason(end_reason).await;
    Ok(SimulationResult {
        end_reason,
        final_summary: last_summary,
        total_ticks,
        total_commands,
    })
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        total_commands = result.total_commands,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            zone = %summary.zone,
            population = summary.population,
            coins = summary.coins,
            weather = ?summary.weather,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use menagerie_types::Zone;

    use super::*;
    use crate::command::GameHandle;
    use crate::config::{GameConfig, SimulationBoundsConfig};
    use crate::observer::Publisher;

    fn bounded(max_ticks: u64) -> Arc<OperatorState> {
        Arc::new(OperatorState::new(&SimulationBoundsConfig {
            max_ticks,
            max_real_time_seconds: 0,
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_by_max_ticks() {
        let mut state = GameState::new(&GameConfig::default()).unwrap();
        let (_handle, mut rx) = GameHandle::channel();
        let operator = bounded(5);

        let result = run_simulation(&mut state, &operator, &mut rx, &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(state.tick(), 5);
        assert_eq!(
            operator.end_reason().await,
            Some(SimulationEndReason::MaxTicksReached)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn operator_stop_before_any_tick() {
        let mut state = GameState::new(&GameConfig::default()).unwrap();
        let (_handle, mut rx) = GameHandle::channel();
        let operator = bounded(0);
        operator.request_stop();

        let result = run_simulation(&mut state, &operator, &mut rx, &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_every_handle_ends_the_run() {
        let mut state = GameState::new(&GameConfig::default()).unwrap();
        let (handle, mut rx) = GameHandle::channel();
        drop(handle);

        let result = run_simulation(&mut state, &bounded(0), &mut rx, &mut NoOpCallback)
            .await
            .unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::ClientsGone);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_commands_apply_before_the_next_tick() {
        let mut state = GameState::new(&GameConfig::default()).unwrap();
        let (handle, mut rx) = GameHandle::channel();
        let mut publisher = Publisher::new();
        let mut observer = publisher.subscribe();

        // Queue without awaiting the replies; the scheduler is not running yet.
        let client = handle.clone();
        let pending = tokio::spawn(async move { client.enter_zone(Zone::Jungle).await });
        tokio::task::yield_now().await;

        let result = run_simulation(&mut state, &bounded(1), &mut rx, &mut publisher)
            .await
            .unwrap();
        assert_eq!(result.total_ticks, 1);
        assert_eq!(pending.await.unwrap().unwrap(), Zone::CoralReef);

        let first = observer.recv().await.unwrap();
        assert_eq!(first.zone, Zone::Jungle);
        assert_eq!(first.entities.len(), 1);
        drop(handle);
    }
}
