//! Operator control state for the running scheduler.
//!
//! Pause, resume and stop are flipped from any task while the scheduler
//! loop reads them lock-free. All mutable control fields use
//! [`std::sync::atomic`] types so the handle can be shared in an
//! [`Arc`](std::sync::Arc) without locking on the tick path.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, Notify};

use crate::config::SimulationBoundsConfig;

/// Reason why the scheduler stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// An operator issued a stop.
    OperatorStop,
    /// Every command sender was dropped.
    ClientsGone,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether ticking is suspended.
    paused: AtomicBool,

    /// Wakes the scheduler on resume or stop.
    wake: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Wall-clock time when the scheduler started.
    started_at: DateTime<Utc>,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Maximum wall-clock seconds (0 = unlimited).
    max_real_time_seconds: u64,

    /// Reason the run ended, if it has.
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Create operator state from the configured bounds.
    pub fn new(bounds: &SimulationBoundsConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            wake: Notify::new(),
            stop_requested: AtomicBool::new(false),
            started_at: Utc::now(),
            max_ticks: bounds.max_ticks,
            max_real_time_seconds: bounds.max_real_time_seconds,
            end_reason: Mutex::new(None),
        }
    }

    /// Unbounded operator state.
    pub fn unbounded() -> Self {
        Self::new(&SimulationBoundsConfig::default())
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Whether ticking is suspended.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Suspend ticking. Commands are still applied while paused.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume ticking.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake.notify_one();
    }

    /// Resolves on the next resume or stop.
    pub async fn woken(&self) {
        self.wake.notified().await;
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Record the reason the run ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        *self.end_reason.lock().await = Some(reason);
    }

    /// The reason the run ended, if it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        *self.end_reason.lock().await
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Returns `true` if `max_real_time_seconds > 0` and that many
    /// seconds have passed since start.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0 && self.elapsed_seconds() >= self.max_real_time_seconds
    }

    /// Wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Elapsed seconds since start.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        // Negative if the wall clock stepped backwards.
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }

    /// Configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Configured max real-time seconds.
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_running() {
        let state = OperatorState::unbounded();
        assert!(!state.is_paused());
        assert!(!state.is_stop_requested());
    }

    #[test]
    fn pause_and_resume() {
        let state = OperatorState::unbounded();
        state.pause();
        assert!(state.is_paused());
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn tick_limit_zero_means_unlimited() {
        let state = OperatorState::unbounded();
        assert!(!state.tick_limit_reached(999_999));
        assert!(!state.time_limit_reached());
    }

    #[test]
    fn tick_limit_reached() {
        let bounds = SimulationBoundsConfig {
            max_ticks: 10,
            max_real_time_seconds: 0,
        };
        let state = OperatorState::new(&bounds);
        assert!(!state.tick_limit_reached(9));
        assert!(state.tick_limit_reached(10));
    }

    #[tokio::test]
    async fn end_reason_is_recorded() {
        let state = OperatorState::unbounded();
        assert_eq!(state.end_reason().await, None);
        state.set_end_reason(SimulationEndReason::OperatorStop).await;
        assert_eq!(
            state.end_reason().await,
            Some(SimulationEndReason::OperatorStop)
        );
    }
}
