//! One simulation tick over the active zone.
//!
//! A tick runs these steps in order:
//!
//! 1. **Clock** -- advance the tick counter and derive game time.
//! 2. **Habitat** -- dispatch to the active context's tick function with
//!    the current speed, weather and caps.
//! 3. **Settle** -- credit earnings to the wallet.
//! 4. **Feedback** -- pick the broadcast notification (tick notification
//!    first, then the oldest queued notice) and re-resolve the selection.
//!
//! Only the active zone advances. Entities elsewhere keep their state
//! until the player returns.

use menagerie_habitats::TickEnv;
use menagerie_types::{EntityId, Notification, VisualEffect, Weather, Zone};
use tracing::{debug, trace};

use crate::clock::ClockError;
use crate::state::GameState;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Crediting an earning failed.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: menagerie_ledger::LedgerError,
    },
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Zone that advanced.
    pub zone: Zone,
    /// Weather during this tick.
    pub weather: Weather,
    /// Entities in the zone at the end of the tick.
    pub population: usize,
    /// Entities born or arrived.
    pub spawned: Vec<EntityId>,
    /// Entities eaten, harvested or departed.
    pub removed: Vec<EntityId>,
    /// Coins credited this tick.
    pub earned: u64,
    /// Wallet balance after the tick.
    pub coins: u64,
    /// The notification to broadcast, if any.
    pub notification: Option<Notification>,
    /// Animation cues.
    pub effects: Vec<VisualEffect>,
    /// Whether the selection was dropped because its entity vanished.
    pub selection_cleared: bool,
}

/// Execute one tick of the active zone.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter overflows and
/// [`TickError::Ledger`] if an earning cannot be credited. The clock has
/// already advanced when a ledger error surfaces.
pub fn run_tick(state: &mut GameState) -> Result<TickSummary, TickError> {
    let tick = state.clock.advance()?;
    let zone = state.context.zone();
    let env = TickEnv {
        now_ms: state.clock.now_ms(),
        speed: state.speed,
        weather: state.weather,
        caps: state.caps,
    };
    trace!(tick, zone = %zone, now_ms = env.now_ms, "Tick started");

    let outcome = state
        .context
        .tick(&mut state.store, &env, &state.sim, &mut state.rng);

    let mut earned: u64 = 0;
    for earning in &outcome.earnings {
        state
            .wallet
            .credit(tick, earning.flow, earning.amount, earning.memo.as_str())?;
        earned = earned.saturating_add(earning.amount);
    }

    let notification = match outcome.notification {
        Some(notice) => Some(notice),
        None => state.take_notice(),
    };
    let selection_cleared = state.selection.reresolve(&state.store, zone);

    let summary = TickSummary {
        tick,
        zone,
        weather: state.weather,
        population: state.store.population(zone),
        spawned: outcome.spawned,
        removed: outcome.removed,
        earned,
        coins: state.wallet.balance(),
        notification,
        effects: outcome.effects,
        selection_cleared,
    };

    if !summary.spawned.is_empty() || !summary.removed.is_empty() || earned > 0 {
        debug!(
            tick,
            zone = %zone,
            population = summary.population,
            spawned = summary.spawned.len(),
            removed = summary.removed.len(),
            earned,
            "Tick completed"
        );
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use menagerie_ledger::AuditResult;
    use menagerie_types::{CoinFlow, NotificationKind, OrderStatus};

    use super::*;
    use crate::config::GameConfig;

    fn state() -> GameState {
        GameState::new(&GameConfig::default()).unwrap()
    }

    #[test]
    fn tick_advances_clock_and_game_time() {
        let mut state = state();
        let summary = run_tick(&mut state).unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.zone, Zone::CoralReef);
        assert_eq!(state.now_ms(), 200);
        run_tick(&mut state).unwrap();
        assert_eq!(state.tick(), 2);
        assert_eq!(state.now_ms(), 400);
    }

    #[test]
    fn inactive_zones_are_frozen() {
        let mut state = state();
        let rex = state.store().ids_in_zone(Zone::Jungle)[0];
        let before = state.store().get(rex).unwrap().clone();
        for _ in 0..50 {
            run_tick(&mut state).unwrap();
        }
        assert_eq!(state.store().get(rex).unwrap(), &before);
    }

    #[test]
    fn queued_notice_fills_a_quiet_tick() {
        let mut state = state();
        state.enter_zone(Zone::Orchard);
        state.push_notice(Notification::new(NotificationKind::Info, "hello"));
        let summary = run_tick(&mut state).unwrap();
        assert_eq!(summary.notification.unwrap().message, "hello");
        let summary = run_tick(&mut state).unwrap();
        assert!(summary.notification.is_none_or(|n| n.message != "hello"));
    }

    #[test]
    fn restaurant_payout_is_credited_to_the_wallet() {
        let mut state = state();
        state.enter_zone(Zone::Dining);

        let mut earned = 0;
        for _ in 0..3_000 {
            let orders: Vec<_> = state
                .context()
                .orders()
                .iter()
                .map(|o| (o.id, o.status()))
                .collect();
            for (id, status) in orders {
                match status {
                    OrderStatus::Pending => state.start_cooking(id).unwrap(),
                    OrderStatus::Ready => {
                        state.serve(id).unwrap();
                    }
                    OrderStatus::Cooking => {}
                }
            }
            earned += run_tick(&mut state).unwrap().earned;
            if earned > 0 {
                break;
            }
        }

        assert!(earned > 0);
        assert_eq!(state.coins(), 200 + earned);
        assert!(state
            .wallet()
            .entries()
            .iter()
            .all(|e| e.flow == CoinFlow::RestaurantPayout));
        assert_eq!(state.wallet().audit(), AuditResult::Balanced);
    }
}
