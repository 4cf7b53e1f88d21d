//! Player commands and text-service completions, queued for the scheduler.
//!
//! Everything that mutates the game from outside the tick loop arrives
//! as a [`Command`] on one mpsc channel. The scheduler applies commands
//! between ticks, never during one. [`GameHandle`] is the cloneable
//! client side.

use menagerie_habitats::{ActionError, Feeding, Harvest, Sale, ServeOutcome};
use menagerie_types::{
    EntityId, MovementPattern, Notification, NotificationKind, OrderId, RandomEvent,
    TickBroadcast, Weather, Zone,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::requests::RequestTicket;
use crate::state::{BuyReceipt, GameState};

/// Capacity of the command queue.
pub const COMMAND_CAPACITY: usize = 64;

/// Reply channel for an action that may be refused.
pub type Reply<T> = oneshot::Sender<Result<T, ActionError>>;

/// One queued mutation.
#[derive(Debug)]
pub enum Command {
    /// Switch the active zone. Replies with the previous zone.
    EnterZone {
        /// Target zone.
        zone: Zone,
        /// Reply channel.
        reply: oneshot::Sender<Zone>,
    },
    /// Change the global speed multiplier.
    SetSpeed {
        /// New multiplier.
        speed: f64,
        /// Reply channel.
        reply: Reply<()>,
    },
    /// Toggle to the next weather. Replies with the new weather.
    CycleWeather {
        /// Reply channel.
        reply: oneshot::Sender<Weather>,
    },
    /// Set the aquarium movement pattern.
    SetPattern {
        /// New pattern.
        pattern: MovementPattern,
        /// Reply channel.
        reply: Reply<()>,
    },
    /// Append a custom-path waypoint.
    AddWaypoint {
        /// Horizontal coordinate.
        x: f64,
        /// Vertical coordinate.
        y: f64,
        /// Reply channel.
        reply: Reply<()>,
    },
    /// Erase the custom path.
    ClearWaypoints {
        /// Reply channel.
        reply: Reply<()>,
    },
    /// Select an entity, or clear the selection with `None`.
    Select {
        /// Entity to select.
        id: Option<EntityId>,
        /// Reply channel.
        reply: Reply<()>,
    },
    /// Buy an entity into the active zone.
    Buy {
        /// Species key.
        species: String,
        /// Reply channel.
        reply: Reply<BuyReceipt>,
    },
    /// Sell an entity.
    Sell {
        /// Entity to sell.
        id: EntityId,
        /// Reply channel.
        reply: Reply<Sale>,
    },
    /// Feed the active zone.
    Feed {
        /// Consumable key.
        item: String,
        /// Reply channel.
        reply: Reply<Feeding>,
    },
    /// Pet an animal. Replies with the coins earned.
    Pet {
        /// Entity to pet.
        id: EntityId,
        /// Reply channel.
        reply: Reply<u64>,
    },
    /// Harvest produce or a plant.
    Harvest {
        /// Entity to harvest.
        id: EntityId,
        /// Reply channel.
        reply: Reply<Harvest>,
    },
    /// Start cooking an order.
    StartCooking {
        /// Order to cook.
        order: OrderId,
        /// Reply channel.
        reply: Reply<()>,
    },
    /// Serve a ready order.
    Serve {
        /// Order to serve.
        order: OrderId,
        /// Reply channel.
        reply: Reply<ServeOutcome>,
    },
    /// Ask for a fact about the selected entity.
    AskFact {
        /// Reply channel.
        reply: Reply<RequestTicket>,
    },
    /// A name suggestion came back.
    NameArrived {
        /// The ticket issued with the purchase.
        ticket: RequestTicket,
        /// Suggested name.
        name: String,
    },
    /// A fact came back.
    FactArrived {
        /// The ticket issued with the request.
        ticket: RequestTicket,
        /// Fact text.
        text: String,
    },
    /// A random event came back.
    RandomEvent {
        /// The event.
        event: RandomEvent,
    },
    /// Read the current state.
    Snapshot {
        /// Reply channel.
        reply: oneshot::Sender<TickBroadcast>,
    },
}

impl Command {
    /// Apply this command to the game. Refused actions are logged and
    /// surface as a warning notification before the error is returned
    /// through the reply channel.
    pub fn apply(self, state: &mut GameState) {
        match self {
            Self::EnterZone { zone, reply } => {
                let _ = reply.send(state.enter_zone(zone));
            }
            Self::SetSpeed { speed, reply } => answer(state, "set speed", reply, |s| s.set_speed(speed)),
            Self::CycleWeather { reply } => {
                let _ = reply.send(state.cycle_weather());
            }
            Self::SetPattern { pattern, reply } => {
                answer(state, "set pattern", reply, |s| s.set_pattern(pattern));
            }
            Self::AddWaypoint { x, y, reply } => {
                answer(state, "add waypoint", reply, |s| s.add_waypoint(x, y));
            }
            Self::ClearWaypoints { reply } => {
                answer(state, "clear waypoints", reply, GameState::clear_waypoints);
            }
            Self::Select { id, reply } => answer(state, "select", reply, |s| match id {
                Some(id) => s.select(id),
                None => {
                    s.deselect();
                    Ok(())
                }
            }),
            Self::Buy { species, reply } => answer(state, "buy", reply, |s| s.buy(&species)),
            Self::Sell { id, reply } => answer(state, "sell", reply, |s| s.sell(id)),
            Self::Feed { item, reply } => answer(state, "feed", reply, |s| s.feed(&item)),
            Self::Pet { id, reply } => answer(state, "pet", reply, |s| s.pet(id)),
            Self::Harvest { id, reply } => answer(state, "harvest", reply, |s| s.harvest(id)),
            Self::StartCooking { order, reply } => {
                answer(state, "cook", reply, |s| s.start_cooking(order));
            }
            Self::Serve { order, reply } => answer(state, "serve", reply, |s| s.serve(order)),
            Self::AskFact { reply } => answer(state, "ask fact", reply, GameState::request_fact),
            Self::NameArrived { ticket, name } => {
                let _ = state.apply_name(&ticket, &name);
            }
            Self::FactArrived { ticket, text } => {
                let _ = state.apply_fact(&ticket, &text);
            }
            Self::RandomEvent { event } => {
                if let Err(error) = state.apply_random_event(&event) {
                    warn!(%error, "Random event dropped");
                }
            }
            Self::Snapshot { reply } => {
                let _ = reply.send(state.snapshot());
            }
        }
    }
}

fn answer<T>(
    state: &mut GameState,
    action: &'static str,
    reply: Reply<T>,
    run: impl FnOnce(&mut GameState) -> Result<T, ActionError>,
) {
    let result = run(state);
    if let Err(ref error) = result {
        warn!(action, %error, "Action rejected");
        state.push_notice(Notification::new(NotificationKind::Warning, error.to_string()));
    }
    if reply.send(result).is_err() {
        debug!(action, "Reply receiver dropped");
    }
}

/// Why a [`GameHandle`] call did not produce a value.
#[derive(Debug, thiserror::Error)]
pub enum HandleError {
    /// The scheduler is gone.
    #[error("game is no longer running")]
    Closed,
    /// The game refused the action.
    #[error(transparent)]
    Rejected(#[from] ActionError),
}

/// Cloneable client for a running game.
#[derive(Debug, Clone)]
pub struct GameHandle {
    tx: mpsc::Sender<Command>,
}

impl GameHandle {
    /// Create a handle and the receiver the scheduler drains.
    pub fn channel() -> (Self, mpsc::Receiver<Command>) {
        let (tx, rx) = mpsc::channel(COMMAND_CAPACITY);
        (Self { tx }, rx)
    }

    /// Queue a command without waiting for its effect.
    ///
    /// # Errors
    ///
    /// [`HandleError::Closed`] if the scheduler has stopped.
    pub async fn send(&self, command: Command) -> Result<(), HandleError> {
        self.tx.send(command).await.map_err(|_send_err| HandleError::Closed)
    }

    async fn call<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, HandleError> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await?;
        let result = rx.await.map_err(|_recv_err| HandleError::Closed)?;
        result.map_err(HandleError::Rejected)
    }

    async fn query<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, HandleError> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply)).await?;
        rx.await.map_err(|_recv_err| HandleError::Closed)
    }

    /// Switch zone. Returns the previous zone.
    ///
    /// # Errors
    ///
    /// [`HandleError::Closed`] if the scheduler has stopped.
    pub async fn enter_zone(&self, zone: Zone) -> Result<Zone, HandleError> {
        self.query(|reply| Command::EnterZone { zone, reply }).await
    }

    /// Change the speed multiplier.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or the value was refused.
    pub async fn set_speed(&self, speed: f64) -> Result<(), HandleError> {
        self.call(|reply| Command::SetSpeed { speed, reply }).await
    }

    /// Toggle the weather. Returns the new weather.
    ///
    /// # Errors
    ///
    /// [`HandleError::Closed`] if the scheduler has stopped.
    pub async fn cycle_weather(&self) -> Result<Weather, HandleError> {
        self.query(|reply| Command::CycleWeather { reply }).await
    }

    /// Set the aquarium movement pattern.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or the action was refused.
    pub async fn set_pattern(&self, pattern: MovementPattern) -> Result<(), HandleError> {
        self.call(|reply| Command::SetPattern { pattern, reply }).await
    }

    /// Append a waypoint to the custom path.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or the action was refused.
    pub async fn add_waypoint(&self, x: f64, y: f64) -> Result<(), HandleError> {
        self.call(|reply| Command::AddWaypoint { x, y, reply }).await
    }

    /// Erase the custom path.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or the action was refused.
    pub async fn clear_waypoints(&self) -> Result<(), HandleError> {
        self.call(|reply| Command::ClearWaypoints { reply }).await
    }

    /// Select an entity, or clear the selection.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or the entity is not here.
    pub async fn select(&self, id: Option<EntityId>) -> Result<(), HandleError> {
        self.call(|reply| Command::Select { id, reply }).await
    }

    /// Buy an entity.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or the purchase was refused.
    pub async fn buy(&self, species: impl Into<String>) -> Result<BuyReceipt, HandleError> {
        let species = species.into();
        self.call(|reply| Command::Buy { species, reply }).await
    }

    /// Sell an entity.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or the sale was refused.
    pub async fn sell(&self, id: EntityId) -> Result<Sale, HandleError> {
        self.call(|reply| Command::Sell { id, reply }).await
    }

    /// Feed the active zone.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or feeding was refused.
    pub async fn feed(&self, item: impl Into<String>) -> Result<Feeding, HandleError> {
        let item = item.into();
        self.call(|reply| Command::Feed { item, reply }).await
    }

    /// Pet an animal.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or petting was refused.
    pub async fn pet(&self, id: EntityId) -> Result<u64, HandleError> {
        self.call(|reply| Command::Pet { id, reply }).await
    }

    /// Harvest produce or a plant.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or the harvest was refused.
    pub async fn harvest(&self, id: EntityId) -> Result<Harvest, HandleError> {
        self.call(|reply| Command::Harvest { id, reply }).await
    }

    /// Start cooking an order.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or cooking was refused.
    pub async fn start_cooking(&self, order: OrderId) -> Result<(), HandleError> {
        self.call(|reply| Command::StartCooking { order, reply }).await
    }

    /// Serve a ready order.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or serving was refused.
    pub async fn serve(&self, order: OrderId) -> Result<ServeOutcome, HandleError> {
        self.call(|reply| Command::Serve { order, reply }).await
    }

    /// Ask for a fact about the selected entity.
    ///
    /// # Errors
    ///
    /// [`HandleError`] if the scheduler stopped or nothing is selected.
    pub async fn ask_fact(&self) -> Result<RequestTicket, HandleError> {
        self.call(|reply| Command::AskFact { reply }).await
    }

    /// Current state of the active zone.
    ///
    /// # Errors
    ///
    /// [`HandleError::Closed`] if the scheduler has stopped.
    pub async fn snapshot(&self) -> Result<TickBroadcast, HandleError> {
        self.query(|reply| Command::Snapshot { reply }).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn state() -> GameState {
        GameState::new(&GameConfig::default()).unwrap()
    }

    #[test]
    fn rejection_becomes_a_warning_notice() {
        let mut state = state();
        let (reply, mut rx) = oneshot::channel();
        Command::Buy {
            species: "dragon".to_owned(),
            reply,
        }
        .apply(&mut state);

        let result = rx.try_recv().unwrap();
        assert!(matches!(result, Err(ActionError::UnknownSpecies(_))));
        let notice = state.take_notice().unwrap();
        assert_eq!(notice.kind, NotificationKind::Warning);
        assert!(notice.message.contains("dragon"));
    }

    #[test]
    fn select_none_clears() {
        let mut state = state();
        let goldie = state.store().ids_in_zone(Zone::CoralReef)[0];
        state.select(goldie).unwrap();
        let (reply, mut rx) = oneshot::channel();
        Command::Select { id: None, reply }.apply(&mut state);
        assert!(rx.try_recv().unwrap().is_ok());
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn dropped_reply_does_not_block_the_action() {
        let mut state = state();
        let (reply, rx) = oneshot::channel();
        drop(rx);
        Command::Buy {
            species: "goldfish".to_owned(),
            reply,
        }
        .apply(&mut state);
        assert_eq!(state.coins(), 185);
    }

    #[tokio::test]
    async fn handle_reports_closed_game() {
        let (handle, rx) = GameHandle::channel();
        drop(rx);
        assert!(matches!(handle.snapshot().await, Err(HandleError::Closed)));
    }
}
