//! The game session: everything a tick or a player action touches.
//!
//! [`GameState`] owns the entity store, the wallet, the active habitat
//! context and the seeded RNG. It is only ever mutated from one task,
//! so ticks, player actions and text-service completions are applied
//! one at a time in arrival order.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use menagerie_habitats::{
    ActionError, ActionScope, Feeding, HabitatContext, Harvest, Purchase, Sale, ServeOutcome,
    SimConfig, actions,
};
use menagerie_ledger::Wallet;
use menagerie_types::{
    CoinFlow, EntityId, Habitat, MovementPattern, Notification, NotificationKind, OrderId,
    Position, RandomEvent, TickBroadcast, VisualEffect, Weather, Zone,
};
use menagerie_world::{EntityStore, ZoneCaps, next_weather, starter_store};

use crate::clock::{ClockError, GameClock};
use crate::config::{EventsConfig, GameConfig, MAX_SPEED, MIN_SPEED};
use crate::requests::{RequestKind, RequestTicket, RequestTracker, Superseded};
use crate::selection::Selection;
use crate::tick::TickSummary;

/// A purchase plus the name request it triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyReceipt {
    /// The completed purchase.
    pub purchase: Purchase,
    /// Ticket for the name the text service will suggest.
    pub name_request: RequestTicket,
}

/// The mutable game session.
#[derive(Debug)]
pub struct GameState {
    pub(crate) clock: GameClock,
    pub(crate) store: EntityStore,
    pub(crate) wallet: Wallet,
    pub(crate) context: HabitatContext,
    pub(crate) weather: Weather,
    pub(crate) speed: f64,
    pub(crate) caps: ZoneCaps,
    pub(crate) sim: SimConfig,
    pub(crate) events: EventsConfig,
    pub(crate) rng: StdRng,
    pub(crate) selection: Selection,
    requests: RequestTracker,
    notices: VecDeque<Notification>,
}

impl GameState {
    /// A fresh session seeded with the starter pets.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for a zero tick interval.
    pub fn new(config: &GameConfig) -> Result<Self, ClockError> {
        Self::with_store(config, starter_store())
    }

    /// A session over a caller-supplied store.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for a zero tick interval.
    pub fn with_store(config: &GameConfig, store: EntityStore) -> Result<Self, ClockError> {
        let zone = config.world.starting_zone;
        info!(
            seed = config.world.seed,
            zone = %zone,
            coins = config.world.starting_coins,
            entities = store.len(),
            "Session starting"
        );
        Ok(Self {
            clock: GameClock::new(config.world.tick_interval_ms)?,
            store,
            wallet: Wallet::new(config.world.starting_coins),
            context: HabitatContext::enter(zone, &config.habitats),
            weather: Weather::Clear,
            speed: config.world.speed,
            caps: config.population,
            sim: config.habitats.clone(),
            events: config.events.clone(),
            rng: StdRng::seed_from_u64(config.world.seed),
            selection: Selection::none(),
            requests: RequestTracker::new(),
            notices: VecDeque::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// Ticks completed.
    pub const fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Game time in milliseconds.
    pub const fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Active zone.
    pub const fn zone(&self) -> Zone {
        self.context.zone()
    }

    /// Active habitat.
    pub const fn habitat(&self) -> Habitat {
        self.context.habitat()
    }

    /// Weather in the active habitat.
    pub const fn weather(&self) -> Weather {
        self.weather
    }

    /// Global speed multiplier.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Coins held.
    pub const fn coins(&self) -> u64 {
        self.wallet.balance()
    }

    /// The wallet and its history.
    pub const fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Every live entity.
    pub const fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The active habitat's simulation context.
    pub const fn context(&self) -> &HabitatContext {
        &self.context
    }

    /// Selected entity, if any.
    pub const fn selected(&self) -> Option<EntityId> {
        self.selection.current()
    }

    /// Outstanding text-service requests.
    pub fn outstanding_requests(&self) -> usize {
        self.requests.outstanding()
    }

    /// A broadcast of the current state with no per-tick feedback.
    pub fn snapshot(&self) -> TickBroadcast {
        self.view(self.tick(), None, Vec::new())
    }

    /// The broadcast for a completed tick.
    pub fn broadcast(&self, summary: &TickSummary) -> TickBroadcast {
        self.view(
            summary.tick,
            summary.notification.clone(),
            summary.effects.clone(),
        )
    }

    fn view(
        &self,
        tick: u64,
        notification: Option<Notification>,
        effects: Vec<VisualEffect>,
    ) -> TickBroadcast {
        let zone = self.zone();
        TickBroadcast {
            tick,
            zone,
            weather: self.weather,
            speed: self.speed,
            coins: self.wallet.balance(),
            entities: self.store.in_zone(zone).cloned().collect(),
            orders: self.context.orders().to_vec(),
            notification,
            effects,
            selected: self.selection.current(),
        }
    }

    // -----------------------------------------------------------------------
    // Notices
    // -----------------------------------------------------------------------

    /// Queue a message for the next broadcast that has room for one.
    pub fn push_notice(&mut self, notice: Notification) {
        self.notices.push_back(notice);
    }

    pub(crate) fn take_notice(&mut self) -> Option<Notification> {
        self.notices.pop_front()
    }

    // -----------------------------------------------------------------------
    // Session controls
    // -----------------------------------------------------------------------

    /// Switch to another zone. The old context is discarded and a fresh
    /// one is built. Weather resets when the habitat changes. Returns the
    /// previous zone.
    pub fn enter_zone(&mut self, zone: Zone) -> Zone {
        let previous = self.zone();
        if zone == previous {
            return previous;
        }
        if zone.habitat() != previous.habitat() {
            self.weather = Weather::Clear;
        }
        self.context = HabitatContext::enter(zone, &self.sim);
        self.selection.clear();
        info!(from = %previous, to = %zone, "Entered zone");
        previous
    }

    /// Change the global speed multiplier.
    ///
    /// # Errors
    ///
    /// [`ActionError::InvalidSpeed`] for a value outside `[0.5, 3.0]` or
    /// not finite.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), ActionError> {
        if !speed.is_finite() || !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(ActionError::InvalidSpeed {
                value: speed,
                min: MIN_SPEED,
                max: MAX_SPEED,
            });
        }
        self.speed = speed;
        debug!(speed, "Speed changed");
        Ok(())
    }

    /// Toggle to the next weather of the active habitat's cycle.
    pub fn cycle_weather(&mut self) -> Weather {
        self.weather = next_weather(self.habitat(), self.weather);
        debug!(weather = ?self.weather, "Weather changed");
        self.weather
    }

    fn aquarium(
        &mut self,
        action: &'static str,
    ) -> Result<&mut menagerie_habitats::AquariumContext, ActionError> {
        let habitat = self.habitat();
        self.context
            .aquarium_mut()
            .ok_or(ActionError::WrongHabitat { action, habitat })
    }

    /// Set the aquarium movement pattern.
    ///
    /// # Errors
    ///
    /// [`ActionError::WrongHabitat`] outside the aquarium.
    pub fn set_pattern(&mut self, pattern: MovementPattern) -> Result<(), ActionError> {
        self.aquarium("set a pattern")?.set_pattern(pattern);
        Ok(())
    }

    /// Append a waypoint to the custom aquarium path.
    ///
    /// # Errors
    ///
    /// [`ActionError::WrongHabitat`] outside the aquarium.
    pub fn add_waypoint(&mut self, x: f64, y: f64) -> Result<(), ActionError> {
        self.aquarium("draw a path")?
            .add_waypoint(Position::new(x, y));
        Ok(())
    }

    /// Erase the custom aquarium path.
    ///
    /// # Errors
    ///
    /// [`ActionError::WrongHabitat`] outside the aquarium.
    pub fn clear_waypoints(&mut self) -> Result<(), ActionError> {
        self.aquarium("clear the path")?.clear_waypoints();
        Ok(())
    }

    /// Select an entity of the active zone.
    ///
    /// # Errors
    ///
    /// [`ActionError::EntityNotFound`] if it is not in the active zone.
    pub fn select(&mut self, id: EntityId) -> Result<(), ActionError> {
        let zone = self.zone();
        if self.selection.select(&self.store, zone, id) {
            Ok(())
        } else {
            Err(ActionError::EntityNotFound(id))
        }
    }

    /// Clear the selection.
    pub const fn deselect(&mut self) {
        self.selection.clear();
    }

    // -----------------------------------------------------------------------
    // Player actions
    // -----------------------------------------------------------------------

    fn scope(&mut self) -> ActionScope<'_> {
        ActionScope {
            store: &mut self.store,
            wallet: &mut self.wallet,
            tick: self.clock.tick(),
            zone: self.context.zone(),
            caps: self.caps,
            config: &self.sim,
        }
    }

    /// Buy an entity into the active zone and issue its name request.
    ///
    /// # Errors
    ///
    /// See [`ActionScope::buy`].
    pub fn buy(&mut self, species: &str) -> Result<BuyReceipt, ActionError> {
        let mut scope = ActionScope {
            store: &mut self.store,
            wallet: &mut self.wallet,
            tick: self.clock.tick(),
            zone: self.context.zone(),
            caps: self.caps,
            config: &self.sim,
        };
        let purchase = scope.buy(species, &mut self.rng)?;
        let habitat = self.context.habitat();
        let entity = self
            .store
            .get(purchase.id)
            .ok_or(ActionError::EntityNotFound(purchase.id))?;
        let name_request = self.requests.issue(RequestKind::Name, entity, habitat);
        Ok(BuyReceipt {
            purchase,
            name_request,
        })
    }

    /// Sell an entity of the active zone.
    ///
    /// # Errors
    ///
    /// See [`ActionScope::sell`].
    pub fn sell(&mut self, id: EntityId) -> Result<Sale, ActionError> {
        let sale = self.scope().sell(id)?;
        let zone = self.zone();
        self.selection.reresolve(&self.store, zone);
        Ok(sale)
    }

    /// Feed the whole active zone.
    ///
    /// # Errors
    ///
    /// See [`ActionScope::feed`].
    pub fn feed(&mut self, item: &str) -> Result<Feeding, ActionError> {
        self.scope().feed(item)
    }

    /// Pet a zoo or farm animal.
    ///
    /// # Errors
    ///
    /// See [`ActionScope::pet`].
    pub fn pet(&mut self, id: EntityId) -> Result<u64, ActionError> {
        self.scope().pet(id)
    }

    /// Harvest produce or a plant.
    ///
    /// # Errors
    ///
    /// See [`ActionScope::harvest`].
    pub fn harvest(&mut self, id: EntityId) -> Result<Harvest, ActionError> {
        let harvest = self.scope().harvest(id)?;
        let zone = self.zone();
        self.selection.reresolve(&self.store, zone);
        Ok(harvest)
    }

    /// Start cooking a pending order.
    ///
    /// # Errors
    ///
    /// [`ActionError::WrongHabitat`] outside the restaurant, otherwise
    /// see [`actions::start_cooking`].
    pub fn start_cooking(&mut self, order: OrderId) -> Result<(), ActionError> {
        let habitat = self.habitat();
        let ctx = self.context.restaurant_mut().ok_or(ActionError::WrongHabitat {
            action: "cook",
            habitat,
        })?;
        actions::start_cooking(ctx, order)
    }

    /// Serve a ready order.
    ///
    /// # Errors
    ///
    /// [`ActionError::WrongHabitat`] outside the restaurant, otherwise
    /// see [`actions::serve`].
    pub fn serve(&mut self, order: OrderId) -> Result<ServeOutcome, ActionError> {
        let habitat = self.habitat();
        let now_ms = self.clock.now_ms();
        let ctx = self.context.restaurant_mut().ok_or(ActionError::WrongHabitat {
            action: "serve",
            habitat,
        })?;
        let outcome = actions::serve(ctx, &mut self.store, now_ms, &self.sim.restaurant, order)?;
        if let ServeOutcome::Discarded(_) = outcome {
            self.push_notice(Notification::new(
                NotificationKind::Warning,
                "That customer already left",
            ));
        }
        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Text-service round trips
    // -----------------------------------------------------------------------

    /// Issue a fact request for the selected entity.
    ///
    /// # Errors
    ///
    /// [`ActionError::NothingSelected`] without a selection.
    pub fn request_fact(&mut self) -> Result<RequestTicket, ActionError> {
        let id = self.selection.current().ok_or(ActionError::NothingSelected)?;
        let habitat = self.habitat();
        let entity = self.store.get(id).ok_or(ActionError::EntityNotFound(id))?;
        Ok(self.requests.issue(RequestKind::Fact, entity, habitat))
    }

    /// Apply a name suggestion unless the request was superseded.
    ///
    /// # Errors
    ///
    /// The reason the answer was dropped.
    pub fn apply_name(&mut self, ticket: &RequestTicket, name: &str) -> Result<(), Superseded> {
        let habitat = self.habitat();
        if let Err(reason) = self.requests.settle(ticket, &self.store, habitat) {
            debug!(request = %ticket.id, ?reason, "Name dropped");
            return Err(reason);
        }
        if let Some(entity) = self.store.get_mut(ticket.entity) {
            name.clone_into(&mut entity.name);
            info!(entity = %ticket.entity, name, "Entity named");
        }
        self.push_notice(Notification::new(
            NotificationKind::Info,
            format!("Welcome, {name}!"),
        ));
        Ok(())
    }

    /// Surface a fact unless the request was superseded.
    ///
    /// # Errors
    ///
    /// The reason the answer was dropped.
    pub fn apply_fact(&mut self, ticket: &RequestTicket, text: &str) -> Result<(), Superseded> {
        let habitat = self.habitat();
        if let Err(reason) = self.requests.settle(ticket, &self.store, habitat) {
            debug!(request = %ticket.id, ?reason, "Fact dropped");
            return Err(reason);
        }
        self.push_notice(Notification::new(NotificationKind::Info, text));
        Ok(())
    }

    /// Credit a random event. Coins are clamped to the configured range.
    /// Returns the coins granted.
    ///
    /// # Errors
    ///
    /// [`ActionError::Ledger`] if the balance would overflow.
    pub fn apply_random_event(&mut self, event: &RandomEvent) -> Result<u64, ActionError> {
        let coins = event
            .coins
            .clamp(self.events.min_coins, self.events.max_coins);
        let tick = self.clock.tick();
        self.wallet
            .credit(tick, CoinFlow::RandomEvent, coins, event.message.as_str())?;
        info!(coins, message = %event.message, "Random event");
        self.push_notice(Notification::new(
            NotificationKind::Reward,
            format!("{} (+{coins} coins)", event.message),
        ));
        Ok(coins)
    }
}
