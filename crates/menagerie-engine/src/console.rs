//! Line-oriented console that drives a running game.
//!
//! Each input line is one command. Entities and orders are addressed by
//! their number in `list` / `orders`, by name, or by full id. Every
//! command goes through the [`GameHandle`], so the console never touches
//! game state directly. Name and fact requests run on their own tasks and
//! come back to the game as commands.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context as _, anyhow, bail};
use menagerie_core::{Command, GameHandle, OperatorState, RequestTicket};
use menagerie_habitats::ServeOutcome;
use menagerie_narrator::Narrator;
use menagerie_types::{Entity, Habitat, MovementPattern, Order, TickBroadcast, Zone};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use crate::events;

/// Printed by `help`.
pub const HELP: &str = "\
Commands:
  status                   tick, zone, weather, coins
  list                     entities in the current zone
  orders                   open restaurant orders
  zone <name>              enter a zone (coral_reef, jungle, barn, orchard, dining, ...)
  speed <0.5-3.0>          set the global speed
  weather                  cycle the weather
  pattern <random|circle|zigzag|custom>
  waypoint <x> <y>         add a custom-path point
  clear-path               erase the custom path
  select <who>|none        select an entity
  buy <species>            buy into the current zone
  sell <who>               sell an entity
  feed <item>              feed the current zone
  pet <who>                pet a zoo or farm animal
  harvest <who>            collect produce or a ripe plant
  cook <order>             start cooking an order
  serve <order>            serve a ready order
  fact                     ask about the selected entity
  event                    roll a random event now
  pause | resume           stop or restart ticking
  quit                     end the session
<who> and <order> are a number from `list` / `orders`, a name, or an id.";

/// How a command names an entity or order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// 1-based position in the last listing.
    Index(usize),
    /// Full id.
    Id(Uuid),
    /// Entity name or menu item, case-insensitive.
    Name(String),
}

impl Target {
    fn parse(text: &str) -> Self {
        let text = text.trim();
        let numbered = text.strip_prefix('#').unwrap_or(text);
        if let Ok(index) = numbered.parse::<usize>() {
            return Self::Index(index);
        }
        if let Ok(id) = Uuid::parse_str(text) {
            return Self::Id(id);
        }
        Self::Name(text.to_owned())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(ref name) => write!(f, "{name:?}"),
        }
    }
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Show the command list.
    Help,
    /// Show tick, zone, weather and coins.
    Status,
    /// List entities in the active zone.
    List,
    /// List open orders.
    Orders,
    /// Enter a zone.
    Zone(Zone),
    /// Set the speed multiplier.
    Speed(f64),
    /// Cycle the weather.
    Weather,
    /// Set the aquarium movement pattern.
    Pattern(MovementPattern),
    /// Add a custom-path waypoint.
    Waypoint {
        /// Horizontal coordinate.
        x: f64,
        /// Vertical coordinate.
        y: f64,
    },
    /// Erase the custom path.
    ClearPath,
    /// Select an entity, or clear the selection.
    Select(Option<Target>),
    /// Buy a species.
    Buy(String),
    /// Sell an entity.
    Sell(Target),
    /// Feed the zone.
    Feed(String),
    /// Pet an animal.
    Pet(Target),
    /// Harvest produce or a plant.
    Harvest(Target),
    /// Start cooking an order.
    Cook(Target),
    /// Serve an order.
    Serve(Target),
    /// Ask for a fact about the selection.
    Fact,
    /// Roll a random event now.
    Event,
    /// Suspend ticking.
    Pause,
    /// Resume ticking.
    Resume,
    /// End the session.
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ConsoleCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => ConsoleCommand::Help,
        "status" => ConsoleCommand::Status,
        "list" | "ls" => ConsoleCommand::List,
        "orders" => ConsoleCommand::Orders,
        "zone" | "go" => ConsoleCommand::Zone(parse_zone(required(rest, "zone")?)?),
        "speed" => {
            let raw = required(rest, "speed")?;
            ConsoleCommand::Speed(raw.parse().with_context(|| format!("not a number: {raw}"))?)
        }
        "weather" => ConsoleCommand::Weather,
        "pattern" => ConsoleCommand::Pattern(parse_pattern(required(rest, "pattern")?)?),
        "waypoint" => {
            let (x, y) = parse_point(rest)?;
            ConsoleCommand::Waypoint { x, y }
        }
        "clear-path" | "clearpath" => ConsoleCommand::ClearPath,
        "select" => {
            if rest.is_empty() || rest.eq_ignore_ascii_case("none") {
                ConsoleCommand::Select(None)
            } else {
                ConsoleCommand::Select(Some(Target::parse(rest)))
            }
        }
        "buy" => ConsoleCommand::Buy(catalog_key(required(rest, "species")?)),
        "sell" => ConsoleCommand::Sell(Target::parse(required(rest, "what to sell")?)),
        "feed" => ConsoleCommand::Feed(catalog_key(required(rest, "item")?)),
        "pet" => ConsoleCommand::Pet(Target::parse(required(rest, "who to pet")?)),
        "harvest" => ConsoleCommand::Harvest(Target::parse(required(rest, "what to harvest")?)),
        "cook" => ConsoleCommand::Cook(Target::parse(required(rest, "order")?)),
        "serve" => ConsoleCommand::Serve(Target::parse(required(rest, "order")?)),
        "fact" | "chat" => ConsoleCommand::Fact,
        "event" => ConsoleCommand::Event,
        "pause" => ConsoleCommand::Pause,
        "resume" => ConsoleCommand::Resume,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => bail!("unknown command {other:?}, try `help`"),
    };
    Ok(Some(command))
}

fn required<'a>(rest: &'a str, what: &str) -> anyhow::Result<&'a str> {
    if rest.is_empty() {
        bail!("missing {what}");
    }
    Ok(rest)
}

/// `Tropical Fish` and `tropical-fish` both become `tropical_fish`.
fn catalog_key(text: &str) -> String {
    text.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

fn parse_zone(text: &str) -> anyhow::Result<Zone> {
    Zone::from_label(&catalog_key(text)).ok_or_else(|| {
        let known: Vec<&str> = Habitat::ALL
            .iter()
            .flat_map(|h| h.zones().iter().map(|z| z.label()))
            .collect();
        anyhow!("unknown zone {text:?}; zones are {}", known.join(", "))
    })
}

fn parse_pattern(text: &str) -> anyhow::Result<MovementPattern> {
    match text.to_ascii_lowercase().as_str() {
        "random" => Ok(MovementPattern::Random),
        "circle" => Ok(MovementPattern::Circle),
        "zigzag" => Ok(MovementPattern::Zigzag),
        "custom" => Ok(MovementPattern::Custom),
        other => bail!("unknown pattern {other:?}; use random, circle, zigzag or custom"),
    }
}

fn parse_point(text: &str) -> anyhow::Result<(f64, f64)> {
    let mut parts = text.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("usage: waypoint <x> <y>");
    };
    let x = x.parse().with_context(|| format!("not a number: {x}"))?;
    let y = y.parse().with_context(|| format!("not a number: {y}"))?;
    Ok((x, y))
}

/// What the console should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and read the next line.
    Say(String),
    /// Stop reading input.
    Quit,
}

/// The console's view of a running game.
pub struct Console {
    handle: GameHandle,
    narrator: Arc<Narrator>,
    operator: Arc<OperatorState>,
}

impl Console {
    /// Build a console over a game handle.
    pub const fn new(
        handle: GameHandle,
        narrator: Arc<Narrator>,
        operator: Arc<OperatorState>,
    ) -> Self {
        Self {
            handle,
            narrator,
            operator,
        }
    }

    /// Read commands until `quit` or end of input, then stop the game.
    pub async fn run<R>(self, input: R) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        println!("Welcome to the Menagerie. Type `help` for commands.");
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("reading console input")? {
            let outcome = match parse_line(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => self.execute(command).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(Outcome::Say(text)) => println!("{text}"),
                Ok(Outcome::Quit) => break,
                Err(e) => println!("! {e:#}"),
            }
        }
        info!("Console closed, stopping the game");
        self.operator.request_stop();
        Ok(())
    }

    /// Carry out one command.
    #[allow(clippy::too_many_lines)]
    pub async fn execute(&self, command: ConsoleCommand) -> anyhow::Result<Outcome> {
        let text = match command {
            ConsoleCommand::Help => HELP.to_owned(),
            ConsoleCommand::Status => {
                describe_status(&self.handle.snapshot().await?, self.operator.is_paused())
            }
            ConsoleCommand::List => describe_entities(&self.handle.snapshot().await?),
            ConsoleCommand::Orders => describe_orders(&self.handle.snapshot().await?),
            ConsoleCommand::Zone(zone) => {
                let previous = self.handle.enter_zone(zone).await?;
                if previous == zone {
                    format!("Already in {zone}")
                } else {
                    format!("Left {previous}, now in {zone}")
                }
            }
            ConsoleCommand::Speed(speed) => {
                self.handle.set_speed(speed).await?;
                format!("Speed set to {speed}x")
            }
            ConsoleCommand::Weather => {
                format!("Weather is now {:?}", self.handle.cycle_weather().await?)
            }
            ConsoleCommand::Pattern(pattern) => {
                self.handle.set_pattern(pattern).await?;
                format!("Movement pattern set to {pattern:?}")
            }
            ConsoleCommand::Waypoint { x, y } => {
                self.handle.add_waypoint(x, y).await?;
                format!("Waypoint added at ({x}, {y})")
            }
            ConsoleCommand::ClearPath => {
                self.handle.clear_waypoints().await?;
                "Custom path cleared".to_owned()
            }
            ConsoleCommand::Select(None) => {
                self.handle.select(None).await?;
                "Selection cleared".to_owned()
            }
            ConsoleCommand::Select(Some(target)) => {
                let entity = self.find_entity(&target).await?;
                self.handle.select(Some(entity.id())).await?;
                format!("Selected {}", entity.name)
            }
            ConsoleCommand::Buy(species) => {
                let receipt = self.handle.buy(species).await?;
                let text = format!(
                    "Bought {} for {} coins",
                    receipt.purchase.name, receipt.purchase.price
                );
                self.spawn_naming(receipt.name_request);
                text
            }
            ConsoleCommand::Sell(target) => {
                let id = self.find_entity(&target).await?.id();
                let sale = self.handle.sell(id).await?;
                format!("Sold {} for {} coins", sale.name, sale.coins)
            }
            ConsoleCommand::Feed(item) => {
                let feeding = self.handle.feed(item).await?;
                format!(
                    "Fed {} with {} for {} coins",
                    feeding.fed, feeding.item, feeding.price
                )
            }
            ConsoleCommand::Pet(target) => {
                let entity = self.find_entity(&target).await?;
                let coins = self.handle.pet(entity.id()).await?;
                format!("{} enjoyed that (+{coins} coins)", entity.name)
            }
            ConsoleCommand::Harvest(target) => {
                let id = self.find_entity(&target).await?.id();
                let harvest = self.handle.harvest(id).await?;
                let removed = if harvest.removed { ", plot cleared" } else { "" };
                format!(
                    "Harvested {} for {} coins{removed}",
                    harvest.name, harvest.coins
                )
            }
            ConsoleCommand::Cook(target) => {
                let order = self.find_order(&target).await?;
                self.handle.start_cooking(order.id).await?;
                format!("Cooking {} for table {}", order.item.item, order.table_id)
            }
            ConsoleCommand::Serve(target) => {
                let order = self.find_order(&target).await?;
                match self.handle.serve(order.id).await? {
                    ServeOutcome::Served(_) => {
                        format!("Served {} to table {}", order.item.item, order.table_id)
                    }
                    ServeOutcome::Discarded(_) => format!(
                        "Table {} had already left, {} thrown away",
                        order.table_id, order.item.item
                    ),
                }
            }
            ConsoleCommand::Fact => {
                let ticket = self.handle.ask_fact().await?;
                let text = format!("Asking about {}...", ticket.subject);
                self.spawn_fact(ticket);
                text
            }
            ConsoleCommand::Event => {
                let narrator = Arc::clone(&self.narrator);
                let handle = self.handle.clone();
                tokio::spawn(async move {
                    if events::request_event(&narrator, &handle).await.is_err() {
                        debug!("Game closed before the event arrived");
                    }
                });
                "Rolling for a random event...".to_owned()
            }
            ConsoleCommand::Pause => {
                self.operator.pause();
                "Paused".to_owned()
            }
            ConsoleCommand::Resume => {
                self.operator.resume();
                "Resumed".to_owned()
            }
            ConsoleCommand::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Say(text))
    }

    fn spawn_naming(&self, ticket: RequestTicket) {
        let narrator = Arc::clone(&self.narrator);
        let handle = self.handle.clone();
        tokio::spawn(async move {
            let name = narrator.name_for(&ticket.species_name).await;
            if handle.send(Command::NameArrived { ticket, name }).await.is_err() {
                debug!("Game closed before the name arrived");
            }
        });
    }

    fn spawn_fact(&self, ticket: RequestTicket) {
        let narrator = Arc::clone(&self.narrator);
        let handle = self.handle.clone();
        tokio::spawn(async move {
            let text = narrator
                .fact(&ticket.subject, &ticket.species_name, ticket.habitat.label())
                .await;
            if handle.send(Command::FactArrived { ticket, text }).await.is_err() {
                debug!("Game closed before the fact arrived");
            }
        });
    }

    async fn find_entity(&self, target: &Target) -> anyhow::Result<Entity> {
        let snapshot = self.handle.snapshot().await?;
        pick_entity(target, snapshot.entities)
    }

    async fn find_order(&self, target: &Target) -> anyhow::Result<Order> {
        let snapshot = self.handle.snapshot().await?;
        pick_order(target, snapshot.orders)
    }
}

fn pick_entity(target: &Target, entities: Vec<Entity>) -> anyhow::Result<Entity> {
    let mut entities = entities.into_iter();
    let found = match *target {
        Target::Index(index) => index.checked_sub(1).and_then(|i| entities.nth(i)),
        Target::Id(id) => entities.find(|e| e.id().into_inner() == id),
        Target::Name(ref name) => entities.find(|e| e.name.eq_ignore_ascii_case(name)),
    };
    found.ok_or_else(|| anyhow!("nothing called {target} in this zone"))
}

fn pick_order(target: &Target, orders: Vec<Order>) -> anyhow::Result<Order> {
    let mut orders = orders.into_iter();
    let found = match *target {
        Target::Index(index) => index.checked_sub(1).and_then(|i| orders.nth(i)),
        Target::Id(id) => orders.find(|o| o.id.into_inner() == id),
        Target::Name(ref item) => orders.find(|o| o.item.item.eq_ignore_ascii_case(item)),
    };
    found.ok_or_else(|| anyhow!("no open order {target}"))
}

fn describe_status(snapshot: &TickBroadcast, paused: bool) -> String {
    let state = if paused { " | paused" } else { "" };
    format!(
        "tick {} | {} | {:?} | {} coins | speed {}x | {} here{state}",
        snapshot.tick,
        snapshot.zone,
        snapshot.weather,
        snapshot.coins,
        snapshot.speed,
        snapshot.entities.len()
    )
}

fn describe_entities(snapshot: &TickBroadcast) -> String {
    if snapshot.entities.is_empty() {
        return format!("Nobody in {} yet", snapshot.zone);
    }
    snapshot
        .entities
        .iter()
        .zip(1_usize..)
        .map(|(entity, n)| {
            let marker = if snapshot.selected == Some(entity.id()) { "*" } else { " " };
            format!(
                "{marker}{n:>3}. {} {} ({}) hunger {:.0} happiness {:.0}",
                entity.glyph,
                entity.name,
                entity.species(),
                entity.vitals.hunger(),
                entity.vitals.happiness()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_orders(snapshot: &TickBroadcast) -> String {
    if snapshot.orders.is_empty() {
        return "No open orders".to_owned();
    }
    snapshot
        .orders
        .iter()
        .zip(1_usize..)
        .map(|(order, n)| {
            format!(
                "{n:>3}. table {} {} {} {:?} {:.0}%",
                order.table_id,
                order.item.glyph,
                order.item.item,
                order.status(),
                order.progress()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print every broadcast notification until the game stops.
pub async fn print_notices(mut rx: broadcast::Receiver<TickBroadcast>) {
    loop {
        match rx.recv().await {
            Ok(broadcast) => {
                if let Some(notice) = broadcast.notification {
                    println!("» {}", notice.message);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "Notice printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
