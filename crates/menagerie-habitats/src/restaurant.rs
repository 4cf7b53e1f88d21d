//! Restaurant tick: customer visits and the kitchen pipeline.
//!
//! Customers walk in to a free table, sit and order, wait for the
//! player to cook and serve, eat, pay and walk out. Orders are created
//! the moment a customer sits down, at most once per customer, and are
//! dropped if their customer is no longer around.

use rand::Rng;
use tracing::{debug, info};

use menagerie_types::{
    CoinFlow, CustomerState, DiningState, Entity, EntityId, EntityParams, Lifecycle, MenuChoice,
    Notification, NotificationKind, Order, OrderId, Position, VisualEffect, Vitals, Zone,
    METER_MAX,
};
use menagerie_world::{EntityStore, catalog};

use crate::config::RestaurantConfig;
use crate::context::{Earning, TickEnv, TickOutcome};

/// Species key shared by every customer record.
pub const CUSTOMER_SPECIES: &str = "customer";

/// Simulation state of one restaurant zone.
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantContext {
    zone: Zone,
    orders: Vec<Order>,
}

impl RestaurantContext {
    /// Fresh context with an empty kitchen.
    pub const fn new(zone: Zone) -> Self {
        Self {
            zone,
            orders: Vec::new(),
        }
    }

    /// The simulated zone.
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Open orders, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Look up an open order.
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub(crate) fn order_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id == id)
    }

    pub(crate) fn take_order(&mut self, id: OrderId) -> Option<Order> {
        let index = self.orders.iter().position(|o| o.id == id)?;
        Some(self.orders.remove(index))
    }

    fn has_order_for(&self, customer: EntityId) -> bool {
        self.orders.iter().any(|o| o.customer == customer)
    }
}

/// What happened to one customer this tick.
enum Visit {
    Unchanged,
    Seated,
    Paid(u64),
    Left,
}

/// Move one customer along its visit.
fn step_customer(entity: &mut Entity, env: &TickEnv, config: &RestaurantConfig) -> Visit {
    let Lifecycle::Customer(state) = &mut entity.lifecycle else {
        return Visit::Unchanged;
    };
    let stride = config.walk_step * env.speed;

    match state.dining {
        DiningState::WalkingIn => {
            let Some(table) = catalog::table(state.table_id) else {
                state.dining = DiningState::WalkingOut;
                return Visit::Unchanged;
            };
            let here = entity.position;
            let dist = here.distance_to(table.position);
            if dist < config.arrive_distance {
                state.dining = DiningState::Waiting;
                entity.position = Position::new(table.position.x, table.position.y - config.seat_offset);
                entity.motion.move_duration_ms = 0;
                return Visit::Seated;
            }
            let step = stride.min(dist);
            let dx = table.position.x - here.x;
            let dy = table.position.y - here.y;
            entity.position = Position::new(here.x + dx / dist * step, here.y + dy / dist * step);
            entity.motion.facing_right = dx > 0.0;
            entity.motion.move_duration_ms = config.step_move_ms;
            Visit::Unchanged
        }
        DiningState::Waiting => Visit::Unchanged,
        DiningState::Eating => match state.pays_at_ms {
            Some(at) if env.now_ms >= at => {
                state.dining = DiningState::WalkingOut;
                state.pays_at_ms = None;
                Visit::Paid(state.order.price)
            }
            _ => Visit::Unchanged,
        },
        DiningState::WalkingOut => {
            if config.exit_x - entity.position.x < config.arrive_distance {
                return Visit::Left;
            }
            entity.position.x = (entity.position.x + stride).min(config.exit_x);
            entity.motion.facing_right = true;
            entity.motion.move_duration_ms = config.step_move_ms;
            Visit::Unchanged
        }
    }
}

/// Advance one restaurant zone by one tick.
pub fn tick<R: Rng + ?Sized>(
    ctx: &mut RestaurantContext,
    store: &mut EntityStore,
    env: &TickEnv,
    config: &RestaurantConfig,
    rng: &mut R,
) -> TickOutcome {
    let zone = ctx.zone;
    let mut outcome = TickOutcome::default();

    // Customers
    for id in store.ids_in_zone(zone) {
        let Some(entity) = store.get_mut(id) else {
            continue;
        };
        match step_customer(entity, env, config) {
            Visit::Unchanged => {}
            Visit::Seated => debug!(zone = ?zone, customer = %id, "customer seated"),
            Visit::Paid(price) => {
                info!(zone = ?zone, customer = %id, price, "customer paid");
                outcome.effects.push(VisualEffect::FloatingText {
                    position: entity.position,
                    text: format!("+{price}"),
                });
                outcome.earnings.push(Earning {
                    flow: CoinFlow::RestaurantPayout,
                    amount: price,
                    memo: entity.name.clone(),
                });
                outcome.offer(Notification::new(
                    NotificationKind::Reward,
                    format!("{} paid {price} coins", entity.name),
                ));
            }
            Visit::Left => outcome.removed.push(id),
        }

        // Seated customers order in the same tick they sit down.
        if let Some(state) = entity.customer()
            && state.dining == DiningState::Waiting
            && !ctx.has_order_for(id)
        {
            let order = Order::new(id, state.table_id, state.order.clone());
            outcome.offer(Notification::new(
                NotificationKind::Info,
                format!(
                    "Table {} ordered {} {}",
                    state.table_id,
                    state.order.glyph,
                    dish_name(&state.order)
                ),
            ));
            ctx.orders.push(order);
        }
    }
    store.remove_all(&outcome.removed);

    // Arrivals
    let cap = env.caps.cap_for(zone);
    if rng.random_bool(config.spawn_chance) && store.population(zone) < cap {
        if let Some(customer) = new_customer(store, zone, config, rng) {
            match store.insert_capped(customer, cap) {
                Ok(id) => {
                    debug!(zone = ?zone, customer = %id, "customer arrived");
                    outcome.spawned.push(id);
                }
                Err(e) => debug!(error = %e, "customer turned away"),
            }
        }
    }

    // Kitchen
    for order in &mut ctx.orders {
        if order.advance_cooking(config.cook_step) {
            outcome.offer(Notification::new(
                NotificationKind::Info,
                format!(
                    "{} {} is ready for table {}",
                    order.item.glyph,
                    dish_name(&order.item),
                    order.table_id
                ),
            ));
        }
    }
    ctx.orders.retain(|o| store.contains(o.customer));

    outcome
}

/// Display name of an ordered dish.
fn dish_name(choice: &MenuChoice) -> &str {
    catalog::menu_item(&choice.item).map_or(choice.item.as_str(), |m| m.name)
}

/// Build a customer for a random free table, or `None` if every table
/// is taken.
fn new_customer<R: Rng + ?Sized>(
    store: &EntityStore,
    zone: Zone,
    config: &RestaurantConfig,
    rng: &mut R,
) -> Option<Entity> {
    let taken: Vec<u8> = store
        .in_zone(zone)
        .filter_map(|e| e.customer().map(|c| c.table_id))
        .collect();
    let free: Vec<_> = catalog::TABLES
        .iter()
        .filter(|t| !taken.contains(&t.id))
        .collect();
    if free.is_empty() {
        return None;
    }
    let table = free.get(rng.random_range(0..free.len()))?;
    let guest = catalog::CUSTOMERS.get(rng.random_range(0..catalog::CUSTOMERS.len()))?;
    let dish = catalog::MENU.get(rng.random_range(0..catalog::MENU.len()))?;

    Some(Entity::new(EntityParams {
        name: guest.name.to_owned(),
        glyph: guest.glyph.to_owned(),
        species: CUSTOMER_SPECIES.to_owned(),
        zone,
        diet: None,
        vitals: Vitals::new(METER_MAX, config.customer_happiness),
        position: Position::new(config.entry_x, config.entry_y),
        lifecycle: Lifecycle::Customer(CustomerState {
            dining: DiningState::WalkingIn,
            table_id: table.id,
            order: MenuChoice {
                item: dish.key.to_owned(),
                glyph: dish.glyph.to_owned(),
                price: dish.price,
                eat_ms: dish.eat_ms,
            },
            pays_at_ms: None,
        }),
    }))
}
