//! The interaction layer: player actions against the store and wallet.
//!
//! Every action validates fully before it mutates anything. A rejected
//! action returns an [`ActionError`] and leaves the store, the wallet and
//! the habitat context exactly as they were. Accepted actions record
//! their coin movement in the [`Wallet`] ledger.

use rand::Rng;
use tracing::{debug, info};

use menagerie_ledger::{LedgerError, Wallet};
use menagerie_types::{
    CoinFlow, DiningState, Entity, EntityId, EntityParams, GrowthStage, Habitat, Lifecycle,
    OrderId, OrderStatus, Position, Vitals, Zone, clamp_meter,
};
use menagerie_world::{EntityStore, ZoneCaps, catalog};

use crate::config::{RestaurantConfig, SimConfig};
use crate::error::ActionError;
use crate::movement::index_as_f64;
use crate::restaurant::RestaurantContext;

/// A completed purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    /// The new entity.
    pub id: EntityId,
    /// Placeholder name until the text service answers.
    pub name: String,
    /// Catalog key.
    pub species: String,
    /// Coins paid.
    pub price: u64,
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    /// Name of the sold entity.
    pub name: String,
    /// Coins received.
    pub coins: u64,
}

/// A completed feeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feeding {
    /// Display name of the consumable.
    pub item: String,
    /// Entities that were fed.
    pub fed: usize,
    /// Coins paid.
    pub price: u64,
}

/// A completed harvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Harvest {
    /// What was harvested from.
    pub name: String,
    /// Coins received.
    pub coins: u64,
    /// Whether the entity was removed (non-perennial plants).
    pub removed: bool,
}

/// Result of serving an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// The customer is now eating.
    Served(EntityId),
    /// The customer was gone; the order was thrown away.
    Discarded(EntityId),
}

/// Everything an action may touch, borrowed for the duration of one call.
#[derive(Debug)]
pub struct ActionScope<'a> {
    /// The entity store.
    pub store: &'a mut EntityStore,
    /// The player's coins.
    pub wallet: &'a mut Wallet,
    /// Current tick, stamped on ledger entries.
    pub tick: u64,
    /// The active zone.
    pub zone: Zone,
    /// Population caps.
    pub caps: ZoneCaps,
    /// Tunables.
    pub config: &'a SimConfig,
}

impl ActionScope<'_> {
    const fn habitat(&self) -> Habitat {
        self.zone.habitat()
    }

    /// An entity of the active zone.
    fn local(&self, id: EntityId) -> Result<&Entity, ActionError> {
        self.store
            .get(id)
            .filter(|e| e.zone() == self.zone)
            .ok_or(ActionError::EntityNotFound(id))
    }

    fn local_mut(&mut self, id: EntityId) -> Result<&mut Entity, ActionError> {
        let zone = self.zone;
        self.store
            .get_mut(id)
            .filter(|e| e.zone() == zone)
            .ok_or(ActionError::EntityNotFound(id))
    }

    fn ensure_funds(&self, price: u64) -> Result<(), ActionError> {
        if self.wallet.can_afford(price) {
            Ok(())
        } else {
            Err(ActionError::InsufficientFunds {
                needed: price,
                available: self.wallet.balance(),
            })
        }
    }

    fn charge(&mut self, flow: CoinFlow, price: u64, memo: &str) -> Result<(), ActionError> {
        self.wallet
            .debit(self.tick, flow, price, memo)
            .map(|_| ())
            .map_err(|e| match e {
                LedgerError::InsufficientFunds { needed, available } => {
                    ActionError::InsufficientFunds { needed, available }
                }
                other => ActionError::Ledger(other),
            })
    }

    fn pay(&mut self, flow: CoinFlow, coins: u64, memo: &str) -> Result<(), ActionError> {
        self.wallet.credit(self.tick, flow, coins, memo)?;
        Ok(())
    }

    /// Buy one entity of `species` into the active zone.
    ///
    /// The entity starts with full vitals, zero progress and a
    /// placeholder name `"<Species> #<n>"`.
    ///
    /// # Errors
    ///
    /// Unknown species, a species from another zone, a full zone or too
    /// few coins, checked in that order.
    pub fn buy<R: Rng + ?Sized>(
        &mut self,
        species: &str,
        rng: &mut R,
    ) -> Result<Purchase, ActionError> {
        let spec =
            catalog::species(species).ok_or_else(|| ActionError::UnknownSpecies(species.to_owned()))?;
        if spec.zone != self.zone {
            return Err(ActionError::WrongZone {
                species: species.to_owned(),
                zone: self.zone,
            });
        }
        let cap = self.caps.cap_for(self.zone);
        let population = self.store.population(self.zone);
        if population >= cap {
            return Err(ActionError::ZoneAtCapacity {
                zone: self.zone,
                cap,
            });
        }
        self.ensure_funds(spec.price)?;

        let habitat = self.habitat();
        let perennial = spec.plant.is_some_and(|p| p.perennial);
        let lifecycle = Lifecycle::fresh(habitat, perennial).ok_or(ActionError::WrongHabitat {
            action: "buy",
            habitat,
        })?;
        let glyph = spec
            .plant
            .map_or(spec.glyph, |p| p.glyph_for_stage(GrowthStage::Seed.index()));
        let name = format!("{} #{}", spec.name, population.saturating_add(1));
        let position = self.spawn_point(habitat, population, rng);

        let id = self.store.insert_capped(
            Entity::new(EntityParams {
                name: name.clone(),
                glyph: glyph.to_owned(),
                species: spec.key.to_owned(),
                zone: self.zone,
                diet: spec.diet,
                vitals: Vitals::full(),
                position,
                lifecycle,
            }),
            cap,
        )?;
        if let Err(e) = self.charge(CoinFlow::Purchase, spec.price, spec.key) {
            self.store.remove(id);
            return Err(e);
        }

        info!(zone = ?self.zone, species = spec.key, %id, price = spec.price, "bought");
        Ok(Purchase {
            id,
            name,
            species: spec.key.to_owned(),
            price: spec.price,
        })
    }

    fn spawn_point<R: Rng + ?Sized>(
        &self,
        habitat: Habitat,
        population: usize,
        rng: &mut R,
    ) -> Position {
        match habitat {
            Habitat::Farm => Position::new(50.0, 70.0),
            Habitat::Garden => {
                let cfg = &self.config.actions;
                let col = index_as_f64(population.checked_rem(cfg.garden_columns).unwrap_or(0));
                let row = index_as_f64(population.checked_div(cfg.garden_columns).unwrap_or(0));
                Position::new(
                    cfg.garden_cell.mul_add(col, 20.0) + rng.random_range(0.0..=cfg.garden_jitter),
                    cfg.garden_cell.mul_add(row, 35.0) + rng.random_range(0.0..=cfg.garden_jitter),
                )
            }
            _ => Position::new(50.0, 50.0),
        }
    }

    /// Sell an entity of the active zone for 60% of its catalog price.
    ///
    /// # Errors
    ///
    /// Missing entity, or a restaurant customer.
    pub fn sell(&mut self, id: EntityId) -> Result<Sale, ActionError> {
        let entity = self.local(id)?;
        if matches!(entity.lifecycle, Lifecycle::Customer(_)) {
            return Err(ActionError::NotSellable(entity.name.clone()));
        }
        let spec = catalog::species(entity.species())
            .ok_or_else(|| ActionError::UnknownSpecies(entity.species().to_owned()))?;
        let coins = spec.resale_value();
        let name = entity.name.clone();

        self.pay(CoinFlow::Sale, coins, &name)?;
        self.store.remove(id);
        info!(zone = ?self.zone, %id, coins, "sold");
        Ok(Sale { name, coins })
    }

    /// Feed every entity of the active zone with one consumable.
    ///
    /// Fish also gain breeding progress and plants gain growth from the
    /// happiness delta.
    ///
    /// # Errors
    ///
    /// The restaurant, an unknown item, or too few coins.
    pub fn feed(&mut self, item: &str) -> Result<Feeding, ActionError> {
        let habitat = self.habitat();
        if habitat == Habitat::Restaurant {
            return Err(ActionError::WrongHabitat {
                action: "feed",
                habitat,
            });
        }
        let food = catalog::consumable(habitat, item)
            .ok_or_else(|| ActionError::UnknownItem(item.to_owned()))?;
        self.ensure_funds(food.price)?;
        self.charge(CoinFlow::Feed, food.price, food.key)?;

        let breeding = self.config.actions.feed_breeding_share * food.hunger;
        let mut fed = 0_usize;
        for entity in self.store.in_zone_mut(self.zone) {
            entity.vitals.adjust_hunger(food.hunger);
            entity.vitals.adjust_happiness(food.happiness);
            match &mut entity.lifecycle {
                Lifecycle::Creature(state) if habitat == Habitat::Aquarium => {
                    state.reproduction = clamp_meter(state.reproduction + breeding);
                }
                Lifecycle::Plant(state) if !state.stage.is_harvestable() => {
                    state.growth = clamp_meter(state.growth + food.happiness);
                }
                _ => {}
            }
            fed = fed.saturating_add(1);
        }

        debug!(zone = ?self.zone, item = food.key, fed, "fed");
        Ok(Feeding {
            item: food.name.to_owned(),
            fed,
            price: food.price,
        })
    }

    /// Pet a zoo or farm animal. Returns the coins earned.
    ///
    /// # Errors
    ///
    /// Any other habitat, or a missing entity.
    pub fn pet(&mut self, id: EntityId) -> Result<u64, ActionError> {
        let habitat = self.habitat();
        let cfg = &self.config.actions;
        let (happiness, coins) = match habitat {
            Habitat::Zoo => (cfg.zoo_pet_happiness, cfg.zoo_pet_coins),
            Habitat::Farm => (cfg.farm_pet_happiness, cfg.farm_pet_coins),
            _ => {
                return Err(ActionError::WrongHabitat {
                    action: "pet",
                    habitat,
                });
            }
        };
        let name = self.local(id)?.name.clone();
        self.pay(CoinFlow::PetReward, coins, &name)?;
        self.local_mut(id)?.vitals.adjust_happiness(happiness);
        debug!(zone = ?self.zone, %id, coins, "petted");
        Ok(coins)
    }

    /// Collect produce from a farm animal or a harvestable plant.
    ///
    /// Farm animals restart production. Perennial plants drop back to
    /// sprout with some growth kept; other plants are removed.
    ///
    /// # Errors
    ///
    /// Missing entity, nothing ready, or a habitat without harvests.
    pub fn harvest(&mut self, id: EntityId) -> Result<Harvest, ActionError> {
        let regrowth = self.config.garden.regrowth;
        let entity = self.local(id)?;
        let spec = catalog::species(entity.species())
            .ok_or_else(|| ActionError::UnknownSpecies(entity.species().to_owned()))?;
        let name = entity.name.clone();

        let (coins, remove) = match &entity.lifecycle {
            Lifecycle::FarmAnimal(state) => match spec.produce {
                Some(produce) if state.ready => (produce.price, false),
                _ => return Err(ActionError::NotReady(name)),
            },
            Lifecycle::Plant(state) => match spec.plant {
                Some(plant) if state.stage.is_harvestable() => (plant.produce_price, !plant.perennial),
                _ => return Err(ActionError::NotReady(name)),
            },
            Lifecycle::Creature(_) | Lifecycle::Customer(_) => {
                return Err(ActionError::WrongHabitat {
                    action: "harvest",
                    habitat: self.habitat(),
                });
            }
        };

        self.pay(CoinFlow::Harvest, coins, &name)?;
        if remove {
            self.store.remove(id);
        } else {
            let entity = self.local_mut(id)?;
            match &mut entity.lifecycle {
                Lifecycle::FarmAnimal(state) => {
                    state.production = 0.0;
                    state.ready = false;
                }
                Lifecycle::Plant(state) => {
                    state.stage = GrowthStage::Sprout;
                    state.growth = regrowth;
                    if let Some(plant) = spec.plant {
                        entity.glyph = plant.glyph_for_stage(GrowthStage::Sprout.index()).to_owned();
                    }
                }
                Lifecycle::Creature(_) | Lifecycle::Customer(_) => {}
            }
        }

        info!(zone = ?self.zone, %id, coins, removed = remove, "harvested");
        Ok(Harvest {
            name,
            coins,
            removed: remove,
        })
    }
}

/// Put a pending order on the stove.
///
/// # Errors
///
/// Unknown order, or an order that is not pending.
pub fn start_cooking(ctx: &mut RestaurantContext, order: OrderId) -> Result<(), ActionError> {
    let open = ctx.order_mut(order).ok_or(ActionError::OrderNotFound(order))?;
    if open.start_cooking() {
        debug!(%order, "cooking started");
        Ok(())
    } else {
        Err(ActionError::OrderState {
            order,
            status: open.status(),
        })
    }
}

/// Serve a ready order. The customer starts eating and pays after the
/// configured delay. An order whose customer is gone is discarded.
///
/// # Errors
///
/// Unknown order, or an order that is not ready.
pub fn serve(
    ctx: &mut RestaurantContext,
    store: &mut EntityStore,
    now_ms: u64,
    config: &RestaurantConfig,
    order: OrderId,
) -> Result<ServeOutcome, ActionError> {
    let open = ctx.order(order).ok_or(ActionError::OrderNotFound(order))?;
    if open.status() != OrderStatus::Ready {
        return Err(ActionError::OrderState {
            order,
            status: open.status(),
        });
    }
    let customer = open.customer;
    ctx.take_order(order);

    let state = store
        .get_mut(customer)
        .and_then(Entity::customer_mut);
    let Some(state) = state else {
        info!(%order, %customer, "customer left before being served");
        return Ok(ServeOutcome::Discarded(customer));
    };
    state.dining = DiningState::Eating;
    state.pays_at_ms = Some(now_ms.saturating_add(config.payout_delay_ms));
    info!(%order, %customer, "order served");
    Ok(ServeOutcome::Served(customer))
}
