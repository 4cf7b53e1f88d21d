//! Per-habitat simulation contexts and the tick dispatch.
//!
//! A context is built when the player enters a zone and dropped when
//! they leave. It owns everything a habitat tick remembers between
//! ticks (leader points, per-entity move timers, open orders) so the
//! tick itself is a plain function of `(context, store, env, rng)`.

use rand::Rng;

use menagerie_types::{
    CoinFlow, EntityId, Habitat, Notification, NotificationKind, Order, VisualEffect, Weather,
    Zone,
};
use menagerie_world::{EntityStore, ZoneCaps};

use crate::aquarium::{self, AquariumContext};
use crate::config::SimConfig;
use crate::garden::{self, GardenContext};
use crate::land::{self, HerdContext};
use crate::restaurant::{self, RestaurantContext};

/// Read-only inputs shared by every habitat tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEnv {
    /// Game time at the start of this tick, in milliseconds.
    pub now_ms: u64,
    /// Global speed multiplier.
    pub speed: f64,
    /// Weather in the active habitat.
    pub weather: Weather,
    /// Population caps.
    pub caps: ZoneCaps,
}

/// Coins a tick earned for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Earning {
    /// Why the coins were earned.
    pub flow: CoinFlow,
    /// How many.
    pub amount: u64,
    /// Context for the ledger.
    pub memo: String,
}

/// Everything a tick changed besides the entity records themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Entities removed this tick, in removal order.
    pub removed: Vec<EntityId>,
    /// Entities created this tick.
    pub spawned: Vec<EntityId>,
    /// The one notification this tick surfaces.
    pub notification: Option<Notification>,
    /// Animation cues.
    pub effects: Vec<VisualEffect>,
    /// Coins to credit.
    pub earnings: Vec<Earning>,
}

impl TickOutcome {
    /// Keep `candidate` if it outranks the current notification.
    ///
    /// Kills beat births, births beat rewards, rewards beat everything
    /// else. Ties keep the first one offered.
    pub fn offer(&mut self, candidate: Notification) {
        let replace = self
            .notification
            .as_ref()
            .is_none_or(|current| rank(candidate.kind) > rank(current.kind));
        if replace {
            self.notification = Some(candidate);
        }
    }
}

const fn rank(kind: NotificationKind) -> u8 {
    match kind {
        NotificationKind::Kill => 4,
        NotificationKind::Birth => 3,
        NotificationKind::Reward => 2,
        NotificationKind::Warning => 1,
        NotificationKind::Info => 0,
    }
}

/// The simulation state of the active zone.
#[derive(Debug, Clone)]
pub enum HabitatContext {
    /// Aquarium zone.
    Aquarium(AquariumContext),
    /// Zoo zone.
    Zoo(HerdContext),
    /// Farm zone.
    Farm(HerdContext),
    /// Garden zone.
    Garden(GardenContext),
    /// Restaurant zone.
    Restaurant(RestaurantContext),
}

impl HabitatContext {
    /// Fresh context for entering `zone`.
    pub fn enter(zone: Zone, config: &SimConfig) -> Self {
        match zone.habitat() {
            Habitat::Aquarium => Self::Aquarium(AquariumContext::new(zone)),
            Habitat::Zoo => Self::Zoo(HerdContext::new(zone, &config.zoo)),
            Habitat::Farm => Self::Farm(HerdContext::new(zone, &config.farm)),
            Habitat::Garden => Self::Garden(GardenContext::new(zone)),
            Habitat::Restaurant => Self::Restaurant(RestaurantContext::new(zone)),
        }
    }

    /// The zone this context simulates.
    pub const fn zone(&self) -> Zone {
        match self {
            Self::Aquarium(ctx) => ctx.zone(),
            Self::Zoo(ctx) | Self::Farm(ctx) => ctx.zone(),
            Self::Garden(ctx) => ctx.zone(),
            Self::Restaurant(ctx) => ctx.zone(),
        }
    }

    /// The habitat of the simulated zone.
    pub const fn habitat(&self) -> Habitat {
        self.zone().habitat()
    }

    /// Open restaurant orders. Empty for other habitats.
    pub fn orders(&self) -> &[Order] {
        match self {
            Self::Restaurant(ctx) => ctx.orders(),
            _ => &[],
        }
    }

    /// The aquarium context, if the aquarium is active.
    pub const fn aquarium_mut(&mut self) -> Option<&mut AquariumContext> {
        match self {
            Self::Aquarium(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// The restaurant context, if the restaurant is active.
    pub const fn restaurant_mut(&mut self) -> Option<&mut RestaurantContext> {
        match self {
            Self::Restaurant(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Run one tick of the active habitat.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        store: &mut EntityStore,
        env: &TickEnv,
        config: &SimConfig,
        rng: &mut R,
    ) -> TickOutcome {
        match self {
            Self::Aquarium(ctx) => aquarium::tick(ctx, store, env, &config.aquarium, rng),
            Self::Zoo(ctx) => land::tick(ctx, store, env, &config.zoo, rng),
            Self::Farm(ctx) => land::tick(ctx, store, env, &config.farm, rng),
            Self::Garden(ctx) => garden::tick(ctx, store, env, &config.garden),
            Self::Restaurant(ctx) => restaurant::tick(ctx, store, env, &config.restaurant, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kills_outrank_births() {
        let mut outcome = TickOutcome::default();
        outcome.offer(Notification::new(NotificationKind::Birth, "a baby"));
        outcome.offer(Notification::new(NotificationKind::Kill, "a kill"));
        outcome.offer(Notification::new(NotificationKind::Birth, "another baby"));
        outcome.offer(Notification::new(NotificationKind::Kill, "a second kill"));
        let kept = outcome.notification.unwrap_or_else(|| Notification::new(NotificationKind::Info, ""));
        assert_eq!(kept.message, "a kill");
    }

    #[test]
    fn entering_builds_the_matching_context() {
        let config = SimConfig::default();
        for habitat in Habitat::ALL {
            for zone in habitat.zones() {
                let ctx = HabitatContext::enter(*zone, &config);
                assert_eq!(ctx.zone(), *zone);
                assert_eq!(ctx.habitat(), habitat);
                assert!(ctx.orders().is_empty());
            }
        }
    }
}
