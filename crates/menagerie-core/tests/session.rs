//! End-to-end session flows through the public API.
//!
//! The synchronous tests drive [`GameState`] and [`run_tick`] directly.
//! The async tests run the scheduler on its own task and talk to it
//! through a [`GameHandle`], the way the engine binary does.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use menagerie_core::command::Command;
use menagerie_core::config::SimulationBoundsConfig;
use menagerie_core::{
    GameConfig, GameHandle, GameState, HandleError, OperatorState, Publisher,
    SimulationEndReason, Superseded, run_simulation, run_tick,
};
use menagerie_habitats::ActionError;
use menagerie_ledger::AuditResult;
use menagerie_types::{CoinFlow, GrowthStage, RandomEvent, Weather, Zone};

fn state() -> GameState {
    GameState::new(&GameConfig::default()).unwrap()
}

#[test]
fn garden_plant_grows_and_pays_on_harvest() {
    let mut state = state();
    state.enter_zone(Zone::Vegetables);
    let receipt = state.buy("carrot").unwrap();
    let id = receipt.purchase.id;
    assert_eq!(state.coins(), 195);

    assert!(matches!(state.harvest(id), Err(ActionError::NotReady(_))));

    let mut ticks = 0;
    while ticks < 2_000
        && !state
            .store()
            .get(id)
            .and_then(|e| e.plant())
            .is_some_and(|p| p.stage == GrowthStage::Harvestable)
    {
        run_tick(&mut state).unwrap();
        ticks += 1;
    }
    assert!(ticks < 2_000, "carrot never ripened");

    let harvest = state.harvest(id).unwrap();
    assert_eq!(harvest.coins, 10);
    assert!(harvest.removed);
    assert!(!state.store().contains(id));
    assert_eq!(state.coins(), 205);
    assert_eq!(state.wallet().audit(), AuditResult::Balanced);
}

#[test]
fn purchases_in_the_wrong_zone_are_refused() {
    let mut state = state();
    assert!(matches!(
        state.buy("lion"),
        Err(ActionError::WrongZone { .. })
    ));
    assert_eq!(state.coins(), 200);
    assert!(state.wallet().entries().is_empty());
}

#[test]
fn leaving_the_restaurant_discards_open_orders() {
    let mut state = state();
    state.enter_zone(Zone::Dining);
    for _ in 0..3_000 {
        run_tick(&mut state).unwrap();
        if !state.context().orders().is_empty() {
            break;
        }
    }
    assert!(!state.context().orders().is_empty());

    state.enter_zone(Zone::Bar);
    assert!(state.context().orders().is_empty());

    // Waiting customers order again on return.
    state.enter_zone(Zone::Dining);
    run_tick(&mut state).unwrap();
    assert!(!state.context().orders().is_empty());
}

#[test]
fn stale_answers_never_touch_the_game() {
    let mut state = state();
    let first = state.buy("goldfish").unwrap();

    // The fish is sold before its name arrives.
    state.sell(first.purchase.id).unwrap();
    assert_eq!(
        state.apply_name(&first.name_request, "Bubbles"),
        Err(Superseded::EntityGone)
    );

    // A second fact request replaces the first.
    let goldie = state.store().ids_in_zone(Zone::CoralReef)[0];
    state.select(goldie).unwrap();
    let old = state.request_fact().unwrap();
    let new = state.request_fact().unwrap();
    assert_eq!(
        state.apply_fact(&old, "old news"),
        Err(Superseded::NewerRequest)
    );
    assert_eq!(state.apply_fact(&new, "Goldfish have teeth."), Ok(()));
    assert_eq!(state.outstanding_requests(), 0);
}

#[test]
fn weather_cycles_per_habitat() {
    let mut state = state();
    let mut seen = vec![state.weather()];
    for _ in 0..3 {
        seen.push(state.cycle_weather());
    }
    assert_eq!(
        seen,
        vec![Weather::Clear, Weather::Rain, Weather::Storm, Weather::Clear]
    );

    state.enter_zone(Zone::Arctic);
    assert_eq!(state.cycle_weather(), Weather::Rain);
    assert_eq!(state.cycle_weather(), Weather::Storm);
    assert_eq!(state.cycle_weather(), Weather::Snow);
}

#[tokio::test(start_paused = true)]
async fn scheduler_serves_a_remote_client() {
    let (handle, mut rx) = GameHandle::channel();
    let operator = Arc::new(OperatorState::new(&SimulationBoundsConfig::default()));
    let mut publisher = Publisher::new();
    let mut observer = publisher.subscribe();

    let scheduler = {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            let mut state = state();
            let result = run_simulation(&mut state, &operator, &mut rx, &mut publisher)
                .await
                .unwrap();
            (result, state)
        })
    };

    let receipt = handle.buy("goldfish").await.unwrap();
    assert_eq!(receipt.purchase.price, 15);
    handle
        .send(Command::NameArrived {
            ticket: receipt.name_request.clone(),
            name: "Nemo".to_owned(),
        })
        .await
        .unwrap();
    handle
        .send(Command::RandomEvent {
            event: RandomEvent {
                message: "You found a lucky coin!".to_owned(),
                coins: 10,
            },
        })
        .await
        .unwrap();

    let rejected = handle.set_speed(9.0).await;
    assert!(matches!(
        rejected,
        Err(HandleError::Rejected(ActionError::InvalidSpeed { .. }))
    ));

    let view = handle.snapshot().await.unwrap();
    assert_eq!(view.coins, 195);
    assert!(view.entities.iter().any(|e| e.name == "Nemo"));

    let broadcast = observer.recv().await.unwrap();
    assert_eq!(broadcast.zone, Zone::CoralReef);

    operator.request_stop();
    let (result, state) = scheduler.await.unwrap();
    assert_eq!(result.end_reason, SimulationEndReason::OperatorStop);
    assert!(result.total_commands >= 5);
    assert_eq!(state.coins(), 195);
    assert!(
        state
            .wallet()
            .entries()
            .iter()
            .any(|e| e.flow == CoinFlow::RandomEvent)
    );
    drop(handle);
}

#[tokio::test(start_paused = true)]
async fn paused_scheduler_still_applies_commands() {
    let (handle, mut rx) = GameHandle::channel();
    let operator = Arc::new(OperatorState::new(&SimulationBoundsConfig::default()));
    operator.pause();

    let scheduler = {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            let mut state = state();
            run_simulation(&mut state, &operator, &mut rx, &mut Publisher::new())
                .await
                .unwrap();
            state
        })
    };

    assert_eq!(handle.enter_zone(Zone::Barn).await.unwrap(), Zone::CoralReef);
    tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    assert_eq!(handle.snapshot().await.unwrap().tick, 0);

    operator.resume();
    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    assert!(handle.snapshot().await.unwrap().tick > 0);

    drop(handle);
    let state = scheduler.await.unwrap();
    assert_eq!(state.zone(), Zone::Barn);
}
