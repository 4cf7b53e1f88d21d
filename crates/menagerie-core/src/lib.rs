//! Game clock, session state, tick dispatch and scheduling for the
//! Menagerie simulator.
//!
//! A session is one [`GameState`] owned by the scheduler task. Ticks,
//! player commands and text-service completions are applied to it one at
//! a time; observers receive a broadcast after every tick.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and game time.
//! - [`command`] -- [`Command`] queue and the [`GameHandle`] client.
//! - [`config`] -- Loading `menagerie.yaml` into typed structs.
//! - [`observer`] -- [`Publisher`] fan-out of tick broadcasts.
//! - [`operator`] -- Pause, resume, stop and run bounds.
//! - [`requests`] -- Tickets for in-flight text-service requests.
//! - [`runner`] -- The scheduler loop.
//! - [`selection`] -- The entity the player has selected.
//! - [`state`] -- [`GameState`] and every session operation.
//! - [`tick`] -- One tick of the active zone.

pub mod clock;
pub mod command;
pub mod config;
pub mod observer;
pub mod operator;
pub mod requests;
pub mod runner;
pub mod selection;
pub mod state;
pub mod tick;

pub use command::{Command, GameHandle, HandleError};
pub use config::GameConfig;
pub use observer::Publisher;
pub use operator::{OperatorState, SimulationEndReason};
pub use requests::{RequestKind, RequestTicket, Superseded};
pub use runner::{SimulationResult, TickCallback, run_simulation};
pub use state::{BuyReceipt, GameState};
pub use tick::{TickSummary, run_tick};
