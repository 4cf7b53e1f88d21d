//! Engine binary for the Menagerie simulator.
//!
//! Wires the game together and runs it until the player quits or a
//! configured bound is reached.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `menagerie.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the narrator from `NARRATOR_*` environment variables
//! 4. Create the game state with the starter pets
//! 5. Create operator state from the simulation bounds
//! 6. Start the notice printer, random-event timer and console
//! 7. Run the scheduler
//! 8. Log the result

mod console;
mod error;
mod events;
mod tick_log;

use std::sync::Arc;
use std::time::Duration;

use menagerie_core::config::LoggingConfig;
use menagerie_core::observer::Publisher;
use menagerie_core::runner;
use menagerie_core::{GameConfig, GameHandle, GameState, OperatorState};
use menagerie_narrator::{Narrator, NarratorSettings};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::Console;
use crate::error::EngineError;
use crate::events::EventTimer;
use crate::tick_log::TickLog;

/// How long shutdown waits for blocking tasks such as the stdin reader.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

/// Application entry point.
///
/// The runtime is built by hand so shutdown does not wait on a console
/// read that will never complete.
///
/// # Errors
///
/// Returns an error if any initialization step or the scheduler fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(EngineError::from)?;
    let result = runtime.block_on(run());
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result?;
    Ok(())
}

async fn run() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config = GameConfig::load()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        starting_zone = %config.world.starting_zone,
        "Configuration loaded"
    );

    // 3. Narrator.
    let timeout = Duration::from_millis(config.narrator.request_timeout_ms);
    let narrator = Arc::new(Narrator::new(&NarratorSettings::from_env(timeout)?)?);

    // 4. Game state.
    let mut state = GameState::new(&config)?;

    // 5. Operator state.
    let operator = Arc::new(OperatorState::new(&config.simulation));
    info!(
        max_ticks = operator.max_ticks(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        "Operator state initialized"
    );

    // 6. Observers, timer and console.
    let (handle, mut commands) = GameHandle::channel();
    let publisher = Publisher::new();
    let notices = tokio::spawn(console::print_notices(publisher.subscribe()));
    let mut callback = TickLog::new(publisher);

    let timer = EventTimer::new(&config.events, config.world.seed)
        .spawn(Arc::clone(&narrator), handle.clone());

    let console = Console::new(handle, narrator, Arc::clone(&operator));
    let console_task = tokio::spawn(async move {
        if let Err(error) = console.run(BufReader::new(tokio::io::stdin())).await {
            warn!(error = %error, "Console stopped");
        }
    });

    // 7. Run the scheduler.
    let result = runner::run_simulation(&mut state, &operator, &mut commands, &mut callback).await;

    timer.abort();
    console_task.abort();
    notices.abort();
    let result = result?;

    // 8. Log results.
    runner::log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        coins = state.coins(),
        ledger_entries = state.wallet().entries().len(),
        audit = ?state.wallet().audit(),
        "menagerie-engine shutdown complete"
    );

    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured level. Logs go to stderr so
/// they do not mix with console output.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_env_err| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if logging.is_json() {
        builder.json().init();
    } else {
        builder.init();
    }
}
