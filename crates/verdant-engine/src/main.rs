//! Game engine binary for the verdant staking farm.
//!
//! This is the entry point that wires the session reducer to its
//! collaborators and runs the event loop. It loads configuration,
//! resolves the session address, hydrates local state from the ledger
//! once, and then select-loops over ticks, commands, executor
//! completions, and periodic ledger refreshes until shutdown.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `verdant-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Resolve the session address (config or `VERDANT_ADDRESS`)
//! 4. Construct the session engine and collaborators
//! 5. Hydrate plots and progress from the ledger
//! 6. Run the event loop until interrupted
//! 7. Log the final session state

mod error;
mod runtime;

use std::path::Path;

use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use verdant_core::GameConfig;
use verdant_core::ports::{
    LoggingSink, RecordingExecutor, SessionProvider, StaticSession, StubLedger,
};
use verdant_core::session::SessionEngine;

use crate::error::EngineError;
use crate::runtime::EngineRuntime;

/// Application entry point for the game engine.
///
/// # Errors
///
/// Returns an error if configuration loading fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging, config level as the fallback.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!(
        plot_count = config.farm.plot_count,
        tick_interval_ms = config.growth.tick_interval_ms,
        refresh_interval_ms = config.ledger.refresh_interval_ms,
        "verdant-engine starting"
    );

    // 3. Resolve the session address.
    let session = config
        .ledger
        .address
        .clone()
        .map_or_else(StaticSession::disconnected, StaticSession::connected);
    let Some(address) = session.current_address() else {
        warn!("no session address, set ledger.address or VERDANT_ADDRESS");
        return Ok(());
    };
    info!(address, "session resolved");

    // 4. Construct the engine and collaborators. The dry-run executor
    //    confirms every intent without touching a chain; the ledger stub
    //    serves an empty account until a real reader is wired in.
    let engine = SessionEngine::new(config);
    let mut runtime = EngineRuntime::new(
        engine,
        address,
        StubLedger::default(),
        RecordingExecutor::confirming(),
        LoggingSink,
    );

    // 5. Hydrate from the ledger once before the loop.
    runtime.refresh_ledger();

    // 6. Run the loop. Ctrl-C closes the command channel, which is the
    //    loop's shutdown signal.
    let (command_tx, command_rx) = mpsc::channel(32);
    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "ctrl-c handler failed");
        }
        drop(command_tx);
    });

    let engine = runtime.run(command_rx).await;

    // 7. Log the final session state.
    let progress = engine.store().progress();
    info!(
        level = progress.level,
        experience = progress.experience,
        token_balance = %progress.token_balance,
        "verdant-engine shutdown complete"
    );

    Ok(())
}

/// Load the game configuration from `verdant-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
/// Falls back to defaults when the file does not exist.
fn load_config() -> Result<GameConfig, EngineError> {
    let config_path = Path::new("verdant-config.yaml");
    if config_path.exists() {
        let config = GameConfig::from_file(config_path)?;
        Ok(config)
    } else {
        let mut config = GameConfig::default();
        config.ledger.apply_env_override();
        Ok(config)
    }
}
