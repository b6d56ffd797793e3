// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tend daemon (tendd)
//!
//! Long-running supervisor that starts and stops external processes on
//! time-based schedules and restarts them on failure. The loop arms exactly
//! one timer at a time; everything else arrives as events.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod watch;

use std::path::PathBuf;
use std::time::Duration;

use tend_core::{Config, Dispatcher, LocalProcessAdapter, SystemClock};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::watch::ConfigWatcher;

/// How often the configuration file is checked for changes
const CONFIG_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("tend.toml")
    };

    info!("starting tendd with configuration: {}", config_path.display());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            return Err(e.into());
        }
    };

    let (exit_tx, mut exits) = mpsc::channel(64);
    let procs = LocalProcessAdapter::new(exit_tx);
    let mut dispatcher = Dispatcher::new(procs, SystemClock);
    dispatcher.apply_config(config).await;

    let mut watcher = ConfigWatcher::new(config_path);
    let mut poll = tokio::time::interval(CONFIG_POLL_INTERVAL);

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Main event loop
    loop {
        let delay = dispatcher.next_delay();

        tokio::select! {
            // The single pending timer
            _ = sleep_or_idle(delay) => {
                dispatcher.tick().await;
            }

            // Exit notifications from child processes
            Some(exit) = exits.recv() => {
                dispatcher.handle_exit(exit).await;
            }

            // Configuration change polling
            _ = poll.tick() => {
                match watcher.poll() {
                    Some(Ok(config)) => dispatcher.apply_config(config).await,
                    Some(Err(e)) => warn!(error = %e, "ignoring configuration change"),
                    None => {}
                }
            }

            // Graceful shutdown
            _ = sigterm.recv() => {
                info!("received SIGTERM, stopping all tasks");
                dispatcher.shutdown().await;
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, stopping all tasks");
                dispatcher.shutdown().await;
                break;
            }
        }
    }

    info!("supervisor stopped");
    Ok(())
}

async fn sleep_or_idle(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending().await,
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}
