use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::info;

mod config;
mod device;
mod ethos;
mod tiers;
mod ui;
mod watch;

use config::Config;
use watch::Watcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // No handle on the command line: fall back to the interactive menu.
    let Some(raw_handle) = config.handle.clone() else {
        return ui::interactive(config).await;
    };
    let handle = raw_handle.trim_start_matches('@').to_string();

    let watcher = Watcher::from_config(&config, !config.no_led)?;
    match config.watch {
        Some(secs) => {
            watcher
                .watch(&handle, Duration::from_secs(secs), shutdown_signal())
                .await?;
        }
        None => {
            watcher.display_once(&handle).await?;
        }
    }
    Ok(())
}

/// Resolve when the user asks the process to stop (Ctrl+C, or SIGTERM on
/// unix). Used as the cooperative cancellation signal for watch sessions.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
