//! Startup helpers for the reelgen server.

use std::process::ExitCode;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::server::{self, AppState};

/// Error type of startup steps that only need to be logged.
pub type StartupError = Box<dyn std::error::Error + Send + Sync>;

/// Run the server until Ctrl+C.
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting reelgen v{}", env!("CARGO_PKG_VERSION"));

    let (config, state) = match initialize() {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Startup failed: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let served = rt.block_on(server::run_server_with_shutdown(
        state,
        config.port,
        shutdown_signal(),
    ));
    if let Err(e) = served {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    tracing::info!("Server stopped");
    ExitCode::SUCCESS
}

/// Load configuration and build application state without starting the server.
///
/// Reads `.env` if present, then the process environment.
///
/// # Errors
/// Returns an error if the configuration is invalid or state creation fails.
pub fn initialize() -> Result<(ServiceConfig, Arc<AppState>), StartupError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Ignoring unreadable .env file: {e}");
        }
    }

    let config = ServiceConfig::from_env()?;
    tracing::info!(
        model = %config.model,
        stories_dir = %config.stories_dir.display(),
        timeout_secs = config.generation_timeout.as_secs(),
        "Configuration loaded"
    );

    let state = AppState::new(&config).map_err(|e| format!("Failed to create state: {e}"))?;
    Ok((config, state))
}

/// Resolve once Ctrl+C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
