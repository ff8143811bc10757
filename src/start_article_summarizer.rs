//! Startup helpers for the summarizer server.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::server::{self, AppState};
use crate::session::SessionCleanup;

/// Run the server until Ctrl-C (used by the `article-summarizer-server` binary).
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

    tracing::info!("Starting Article Summarizer v{}", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };
    tracing::info!(model = %config.model.model, port = config.server.port, "Configuration loaded");

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    rt.block_on(serve(config))
}

async fn serve(config: AppConfig) -> ExitCode {
    let state = match initialize(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    let cleanup = SessionCleanup::new(
        Arc::clone(&state.store),
        Duration::from_secs(config.session.cleanup_interval_seconds),
    );
    let stop_cleanup = cleanup.shutdown_notifier();
    let cleanup_handle = cleanup.spawn();

    let result = server::run_server_with_shutdown(state, config.server.port, shutdown_signal()).await;

    stop_cleanup.notify_one();
    if let Err(e) = cleanup_handle.await {
        tracing::warn!("Session cleanup task ended abnormally: {e}");
    }

    match result {
        Ok(()) => {
            tracing::info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Server error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Initialize application state without starting the server.
///
/// # Errors
/// Returns an error if state creation fails.
pub fn initialize(config: &AppConfig) -> Result<Arc<AppState>, crate::loader::LoaderError> {
    AppState::new(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
