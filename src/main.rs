//! Social Cache - diagnostics server
//!
//! Builds the cache registry from the environment and serves the diagnostics
//! endpoints until SIGINT/SIGTERM.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_cache::api::{create_router, AppState};
use social_cache::{spawn_stats_reporter, Config};

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache registry with configured partition limits
/// 4. Start the stats reporter unless disabled
/// 5. Serve the diagnostics router on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "social_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Social Cache");

    let config = Config::from_env();
    info!(
        "Configuration loaded: avatars={:?}, texts={:?}, users={:?}, posts={:?}, recent_users={:?}, chats={:?}, port={}",
        config.avatars,
        config.texts,
        config.users,
        config.posts,
        config.recent_users,
        config.chats,
        config.server_port
    );

    let state = AppState::from_config(&config);

    let reporter = (config.stats_interval > 0)
        .then(|| spawn_stats_reporter(state.registry.clone(), config.stats_interval));

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Diagnostics listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(reporter))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the reporter.
async fn shutdown_signal(reporter: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = reporter {
        handle.abort();
        warn!("Stats reporter aborted");
    }
}
