//! Explorer Gateway server binary
//!
//! # Startup Sequence
//! 1. Initialize tracing
//! 2. Load configuration from environment variables
//! 3. Open storage and the JSON-RPC client
//! 4. Start the background cleanup task
//! 5. Serve the router until SIGINT/SIGTERM

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use explorer_gateway::chain::{ChainState, RpcChainClient};
use explorer_gateway::clock::{SharedClock, SystemClock};
use explorer_gateway::storage::{MemoryStorage, Storage};
use explorer_gateway::{create_router, spawn_cleanup_task, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to info, overridable with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "explorer_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Explorer Gateway");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, environment={}, rpc={}, cache_max_entries={}, cleanup_interval={}s, trust_proxy={}",
        config.server_port,
        config.environment,
        config.rpc_endpoint,
        config.cache_max_entries,
        config.cleanup_interval,
        config.trust_proxy
    );

    let storage: Arc<dyn Storage> = match &config.storage_snapshot {
        Some(path) => {
            let storage = MemoryStorage::from_file(path)?;
            info!("Storage snapshot loaded from {}", path.display());
            Arc::new(storage)
        }
        None => {
            warn!("STORAGE_SNAPSHOT not set, serving an empty index");
            Arc::new(MemoryStorage::default())
        }
    };

    let chain: Arc<dyn ChainState> = Arc::new(
        RpcChainClient::new(
            &config.rpc_endpoint,
            Duration::from_secs(config.rpc_timeout_secs),
        )
        .context("failed to build JSON-RPC client")?,
    );

    let clock: SharedClock = Arc::new(SystemClock);
    let state = AppState::from_config(&config, storage, chain, clock);

    let cleanup_handle = spawn_cleanup_task(
        state.pipeline.cache().clone(),
        state.pipeline.limiter().clone(),
        config.cleanup_interval,
    );
    info!("Background cleanup task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    // Peer addresses identify clients unless TRUST_PROXY is set
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(cleanup_handle))
    .await
    .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then aborts the cleanup task.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
