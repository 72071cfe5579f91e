use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod host;
pub mod logging;
pub mod service;

use config::Config;
use host::{ConsoleHost, HostThread, PassthroughSink};
use logging::LogCapture;
use service::{CommandBridge, LogStore, log_store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; the capture layer stays inert until a store is attached
    let capture = Arc::new(LogCapture::new());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smc_server=info,tower_http=info,Server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(capture.layer())
        .init();

    tracing::info!("Starting SMC server...");

    let config_path = std::env::var("SMC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    // Log store first, so everything after this point is captured
    let store = Arc::new(LogStore::new(
        config.logging.buffer_size,
        config.log_retention(),
    ));
    capture.attach(Arc::clone(&store));
    tracing::info!(
        "Log store ready (capacity {}, retention {}h)",
        store.capacity(),
        config.logging.retention_hours
    );

    let host = HostThread::spawn(ConsoleHost::new(config.host.version.clone()))
        .context("Failed to start host thread")?;

    // Startup banner goes through the host like any console command
    host.handle().submit(|host| {
        let mut console = PassthroughSink::new("console");
        if let Err(e) = host.dispatch(&mut console, "version") {
            tracing::warn!("Host failed to report its version: {}", e);
        }
    })?;

    let bridge = CommandBridge::new(
        host.handle(),
        config.command_timeout(),
        config.commands.blacklist.clone(),
    );

    let sweeper = log_store::spawn_retention_sweep(Arc::clone(&store), config.sweep_interval());

    let served = if config.http.enabled {
        serve(&config, bridge, Arc::clone(&store), &host).await
    } else {
        tracing::info!("HTTP API disabled, waiting for shutdown signal");
        shutdown_signal().await;
        Ok(())
    };

    tracing::info!("Shutting down...");

    sweeper.abort();
    tokio::task::spawn_blocking(move || host.shutdown())
        .await
        .context("Host thread shutdown panicked")?;

    capture.detach();
    store.clear();

    served
}

async fn serve(
    config: &Config,
    bridge: CommandBridge,
    store: Arc<LogStore>,
    host: &HostThread,
) -> anyhow::Result<()> {
    let state = api::AppState {
        bridge: Arc::new(bridge),
        logs: store,
        host: host.handle(),
        api_key: Arc::from(config.http.api_key.as_str()),
    };

    // Build router with all API endpoints
    let app = api::create_router(state);

    let addr = config.bind_addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
