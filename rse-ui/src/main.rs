//! rse-ui - Review Sentiment Explorer
//!
//! Serves the page and API immediately, then loads the review dataset and
//! initializes the sentiment classifier in the background.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rse_common::config::{load_toml_config, resolve_config_path};
use rse_common::credential::CredentialStore;
use rse_common::{startup, telemetry, Session, WorkflowController};
use rse_ui::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for rse-ui
#[derive(Parser, Debug)]
#[command(name = "rse-ui")]
#[command(about = "Review Sentiment Explorer web service")]
#[command(version)]
struct Args {
    /// Config file (falls back to RSE_CONFIG, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "RSE_PORT")]
    port: Option<u16>,

    /// Dataset URL or local path (overrides the config file)
    #[arg(short, long, env = "RSE_DATASET")]
    dataset: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let loaded = load_toml_config(&config_path);
    let level = loaded
        .as_ref()
        .map(|config| config.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Review Sentiment Explorer (rse-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut config = loaded
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    info!("Config file: {}", config_path.display());

    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dataset) = args.dataset {
        config.dataset = dataset;
    }

    let credential =
        CredentialStore::new(config.classifier.token.clone()).with_config_path(&config_path);
    let session = Arc::new(Session::new(credential));
    info!(session_id = %session.id(), "Session created");

    let sink = telemetry::build_sink(&config.telemetry);
    let controller = Arc::new(WorkflowController::new(
        Arc::clone(&session),
        sink,
        config.classifier.timeout(),
    ));

    tokio::spawn({
        let session = Arc::clone(&session);
        let config = config.clone();
        async move {
            startup::run(&session, &config).await;
        }
    });

    let app = build_router(AppState::new(controller));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("rse-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
