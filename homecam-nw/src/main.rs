//! homecam-nw — Push-Notification Worker service

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use homecam_nw::deck::NotificationDeck;
use homecam_nw::link::SystemLink;
use homecam_nw::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "homecam-nw")]
#[command(about = "HomeCam push-notification worker", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "HOMECAM_NW_PORT", default_value_t = 5174)]
    port: u16,

    /// Base URL of the dashboard controller
    #[arg(
        long,
        env = "HOMECAM_DASHBOARD_URL",
        default_value = "http://127.0.0.1:5173"
    )]
    dashboard_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Starting homecam-nw v{}", env!("CARGO_PKG_VERSION"));
    info!("Dashboard: {}", args.dashboard_url);

    let state = AppState {
        deck: Arc::new(Mutex::new(NotificationDeck::new())),
        link: Arc::new(SystemLink::new(args.dashboard_url)?),
    };
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Notification worker listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("homecam-nw shut down");
    Ok(())
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
