//! homecam-ui — Dashboard Controller service
//!
//! Hosts the browser dashboard's backend: session state, the hub
//! request dispatcher, the realtime event router, and the SSE stream
//! the dashboard observes.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use homecam_common::config::resolve_hub_url;
use homecam_ui::controller::Dashboard;
use homecam_ui::hub::HubClient;
use homecam_ui::realtime::run_realtime_router;
use homecam_ui::recording::CpalMicSource;
use homecam_ui::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "homecam-ui")]
#[command(about = "HomeCam dashboard controller", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "HOMECAM_UI_PORT", default_value_t = 5173)]
    port: u16,

    /// Base URL of the HomeCam hub
    #[arg(long, env = "HOMECAM_HUB_URL")]
    hub_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let hub_url = resolve_hub_url(args.hub_url.as_deref(), "HOMECAM_HUB_URL");
    info!("Starting homecam-ui v{}", env!("CARGO_PKG_VERSION"));
    info!("Hub: {}", hub_url);

    let hub = Arc::new(HubClient::new(hub_url.clone())?);
    let mic = Arc::new(CpalMicSource::new());
    let dashboard = Dashboard::new(hub, mic);

    // Persistent hub event stream with its own reconnect loop
    tokio::spawn(run_realtime_router(Arc::clone(&dashboard), hub_url));

    let app = build_router(AppState { dashboard });

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Dashboard controller listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("homecam-ui shut down");
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
