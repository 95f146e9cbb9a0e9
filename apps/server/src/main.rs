mod api;
mod config;
mod error;
mod main_lib;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::AppConfig;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    let missing = config.ghl.missing_settings();
    if !missing.is_empty() {
        warn!(
            "GHL settings not configured ({}); sync and forms requests will fail",
            missing.join(", ")
        );
    }
    match &config.allowed_origins {
        Some(origins) => info!("CORS allowed origins: {}", origins.join(", ")),
        None => info!("CORS allowing any origin"),
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let state = main_lib::build_state(config)?;
    let app = main_lib::build_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("{} listening on {}", main_lib::SERVICE_NAME, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
