//! Serve command - runs one forum service

use std::net::SocketAddr;

use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::api::create_router;
use crate::config::AppConfig;
use crate::domain::EntityKind;
use crate::infrastructure::logging;
use crate::infrastructure::observability::init_metrics;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Collection to serve: users, threads or posts
    pub service: EntityKind,

    /// Listen port, overriding configuration
    #[arg(long)]
    pub port: Option<u16>,
}

/// Run the service until Ctrl+C or SIGTERM
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    logging::init_logging(&config.logging, args.service.service_name());

    let state = crate::create_app_state(&config, args.service).await?;
    let metrics = init_metrics(&config.metrics, args.service.service_name());
    let app = create_router(state, metrics);

    let addr = build_socket_addr(&config)?;
    info!(
        service = args.service.service_name(),
        dynamodb = config.storage.use_dynamodb,
        "{} started on {}",
        args.service.service_name(),
        addr
    );

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{} shutdown complete", args.service.service_name());
    Ok(())
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
