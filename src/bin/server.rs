//! Aqualog HTTP server
//!
//! Single-process, memory-only telemetry service for one aquarium sensor
//! feed.
//!
//! # Endpoints
//!
//! - `GET /health` - store size, retention window, latest timestamp
//! - `POST /ingest` - store one sensor reading
//! - `GET /latest` - most recent reading
//! - `GET /history` - windowed history (`hours`, `limit` query parameters)
//!
//! # CLI Commands
//!
//! - `start` - start the HTTP server (default if no command specified)
//! - `check-config` - validate configuration without starting the server
//!
//! # Configuration
//!
//! Read from the `AQUALOG_CONFIG` environment variable (path to a TOML
//! file), then `./aqualog.toml`, then defaults with `AQUALOG_*` environment
//! overrides. History is held only in memory and is lost on restart by
//! design.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

use aqualog::config::{load_config, AppConfig};
use aqualog::server::{build_router, AppState};

/// Aqualog - aquarium telemetry ingestion service
#[derive(Parser)]
#[command(name = "aqualog")]
#[command(version)]
#[command(about = "In-memory aquarium telemetry service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file (overrides AQUALOG_CONFIG env var)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Override listen address (e.g. 0.0.0.0:8080)
    #[arg(short, long, global = true)]
    listen: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Start,

    /// Validate configuration without starting the server
    CheckConfig,
}

/// Graceful shutdown on ctrl-c or SIGTERM.
///
/// Signal registration failures are logged and the corresponding branch
/// waits forever instead of panicking during startup.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                warn!(error = %e, "ctrl-c handler installation failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler installation failed");
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

    info!("shutdown signal received");
}

/// Validate configuration and print a summary.
fn cmd_check_config(config: &AppConfig) {
    println!("Configuration is valid!");
    println!();
    println!("Server:");
    println!("  Listen address: {}", config.server.listen_addr);
    println!("  Log level: {}", config.server.log_level);
    println!();
    println!("Retention:");
    println!("  Window: {} day(s)", config.retention.days);
    println!();
    println!("Security:");
    if config.security.cors_allowed_origins.is_empty() {
        println!("  CORS origins: any");
    } else {
        println!(
            "  CORS origins: {}",
            config.security.cors_allowed_origins.join(", ")
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(config_path) = &cli.config {
        std::env::set_var("AQUALOG_CONFIG", config_path);
    }

    let mut config = load_config();
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen.clone();
    }

    if let Some(Commands::CheckConfig) = cli.command {
        cmd_check_config(&config);
        return Ok(());
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("starting aqualog server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        listen_addr = %config.server.listen_addr,
        retention_days = config.retention.days,
        "configuration loaded"
    );

    let addr: SocketAddr = config.server.listen_addr.parse()?;
    let state = Arc::new(AppState::new(config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}
