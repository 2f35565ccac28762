//! Universal SSL gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 SSL GATEWAY                   │
//!                        │                                               │
//!     Client Request     │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!     ───────────────────┼─▶│  http   │──▶│ request  │──▶│   auth    │  │
//!                        │  │ server  │   │ validate │   │ classify/ │  │
//!                        │  └─────────┘   └──────────┘   │ headers   │  │
//!                        │                               └─────┬─────┘  │
//!                        │                                     ▼        │
//!     Client Response    │  ┌──────────┐   ┌──────────────────────┐     │
//!     ◀──────────────────┼──│ response │◀──│  cloudflare client   │◀────┼──── Cloudflare
//!                        │  │ envelope │   │  (one call, no retry)│     │     API v4
//!                        │  └──────────┘   └──────────────────────┘     │
//!                        │                                               │
//!                        │  config · observability · security · lifecycle│
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use ssl_gateway::config::{load_config, validate_config, GatewayConfig};
use ssl_gateway::lifecycle::signals::spawn_signal_listener;
use ssl_gateway::observability::{logging, metrics};
use ssl_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "ssl-gateway")]
#[command(about = "HTTP gateway for enabling Cloudflare Universal SSL", version)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "SSL_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long, env = "SSL_GATEWAY_BIND")]
    bind: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(level) = args.log_level {
        config.observability.log_level = level;
    }
    validate_config(&config).map_err(ssl_gateway::config::ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ssl-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        cloudflare_timeout_secs = config.cloudflare.timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        default_mode = ?config.defaults.mode,
        default_ca = config.defaults.certificate_authority.as_str(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    spawn_signal_listener(shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
