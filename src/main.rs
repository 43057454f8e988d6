//! Map Starter Kit page server.
//!
//! # Architecture Overview
//!
//! ```text
//!     GET /step3-steps
//!  ──────────────────────▶ ┌──────────┐    ┌──────────────────┐
//!                          │   http   │───▶│      pages       │
//!                          │  server  │    │    controller    │
//!                          └──────────┘    └───┬─────┬─────┬──┘
//!                                              │     │     │
//!                           ┌──────────────────┘     │     └───────────────┐
//!                           ▼                        ▼                     ▼
//!                  ┌─────────────────┐   ┌────────────────────┐   ┌─────────────────┐
//!                  │ secret reader   │   │ head script cache  │   │ template        │
//!                  │ .env.secret     │   │ partials/head-...  │   │ composer        │
//!                  └─────────────────┘   └────────────────────┘   └─────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use map_starter_kit::config::ConfigError;
use map_starter_kit::http::HttpServer;
use map_starter_kit::lifecycle::signals::spawn_signal_handler;
use map_starter_kit::lifecycle::startup::{prepare, Overrides};
use map_starter_kit::lifecycle::Shutdown;
use map_starter_kit::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "map-starter-kit")]
#[command(about = "Serves the Map Starter Kit pages", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "KIT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing the kit's public/assets/views.
    #[arg(long, env = "KIT_CORE_ROOT")]
    core_root: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:3000.
    #[arg(short, long, env = "KIT_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let overrides = Overrides {
        core_root: args.core_root,
        bind_address: args.bind,
    };
    let (config, paths) = match prepare(args.config.as_deref(), overrides) {
        Ok(prepared) => prepared,
        Err(e) => {
            // Logging is not up yet; the config decides its format.
            eprintln!("map-starter-kit: {e}");
            std::process::exit(1);
        }
    };

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "map-starter-kit starting");
    tracing::info!(
        core_root = %paths.core_root.display(),
        views_dir = %paths.views_dir.display(),
        secret_file = %paths.secret_file.display(),
        "Paths resolved"
    );

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        memoize_secret = config.secret.memoize,
        watch_views = config.views.watch,
        maps_api = config.maps.api_base_url.as_deref().unwrap_or("none"),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(ConfigError::Io)?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config, paths)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
