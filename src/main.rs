//! Visitor counter service.
//!
//! ```text
//!   request ──▶ request-id / trace / timeout layers ──▶ count_visit
//!                                                         │
//!                                 add 1 to "visitor_count" │ put "ip:<ip>@<ts>"
//!                                                         ▼
//!                                                  Store (memory | file)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use visitor_counter::config::resolve_config;
use visitor_counter::http::HttpServer;
use visitor_counter::lifecycle::{signals, Shutdown};
use visitor_counter::observability::{logging, metrics};
use visitor_counter::store::open_store;

#[derive(Parser)]
#[command(name = "visitor-counter")]
#[command(about = "HTTP endpoint that counts and logs visitors", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;

    logging::init(&logging::default_filter(&config.observability.log_level));
    tracing::info!("visitor-counter v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        table = %config.store.table_name,
        backend = ?config.store.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address was checked during validation.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let store = open_store(&config.store).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config, store);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
