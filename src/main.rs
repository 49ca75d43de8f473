use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use auth_site::lifecycle::{signals, startup};
use auth_site::observability::{logging, metrics};
use auth_site::settings::load_settings;
use auth_site::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "auth-site")]
#[command(about = "Auth site configuration service", long_about = None)]
struct Args {
    /// Settings file (TOML). Defaults plus environment when omitted.
    #[arg(short, long, env = "AUTH_SITE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    logging::init(&settings.observability).map_err(|e| e.to_string())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "auth-site starting");

    tracing::info!(
        bind_address = %settings.listener.bind_address,
        backend = ?settings.storage.backend,
        object_key = %settings.storage.object_key,
        "Settings loaded"
    );

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = settings.listener.bind_address.clone();
    let state = startup::start(settings).await?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    HttpServer::new(state).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
