use std::net::SocketAddr;
use std::panic::PanicHookInfo;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::WrapErr;
use metro_map_core::prelude::*;
use tracing::Level;
use tracing_subscriber::filter::{FilterFn, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod server;
mod surface;

use server::{AppState, ViewerServer};
use surface::SnapshotSurface;

#[derive(Parser, Debug)]
#[command(
    name = "metro-map-viewer",
    version,
    about = "Compose the Metro transit map layers and serve them to a browser renderer"
)]
struct Args {
    /// Base URL of the layer data backend
    #[arg(long, default_value = "http://localhost:3000")]
    backend: String,

    /// Address to serve the composed map on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// JSON file overriding the built-in map configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = FilterFn::new(|metadata| {
        metadata.module_path().unwrap_or_default().starts_with("metro")
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .with(LevelFilter::from_level(level))
        .init();

    std::panic::set_hook(Box::new(panic_hook));
}

fn panic_hook(info: &PanicHookInfo) {
    tracing::error!("{info}")
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = match &args.config {
        Some(path) => MapConfig::from_json_file(path)
            .wrap_err_with(|| format!("failed to load map config from {}", path.display()))?,
        None => MapConfig::default(),
    };

    tracing::info!(backend = %args.backend, basemap = %config.basemap, "starting map viewer");

    let registry = Arc::new(LayerRegistry::new(&config));
    let fetcher = Arc::new(HttpFetcher::new(args.backend.as_str()));

    let surface = SnapshotSurface::new();
    let snapshot = surface.handle();
    let mut controller = MapController::new(surface, &config, registry, fetcher);

    let server = ViewerServer::start(
        args.bind,
        AppState {
            snapshot,
            composition: controller.subscribe(),
        },
    )
    .await
    .wrap_err_with(|| format!("failed to bind {}", args.bind))?;

    // a failed build stays visible on /state, so keep serving
    if controller.run().await.is_ok() {
        tracing::info!(addr = %server.local_addr(), "map ready");
    }

    tokio::signal::ctrl_c().await.wrap_err("failed to listen for ctrl-c")?;
    tracing::info!("shutting down");

    server.shutdown().await;
    drop(controller);
    Ok(())
}
