//! Page version server.
//!
//! # Architecture Overview
//!
//! ```text
//!   page-versions.toml ──▶ config::loader ──▶ VersionCatalog ──▶ CatalogHandle
//!          │                                                        ▲
//!          └──(--watch)── config::watcher ──── rebuilt catalog ─────┘
//!
//!   Client Request ──▶ http::server ──▶ version middleware ──▶ page handler
//!                                         │ resolve()             │ switcher entries
//!   Client Response ◀── Set-Cookie ◀──────┘◀──────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use page_versions::config::{build_catalog, load_config};
use page_versions::config::watcher::ConfigWatcher;
use page_versions::lifecycle::{signals, Shutdown};
use page_versions::observability::init_logging;
use page_versions::{CatalogHandle, HttpServer};

#[derive(Parser)]
#[command(name = "page-versions")]
#[command(about = "Serve pages with per-request version resolution", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "page-versions.toml")]
    config: PathBuf,

    /// Reload the version catalog when the configuration file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(&args.config)?;
    init_logging(&config.observability);

    tracing::info!("page-versions v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %args.config.display(),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let catalogs = Arc::new(CatalogHandle::new());
    catalogs.publish(build_catalog(&config)?);

    // Dropping the watcher stops reloads, so it lives until main returns.
    let (_watcher, catalog_updates) = if args.watch {
        let (watcher, updates) = ConfigWatcher::new(&args.config, &config);
        (Some(watcher.run()?), updates)
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_on_ctrl_c(&signal_shutdown).await;
    });

    let server = HttpServer::new(config, catalogs);
    server.run(listener, catalog_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
