//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use page_versions::config::AppConfig;
use page_versions::versions::{AddressingMode, VersionDescriptor};
use page_versions::{CatalogHandle, HttpServer, Shutdown, VersionCatalog};

/// Two versions, `v1` is the default.
pub fn catalog(persist_preference: bool, mode: AddressingMode) -> VersionCatalog {
    VersionCatalog::build(
        vec![
            VersionDescriptor::new("v1", "Version1", "Version 1", true),
            VersionDescriptor::new("v2", "Version2", "Version 2", false),
        ],
        persist_preference,
        mode,
    )
    .unwrap()
}

/// A running server and the handles to control it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub updates: mpsc::UnboundedSender<VersionCatalog>,
}

/// Start the server on `addr`, optionally with a catalog already published.
pub async fn start_server(addr: SocketAddr, catalog: Option<VersionCatalog>) -> TestServer {
    let mut config = AppConfig::default();
    config.listener.bind_address = addr.to_string();

    let catalogs = Arc::new(CatalogHandle::new());
    if let Some(catalog) = catalog {
        catalogs.publish(catalog);
    }

    let shutdown = Shutdown::new();
    let (updates, update_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config, catalogs);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, update_rx, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(200)).await;

    TestServer {
        addr,
        shutdown,
        updates,
    }
}

/// Client without connection pooling or system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
