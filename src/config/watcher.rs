//! Hot reload of the `[versions]` section.
//!
//! # Reload Scope
//! ```text
//! file change ──▶ load + validate ──▶ rebuild catalog ──▶ channel ──▶ CatalogHandle
//!                       │
//!                       └── listener / cookie / timeouts / observability
//!                           compared with the running config, warned about
//! ```
//!
//! Only the catalog is swapped at runtime. The other sections are wired into
//! the router and subscriber at startup, so edits to them are reported and
//! otherwise ignored until the next restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{build_catalog, load_config, LoadError};
use crate::config::schema::AppConfig;
use crate::versions::VersionCatalog;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Watches the config file and sends rebuilt catalogs.
pub struct ConfigWatcher {
    path: PathBuf,
    running: AppConfig,
    catalog_tx: mpsc::UnboundedSender<VersionCatalog>,
}

impl ConfigWatcher {
    /// `running` is the configuration the process started with; edits to
    /// its non-reloadable sections are reported against it.
    pub fn new(path: &Path, running: &AppConfig) -> (Self, mpsc::UnboundedReceiver<VersionCatalog>) {
        let (catalog_tx, catalog_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            running: running.clone(),
            catalog_tx,
        };
        (watcher, catalog_rx)
    }

    /// Start watching. Reloads stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            running,
            catalog_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match reload(&path, &running) {
                        Ok(catalog) => {
                            if catalog_tx.send(catalog).is_err() {
                                tracing::debug!("Catalog receiver gone, dropping reload");
                            }
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Reload failed, keeping current versions");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(POLL_INTERVAL),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %watched.display(), "Watching config for version changes");
        Ok(watcher)
    }
}

/// Re-read `path` and rebuild the catalog, warning about edits that only a
/// restart would apply.
pub fn reload(path: &Path, running: &AppConfig) -> Result<VersionCatalog, LoadError> {
    let config = load_config(path)?;

    let stale = running.restart_required_sections(&config);
    if !stale.is_empty() {
        tracing::warn!(
            sections = ?stale,
            "Config sections changed but only [versions] is reloaded; restart to apply"
        );
    }

    let catalog = build_catalog(&config)?;
    tracing::info!(
        path = %path.display(),
        versions = catalog.descriptors().len(),
        "Reloaded version catalog"
    );
    Ok(catalog)
}
