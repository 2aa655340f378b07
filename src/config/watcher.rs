//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, LoadOptions};
use crate::config::schema::ConfigDocument;
use crate::observability::metrics;

/// A watcher that monitors the configuration file for changes.
///
/// Every change is fully loaded and validated on the notify thread; only
/// complete documents are sent to the receiver. A broken edit is logged and
/// dropped so the running document stays in force.
pub struct ConfigWatcher {
    path: PathBuf,
    options: LoadOptions,
    update_tx: mpsc::UnboundedSender<ConfigDocument>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated documents.
    pub fn new(
        path: &Path,
        options: LoadOptions,
    ) -> (Self, mpsc::UnboundedReceiver<ConfigDocument>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                options,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned handle must be kept alive for as long as events are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();
        let options = self.options.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?path, "Config file change detected, reloading...");
                        match load_config(&path, &options) {
                            Ok(document) => {
                                let _ = tx.send(document);
                            }
                            Err(e) => {
                                metrics::record_reload(false);
                                tracing::error!(
                                    "Failed to reload config: {}. Keeping current configuration.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
