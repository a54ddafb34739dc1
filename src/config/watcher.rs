//! Routing model file watcher for re-rendering on change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_model;
use crate::config::schema::RoutingModel;

/// Monitors a snapshot file and publishes every valid new snapshot.
pub struct ModelWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RoutingModel>,
}

impl ModelWatcher {
    /// Create a new ModelWatcher.
    ///
    /// Returns the watcher and a receiver for snapshot updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RoutingModel>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned handle must be kept alive for
    /// as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = %path.display(), "routing model changed, reloading");
                        match load_model(&path) {
                            Ok(model) => {
                                let _ = tx.send(model);
                            }
                            Err(e) => {
                                tracing::error!(
                                    error = %e,
                                    "failed to reload routing model, keeping current snapshot"
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "model watcher started");
        Ok(watcher)
    }
}
