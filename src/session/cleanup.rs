//! Background expiry of idle sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::session::store::SessionStore;

/// Periodically purges expired sessions until told to stop.
pub struct SessionCleanup {
    store: Arc<dyn SessionStore>,
    interval: Duration,
    shutdown: Arc<Notify>,
}

impl SessionCleanup {
    /// Create a new cleanup worker.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Get a shutdown notifier to stop the worker.
    #[must_use]
    pub fn shutdown_notifier(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Spawn the worker as a tokio task.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        info!(interval = ?self.interval, "Starting session cleanup worker");

        loop {
            tokio::select! {
                () = tokio::time::sleep(self.interval) => {
                    let removed = self.store.purge_expired().await;
                    if removed > 0 {
                        let remaining = self.store.count().await;
                        info!(removed, remaining, "Expired sessions purged");
                    } else {
                        debug!("Session cleanup found nothing to remove");
                    }
                }
                () = self.shutdown.notified() => {
                    info!("Session cleanup worker shutting down");
                    break;
                }
            }
        }
    }
}
