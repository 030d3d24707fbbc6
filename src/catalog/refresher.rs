//! Background catalog refresh
//!
//! A tokio task that refreshes the catalog every interval until told to stop.
//! A failed refresh is logged and the loop carries on.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::cache::ToolCatalogCache;
use crate::error::{Result, ToolhubError};

/// Handle to the running refresh task
#[derive(Debug)]
pub struct CatalogRefresher {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl CatalogRefresher {
    /// Start refreshing `cache` on its configured interval
    pub fn spawn(cache: ToolCatalogCache) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run(cache, stop_rx));
        Self { stop_tx, handle }
    }

    /// Ask the loop to stop and wait for it for at most `timeout`.
    ///
    /// A loop still busy after `timeout` is aborted and `ShutdownTimeout` is
    /// returned.
    pub async fn shutdown(self, timeout: Duration) -> Result<()> {
        let _ = self.stop_tx.send(true);
        let abort = self.handle.abort_handle();

        match tokio::time::timeout(timeout, self.handle).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ToolhubError::Refresh(format!("refresher task failed: {}", e))),
            Err(_) => {
                tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Catalog refresher did not stop in time");
                abort.abort();
                Err(ToolhubError::ShutdownTimeout(timeout.as_millis() as u64))
            }
        }
    }
}

async fn run(cache: ToolCatalogCache, mut stop_rx: watch::Receiver<bool>) {
    let interval = cache.refresh_interval();
    tracing::info!(interval_secs = interval.as_secs(), source = %cache.source_location(), "Catalog refresher started");

    loop {
        // A dropped sender counts as a stop request
        let stop = tokio::select! {
            _ = tokio::time::sleep(interval) => *stop_rx.borrow(),
            changed = stop_rx.changed() => changed.is_err() || *stop_rx.borrow(),
        };
        if stop {
            break;
        }

        match cache.refresh().await {
            Ok(report) => tracing::debug!(
                published = report.published,
                groups = report.groups,
                tools = report.tools,
                skipped = report.skipped_files,
                "Scheduled catalog refresh done"
            ),
            Err(e) => tracing::error!(error = %e, "Scheduled catalog refresh failed"),
        }
    }

    tracing::info!("Catalog refresher stopped");
}
