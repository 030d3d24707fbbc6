//! Daemon Core - catalog, background refresh and IPC serving
//!
//! The daemon is the long-running process that:
//! - Owns the single tool catalog instance for the process
//! - Keeps it fresh with a background refresher
//! - Answers catalog requests over the IPC socket

pub mod handlers;

use std::future::Future;
use std::sync::Arc;

use crate::catalog::{CatalogRefresher, ToolCatalogCache};
use crate::config::Config;
use crate::error::Result;
use crate::ipc::server::IpcServer;

pub use handlers::CatalogRequestHandler;

/// Composition root for the catalog daemon
#[derive(Debug)]
pub struct Daemon {
    config: Config,
    catalog: ToolCatalogCache,
}

impl Daemon {
    /// Build the catalog and load it once
    pub fn new(config: Config) -> Result<Self> {
        let catalog = ToolCatalogCache::new(
            config.catalog.tools_dir.clone(),
            config.catalog.refresh_interval(),
        )?;
        Ok(Self { config, catalog })
    }

    pub fn catalog(&self) -> &ToolCatalogCache {
        &self.catalog
    }

    /// Serve until `shutdown` resolves, then stop the refresher
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let refresher = CatalogRefresher::spawn(self.catalog.clone());
        let server = IpcServer::new(self.config.server.clone());
        let handler = Arc::new(CatalogRequestHandler::new(self.catalog.clone()));

        let served = server.run(handler, shutdown).await;
        let stopped = refresher
            .shutdown(self.config.catalog.shutdown_timeout())
            .await;
        tracing::info!("Daemon stopped");

        served?;
        stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, ServerConfig};
    use tempfile::TempDir;

    fn config(temp: &TempDir) -> Config {
        Config {
            log_level: None,
            catalog: CatalogConfig {
                tools_dir: temp.path().join("tools"),
                refresh_interval_secs: 60,
                shutdown_timeout_ms: 1000,
            },
            server: ServerConfig {
                socket_path: temp.path().join("toolhub.sock"),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_daemon_new_loads_catalog() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("tools")).unwrap();
        std::fs::write(temp.path().join("tools").join("a.json"), r#"{"name": "a"}"#).unwrap();

        let daemon = Daemon::new(config(&temp)).unwrap();
        assert_eq!(daemon.catalog().get_stats().total_tools, 1);
    }

    #[test]
    fn test_daemon_new_rejects_zero_interval() {
        let temp = TempDir::new().unwrap();
        let mut config = config(&temp);
        config.catalog.refresh_interval_secs = 0;
        assert!(Daemon::new(config).is_err());
    }

    #[tokio::test]
    async fn test_daemon_run_stops_on_shutdown() {
        let temp = TempDir::new().unwrap();
        let daemon = Daemon::new(config(&temp)).unwrap();
        daemon.run(async {}).await.unwrap();
        assert!(!temp.path().join("toolhub.sock").exists());
    }
}
