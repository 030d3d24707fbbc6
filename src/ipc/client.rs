//! IPC client for talking to a running daemon.
//!
//! Each request opens a connection, writes one JSON line and reads one
//! response line, bounded by the configured request timeout.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use crate::config::ServerConfig;
use crate::error::{Result, ToolhubError};
use crate::ipc::messages::{DaemonRequest, DaemonResponse, Methods};

/// IPC client for communicating with the daemon.
#[derive(Debug)]
pub struct IpcClient {
    socket_path: PathBuf,
    request_timeout: Duration,
    next_id: AtomicU64,
}

impl IpcClient {
    pub fn new(socket_path: impl Into<PathBuf>, request_timeout: Duration) -> Self {
        Self {
            socket_path: socket_path.into(),
            request_timeout,
            next_id: AtomicU64::new(1),
        }
    }

    /// Client for the daemon described by a server config.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.socket_path.clone(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    /// Get socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send a request and wait for response.
    pub async fn request(&self, method: &str, params: Value) -> Result<DaemonResponse> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = DaemonRequest::new(id, method, params);

        match tokio::time::timeout(self.request_timeout, self.round_trip(&request)).await {
            Ok(result) => result,
            Err(_) => Err(ToolhubError::Ipc("Request timeout".into())),
        }
    }

    async fn round_trip(&self, request: &DaemonRequest) -> Result<DaemonResponse> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| ToolhubError::Ipc(format!("Failed to connect: {}", e)))?;
        let (reader, mut writer) = stream.into_split();

        let json = serde_json::to_string(request)?;
        writer
            .write_all(json.as_bytes())
            .await
            .map_err(|e| ToolhubError::Ipc(format!("Failed to write: {}", e)))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| ToolhubError::Ipc(format!("Failed to write newline: {}", e)))?;
        writer
            .flush()
            .await
            .map_err(|e| ToolhubError::Ipc(format!("Failed to flush: {}", e)))?;

        let mut reader = BufReader::new(reader);
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Err(ToolhubError::Ipc("Connection closed before response".into()));
        }

        let response: DaemonResponse = serde_json::from_str(line.trim())?;
        // The daemon answers with id 0 when it cannot attribute an error to a request
        let unattributed_error = response.id == 0 && response.error.is_some();
        if response.id != request.id && !unattributed_error {
            return Err(ToolhubError::Ipc(format!(
                "Response id {} does not match request id {}",
                response.id, request.id
            )));
        }
        Ok(response)
    }

    /// Send a request with no parameters.
    pub async fn request_no_params(&self, method: &str) -> Result<DaemonResponse> {
        self.request(method, serde_json::json!({})).await
    }

    // Convenience methods for common operations

    /// Send ping request.
    pub async fn ping(&self) -> Result<bool> {
        let response = self.request_no_params(Methods::PING).await?;
        Ok(response.is_success())
    }

    pub async fn list_groups(&self) -> Result<DaemonResponse> {
        self.request_no_params(Methods::GROUPS_LIST).await
    }

    pub async fn get_group(&self, name: &str) -> Result<DaemonResponse> {
        self.request(Methods::GROUPS_GET, serde_json::json!({ "name": name }))
            .await
    }

    pub async fn list_tools(&self) -> Result<DaemonResponse> {
        self.request_no_params(Methods::TOOLS_LIST).await
    }

    pub async fn get_tool(&self, name: &str) -> Result<DaemonResponse> {
        self.request(Methods::TOOLS_GET, serde_json::json!({ "name": name }))
            .await
    }

    pub async fn search(&self, query: &str) -> Result<DaemonResponse> {
        self.request(Methods::TOOLS_SEARCH, serde_json::json!({ "query": query }))
            .await
    }

    /// Force a catalog refresh.
    pub async fn refresh(&self) -> Result<DaemonResponse> {
        self.request_no_params(Methods::CATALOG_REFRESH).await
    }

    pub async fn stats(&self) -> Result<DaemonResponse> {
        self.request_no_params(Methods::CATALOG_STATS).await
    }
}
