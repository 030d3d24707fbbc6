//! IPC Server - Unix socket server for client-daemon communication
//!
//! Provides:
//! - Unix stream socket listener
//! - Client connection handling with a connection cap
//! - Request routing and response sending

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

use crate::config::ServerConfig;
use crate::error::{Result, ToolhubError};
use crate::ipc::messages::{DaemonError, DaemonRequest, DaemonResponse};

/// How long a rejected client gets to send its request before the reply
const REJECT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Handler trait for processing requests
pub trait RequestHandler: Send + Sync {
    /// Handle a request and return a response
    fn handle(&self, request: DaemonRequest) -> impl Future<Output = DaemonResponse> + Send;
}

/// IPC Server for daemon communication
pub struct IpcServer {
    config: ServerConfig,
    /// Number of connected clients
    clients: Arc<AtomicUsize>,
}

impl IpcServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the socket path
    pub fn socket_path(&self) -> &Path {
        &self.config.socket_path
    }

    /// Serve requests until `shutdown` resolves
    pub async fn run<H, F>(&self, handler: Arc<H>, shutdown: F) -> Result<()>
    where
        H: RequestHandler + 'static,
        F: Future<Output = ()>,
    {
        // Remove existing socket if present
        if self.config.socket_path.exists() {
            std::fs::remove_file(&self.config.socket_path)?;
        }

        // Ensure parent directory exists
        if let Some(parent) = self.config.socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let listener = UnixListener::bind(&self.config.socket_path)
            .map_err(|e| ToolhubError::Ipc(format!("Failed to bind socket: {}", e)))?;
        tracing::info!(socket = %self.config.socket_path.display(), "IPC server listening");

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _addr)) => {
                            if self.clients.load(Ordering::SeqCst) >= self.config.max_clients {
                                tracing::warn!(max_clients = self.config.max_clients, "Rejecting client, at capacity");
                                tokio::spawn(reject_client(stream));
                                continue;
                            }
                            self.clients.fetch_add(1, Ordering::SeqCst);

                            let handler = Arc::clone(&handler);
                            let clients = Arc::clone(&self.clients);
                            tokio::spawn(async move {
                                if let Err(e) = handle_client(stream, handler).await {
                                    tracing::debug!(error = %e, "Client connection ended with error");
                                }
                                clients.fetch_sub(1, Ordering::SeqCst);
                            });
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Accept error");
                        }
                    }
                }
                _ = &mut shutdown => {
                    break;
                }
            }
        }

        // Cleanup socket
        let _ = std::fs::remove_file(&self.config.socket_path);
        tracing::info!("IPC server stopped");
        Ok(())
    }
}

/// Tell a client over the connection cap why it is being dropped
async fn reject_client(stream: UnixStream) {
    // Consume the pending request so the client's write does not race the close
    let mut stream = BufReader::new(stream);
    let mut request = String::new();
    let _ = tokio::time::timeout(REJECT_READ_TIMEOUT, stream.read_line(&mut request)).await;
    let mut stream = stream.into_inner();

    let response = DaemonResponse::error(0, DaemonError::internal_error("server at capacity"));
    let Ok(json) = serde_json::to_string(&response) else {
        return;
    };
    if let Err(e) = stream.write_all(format!("{}\n", json).as_bytes()).await {
        tracing::debug!(error = %e, "Failed to notify rejected client");
        return;
    }
    let _ = stream.shutdown().await;
}

/// Handle a single client connection
async fn handle_client<H: RequestHandler>(stream: UnixStream, handler: Arc<H>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            // EOF - client disconnected
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<DaemonRequest>(trimmed) {
            Ok(request) => handler.handle(request).await,
            Err(e) => DaemonResponse::error(0, DaemonError::parse_error(format!("Parse error: {}", e))),
        };

        let response_json = serde_json::to_string(&response)?;
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    Ok(())
}
