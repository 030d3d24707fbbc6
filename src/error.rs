//! Error types for toolhub
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in toolhub
#[derive(Debug, Error)]
pub enum ToolhubError {
    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// Refresh body failed unexpectedly (not a routine I/O or parse failure)
    #[error("Refresh error: {0}")]
    Refresh(String),

    /// Background task did not stop within the allotted time
    #[error("Shutdown timed out after {0}ms")]
    ShutdownTimeout(u64),

    /// IPC communication error
    #[error("IPC error: {0}")]
    Ipc(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for toolhub operations
pub type Result<T> = std::result::Result<T, ToolhubError>;
