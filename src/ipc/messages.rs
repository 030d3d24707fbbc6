//! IPC message types for client ↔ daemon communication.
//!
//! Uses JSON Lines (newline-delimited JSON) over a Unix stream socket.
//! Message schema uses familiar field names (id, method, params, result, error)
//! but does NOT implement the JSON-RPC 2.0 specification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request sent from a client to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonRequest {
    /// Unique request ID for correlating responses.
    pub id: u64,
    /// Method name (e.g., "groups.list", "tools.search").
    pub method: String,
    /// Method parameters as JSON value.
    #[serde(default)]
    pub params: Value,
}

impl DaemonRequest {
    /// Create a new request with the given method and params.
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// String parameter by key, if present and a string.
    pub fn str_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }
}

/// Response sent from the daemon to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonResponse {
    /// Request ID this response corresponds to.
    pub id: u64,
    /// Result value on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DaemonError>,
}

impl DaemonResponse {
    /// Create a success response.
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: u64, error: DaemonError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Check if this response indicates success.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Error details in a daemon response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonError {
    /// Error code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
}

impl DaemonError {
    /// Create a new error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PARSE_ERROR, message)
    }

    /// Method not found error (-32601).
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::METHOD_NOT_FOUND,
            format!("Unknown method: {}", method.into()),
        )
    }

    /// Invalid params error (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_PARAMS, message)
    }

    /// Internal error (-32603).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INTERNAL_ERROR, message)
    }

    /// Group not found error (1001).
    pub fn group_not_found(name: impl Into<String>) -> Self {
        Self::new(ErrorCode::GROUP_NOT_FOUND, format!("Group not found: {}", name.into()))
    }

    /// Tool not found error (1002).
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::new(ErrorCode::TOOL_NOT_FOUND, format!("Tool not found: {}", name.into()))
    }
}

/// Standard error codes.
pub struct ErrorCode;

impl ErrorCode {
    /// Invalid JSON.
    pub const PARSE_ERROR: i32 = -32700;
    /// Unknown method.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid parameters.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal daemon error.
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Display group doesn't exist.
    pub const GROUP_NOT_FOUND: i32 = 1001;
    /// Tool doesn't exist.
    pub const TOOL_NOT_FOUND: i32 = 1002;
}

/// Known method names as constants.
pub struct Methods;

impl Methods {
    pub const PING: &'static str = "ping";

    // Groups
    pub const GROUPS_LIST: &'static str = "groups.list";
    pub const GROUPS_GET: &'static str = "groups.get";

    // Tools
    pub const TOOLS_LIST: &'static str = "tools.list";
    pub const TOOLS_GET: &'static str = "tools.get";
    pub const TOOLS_SEARCH: &'static str = "tools.search";

    // Catalog
    pub const CATALOG_REFRESH: &'static str = "catalog.refresh";
    pub const CATALOG_STATS: &'static str = "catalog.stats";
}
