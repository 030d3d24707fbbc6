//! IPC Layer - Unix socket transport between clients and the daemon
//!
//! This module provides:
//! - Message types for requests and responses
//! - Unix socket server for the daemon
//! - Client used by the CLI subcommands

pub mod client;
pub mod messages;
pub mod server;

pub use client::IpcClient;
pub use messages::{DaemonError, DaemonRequest, DaemonResponse, ErrorCode, Methods};
pub use server::{IpcServer, RequestHandler};
