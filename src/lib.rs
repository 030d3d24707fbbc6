//! toolhub - tool catalog daemon for a data-provider aggregator
//!
//! Scans a directory of tool definition files, folds them into display groups
//! and serves the resulting catalog to concurrent readers while a background
//! task keeps it fresh.

pub mod catalog;
pub mod config;
pub mod daemon;
pub mod error;
pub mod ipc;

pub use error::{Result, ToolhubError};
