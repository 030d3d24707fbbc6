//! CLI module for toolhub - command-line interface and subcommands.
//!
//! Provides the main entry point with a `serve` subcommand for the daemon and
//! client subcommands that query a running daemon.

pub mod commands;

pub use commands::Cli;
