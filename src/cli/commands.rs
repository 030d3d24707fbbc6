//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - serve: run the catalog daemon
//! - groups/group: browse display groups
//! - tools/tool/search: browse and search tools
//! - refresh/stats: force a rescan, show catalog figures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// toolhub - catalog of data-provider tools
#[derive(Parser, Debug)]
#[command(name = "toolhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the catalog daemon in the foreground
    Serve {
        /// Override the tools directory from the config
        #[arg(short, long)]
        tools_dir: Option<PathBuf>,
    },

    /// List display groups
    Groups,

    /// Show one display group and its tools
    Group {
        /// Group name, e.g. "Financial Markets"
        name: String,
    },

    /// List every tool
    Tools,

    /// Show one tool
    Tool {
        /// Tool name
        name: String,
    },

    /// Search tools by name, description or tag
    Search {
        /// Case-insensitive search text
        query: String,
    },

    /// Force the daemon to rescan the tools directory
    Refresh,

    /// Show catalog statistics
    Stats,
}
