//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Holo - Minimal configuration management
#[derive(Parser, Debug)]
#[command(name = "holo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Root of the system to manage
    #[arg(long, global = true, env = "HOLO_ROOT_DIR", default_value = "/")]
    pub root: PathBuf,

    /// Configuration file (default: /etc/holo/holo.toml below the root)
    #[arg(long, global = true, env = "HOLO_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Apply repository files to their targets
    ///
    /// Orphaned backups among the targets are restored and removed.
    ///
    /// Examples:
    ///   holo apply                   # Everything
    ///   holo apply /etc/foo.conf     # Only this file
    ///   holo apply -f file:/etc/foo  # Overwrite local changes
    Apply {
        /// Overwrite targets that were modified since the last apply
        #[arg(short, long)]
        force: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Targets to apply (default: all)
        targets: Vec<String>,
    },

    /// Show how targets differ from what apply would write
    Diff {
        /// Targets to diff (default: all)
        targets: Vec<String>,
    },

    /// List managed files and orphaned backups
    Scan {
        /// Only print target names
        #[arg(short, long)]
        short: bool,

        /// Output as JSON for scripting
        #[arg(long, conflicts_with = "short")]
        json: bool,
    },

    /// Print version information
    Version,
}
