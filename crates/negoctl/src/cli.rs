//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Multi-satellite negotiation results viewer
#[derive(Parser, Debug)]
#[command(name = "negoctl")]
#[command(about = "Run satellite coalition negotiations and inspect their outcomes", long_about = None)]
#[command(version = env!("NEGOCTL_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Backend base URL (overrides $NEGOCTL_BACKEND_URL and config)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Config file (overrides $NEGOCTL_CONFIG and the XDG location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate satellites on the backend
    Satellites {
        #[command(subcommand)]
        action: SatelliteCommands,
    },

    /// Generate tasks on the backend
    Tasks {
        #[command(subcommand)]
        action: TaskCommands,
    },

    /// Run a negotiation and show its results
    Negotiate {
        /// Number of satellites
        #[arg(long)]
        satellites: Option<u32>,

        /// Number of tasks
        #[arg(long)]
        tasks: Option<u32>,

        /// Negotiator version (e.g. v031)
        #[arg(long)]
        negotiator: Option<String>,

        /// Initiating satellite; omit (or "all") to let every satellite initiate
        #[arg(long)]
        initiator: Option<String>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show the latest negotiation results
    Results {
        /// Read a saved result set instead of asking the backend
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show every negotiation attempt for one task
    Detail {
        /// Task ID
        task_id: String,

        /// Read a saved result set instead of asking the backend
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Save the backend's current tasks and satellites under a name
    Save { filename: String },

    /// Load named tasks and satellites into the backend
    Load { filename: String },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SatelliteCommands {
    /// Create satellites (and their coalition tables)
    Create {
        /// Number of satellites
        #[arg(long)]
        count: Option<u32>,

        /// Also print each satellite's coalition table
        #[arg(long)]
        coalitions: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create tasks
    Create {
        /// Number of tasks
        #[arg(long)]
        count: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
