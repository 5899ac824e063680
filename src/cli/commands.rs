//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RiceScan insurance portal CLI
#[derive(Parser, Debug)]
#[command(name = "ricescan-portal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Portal configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with a PCIC ID (farmers) or email address (staff)
    Login {
        /// PCIC ID or email address
        identifier: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Sign out and discard the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Insured farmer accounts
    Farmers {
        #[command(subcommand)]
        command: FarmersCommands,
    },

    /// Crop inspection schedules
    Schedules {
        #[command(subcommand)]
        command: SchedulesCommands,
    },

    /// Claim evidence photos
    Evidence {
        #[command(subcommand)]
        command: EvidenceCommands,
    },

    /// Rice disease reference
    Diseases {
        #[command(subcommand)]
        command: DiseasesCommands,
    },

    /// Route access rules
    Routes {
        #[command(subcommand)]
        command: RoutesCommands,
    },
}

/// Farmer subcommands
#[derive(Subcommand, Debug)]
pub enum FarmersCommands {
    /// List farmers, one page at a time
    List {
        /// Filter by name, PCIC ID, contact or address
        #[arg(short, long)]
        search: Option<String>,

        /// Page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Items per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show one farmer
    Show {
        /// Farmer PCIC ID
        pcicid: String,
    },
}

/// Schedule subcommands
#[derive(Subcommand, Debug)]
pub enum SchedulesCommands {
    /// List inspection schedules
    List {
        /// Filter by status (pending, in-progress, done)
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by farmer id
        #[arg(long)]
        farmer: Option<String>,
    },

    /// Mark a schedule as done
    Done {
        /// Schedule id
        id: String,
    },
}

/// Evidence subcommands
#[derive(Subcommand, Debug)]
pub enum EvidenceCommands {
    /// List evidence photos
    List {
        /// Filter by farmer id
        #[arg(long)]
        farmer: Option<String>,

        /// Group rows by farmer, claims-review style
        #[arg(short, long)]
        grouped: bool,
    },
}

/// Disease subcommands
#[derive(Subcommand, Debug)]
pub enum DiseasesCommands {
    /// List rice diseases
    List {
        /// Search by name
        #[arg(short, long)]
        search: Option<String>,
    },
}

/// Route subcommands
#[derive(Subcommand, Debug)]
pub enum RoutesCommands {
    /// Check where a portal path leads for the current session
    Check {
        /// Portal path, e.g. /admin/dashboard
        path: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Table,
    /// JSON output
    Json,
}
