//! CLI module
//!
//! Command-line interface for the insurance portal.
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` - Session lifecycle
//! - `farmers` - List and inspect insured farmers
//! - `schedules` - List inspection schedules, mark them done
//! - `evidence` - List claim evidence, optionally grouped by farmer
//! - `diseases` - Browse the rice disease reference
//! - `routes` - Check where a portal path leads for the current session

mod commands;
mod runner;

pub use commands::{
    Cli, Commands, DiseasesCommands, EvidenceCommands, FarmersCommands, OutputFormat,
    RoutesCommands, SchedulesCommands,
};
pub use runner::Runner;
