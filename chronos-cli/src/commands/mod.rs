//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod schedule;

pub use job::JobCommands;
pub use schedule::ScheduleArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Print a recurrence string for a scheduled job
    Schedule(ScheduleArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Schedule(args) => schedule::handle_schedule_command(args),
    }
}
