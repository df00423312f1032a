//! Job command handlers
//!
//! Handles all job-related CLI commands: listing, searching, submitting,
//! starting and removing jobs.

use anyhow::{Context, Result, bail};
use chronos_client::{ChronosClient, SchedulerApi};
use chronos_core::domain::job::Job;
use clap::Subcommand;
use colored::*;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List all jobs
    List,
    /// Search jobs by name
    Search {
        /// Name (or part of a name) to look for
        name: String,
    },
    /// Delete a job
    Delete {
        /// Job name
        name: String,
    },
    /// Kill all running tasks of a job
    Kill {
        /// Job name
        name: String,
    },
    /// Start a job now
    Start {
        /// Job name
        name: String,

        /// Argument appended to the job's command, as key=value (repeatable)
        #[arg(short, long = "arg", value_parser = parse_key_val)]
        args: Vec<(String, String)>,
    },
    /// Add a scheduled job from a JSON file
    Add {
        /// Path to the job definition
        file: PathBuf,
    },
    /// Add a dependent job from a JSON file
    AddDependent {
        /// Path to the job definition
        file: PathBuf,
    },
    /// Submit the job in a JSON file to run once, immediately
    RunOnce {
        /// Path to the job definition
        file: PathBuf,
    },
    /// Stop a job from running again without deleting it
    Unschedule {
        /// Job name
        name: String,
    },
}

/// Handle job commands
///
/// Connects to the scheduler (failing early if it is unreachable) and
/// routes job subcommands to their respective handlers.
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    tracing::debug!("Connecting to scheduler at {}", config.url);
    let client = ChronosClient::connect(config.client_config()?).await?;

    run_job_command(&client, command).await
}

async fn run_job_command(api: &dyn SchedulerApi, command: JobCommands) -> Result<()> {
    match command {
        JobCommands::List => list_jobs(api).await,
        JobCommands::Search { name } => search_jobs(api, &name).await,
        JobCommands::Delete { name } => {
            api.delete_job(&name)
                .await
                .with_context(|| format!("Failed to delete job {}", name))?;
            println!("{} Deleted job {}", "✓".green(), name.cyan());
            Ok(())
        }
        JobCommands::Kill { name } => {
            api.delete_job_tasks(&name)
                .await
                .with_context(|| format!("Failed to kill tasks of job {}", name))?;
            println!("{} Killed tasks of job {}", "✓".green(), name.cyan());
            Ok(())
        }
        JobCommands::Start { name, args } => {
            api.start_job(&name, &args)
                .await
                .with_context(|| format!("Failed to start job {}", name))?;
            println!("{} Started job {}", "✓".green(), name.cyan());
            Ok(())
        }
        JobCommands::Add { file } => {
            let job = load_job(&file)?;
            if !job.parents.is_empty() {
                println!(
                    "{}",
                    "⚠ Job has parents; use add-dependent for dependent jobs".yellow()
                );
            }
            api.add_scheduled_job(&job)
                .await
                .with_context(|| format!("Failed to add job {}", job.name))?;
            println!("{} Added scheduled job {}", "✓".green(), job.name.cyan());
            Ok(())
        }
        JobCommands::AddDependent { file } => {
            let job = load_job(&file)?;
            api.add_dependent_job(&job)
                .await
                .with_context(|| format!("Failed to add job {}", job.name))?;
            println!("{} Added dependent job {}", "✓".green(), job.name.cyan());
            Ok(())
        }
        JobCommands::RunOnce { file } => {
            let mut job = load_job(&file)?;
            api.run_once_now_job(&mut job)
                .await
                .with_context(|| format!("Failed to submit job {}", job.name))?;
            println!("{} Submitted job {} to run once", "✓".green(), job.name.cyan());
            Ok(())
        }
        JobCommands::Unschedule { name } => unschedule_job(api, &name).await,
    }
}

/// List all jobs
async fn list_jobs(api: &dyn SchedulerApi) -> Result<()> {
    let jobs = api.jobs().await.context("Failed to list jobs")?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in &jobs {
            print_job_summary(job);
        }
    }

    Ok(())
}

/// Search and display jobs by name
async fn search_jobs(api: &dyn SchedulerApi, name: &str) -> Result<()> {
    let jobs = api.search_jobs(name).await.context("Failed to search jobs")?;

    if jobs.is_empty() {
        println!("{}", format!("No jobs matching {:?}.", name).yellow());
    } else {
        for job in &jobs {
            print_job_summary(job);
        }
    }

    Ok(())
}

/// Look the job up by exact name, then reschedule it to never run
async fn unschedule_job(api: &dyn SchedulerApi, name: &str) -> Result<()> {
    let mut job = api
        .search_jobs(name)
        .await
        .context("Failed to look up job")?
        .into_iter()
        .find(|job| job.name == name)
        .with_context(|| format!("No job named {}", name))?;

    api.unschedule_job(&mut job)
        .await
        .with_context(|| format!("Failed to unschedule job {}", name))?;
    println!("{} Unscheduled job {}", "✓".green(), name.cyan());

    Ok(())
}

/// Read a job definition from a JSON file
fn load_job(path: &Path) -> Result<Job> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let job: Job = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid job definition in {}", path.display()))?;

    if job.name.trim().is_empty() {
        bail!("Job definition in {} has no name", path.display());
    }

    Ok(job)
}

/// Parse a `key=value` argument
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got {:?}", s))
}

/// Print a job summary
fn print_job_summary(job: &Job) {
    let state = if job.disabled == Some(true) {
        "disabled".dimmed()
    } else if job.errors_since_last_success.unwrap_or(0) > 0 {
        "failing".red()
    } else {
        "ok".green()
    };

    println!("  {} {} [{}]", "▸".cyan(), job.name.bold(), state);
    println!("    Command:  {}", job.command.dimmed());
    if let Some(schedule) = job.schedule.as_deref().filter(|s| !s.is_empty()) {
        println!("    Schedule: {}", schedule);
    }
    if !job.parents.is_empty() {
        println!("    Parents:  {}", job.parents.join(", "));
    }
    if let Some(success) = job.last_success.as_deref().filter(|s| !s.is_empty()) {
        println!("    Last OK:  {}", success.dimmed());
    }
    if let Some(error) = job.last_error.as_deref().filter(|s| !s.is_empty()) {
        println!("    Last err: {}", error.red());
    }
    println!(
        "    Runs:     {} ok / {} failed",
        job.success_count.unwrap_or(0),
        job.error_count.unwrap_or(0)
    );
    println!();
}
