//! Schedule command handler
//!
//! Prints recurrence strings without talking to the scheduler.

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use chronos_core::schedule::{format_schedule, run_once_now_schedule};
use clap::Args;

/// Arguments for building a recurrence string
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// First run as an RFC 3339 timestamp; omit to start immediately
    #[arg(long)]
    start: Option<DateTime<FixedOffset>>,

    /// ISO-8601 duration between runs (e.g. PT1H, P1D)
    #[arg(long, required_unless_present = "run_once_now")]
    interval: Option<String>,

    /// Number of runs: "R" for forever, "R5" for five
    #[arg(long, default_value = "R")]
    reps: String,

    /// Print the run-once-now schedule instead
    #[arg(long, conflicts_with_all = ["start", "interval"])]
    run_once_now: bool,
}

/// Handle the schedule command
pub fn handle_schedule_command(args: ScheduleArgs) -> Result<()> {
    println!("{}", render(&args)?);
    Ok(())
}

fn render(args: &ScheduleArgs) -> Result<String> {
    if args.run_once_now {
        return Ok(run_once_now_schedule().to_string());
    }

    let interval = args.interval.as_deref().unwrap_or_default();
    Ok(format_schedule(args.start.as_ref(), interval, &args.reps)?)
}
