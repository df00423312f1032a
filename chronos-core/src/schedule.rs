//! Recurrence strings
//!
//! The scheduler describes when a job runs with a three-part string
//! `<repetitions>/<start>/<interval>`:
//! - repetitions: `R` for forever, `R<n>` for n runs
//! - start: an RFC-3339 timestamp, or empty to start immediately
//! - interval: an ISO-8601 duration such as `PT2M` or `P1D`
//!
//! e.g. `R5/2023-01-01T00:00:00Z/PT1H` or `R1//PT2M`.

use chrono::{DateTime, TimeZone};
use thiserror::Error;

/// Run once, immediately, retrying every 2 minutes until the run succeeds
pub const RUN_ONCE_NOW_SCHEDULE: &str = "R1//PT2M";

/// Window the scheduler allows a run-once job to start late
pub const RUN_ONCE_EPSILON: &str = "PT10M";

/// Zero repetitions: the job stays registered but never runs again
pub const UNSCHEDULE_SCHEDULE: &str = "R0//PT0M";

/// Errors produced while building a recurrence string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Repetitions string not formatted correctly: {0:?}")]
    InvalidRepetitions(String),

    #[error("Interval string not formatted correctly: {0:?}")]
    InvalidInterval(String),
}

/// Builds a recurrence string for a scheduled job
///
/// # Arguments
/// * `start_time` - When the first run happens; `None` means now
/// * `interval` - ISO-8601 duration between runs, must start with `P`
/// * `repetitions` - `R` (forever) or `R<n>`
///
/// Only the leading designators are checked. A well-formed prefix with a
/// nonsensical body (e.g. `P3X`) is passed through to the server untouched.
///
/// # Example
/// ```
/// use chronos_core::schedule::format_schedule;
///
/// let schedule = format_schedule(None::<&chrono::DateTime<chrono::Utc>>, "PT1H", "R5").unwrap();
/// assert_eq!(schedule, "R5//PT1H");
/// ```
pub fn format_schedule<Tz: TimeZone>(
    start_time: Option<&DateTime<Tz>>,
    interval: &str,
    repetitions: &str,
) -> Result<String, ScheduleError> {
    validate_interval(interval)?;
    validate_repetitions(repetitions)?;

    let start = start_time.map(format_timestamp).unwrap_or_default();

    Ok(format!("{}/{}/{}", repetitions, start, interval))
}

/// Schedule used by run-once-now submissions
pub fn run_once_now_schedule() -> &'static str {
    RUN_ONCE_NOW_SCHEDULE
}

/// Renders a timestamp the way the scheduler expects it
///
/// RFC-3339 with the fractional part trimmed of trailing zeros (omitted
/// entirely on whole seconds), and `Z` for a zero UTC offset.
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    let time = time.fixed_offset();
    let mut out = time.format("%Y-%m-%dT%H:%M:%S").to_string();

    // Leap seconds are reported as nanos >= 1s
    let nanos = time.timestamp_subsec_nanos() % 1_000_000_000;
    if nanos > 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }

    if time.offset().local_minus_utc() == 0 {
        out.push('Z');
    } else {
        out.push_str(&time.format("%:z").to_string());
    }

    out
}

fn validate_repetitions(repetitions: &str) -> Result<(), ScheduleError> {
    match repetitions.strip_prefix('R') {
        Some(count) if count.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        _ => Err(ScheduleError::InvalidRepetitions(repetitions.to_string())),
    }
}

fn validate_interval(interval: &str) -> Result<(), ScheduleError> {
    if interval.starts_with('P') {
        Ok(())
    } else {
        Err(ScheduleError::InvalidInterval(interval.to_string()))
    }
}
