//! Scheduler capability set
//!
//! Consumers should depend on [`SchedulerApi`] rather than on
//! [`crate::ChronosClient`] directly so tests can substitute a double.

use async_trait::async_trait;
use chronos_core::domain::job::{Job, Jobs};

use crate::error::Result;

/// Operations the scheduler exposes
///
/// Each operation is exactly one request/response round trip.
#[async_trait]
pub trait SchedulerApi: Send + Sync {
    /// Lists every job the scheduler knows about
    async fn jobs(&self) -> Result<Jobs>;

    /// Finds jobs matching `name`
    ///
    /// Fails with a validation error, without any request, when `name` is
    /// blank.
    async fn search_jobs(&self, name: &str) -> Result<Jobs>;

    /// Deletes a job
    async fn delete_job(&self, name: &str) -> Result<()>;

    /// Kills all running tasks of a job
    async fn delete_job_tasks(&self, name: &str) -> Result<()>;

    /// Starts a job right away
    ///
    /// # Arguments
    /// * `name` - The job to start
    /// * `args` - Appended to the job's command by the scheduler, in order
    async fn start_job(&self, name: &str, args: &[(String, String)]) -> Result<()>;

    /// Adds (or replaces) a schedule-driven job
    async fn add_scheduled_job(&self, job: &Job) -> Result<()>;

    /// Adds (or replaces) a job that runs after its parents
    async fn add_dependent_job(&self, job: &Job) -> Result<()>;

    /// Submits `job` to run once, now
    ///
    /// Overwrites `job.schedule` with the run-once schedule and
    /// `job.epsilon` with a 10 minute window before submitting it as a
    /// scheduled job.
    async fn run_once_now_job(&self, job: &mut Job) -> Result<()>;

    /// Stops `job` from running again by rescheduling it with zero
    /// repetitions; overwrites `job.schedule`
    async fn unschedule_job(&self, job: &mut Job) -> Result<()>;
}
