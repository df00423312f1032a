//! Job-related API endpoints

use async_trait::async_trait;
use chronos_core::domain::job::{Job, Jobs};
use chronos_core::schedule::{RUN_ONCE_EPSILON, UNSCHEDULE_SCHEDULE, run_once_now_schedule};

use crate::ChronosClient;
use crate::api::SchedulerApi;
use crate::error::{ClientError, Result};
use crate::request::join_path;

pub const JOB_PATH: &str = "scheduler/job";
pub const JOBS_PATH: &str = "scheduler/jobs";
pub const SEARCH_JOBS_PATH: &str = "scheduler/jobs/search";
pub const KILL_JOB_TASKS_PATH: &str = "scheduler/task/kill";
pub const ADD_SCHEDULED_JOB_PATH: &str = "scheduler/iso8601";
pub const ADD_DEPENDENT_JOB_PATH: &str = "scheduler/dependency";

#[async_trait]
impl SchedulerApi for ChronosClient {
    // =============================================================================
    // Job Query
    // =============================================================================

    async fn jobs(&self) -> Result<Jobs> {
        let mut jobs = Jobs::new();
        self.api_get(JOBS_PATH, &[], &mut jobs).await?;

        Ok(jobs)
    }

    async fn search_jobs(&self, name: &str) -> Result<Jobs> {
        if name.trim().is_empty() {
            return Err(ClientError::Validation(
                "search requires a non-blank job name".to_string(),
            ));
        }

        let mut jobs = Jobs::new();
        self.api_get(SEARCH_JOBS_PATH, &[("name", name)], &mut jobs).await?;

        Ok(jobs)
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    async fn delete_job(&self, name: &str) -> Result<()> {
        self.api_delete(&join_path(JOB_PATH, name)).await?;
        Ok(())
    }

    async fn delete_job_tasks(&self, name: &str) -> Result<()> {
        self.api_delete(&join_path(KILL_JOB_TASKS_PATH, name)).await?;
        Ok(())
    }

    async fn start_job(&self, name: &str, args: &[(String, String)]) -> Result<()> {
        let params: Vec<(&str, &str)> = args
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();

        self.api_put(&join_path(JOB_PATH, name), &params).await?;
        Ok(())
    }

    // =============================================================================
    // Job Submission
    // =============================================================================

    async fn add_scheduled_job(&self, job: &Job) -> Result<()> {
        tracing::debug!("Submitting scheduled job: {}", job.name);

        self.api_post(ADD_SCHEDULED_JOB_PATH, job).await?;
        Ok(())
    }

    async fn add_dependent_job(&self, job: &Job) -> Result<()> {
        tracing::debug!("Submitting dependent job: {}", job.name);

        self.api_post(ADD_DEPENDENT_JOB_PATH, job).await?;
        Ok(())
    }

    async fn run_once_now_job(&self, job: &mut Job) -> Result<()> {
        job.schedule = Some(run_once_now_schedule().to_string());
        job.epsilon = Some(RUN_ONCE_EPSILON.to_string());

        self.add_scheduled_job(job).await
    }

    async fn unschedule_job(&self, job: &mut Job) -> Result<()> {
        job.schedule = Some(UNSCHEDULE_SCHEDULE.to_string());

        self.add_scheduled_job(job).await
    }
}
