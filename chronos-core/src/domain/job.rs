//! Job domain types

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A single key/value entry as the scheduler encodes it, e.g.
/// `{"key": "privileged", "value": "true"}` or
/// `{"containerPath": "/data", "hostPath": "/mnt/data", "mode": "RW"}`.
pub type KeyValues = BTreeMap<String, String>;

/// Jobs as returned by listing and search, in server order
pub type Jobs = Vec<Job>;

/// Job configuration and status as understood by the scheduler
///
/// A job is either schedule-driven (`schedule` set, `parents` empty) or
/// dependency-driven (`parents` set, no `schedule`). The two kinds are
/// submitted to different endpoints; nothing here prevents building a hybrid.
///
/// Every optional field is left out of the JSON payload when unset so the
/// server keeps its own defaults. An explicit `null` from the server decodes
/// the same as a missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Job {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor_flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "async", skip_serializing_if = "Option::is_none")]
    pub is_async: Option<bool>,

    // Telemetry reported by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors_since_last_success: Option<u64>,

    // Resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpus: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soft_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_processing_job_type: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_priority: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_as_user: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub uris: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub environment_variables: Vec<KeyValues>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,

    // Scheduling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_time_zone: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub constraints: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub parents: Vec<String>,
}

impl Job {
    /// Creates a job with only a name and a command set
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            ..Default::default()
        }
    }

    /// Creates a schedule-driven job
    ///
    /// # Arguments
    /// * `schedule` - A recurrence string, see [`crate::schedule::format_schedule`]
    pub fn scheduled(
        name: impl Into<String>,
        command: impl Into<String>,
        schedule: impl Into<String>,
    ) -> Self {
        Self {
            schedule: Some(schedule.into()),
            ..Self::new(name, command)
        }
    }

    /// Creates a job that runs after all of `parents` complete
    pub fn dependent<I, S>(
        name: impl Into<String>,
        command: impl Into<String>,
        parents: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parents: parents.into_iter().map(Into::into).collect(),
            ..Self::new(name, command)
        }
    }

    /// True when the job carries a schedule and no parents
    pub fn is_scheduled(&self) -> bool {
        self.schedule.as_deref().is_some_and(|s| !s.is_empty()) && self.parents.is_empty()
    }

    /// True when the job names at least one parent and carries no schedule
    pub fn is_dependent(&self) -> bool {
        !self.parents.is_empty() && self.schedule.as_deref().is_none_or(str::is_empty)
    }
}

/// Isolated execution environment for a job
///
/// Volumes and parameters are kept in the order given; the scheduler passes
/// them to the container runtime in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub volumes: Vec<KeyValues>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub parameters: Vec<KeyValues>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
