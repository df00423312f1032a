//! Chronos HTTP Client
//!
//! A small, type-safe client for the Chronos job scheduler's HTTP/JSON API.
//!
//! Every operation is a single request/response round trip. The client holds
//! no session state: each call builds its own request target from the
//! read-only [`ClientConfig`], so one client can be shared across tasks.
//!
//! # Example
//!
//! ```no_run
//! use chronos_client::{ChronosClient, ClientConfig, SchedulerApi};
//! use chronos_core::domain::job::Job;
//! use chronos_core::schedule::format_schedule;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::new("http://127.0.0.1:4400")?.with_api_prefix("v1");
//!     let client = ChronosClient::connect(config).await?;
//!
//!     let schedule = format_schedule(None::<&chrono::DateTime<chrono::Utc>>, "PT1H", "R")?;
//!     client
//!         .add_scheduled_job(&Job::scheduled("hourly-report", "./report.sh", schedule))
//!         .await?;
//!
//!     for job in client.jobs().await? {
//!         println!("{}", job.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
mod executor;
mod jobs;
pub mod request;

// Re-export commonly used types
pub use api::SchedulerApi;
pub use config::{BasicAuth, ClientConfig};
pub use error::{ClientError, Result};
pub use jobs::{
    ADD_DEPENDENT_JOB_PATH, ADD_SCHEDULED_JOB_PATH, JOB_PATH, JOBS_PATH, KILL_JOB_TASKS_PATH,
    SEARCH_JOBS_PATH,
};

use reqwest::Client;
use std::sync::Arc;

/// HTTP client for the Chronos scheduler API
///
/// Cheap to clone; clones share the configuration and the connection pool.
#[derive(Debug, Clone)]
pub struct ChronosClient {
    /// Read-only configuration shared by every request
    config: Arc<ClientConfig>,
    /// HTTP client instance
    http: Client,
}

impl ChronosClient {
    /// Create a new client without contacting the scheduler
    ///
    /// # Arguments
    /// * `config` - Address, prefix, timeout and credentials
    ///
    /// # Example
    /// ```
    /// use chronos_client::{ChronosClient, ClientConfig};
    ///
    /// let client = ChronosClient::new(ClientConfig::local()).unwrap();
    /// assert_eq!(client.config().base_url.as_str(), "http://127.0.0.1:4400/");
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Create a client and make sure the scheduler answers
    ///
    /// Lists jobs once as a reachability check. A failed check is reported as
    /// [`ClientError::Unreachable`] wrapping the underlying error.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;

        if let Err(err) = client.jobs().await {
            tracing::warn!("Connectivity check against {} failed: {}", client.config.base_url, err);
            return Err(ClientError::Unreachable(Box::new(err)));
        }

        tracing::info!("Connected to chronos at {}", client.config.base_url);

        Ok(client)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
