//! Client configuration
//!
//! Everything a client needs to reach the scheduler: address, API prefix,
//! per-call timeout and basic-auth credentials. Built once, then only read.

use reqwest::Url;
use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Address of a scheduler running on the local machine
pub const DEFAULT_URL: &str = "http://127.0.0.1:4400";

/// Per-call timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Basic-auth credential pair
///
/// Attached to every request, even when both fields are empty.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Client configuration
///
/// The path of `base_url` is replaced by `api_prefix` joined with the
/// resource path on every request; any query already on `base_url` is kept.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheduler base URL (e.g., "http://127.0.0.1:4400")
    pub base_url: Url,

    /// Path prefix placed before every resource path (e.g., "v1")
    pub api_prefix: String,

    /// Overall timeout for a single request/response round trip
    pub timeout: Duration,

    /// Credentials sent with every request
    pub basic_auth: BasicAuth,
}

impl ClientConfig {
    /// Creates a configuration for the given address with defaults
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ClientError::Config(format!("invalid base url {:?}: {}", base_url, e))
        })?;

        let config = Self {
            base_url,
            ..Self::local()
        };
        config.validate()?;

        Ok(config)
    }

    /// Configuration for a scheduler on `127.0.0.1:4400` with no prefix
    pub fn local() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_URL).expect("DEFAULT_URL is a valid url"),
            api_prefix: String::new(),
            timeout: DEFAULT_TIMEOUT,
            basic_auth: BasicAuth::default(),
        }
    }

    /// Sets the API path prefix
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Sets the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets basic-auth credentials
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = BasicAuth::new(username, password);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ClientError::Config(
                "base url must start with http:// or https://".to_string(),
            ));
        }

        if self.base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base url {} cannot carry a path",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::Config("timeout must be greater than 0".to_string()));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::local()
    }
}
