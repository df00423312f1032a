//! Configuration module
//!
//! Handles CLI configuration and turns it into a client configuration.

use anyhow::{Context, Result};
use chronos_client::ClientConfig;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the scheduler
    pub url: String,
    /// Path prefix for every API call
    pub api_prefix: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub username: String,
    pub password: String,
}

impl Config {
    /// Builds the client configuration
    pub fn client_config(&self) -> Result<ClientConfig> {
        let config = ClientConfig::new(&self.url)
            .with_context(|| format!("Invalid scheduler URL: {}", self.url))?
            .with_api_prefix(self.api_prefix.clone())
            .with_timeout(self.timeout)
            .with_basic_auth(self.username.clone(), self.password.clone());

        config.validate().context("Invalid client configuration")?;

        Ok(config)
    }
}
