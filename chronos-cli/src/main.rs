//! Chronos CLI
//!
//! Command-line interface for managing jobs on a Chronos scheduler.

mod commands;
mod config;

use anyhow::Result;
use chronos_client::config::DEFAULT_URL;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chronos")]
#[command(about = "Chronos job scheduler CLI", long_about = None)]
struct Cli {
    /// Scheduler URL
    #[arg(long, env = "CHRONOS_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Path prefix placed before every API path (e.g. "v1")
    #[arg(long, env = "CHRONOS_API_PREFIX", default_value = "")]
    api_prefix: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "CHRONOS_TIMEOUT", default_value_t = 5)]
    timeout: u64,

    /// Basic-auth username
    #[arg(long, env = "CHRONOS_USERNAME", default_value = "")]
    username: String,

    /// Basic-auth password
    #[arg(long, env = "CHRONOS_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chronos_cli=warn,chronos_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        url: cli.url,
        api_prefix: cli.api_prefix,
        timeout: Duration::from_secs(cli.timeout),
        username: cli.username,
        password: cli.password,
    };

    handle_command(cli.command, &config).await
}
