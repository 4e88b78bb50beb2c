//! Nightbot command-line client
//!
//! Thin front end over the SDK:
//! 1. Loads the TOML config and the stored token pair
//! 2. Runs one subcommand through `nightbot_api::Client`
//! 3. Prints the result as pretty JSON
//!
//! Refreshed tokens are written back to the token file by the refresh hook.

mod cli;
mod config;
mod run;
mod token_store;

use anyhow::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable JSON
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with(json_logs.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json_logs).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = cli::parse(&args)?;

    let config_path = Config::resolve_path(args.config.as_deref());
    debug!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    debug!(
        base_url = %config.api.base_url,
        token_path = %config.tokens.path.display(),
        "configuration loaded"
    );

    let output = run::run(&config, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
