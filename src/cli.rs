//! Command-line interface parsing for npsites
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the runtime settings used to build the fetcher and clients.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::cache;
use crate::fetch::{DEFAULT_MIN_DELAY, DEFAULT_TIMEOUT};

/// Cache file used when no XDG cache directory is available
const FALLBACK_CACHE_FILE: &str = "npsites_cache.json";

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A request timeout of zero would fail every live fetch
    #[error("Invalid timeout: must be at least 1 second")]
    ZeroTimeout,

    /// The credential was given but is blank
    #[error("Invalid API key: must not be empty")]
    EmptyApiKey,
}

/// npsites - Browse U.S. national sites by state and find places nearby
#[derive(Parser, Debug)]
#[command(name = "npsites")]
#[command(about = "Browse national sites by state and look up nearby places")]
#[command(version)]
pub struct Cli {
    /// Path of the response cache file
    ///
    /// Defaults to the platform cache directory, e.g. ~/.cache/npsites/cache.json
    #[arg(long, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,

    /// Minimum delay before every live request, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_MIN_DELAY.as_millis() as u64)]
    pub delay_ms: u64,

    /// Timeout for a single live request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// MapQuest API key used for nearby place searches
    #[arg(long, value_name = "KEY", env = "MAPQUEST_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Default log level (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: tracing::Level,
}

/// Settings derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub cache_file: PathBuf,
    pub min_delay: Duration,
    pub timeout: Duration,
    pub api_key: Option<String>,
    pub log_level: tracing::Level,
}

impl RuntimeConfig {
    /// Creates a RuntimeConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(RuntimeConfig)` with defaults filled in
    /// * `Err(CliError)` if a value is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.timeout_secs == 0 {
            return Err(CliError::ZeroTimeout);
        }

        let api_key = match &cli.api_key {
            Some(key) if key.trim().is_empty() => return Err(CliError::EmptyApiKey),
            Some(key) => Some(key.trim().to_string()),
            None => None,
        };

        let cache_file = cli
            .cache_file
            .clone()
            .or_else(cache::default_path)
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_FILE));

        Ok(RuntimeConfig {
            cache_file,
            min_delay: Duration::from_millis(cli.delay_ms),
            timeout: Duration::from_secs(cli.timeout_secs),
            api_key,
            log_level: cli.log_level,
        })
    }
}
