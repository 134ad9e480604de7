//! # Logging
//!
//! Structured logging for the generator, built on `tracing` and
//! `tracing-subscriber`. Logs go to stderr so that stdout stays clean for
//! `toolgen inspect` output.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: standard filter; takes precedence over the level below
//! - `TOOLGEN_LOG_LEVEL`: `trace`, `debug`, `info` (default), `warn`, `error`
//! - `TOOLGEN_LOG_FORMAT`: `pretty` (default) or `json`
//! - `TOOLGEN_LOG_TARGET_FILTER`: extra comma-separated directives,
//!   e.g. `openapi_toolgen::spec=debug`
//! - `TOOLGEN_LOG_INCLUDE_LOCATION`: `true` to print file and line

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for log collectors
    Json,
    /// Human-readable lines (default)
    Pretty,
}

impl LogFormat {
    /// Parse a `TOOLGEN_LOG_FORMAT` value; anything but `json` is [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Logging settings read from the `TOOLGEN_LOG_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is unset (`TOOLGEN_LOG_LEVEL`)
    pub log_level: String,
    /// Output format (`TOOLGEN_LOG_FORMAT`)
    pub format: LogFormat,
    /// Extra comma-separated filter directives (`TOOLGEN_LOG_TARGET_FILTER`)
    pub target_filter: Option<String>,
    /// Print file and line of each event (`TOOLGEN_LOG_INCLUDE_LOCATION`)
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Read the `TOOLGEN_LOG_*` variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; missing or unparsable values fall back to defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            log_level: lookup("TOOLGEN_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("TOOLGEN_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: lookup("TOOLGEN_LOG_TARGET_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: lookup("TOOLGEN_LOG_INCLUDE_LOCATION")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// The filter this config describes; `RUST_LOG` wins over `log_level` when set.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for directive in target_filter.split(',') {
                let directive = directive.trim();
                if directive.is_empty() {
                    continue;
                }
                match directive.parse() {
                    Ok(d) => filter = filter.add_directive(d),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {directive}"),
                }
            }
        }
        filter
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}

/// Install the global subscriber from the environment.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LogConfig::from_env())
}
