//! Log output for the research pipeline.
//!
//! Pipeline stages emit `tracing` events: `warn!` when a stage degrades
//! (a failed search, a fallback answer) and `debug!` around each request.
//! This module decides where those events land.

use std::sync::OnceLock;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ConfigError;

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Filter used when neither the caller nor the environment picks one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Environment variable consulted before `RUST_LOG`.
pub const ENV_LOG_FILTER: &str = "RESQ_LOG";

#[derive(Debug, Clone)]
pub struct TelemetryOptions {
    /// Explicit filter directives; wins over the environment.
    pub env_filter: Option<String>,
    pub with_ansi: bool,
}

impl Default for TelemetryOptions {
    fn default() -> Self {
        Self {
            env_filter: None,
            with_ansi: true,
        }
    }
}

impl TelemetryOptions {
    /// Resolves the filter directives: explicit option, `RESQ_LOG`,
    /// `RUST_LOG`, then [`DEFAULT_LOG_FILTER`].
    pub fn filter_with<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        self.env_filter
            .clone()
            .or_else(|| lookup(ENV_LOG_FILTER))
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }
}

/// Sends pipeline logs to stderr.
pub fn init_telemetry(options: TelemetryOptions) -> Result<(), ConfigError> {
    init_telemetry_with_writer(options, std::io::stderr)
}

/// Sends pipeline logs to `writer`.
///
/// Only the first successful call in a process has an effect; later calls
/// return `Ok(())` without touching the installed subscriber.
pub fn init_telemetry_with_writer<W>(options: TelemetryOptions, writer: W) -> Result<(), ConfigError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let directives = options.filter_with(|key| std::env::var(key).ok());

    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::new(directives))
        .with_ansi(options.with_ansi)
        .with_target(false)
        .with_writer(writer)
        .try_init()
        .map_err(|err| ConfigError::Invalid(format!("telemetry init failed: {err}")))?;

    INSTALLED.get_or_init(|| ());
    Ok(())
}
