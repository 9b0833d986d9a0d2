//! Tracing subscriber setup for applications using the client
//!
//! `RUST_LOG` wins over the filter passed in. Secrets never reach the
//! subscriber: the client renders them masked.

use kelvin_domain::{KelvinError, Result};
use tracing_subscriber::EnvFilter;

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install a global human readable subscriber, e.g. `init("kelvin_client=info")`.
pub fn init(default_filter: &str) -> Result<()> {
    init_with(default_filter, LogFormat::Text)
}

/// Install a global subscriber in the given format.
///
/// # Errors
/// Returns `KelvinError::Config` if the filter does not parse or a global
/// subscriber is already installed.
pub fn init_with(default_filter: &str, format: LogFormat) -> Result<()> {
    let filter = env_filter(default_filter)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| KelvinError::Config(format!("Failed to install tracing subscriber: {e}")))
}

fn env_filter(default_filter: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| KelvinError::Config(format!("Invalid log filter {default_filter:?}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_default_filter() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert!(matches!(env_filter("kelvin_client=loudest"), Err(KelvinError::Config(_))));
        assert!(env_filter("kelvin_client=debug").is_ok());
    }
}
