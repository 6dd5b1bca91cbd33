//! # Logging
//!
//! `tracing` subscriber setup. Logs go to stderr so command output on stdout
//! stays machine-readable.
//!
//! `RUST_LOG` wins when set; otherwise the crate logs at `LOG_LEVEL`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Default filter directive for a log level, e.g. `auth0_resources=info`
#[must_use]
pub fn default_directive(log_level: &str) -> String {
    let level = log_level.to_lowercase();
    format!("auth0_resources={level},auth0ctl={level}")
}

/// Install the global tracing subscriber
///
/// `log_format` selects `json` or human-readable `text` output.
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if log_format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_lowercases_level() {
        assert_eq!(
            default_directive("DEBUG"),
            "auth0_resources=debug,auth0ctl=debug"
        );
    }

    #[test]
    fn test_default_directive_is_a_valid_filter() {
        assert!(EnvFilter::try_new(default_directive("WARN")).is_ok());
    }
}
