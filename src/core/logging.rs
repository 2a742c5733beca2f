//! Logging configuration and initialization
//!
//! Sets up the tracing subscriber. All log output goes to stderr because
//! stdout is reserved for the model's reply.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when the configured one is missing or unrecognised
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Normalise a configured log level into an `EnvFilter` directive
///
/// Only the first word is considered so trailing comments in config values
/// are ignored. `warning` maps to `warn` and `critical` to `error`.
pub fn normalize_level(log_level: &str) -> &'static str {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or(DEFAULT_LOG_LEVEL)
        .to_lowercase();

    match level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => DEFAULT_LOG_LEVEL,
    }
}

/// Initialize the logging system with the specified level
///
/// `RUST_LOG`, when set, takes precedence over `log_level`.
pub fn init_logging(log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(normalize_level(log_level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_level("warning"), "warn");
        assert_eq!(normalize_level("CRITICAL"), "error");
        assert_eq!(normalize_level("debug # verbose"), "debug");
    }

    #[test]
    fn test_normalize_falls_back() {
        assert_eq!(normalize_level("loud"), DEFAULT_LOG_LEVEL);
        assert_eq!(normalize_level(""), DEFAULT_LOG_LEVEL);
    }
}
