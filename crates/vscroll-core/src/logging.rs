#![forbid(unsafe_code)]

//! Logging bootstrap.
//!
//! The engine logs through `tracing` unconditionally; installing a
//! subscriber is the host's business. With the `tracing-json` feature this
//! module provides a ready-made JSON subscriber filtered by the
//! `VSCROLL_LOG` environment variable (`EnvFilter` syntax, default `warn`).

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "VSCROLL_LOG";

/// Default filter when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Target used by every engine span and event.
pub const TARGET: &str = "vscroll";

/// Resolve the filter directive from an environment lookup.
#[must_use]
pub fn filter_directive_with<F>(get: F) -> String
where
    F: FnOnce(&str) -> Option<String>,
{
    get(LOG_ENV)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let directive = filter_directive_with(|key| std::env::var(key).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
