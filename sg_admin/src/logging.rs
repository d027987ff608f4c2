//! Structured logging configuration.
//!
//! Log output goes to stderr so that command results on stdout stay
//! machine-readable. Records emitted by the library through the `log` facade
//! are forwarded into the same subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Levels are configurable through the `RUST_LOG` env var
/// (default: `info,sqlx=warn`).
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Structured logging initialized");
}

/// Log an administrative action and its outcome
///
/// # Arguments
///
/// * `action` - Command that was run, e.g. `team delete`
/// * `target` - Entity the action applied to
/// * `outcome` - `ok` or the error kind
pub fn log_admin_action(action: &str, target: &str, outcome: &str) {
    if outcome == "ok" {
        tracing::info!(action = action, target_entity = target, outcome = outcome, "ADMIN: action completed");
    } else {
        tracing::warn!(action = action, target_entity = target, outcome = outcome, "ADMIN: action failed");
    }
}

/// Log security event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of security event
/// * `handle` - Optional account handle involved
/// * `message` - Event message
pub fn log_security_event(event_type: &str, handle: Option<&str>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        handle = handle,
        "SECURITY: {}",
        message
    );
}
