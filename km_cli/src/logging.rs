//! Structured logging configuration.
//!
//! Library crates log through `log`; the subscriber installed here also
//! picks those records up, so one `RUST_LOG` filter covers everything.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn,kaartmiddag=info,km_cli=info,sqlx=warn";

/// Initialize structured logging on stderr
///
/// Stdout carries command output only, so logs never mix with exports
/// piped to a file.
///
/// # Example
///
/// ```no_run
/// use km_cli::logging;
///
/// logging::init();
/// tracing::info!("Starting");
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // A subscriber may already be installed
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

/// Log an operator intent with structured data
///
/// # Arguments
///
/// * `command` - Command name as typed
/// * `event` - Event title, if the command targets one
/// * `accepted` - Whether the intent was committed
pub fn log_intent(command: &str, event: Option<&str>, accepted: bool) {
    if accepted {
        tracing::info!(command = command, event = event, "Intent committed");
    } else {
        tracing::warn!(command = command, event = event, "Intent rejected");
    }
}

/// Log a storage operation
///
/// # Arguments
///
/// * `operation` - What was done (open, import, export)
/// * `store` - Store kind
/// * `duration_ms` - Duration in milliseconds
pub fn log_storage_operation(operation: &str, store: &str, duration_ms: u64) {
    tracing::debug!(
        operation = operation,
        store = store,
        duration_ms = duration_ms,
        "Storage operation"
    );

    if duration_ms > 1000 {
        tracing::warn!(
            operation = operation,
            store = store,
            duration_ms = duration_ms,
            "Slow storage operation"
        );
    }
}
