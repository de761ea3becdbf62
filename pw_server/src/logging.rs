//! Structured logging configuration.
//!
//! `tracing` subscriber setup for the server plus helpers that emit wallet
//! operations and request summaries as structured events. Records from the
//! `log` facade used by the ledger library are forwarded to the same
//! subscriber.

use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Operations slower than this are logged at `warn`
pub const SLOW_OPERATION: Duration = Duration::from_millis(1000);

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info,sqlx=warn`.
///
/// # Example
///
/// ```no_run
/// use pw_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a completed wallet operation
///
/// # Arguments
///
/// * `operation` - `create`, `get`, `credit` or `debit`
/// * `wallet_id` - Wallet the operation targeted, if known
/// * `outcome` - `ok` or a short error label
/// * `duration` - Time spent in the ledger
///
/// # Example
///
/// ```
/// use pw_server::logging::log_wallet_operation;
/// use std::time::Duration;
///
/// log_wallet_operation("debit", Some(6), "insufficient_funds", Duration::from_millis(3));
/// ```
pub fn log_wallet_operation(
    operation: &str,
    wallet_id: Option<i64>,
    outcome: &str,
    duration: Duration,
) {
    let duration_ms = duration.as_millis() as u64;

    if duration >= SLOW_OPERATION {
        tracing::warn!(
            operation,
            wallet_id,
            outcome,
            duration_ms,
            "Slow wallet operation"
        );
    } else {
        tracing::info!(operation, wallet_id, outcome, duration_ms, "Wallet operation");
    }
}

/// Log API request/response
pub fn log_api_request(request_id: &str, method: &str, path: &str, status_code: u16, duration_ms: u64) {
    tracing::info!(
        request_id,
        http_method = method,
        http_path = path,
        http_status = status_code,
        duration_ms,
        "Request completed"
    );
}
