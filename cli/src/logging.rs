//! # Logging Setup
//!
//! Initializes the `tracing` subscriber for the sandbox binary. Log output
//! goes to stderr so stdout stays clean for the JSON state summary.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber. Call once, early in `main()`.
///
/// `default_filter` applies when `RUST_LOG` is unset; `json` switches from
/// human-readable lines to machine-parseable JSON lines.
pub fn init(default_filter: &str, json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
