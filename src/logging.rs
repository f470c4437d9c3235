//! Logging setup for the atlas CLI.

use tracing_subscriber::EnvFilter;

/// Initialize console logging, honoring `RUST_LOG` with an `atlas=info`
/// default.
///
/// Skipped-file warnings from the walker and extractors land here; reports
/// themselves are written to files, so no file appender is configured.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("atlas=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
