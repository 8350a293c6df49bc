pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod health;
pub mod identity;
pub mod normalize;
pub mod types;

use tracing_subscriber::EnvFilter;

pub use error::{HealthError, NormalizeError};
pub use health::{HealthMonitor, HealthSnapshot};
pub use identity::MonitorKey;

/// Initialize structured logging with tracing.
/// Respects RUST_LOG env var; defaults to `info` level for relaywatch crates.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("relaywatch=info,relaywatch_lib=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
