use tracing_subscriber::{fmt, EnvFilter};

/// Installs a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Calling it again after a subscriber is set is a no-op.
pub fn install() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
