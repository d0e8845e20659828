//! Tracing setup shared by the Agent Service and Gateway Service binaries.

use tracing_subscriber::EnvFilter;

/// Initializes a `tracing-subscriber` `fmt` layer with an `EnvFilter` read
/// from `RUST_LOG`, defaulting to `info`. Safe to call once per process;
/// a second call is a no-op (the underlying `try_init` just returns Err).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
