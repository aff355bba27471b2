//! Tracing initialization (fmt subscriber with env-filter).
//!
//! Log verbosity follows `RUST_LOG`; the default is `info`. Request-level
//! spans come from the `tower_http` trace layer installed in
//! [`crate::build_router`].

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Safe to call once per process;
/// a second call reports an error from `try_init`.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
