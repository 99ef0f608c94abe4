use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/**
 * Installs the global `tracing` subscriber.
 *
 * Filter comes from `RUST_LOG`, defaulting to `info`. Thread names are
 * printed so worker lines (`webhook-worker`) stand out from the host's.
 * Does nothing if a subscriber is already installed.
 */
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let formatting_layer = fmt::layer()
        .with_thread_names(true)
        .with_target(true)
        .compact();

    let _ = Registry::default()
        .with(filter)
        .with(formatting_layer)
        .try_init();
}
