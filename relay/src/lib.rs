/**
 * Relay — webhook notifications for long-running servers.
 *
 * This is the crate hosts should depend on. It re-exports the core queue
 * and adds the pieces a host needs around it: TOML configuration, logging
 * setup, and startup/shutdown hooks.
 *
 * # Quick start
 *
 * ```ignore
 * fn main() -> anyhow::Result<()> {
 *     relay::init_logging();
 *     let config = relay::load_config("relay.toml")?;
 *
 *     let hooks = relay::WebhookHooks::new(config.webhook);
 *     hooks.on_startup();
 *
 *     hooks.queue().enqueue("server online");
 *
 *     // pending messages are dropped, the worker is joined
 *     hooks.on_shutdown();
 *     Ok(())
 * }
 * ```
 */

pub mod config;
pub mod hooks;
pub mod logging;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use config::{load_config, RelayConfig, WebhookConfig};
pub use hooks::WebhookHooks;
pub use logging::init_logging;
pub use relay_core::{
    DispatchQueue, Error, QueueOptions, Result, Transport, TransportOptions, WebhookTransport,
    WorkerState, PACING_INTERVAL,
};
