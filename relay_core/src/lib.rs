/*!
 * Relay Core — rate-limited webhook delivery.
 *
 * Callers enqueue text messages; one background worker takes them off the
 * queue in order, POSTs each to a webhook as `{"content": "..."}`, and
 * pauses a fixed interval after every send to stay under the endpoint's
 * rate limit.
 *
 * Fire-and-forget: no retries, no persistence, no delivery receipts.
 * Failures are logged through `tracing` and the worker moves on.
 *
 * # Module structure
 *
 * - `protocol/` — what we send: body type, constants, destination parsing
 * - `transport/` — how we deliver: HTTP client, background worker
 * - `queue` — queue lifecycle: configure, enqueue, start, stop
 * - `error` — error taxonomy
 *
 * # Example
 *
 * ```ignore
 * use std::sync::Arc;
 * use relay_core::DispatchQueue;
 *
 * let queue: Arc<DispatchQueue> = Arc::new(DispatchQueue::default());
 * queue.configure("https://discord.com/api/webhooks/<id>/<token>")?;
 * queue.start()?;
 *
 * queue.enqueue("server started");
 *
 * // at shutdown: pending messages are dropped, the worker is joined
 * queue.stop();
 * ```
 */

mod error;
mod protocol;
mod queue;
mod transport;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::{Error, Result};
pub use protocol::constants::{PACING_INTERVAL, SUCCESS_STATUS, WEBHOOK_PATH_MARKER};
pub use protocol::destination::{redact, Destination};
pub use protocol::types::WebhookBody;
pub use queue::{DispatchQueue, QueueOptions, WorkerState};
pub use transport::{Transport, TransportOptions, WebhookTransport};
