/**
 * Transport layer — HTTP delivery and the background worker thread.
 *
 * Everything related to *how* messages reach the webhook:
 * - `http` — `Transport` trait and the ureq-based implementation
 * - `worker` — background thread, cancellation, pacing
 */

pub mod http;
pub mod worker;

pub use http::{Transport, TransportOptions, WebhookTransport};
pub use worker::{Pacer, Worker, WorkerHandle};
