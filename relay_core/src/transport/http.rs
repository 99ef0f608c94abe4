/*!
 * HTTP transport layer for delivering messages to the webhook endpoint.
 *
 * Uses `ureq` — a pure-Rust blocking HTTP client with rustls, no async
 * runtime. The worker is already a dedicated background thread, so
 * blocking I/O is fine there.
 *
 * Design decisions:
 * - **One connection per message** — every request carries
 *   `Connection: close`, nothing is pooled between sends.
 * - **Single attempt** — no retries. Retry policy belongs to the caller,
 *   and the queue deliberately has none.
 * - **Status line only** — success is decided on the status code; the
 *   response body is never read.
 */

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::error::{Error, Result};
use crate::protocol::constants::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, SUCCESS_STATUS,
};
use crate::protocol::destination::Destination;
use crate::protocol::types::WebhookBody;

// ---------------------------------------------------------------------------
// Transport trait
// ---------------------------------------------------------------------------

/**
 * Delivers one message to one destination.
 *
 * The dispatch queue is generic over this trait so the worker can be
 * driven by something other than a real network client.
 * Implementations are called from the worker thread only, one call at a
 * time.
 */
pub trait Transport: Send + Sync + 'static {
    /**
     * Sends `payload` to `destination`.
     *
     * Returns `Ok(())` only when the endpoint accepted the message.
     */
    fn send(&self, destination: &str, payload: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// TransportOptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    /// Upper bound on DNS + TCP connect + TLS handshake.
    pub connect_timeout: Duration,

    /// Upper bound on the whole request, response status included.
    pub request_timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// WebhookTransport
// ---------------------------------------------------------------------------

/**
 * Thin wrapper around `ureq::Agent` that POSTs `{"content": ...}` to a
 * webhook URL.
 *
 * Non-2xx statuses are not turned into errors by the agent; the status
 * is inspected here so every non-204 answer maps to `RemoteRejected`.
 */
pub struct WebhookTransport {
    agent: Agent,
}

impl WebhookTransport {
    pub fn new(options: TransportOptions) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_connect(Some(options.connect_timeout))
            .timeout_global(Some(options.request_timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent }
    }
}

impl Default for WebhookTransport {
    fn default() -> Self {
        Self::new(TransportOptions::default())
    }
}

impl Transport for WebhookTransport {
    fn send(&self, destination: &str, payload: &str) -> Result<()> {
        /*
         * Validate the destination before touching the network.
         */
        let destination = Destination::parse(destination)?;
        let body = WebhookBody::new(payload);

        debug!(
            host = destination.host(),
            port = destination.port(),
            tls = destination.is_tls(),
            bytes = payload.len(),
            "posting webhook message"
        );

        /*
         * Serialize ourselves: the body must be the compact
         * `{"content":"..."}` form, byte for byte. A fixed-size body gives
         * an explicit `Content-Length`; `Host` comes from the URL.
         */
        let json = body.to_json().map_err(|e| Error::Transport {
            detail: format!("failed to encode message body: {e}"),
        })?;

        let response = self
            .agent
            .post(destination.request_url())
            .header("Content-Type", "application/json")
            .header("Connection", "close")
            .send(json.into_bytes())
            .map_err(|e| Error::Transport {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status.as_u16() == SUCCESS_STATUS {
            Ok(())
        } else {
            Err(Error::RemoteRejected {
                status_code: status.as_u16(),
                status_line: status.canonical_reason().unwrap_or_default().to_string(),
            })
        }
    }
}
