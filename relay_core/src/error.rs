/**
 * Error taxonomy for the relay.
 *
 * `Configuration` and `Worker` are reported at setup, to whoever called
 * `configure()` / `start()`. The other three variants are per-message:
 * the worker logs them and moves on to the next message.
 */
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Empty destination, or an attempt to reconfigure a running queue.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The background worker thread could not be spawned.
    #[error("worker error: {0}")]
    Worker(String),

    /// The destination URL does not look like a webhook endpoint.
    /// Raised before any network I/O takes place.
    #[error("malformed destination: {reason}")]
    MalformedDestination { url: String, reason: String },

    /// Connect, TLS handshake or I/O failure.
    #[error("transport error: {detail}")]
    Transport { detail: String },

    /// The endpoint answered with something other than 204.
    ///
    /// `status_line` is the canonical reason phrase for `status_code`, not
    /// the phrase the server sent: `ureq` does not expose the raw status
    /// line. Non-standard codes therefore carry an empty `status_line`.
    #[error("remote rejected message: HTTP {status_code} {status_line}")]
    RemoteRejected { status_code: u16, status_line: String },
}
