/**
 * Relay-wide constants.
 *
 * Values are dictated by the webhook endpoint: it answers `204 No Content`
 * on acceptance and allows 5 requests per 2 seconds per webhook.
 */
use std::time::Duration;

/// Minimum pause after every send attempt.
/// 600 ms keeps a single serial sender under 5 requests / 2 s with margin.
pub const PACING_INTERVAL: Duration = Duration::from_millis(600);

/// The only status code treated as a successful delivery.
pub const SUCCESS_STATUS: u16 = 204;

/// Marker that every webhook URL path must contain.
/// The request path sent on the wire starts here.
pub const WEBHOOK_PATH_MARKER: &str = "/api/webhooks";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

