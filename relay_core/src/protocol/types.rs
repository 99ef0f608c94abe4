/**
 * Wire types for the webhook endpoint.
 *
 * The endpoint accepts a JSON object with a single `content` field:
 * ```json
 * { "content": "server restarted" }
 * ```
 * Serialization goes through `serde_json`, so quotes, backslashes and
 * control characters in the message text are escaped properly.
 */
use serde::Serialize;

/**
 * The JSON body POSTed for one message. Borrows the payload so the
 * worker does not copy the text again just to serialize it.
 */
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WebhookBody<'a> {
    /// Message text exactly as it was enqueued.
    pub content: &'a str,
}

impl<'a> WebhookBody<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content }
    }

    /// Compact JSON form, exactly what goes on the wire.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
