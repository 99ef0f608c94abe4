/*!
 * Protocol layer — what goes over the wire.
 *
 * - `types` — the JSON body posted to the webhook
 * - `constants` — pacing interval, success status, path marker
 * - `destination` — webhook URL parsing and validation
 */

pub mod constants;
pub mod destination;
pub mod types;
