/**
 * Webhook destination parsing.
 *
 * A webhook URL looks like:
 * `https://discord.com/api/webhooks/{webhook_id}/{webhook_token}`
 *
 * The path itself is the credential, so it is never logged. Parsing splits
 * the URL into what the connection needs (host, port, TLS or not) and what
 * the request line needs (the path from `/api/webhooks` onward, query
 * string included).
 *
 * Plain `http` is only accepted for loopback hosts, which is what local
 * relays and the integration tests use.
 */
use std::net::IpAddr;

use url::{Host, Url};

use crate::error::{Error, Result};
use crate::protocol::constants::WEBHOOK_PATH_MARKER;

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    tls: bool,
    host: String,
    port: u16,
    path: String,
}

impl Destination {
    /**
     * Parses and validates a webhook URL.
     *
     * Fails with `MalformedDestination` when the URL cannot be parsed, uses
     * an unsupported scheme, has no host, or its path does not continue
     * past `/api/webhooks/`.
     */
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| malformed(raw, e.to_string()))?;

        let host = match url.host() {
            Some(host) => host,
            None => return Err(malformed(raw, "missing host")),
        };

        let tls = match url.scheme() {
            "https" => true,
            "http" if is_loopback(&host) => false,
            "http" => return Err(malformed(raw, "plain http is only allowed for loopback hosts")),
            other => return Err(malformed(raw, format!("unsupported scheme `{other}`"))),
        };

        let port = url
            .port_or_known_default()
            .ok_or_else(|| malformed(raw, "cannot determine port"))?;

        /*
         * Everything before the marker is dropped, everything after it must
         * be a non-empty `/{id}/{token}` tail.
         */
        let full_path = url.path();
        let start = full_path
            .find(WEBHOOK_PATH_MARKER)
            .ok_or_else(|| malformed(raw, format!("path does not contain `{WEBHOOK_PATH_MARKER}`")))?;
        let tail = &full_path[start + WEBHOOK_PATH_MARKER.len()..];
        let has_tail = tail
            .strip_prefix('/')
            .is_some_and(|rest| !rest.trim_matches('/').is_empty());
        if !has_tail {
            return Err(malformed(raw, "missing webhook id and token"));
        }

        let mut path = full_path[start..].to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            tls,
            host: url.host_str().unwrap_or_default().to_string(),
            port,
            path,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /**
     * The URL actually requested: configured host, port when it is not
     * the scheme's default, normalized path. Contains the credential, do
     * not log it.
     */
    pub fn request_url(&self) -> String {
        let (scheme, default_port) = if self.tls { ("https", 443) } else { ("http", 80) };
        if self.port == default_port {
            format!("{scheme}://{}{}", self.host, self.path)
        } else {
            format!("{scheme}://{}:{}{}", self.host, self.port, self.path)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => name.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(ip) => IpAddr::V4(*ip).is_loopback(),
        Host::Ipv6(ip) => IpAddr::V6(*ip).is_loopback(),
    }
}

fn malformed(raw: &str, reason: impl Into<String>) -> Error {
    Error::MalformedDestination {
        url: redact(raw),
        reason: reason.into(),
    }
}

/**
 * Strips the credential part of a webhook URL so it can appear in errors
 * and logs. Everything up to `/api/webhooks` is kept, the id and token
 * are replaced by `***`.
 */
pub fn redact(raw: &str) -> String {
    if let Some(start) = raw.find(WEBHOOK_PATH_MARKER) {
        return format!("{}/***", &raw[..start + WEBHOOK_PATH_MARKER.len()]);
    }
    match Url::parse(raw) {
        Ok(url) => format!("{}://{}/***", url.scheme(), url.host_str().unwrap_or("")),
        Err(_) => "<unparseable url>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_webhook_url() {
        let dest = Destination::parse("https://discord.com/api/webhooks/1234/abcDEF_-x").unwrap();
        assert!(dest.is_tls());
        assert_eq!(dest.host(), "discord.com");
        assert_eq!(dest.port(), 443);
        assert_eq!(
            dest.request_url(),
            "https://discord.com/api/webhooks/1234/abcDEF_-x"
        );
    }

    /**
     * Anything in front of the marker is dropped, the query string is kept.
     */
    #[test]
    fn test_parse_keeps_query_and_strips_prefix() {
        let dest =
            Destination::parse("https://example.com:8443/proxy/api/webhooks/1/t?wait=true").unwrap();
        assert_eq!(dest.port(), 8443);
        assert_eq!(
            dest.request_url(),
            "https://example.com:8443/api/webhooks/1/t?wait=true"
        );
    }

    #[test]
    fn test_parse_loopback_http() {
        let dest = Destination::parse("http://127.0.0.1:9000/api/webhooks/1/t").unwrap();
        assert!(!dest.is_tls());
        assert_eq!(dest.request_url(), "http://127.0.0.1:9000/api/webhooks/1/t");

        let dest = Destination::parse("http://localhost/api/webhooks/1/t").unwrap();
        assert_eq!(dest.port(), 80);
        assert_eq!(dest.request_url(), "http://localhost/api/webhooks/1/t");
    }

    #[test]
    fn test_reject_remote_plain_http() {
        let err = Destination::parse("http://discord.com/api/webhooks/1/t").unwrap_err();
        assert!(matches!(err, Error::MalformedDestination { .. }));
    }

    #[test]
    fn test_reject_wrong_shape() {
        for raw in [
            "",
            "not a url",
            "ftp://discord.com/api/webhooks/1/t",
            "https://discord.com/",
            "https://discord.com/api/webhooks",
            "https://discord.com/api/webhooks/",
            "https://discord.com/api/webhooksX/1/t",
        ] {
            let err = Destination::parse(raw).unwrap_err();
            assert!(
                matches!(err, Error::MalformedDestination { .. }),
                "expected malformed destination for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_redact_hides_credential() {
        assert_eq!(
            redact("https://discord.com/api/webhooks/1234/secret"),
            "https://discord.com/api/webhooks/***"
        );
        assert_eq!(redact("https://example.com/other/secret"), "https://example.com/***");
        assert_eq!(redact("nope"), "<unparseable url>");
    }

    #[test]
    fn test_error_does_not_leak_credential() {
        let err = Destination::parse("http://discord.com/api/webhooks/1/secret").unwrap_err();
        assert!(!format!("{err:?}").contains("secret"));
    }
}
