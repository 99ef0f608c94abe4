/**
 * Relay configuration, read from a TOML file.
 *
 * ```toml
 * [webhook]
 * url = "https://discord.com/api/webhooks/<id>/<token>"
 * pacing_interval_ms = 600
 * connect_timeout_secs = 10
 * request_timeout_secs = 30
 * ```
 *
 * Every key is optional. A missing or empty `url` leaves the module
 * disabled rather than failing the host. Zero durations are rejected: a
 * zero pacing interval would lift the rate limit, a zero timeout would
 * fail every send.
 */
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context};
use relay_core::{QueueOptions, TransportOptions, PACING_INTERVAL};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RelayConfig {
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WebhookConfig {
    /// Full webhook URL. The path doubles as the credential.
    pub url: String,
    pub pacing_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        let transport = TransportOptions::default();
        Self {
            url: String::new(),
            pacing_interval_ms: PACING_INTERVAL.as_millis() as u64,
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            request_timeout_secs: transport.request_timeout.as_secs(),
        }
    }
}

impl WebhookConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.pacing_interval_ms > 0,
            "webhook.pacing_interval_ms must be greater than zero"
        );
        ensure!(
            self.connect_timeout_secs > 0,
            "webhook.connect_timeout_secs must be greater than zero"
        );
        ensure!(
            self.request_timeout_secs > 0,
            "webhook.request_timeout_secs must be greater than zero"
        );
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn queue_options(&self) -> QueueOptions {
        QueueOptions {
            pacing_interval: Duration::from_millis(self.pacing_interval_ms),
        }
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

impl RelayConfig {
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let config: RelayConfig = toml::from_str(raw).context("invalid relay config")?;
        config.webhook.validate()?;
        Ok(config)
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> anyhow::Result<RelayConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    RelayConfig::from_toml_str(&raw)
}
