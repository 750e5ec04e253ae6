//! Tracker configuration.

use std::time::Duration;

use beacon_store::key::DEFAULT_PREFIX;
use beacon_store::traits::DEFAULT_EXPIRY_DAYS;
use beacon_store::SaveOptions;
use beacon_transport::{HostCapabilities, Url};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Default ingestion endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://events.bitdeli.com/events";

/// Default HTTP request timeout in milliseconds.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;

/// Configuration for a [`Tracker`](crate::Tracker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Base URL events are sent to; the input id is appended as a path segment.
    pub endpoint: String,
    /// Prefix of the persisted property slot key.
    pub key_prefix: String,
    /// Days a property slot lives without being rewritten.
    pub expiry_days: u32,
    /// Request timeout of the default HTTP client.
    pub http_timeout_ms: u64,
    /// What the host supports; decides the transport.
    pub capabilities: HostCapabilities,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            key_prefix: DEFAULT_PREFIX.to_string(),
            expiry_days: DEFAULT_EXPIRY_DAYS,
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            capabilities: HostCapabilities::default(),
        }
    }
}

impl TrackerConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TrackerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the endpoint is an absolute URL that can take a path segment.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| TrackerError::Config(format!("endpoint {}: {e}", self.endpoint)))?;
        if url.cannot_be_a_base() {
            return Err(TrackerError::Config(format!(
                "endpoint {} cannot be a base URL",
                self.endpoint
            )));
        }
        Ok(())
    }

    /// Persistence options for property slots.
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions::expiring_in_days(self.expiry_days)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }
}
