//! Backend connection settings.

use serde::{Deserialize, Serialize};

/// Where the backend lives and how often to poll it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend, without a trailing path.
    pub base_url: String,

    /// Seconds between `/status` polls in the status indicator.
    pub status_poll_interval_secs: u32,
}

impl ClientConfig {
    /// Backend address used when nothing else is configured.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000";

    /// Default `/status` poll interval.
    pub const DEFAULT_POLL_INTERVAL_SECS: u32 = 30;

    /// Default settings pointed at `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Poll interval in milliseconds, for timer APIs.
    #[must_use]
    pub const fn status_poll_interval_ms(&self) -> u32 {
        self.status_poll_interval_secs.saturating_mul(1000)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            status_poll_interval_secs: Self::DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.status_poll_interval_ms(), 30_000);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://10.0.0.2:5002"}"#).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:5002");
        assert_eq!(config.status_poll_interval_secs, 30);
    }

    #[test]
    fn with_base_url_keeps_poll_interval() {
        let config = ClientConfig::with_base_url("http://backend");
        assert_eq!(config.base_url, "http://backend");
        assert_eq!(config.status_poll_interval_secs, 30);
    }
}
