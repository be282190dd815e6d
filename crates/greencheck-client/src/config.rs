//! Lookup client configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the Team Cymru DNS origin lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CymruConfig {
    /// Zone queried for IPv4 origins
    #[serde(default = "default_origin_zone")]
    pub origin_zone: String,

    /// Zone queried for IPv6 origins
    #[serde(default = "default_origin6_zone")]
    pub origin6_zone: String,

    /// Per-query timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CymruConfig {
    fn default() -> Self {
        Self {
            origin_zone: default_origin_zone(),
            origin6_zone: default_origin6_zone(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl CymruConfig {
    /// Per-query timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Set the per-query timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }
}

/// Settings for the HTTP JSON lookup service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpLookupConfig {
    /// Service base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Sustained request rate allowed against the service
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Requests allowed in a burst above the sustained rate
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl Default for HttpLookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

impl HttpLookupConfig {
    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_origin_zone() -> String {
    String::from("origin.asn.cymru.com")
}

fn default_origin6_zone() -> String {
    String::from("origin6.asn.cymru.com")
}

fn default_base_url() -> String {
    String::from("https://api.iptoasn.com")
}

const fn default_timeout_ms() -> u64 {
    5_000
}

const fn default_requests_per_second() -> u32 {
    10
}

const fn default_burst() -> u32 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cymru = CymruConfig::default();
        assert_eq!(cymru.origin_zone, "origin.asn.cymru.com");
        assert_eq!(cymru.timeout(), Duration::from_secs(5));

        let http = HttpLookupConfig::default();
        assert_eq!(http.base_url, "https://api.iptoasn.com");
        assert_eq!(http.requests_per_second, 10);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let http: HttpLookupConfig = serde_json::from_str(r#"{"timeout_ms": 250}"#).unwrap();
        assert_eq!(http.timeout(), Duration::from_millis(250));
        assert_eq!(http.burst, 5);

        let cymru = CymruConfig::default().with_timeout(Duration::from_millis(750));
        assert_eq!(cymru.timeout_ms, 750);
    }
}
