//! Checker configuration.

use greencheck_core::{GreenCheckError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Timeouts and policy for a [`GreenDomainChecker`](crate::GreenDomainChecker)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// DNS resolution timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub resolve_timeout_ms: u64,

    /// ASN lookup timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub asn_timeout_ms: u64,

    /// Pick an IPv4 address when a host has both families
    #[serde(default = "default_true")]
    pub prefer_ipv4: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: default_timeout_ms(),
            asn_timeout_ms: default_timeout_ms(),
            prefer_ipv4: true,
        }
    }
}

impl CheckerConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| GreenCheckError::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// DNS resolution timeout
    #[must_use]
    pub const fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    /// ASN lookup timeout
    #[must_use]
    pub const fn asn_timeout(&self) -> Duration {
        Duration::from_millis(self.asn_timeout_ms)
    }
}

const fn default_timeout_ms() -> u64 {
    5_000
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CheckerConfig::default();
        assert_eq!(config.resolve_timeout(), Duration::from_secs(5));
        assert_eq!(config.asn_timeout(), Duration::from_secs(5));
        assert!(config.prefer_ipv4);
    }

    #[test]
    fn test_partial_toml() {
        let config: CheckerConfig = toml::from_str("asn_timeout_ms = 1500\nprefer_ipv4 = false").unwrap();
        assert_eq!(config.asn_timeout_ms, 1500);
        assert_eq!(config.resolve_timeout_ms, 5_000);
        assert!(!config.prefer_ipv4);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = CheckerConfig::load(Path::new("/nonexistent/greencheck.toml")).unwrap();
        assert_eq!(config, CheckerConfig::default());
    }
}
