use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use tracing::debug;

use super::{AsnRepository, IpRangeRepository, ProviderRepository};
use crate::error::{GreenCheckError, Result};
use crate::types::{AsnEntry, HostingProvider, IpRange};

/// Registry held entirely in memory.
///
/// Loadable from a TOML data file:
///
/// ```toml
/// [[provider]]
/// id = 1
/// name = "Leafy Hosting"
///
/// [[ip_range]]
/// id = 10
/// provider_id = 1
/// cidr = "192.0.2.0/24"
///
/// [[asn]]
/// id = 20
/// provider_id = 1
/// asn = 64500
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    providers: HashMap<u64, HostingProvider>,
    ranges: Vec<IpRange>,
    asns: Vec<AsnEntry>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default, rename = "provider")]
    providers: Vec<HostingProvider>,
    #[serde(default, rename = "ip_range")]
    ranges: Vec<IpRange>,
    #[serde(default, rename = "asn")]
    asns: Vec<AsnEntry>,
}

impl InMemoryRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RegistryFile =
            toml::from_str(content).map_err(|e| GreenCheckError::Registry(e.to_string()))?;

        let registry = file
            .providers
            .into_iter()
            .fold(Self::new(), Self::with_provider);
        let registry = file.ranges.into_iter().fold(registry, Self::with_range);
        let registry = file.asns.into_iter().fold(registry, Self::with_asn);

        debug!(
            providers = registry.providers.len(),
            ranges = registry.ranges.len(),
            asns = registry.asns.len(),
            "loaded registry"
        );
        Ok(registry)
    }

    /// Load a registry from a TOML data file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Add a hosting provider
    #[must_use]
    pub fn with_provider(mut self, provider: HostingProvider) -> Self {
        self.providers.insert(provider.id, provider);
        self
    }

    /// Add an IP range
    #[must_use]
    pub fn with_range(mut self, range: IpRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Add an ASN entry
    #[must_use]
    pub fn with_asn(mut self, entry: AsnEntry) -> Self {
        self.asns.push(entry);
        self
    }

    /// Number of registered ranges
    #[must_use]
    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// Number of registered ASN entries, active or not
    #[must_use]
    pub fn asn_count(&self) -> usize {
        self.asns.len()
    }
}

#[async_trait]
impl IpRangeRepository for InMemoryRegistry {
    async fn ranges_containing(&self, ip: IpAddr) -> Result<Vec<IpRange>> {
        Ok(self
            .ranges
            .iter()
            .filter(|range| range.contains(ip))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AsnRepository for InMemoryRegistry {
    async fn active_entries(&self, asn: u32) -> Result<Vec<AsnEntry>> {
        Ok(self
            .asns
            .iter()
            .filter(|entry| entry.asn == asn && entry.active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProviderRepository for InMemoryRegistry {
    async fn provider(&self, id: u64) -> Result<Option<HostingProvider>> {
        Ok(self.providers.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[provider]]
        id = 1
        name = "Leafy Hosting"
        website = "https://leafy.example"

        [[ip_range]]
        id = 10
        provider_id = 1
        start = "192.0.2.0"
        end = "192.0.2.255"

        [[ip_range]]
        id = 11
        provider_id = 1
        cidr = "192.0.2.0/28"

        [[asn]]
        id = 20
        provider_id = 1
        asn = 64500

        [[asn]]
        id = 21
        provider_id = 1
        asn = 64501
        active = false
    "#;

    #[tokio::test]
    async fn test_load_from_toml() {
        let registry = InMemoryRegistry::from_toml_str(SAMPLE).unwrap();
        assert_eq!(registry.range_count(), 2);
        assert_eq!(registry.asn_count(), 2);

        let provider = registry.provider(1).await.unwrap().unwrap();
        assert_eq!(provider.name, "Leafy Hosting");
        assert!(provider.show_on_website);
        assert!(registry.provider(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ranges_containing() {
        let registry = InMemoryRegistry::from_toml_str(SAMPLE).unwrap();

        let both = registry.ranges_containing("192.0.2.3".parse().unwrap()).await.unwrap();
        assert_eq!(both.len(), 2);

        let outer = registry.ranges_containing("192.0.2.200".parse().unwrap()).await.unwrap();
        assert_eq!(outer.len(), 1);
        assert_eq!(outer[0].id, 10);

        let none = registry.ranges_containing("198.51.100.1".parse().unwrap()).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_inactive_asns_are_hidden() {
        let registry = InMemoryRegistry::from_toml_str(SAMPLE).unwrap();
        assert_eq!(registry.active_entries(64500).await.unwrap().len(), 1);
        assert!(registry.active_entries(64501).await.unwrap().is_empty());
    }

    #[test]
    fn test_bad_file_is_registry_error() {
        let err = InMemoryRegistry::from_toml_str("[[ip_range]]\nid = 1\nprovider_id = 1\n")
            .unwrap_err();
        assert!(matches!(err, GreenCheckError::Registry(_)));
    }
}
