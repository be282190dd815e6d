use cidr::IpCidr;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::error::{GreenCheckError, Result};
use crate::net::{canonical, ip_to_u128};

/// A hosting provider registered as running on renewable energy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingProvider {
    /// Provider identifier
    pub id: u64,

    /// Display name
    pub name: String,

    /// Provider website
    #[serde(default)]
    pub website: Option<String>,

    /// Partner level, if the provider is a partner
    #[serde(default)]
    pub partner: Option<String>,

    /// Whether the provider is listed in the public directory
    #[serde(default = "default_true")]
    pub show_on_website: bool,
}

/// An inclusive block of addresses registered to a hosting provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IpRangeRecord")]
pub struct IpRange {
    /// Registry identifier
    pub id: u64,

    /// First address in the range
    pub start: IpAddr,

    /// Last address in the range
    pub end: IpAddr,

    /// Owning hosting provider
    pub provider_id: u64,
}

impl IpRange {
    /// Create a range, checking both bounds share a family and are ordered.
    ///
    /// IPv4-mapped IPv6 bounds are stored as plain IPv4.
    pub fn new(id: u64, start: IpAddr, end: IpAddr, provider_id: u64) -> Result<Self> {
        let (start, end) = canonical_bounds(start, end);
        if start.is_ipv4() != end.is_ipv4() {
            return Err(GreenCheckError::Registry(format!(
                "range {id}: {start} and {end} are different address families"
            )));
        }
        if start > end {
            return Err(GreenCheckError::Registry(format!(
                "range {id}: start {start} is after end {end}"
            )));
        }
        Ok(Self {
            id,
            start,
            end,
            provider_id,
        })
    }

    /// Create a range covering every address of a CIDR block
    #[must_use]
    pub fn from_cidr(id: u64, cidr: &IpCidr, provider_id: u64) -> Self {
        let (start, end) = canonical_bounds(cidr.first_address(), cidr.last_address());
        Self {
            id,
            start,
            end,
            provider_id,
        }
    }

    /// Returns true if `ip` lies between `start` and `end` inclusive
    #[must_use]
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip = canonical(ip);
        self.start.is_ipv4() == ip.is_ipv4() && self.start <= ip && ip <= self.end
    }

    /// Number of addresses past `start`, i.e. `end - start`
    #[must_use]
    pub fn span(&self) -> u128 {
        ip_to_u128(self.end) - ip_to_u128(self.start)
    }
}

/// Unwrap IPv4-mapped bounds when both sides map to IPv4
fn canonical_bounds(start: IpAddr, end: IpAddr) -> (IpAddr, IpAddr) {
    match (canonical(start), canonical(end)) {
        (s @ IpAddr::V4(_), e @ IpAddr::V4(_)) => (s, e),
        _ => (start, end),
    }
}

/// On-disk shape of a range: explicit bounds or a CIDR block
#[derive(Debug, Clone, Deserialize)]
struct IpRangeRecord {
    id: u64,
    provider_id: u64,
    #[serde(default)]
    start: Option<IpAddr>,
    #[serde(default)]
    end: Option<IpAddr>,
    #[serde(default)]
    cidr: Option<String>,
}

impl TryFrom<IpRangeRecord> for IpRange {
    type Error = GreenCheckError;

    fn try_from(record: IpRangeRecord) -> Result<Self> {
        match (record.start, record.end, record.cidr) {
            (Some(start), Some(end), None) => Self::new(record.id, start, end, record.provider_id),
            (None, None, Some(cidr)) => {
                let block: IpCidr = cidr.parse().map_err(|e| {
                    GreenCheckError::Registry(format!("range {}: bad cidr {cidr:?}: {e}", record.id))
                })?;
                Ok(Self::from_cidr(record.id, &block, record.provider_id))
            }
            _ => Err(GreenCheckError::Registry(format!(
                "range {}: give either start and end, or cidr",
                record.id
            ))),
        }
    }
}

/// An autonomous system registered to a hosting provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnEntry {
    /// Registry identifier
    pub id: u64,

    /// Autonomous system number
    pub asn: u32,

    /// Owning hosting provider
    pub provider_id: u64,

    /// Inactive entries are soft-deleted and never match
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_range_contains_bounds() {
        let range = IpRange::new(1, ip("192.0.2.10"), ip("192.0.2.20"), 7).unwrap();
        assert!(range.contains(ip("192.0.2.10")));
        assert!(range.contains(ip("192.0.2.20")));
        assert!(range.contains(ip("192.0.2.15")));
        assert!(!range.contains(ip("192.0.2.21")));
        assert!(range.contains(ip("::ffff:192.0.2.15")));
        assert_eq!(range.span(), 10);
    }

    #[test]
    fn test_mapped_bounds_are_stored_as_ipv4() {
        let range = IpRange::new(1, ip("::ffff:198.51.100.0"), ip("::ffff:198.51.100.255"), 7).unwrap();
        assert_eq!(range.start, ip("198.51.100.0"));
        assert_eq!(range.end, ip("198.51.100.255"));
        assert!(range.contains(ip("198.51.100.5")));
        assert!(range.contains(ip("::ffff:198.51.100.5")));

        let block: IpCidr = "::ffff:198.51.100.0/120".parse().unwrap();
        let range = IpRange::from_cidr(2, &block, 7);
        assert_eq!(range.start, ip("198.51.100.0"));
        assert!(range.contains(ip("198.51.100.200")));
    }

    #[test]
    fn test_range_rejects_mixed_families_and_reversed_bounds() {
        assert!(IpRange::new(1, ip("10.0.0.1"), ip("::1"), 1).is_err());
        assert!(IpRange::new(1, ip("10.0.0.9"), ip("10.0.0.1"), 1).is_err());
    }

    #[test]
    fn test_range_from_cidr() {
        let block: IpCidr = "2001:db8::/120".parse().unwrap();
        let range = IpRange::from_cidr(3, &block, 1);
        assert_eq!(range.start, ip("2001:db8::"));
        assert_eq!(range.end, ip("2001:db8::ff"));
        assert_eq!(range.span(), 255);
    }

    #[test]
    fn test_asn_entry_defaults_to_active() {
        let entry: AsnEntry =
            serde_json::from_str(r#"{"id": 1, "asn": 64500, "provider_id": 2}"#).unwrap();
        assert!(entry.active);
    }

    #[test]
    fn test_range_record_needs_bounds_or_cidr() {
        let err = serde_json::from_str::<IpRange>(r#"{"id": 1, "provider_id": 2, "start": "10.0.0.1"}"#);
        assert!(err.is_err());

        let range: IpRange =
            serde_json::from_str(r#"{"id": 1, "provider_id": 2, "cidr": "10.1.0.0/16"}"#).unwrap();
        assert_eq!(range.end, ip("10.1.255.255"));
    }
}
