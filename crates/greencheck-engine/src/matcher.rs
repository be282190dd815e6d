//! Best-match search across the IP range and ASN registries.

use greencheck_core::net::{canonical, ip_to_u128};
use greencheck_core::{AsnLookup, AsnMatch, AsnRepository, IpRange, IpRangeRepository};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Matches an address against the registries.
///
/// Registry and lookup failures never escape: they are logged and the match
/// comes back empty, so the caller classifies the address as grey.
#[derive(Clone)]
pub struct RegistryMatcher {
    ranges: Arc<dyn IpRangeRepository>,
    asns: Arc<dyn AsnRepository>,
    lookup: Arc<dyn AsnLookup>,
    asn_timeout: Duration,
}

impl RegistryMatcher {
    /// Create a matcher over the given registries and ASN service
    pub fn new(
        ranges: Arc<dyn IpRangeRepository>,
        asns: Arc<dyn AsnRepository>,
        lookup: Arc<dyn AsnLookup>,
        asn_timeout: Duration,
    ) -> Self {
        Self {
            ranges,
            asns,
            lookup,
            asn_timeout,
        }
    }

    /// The smallest registered range containing `ip`
    #[instrument(skip(self))]
    pub async fn match_ip_range(&self, ip: IpAddr) -> Option<IpRange> {
        let ip = canonical(ip);
        let candidates = match self.ranges.ranges_containing(ip).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "IP range lookup failed");
                return None;
            }
        };

        let best = best_range(ip, candidates);
        if let Some(range) = &best {
            debug!(range_id = range.id, span = %range.span(), "matched IP range");
        }
        best
    }

    /// The first active ASN entry owning an AS that announces `ip`
    #[instrument(skip(self))]
    pub async fn match_asn(&self, ip: IpAddr) -> AsnMatch {
        let announced = match tokio::time::timeout(self.asn_timeout, self.lookup.lookup_asn(ip)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) if e.is_private_or_reserved() => {
                debug!(service = self.lookup.name(), "no public AS for address");
                return AsnMatch::Invalid;
            }
            Ok(Err(e)) => {
                warn!(service = self.lookup.name(), error = %e, "ASN lookup failed");
                return AsnMatch::NotFound;
            }
            Err(_) => {
                warn!(service = self.lookup.name(), timeout = ?self.asn_timeout, "ASN lookup timed out");
                return AsnMatch::NotFound;
            }
        };

        for &asn in announced.candidates() {
            match self.asns.active_entries(asn).await {
                Ok(entries) => {
                    if let Some(entry) = entries.into_iter().find(|e| e.active && e.asn == asn) {
                        debug!(asn, entry_id = entry.id, "matched ASN");
                        return AsnMatch::Found(entry);
                    }
                }
                Err(e) => warn!(asn, error = %e, "ASN registry lookup failed"),
            }
        }

        AsnMatch::NotFound
    }
}

/// Pick the authoritative range among candidates.
///
/// Smallest span wins; equal spans go to the lowest start address, then the
/// lowest identifier. Candidates not containing `ip` are ignored.
#[must_use]
pub fn best_range(ip: IpAddr, candidates: impl IntoIterator<Item = IpRange>) -> Option<IpRange> {
    candidates
        .into_iter()
        .filter(|range| range.contains(ip))
        .min_by_key(|range| (range.span(), ip_to_u128(range.start), range.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use greencheck_core::{AsnEntry, AsnQueryResult, GreenCheckError, InMemoryRegistry, Result};

    struct FixedLookup(Result<AsnQueryResult>);

    #[async_trait]
    impl AsnLookup for FixedLookup {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn lookup_asn(&self, _ip: IpAddr) -> Result<AsnQueryResult> {
            match &self.0 {
                Ok(result) => Ok(result.clone()),
                Err(GreenCheckError::PrivateOrReservedAddress(ip)) => {
                    Err(GreenCheckError::PrivateOrReservedAddress(*ip))
                }
                Err(e) => Err(GreenCheckError::LookupService(e.to_string())),
            }
        }
    }

    struct SlowLookup;

    #[async_trait]
    impl AsnLookup for SlowLookup {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn lookup_asn(&self, _ip: IpAddr) -> Result<AsnQueryResult> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(AsnQueryResult::Single(64500))
        }
    }

    struct BrokenRegistry;

    #[async_trait]
    impl IpRangeRepository for BrokenRegistry {
        async fn ranges_containing(&self, _ip: IpAddr) -> Result<Vec<IpRange>> {
            Err(GreenCheckError::Registry("connection refused".into()))
        }
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn range(id: u64, start: &str, end: &str) -> IpRange {
        IpRange::new(id, ip(start), ip(end), id * 100).unwrap()
    }

    fn asn(id: u64, asn: u32, active: bool) -> AsnEntry {
        AsnEntry {
            id,
            asn,
            provider_id: id * 100,
            active,
        }
    }

    fn matcher(registry: InMemoryRegistry, lookup: impl AsnLookup + 'static) -> RegistryMatcher {
        let registry = Arc::new(registry);
        RegistryMatcher::new(
            registry.clone(),
            registry,
            Arc::new(lookup),
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn test_single_enclosing_range() {
        let registry = InMemoryRegistry::new().with_range(range(1, "192.0.2.0", "192.0.2.255"));
        let m = matcher(registry, FixedLookup(Ok(AsnQueryResult::NotApplicable)));
        assert_eq!(m.match_ip_range(ip("192.0.2.77")).await.unwrap().id, 1);
        assert!(m.match_ip_range(ip("198.51.100.1")).await.is_none());
    }

    #[tokio::test]
    async fn test_smallest_overlapping_range_wins() {
        let registry = InMemoryRegistry::new()
            .with_range(range(1, "10.0.0.0", "10.255.255.255"))
            .with_range(range(2, "10.1.0.0", "10.1.0.255"))
            .with_range(range(3, "10.1.0.0", "10.1.255.255"));
        let m = matcher(registry, FixedLookup(Ok(AsnQueryResult::NotApplicable)));
        assert_eq!(m.match_ip_range(ip("10.1.0.9")).await.unwrap().id, 2);
        assert_eq!(m.match_ip_range(ip("10.1.9.9")).await.unwrap().id, 3);
        assert_eq!(m.match_ip_range(ip("10.9.9.9")).await.unwrap().id, 1);
    }

    #[test]
    fn test_equal_spans_break_on_start_then_id() {
        let target = ip("10.0.0.5");
        let picked = best_range(
            target,
            vec![range(9, "10.0.0.4", "10.0.0.7"), range(8, "10.0.0.2", "10.0.0.5")],
        )
        .unwrap();
        assert_eq!(picked.id, 8);

        let picked = best_range(
            target,
            vec![range(9, "10.0.0.0", "10.0.0.7"), range(4, "10.0.0.0", "10.0.0.7")],
        )
        .unwrap();
        assert_eq!(picked.id, 4);
    }

    #[tokio::test]
    async fn test_mapped_range_matches_either_form() {
        let registry = InMemoryRegistry::new().with_range(
            IpRange::new(4, ip("::ffff:198.51.100.0"), ip("::ffff:198.51.100.255"), 7).unwrap(),
        );
        let m = matcher(registry, FixedLookup(Ok(AsnQueryResult::NotApplicable)));
        assert_eq!(m.match_ip_range(ip("198.51.100.5")).await.unwrap().id, 4);
        assert_eq!(m.match_ip_range(ip("::ffff:198.51.100.5")).await.unwrap().id, 4);
    }

    #[tokio::test]
    async fn test_registry_failure_is_no_match() {
        let m = RegistryMatcher::new(
            Arc::new(BrokenRegistry),
            Arc::new(InMemoryRegistry::new()),
            Arc::new(FixedLookup(Ok(AsnQueryResult::NotApplicable))),
            Duration::from_millis(100),
        );
        assert!(m.match_ip_range(ip("192.0.2.1")).await.is_none());
    }

    #[tokio::test]
    async fn test_single_asn_match() {
        let registry = InMemoryRegistry::new().with_asn(asn(1, 64500, true));
        let m = matcher(registry, FixedLookup(Ok(AsnQueryResult::Single(64500))));
        assert_eq!(m.match_asn(ip("203.0.113.9")).await, AsnMatch::Found(asn(1, 64500, true)));
    }

    #[tokio::test]
    async fn test_inactive_asn_never_matches() {
        let registry = InMemoryRegistry::new().with_asn(asn(1, 64500, false));
        let m = matcher(registry, FixedLookup(Ok(AsnQueryResult::Single(64500))));
        assert_eq!(m.match_asn(ip("203.0.113.9")).await, AsnMatch::NotFound);
    }

    #[tokio::test]
    async fn test_multi_asn_uses_first_registered_candidate() {
        let registry = InMemoryRegistry::new()
            .with_asn(asn(1, 1111, false))
            .with_asn(asn(2, 2222, true))
            .with_asn(asn(3, 3333, true));
        let lookup = FixedLookup(AsnQueryResult::parse("1111 2222 3333"));
        let m = matcher(registry, lookup);
        assert_eq!(m.match_asn(ip("203.0.113.9")).await.into_entry().unwrap().asn, 2222);
    }

    #[tokio::test]
    async fn test_reserved_address_is_invalid() {
        let m = matcher(
            InMemoryRegistry::new(),
            FixedLookup(Err(GreenCheckError::PrivateOrReservedAddress(ip("127.0.0.1")))),
        );
        assert_eq!(m.match_asn(ip("127.0.0.1")).await, AsnMatch::Invalid);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_not_found() {
        let m = matcher(
            InMemoryRegistry::new().with_asn(asn(1, 64500, true)),
            FixedLookup(Err(GreenCheckError::LookupService("SERVFAIL".into()))),
        );
        assert_eq!(m.match_asn(ip("203.0.113.9")).await, AsnMatch::NotFound);
    }

    #[tokio::test]
    async fn test_lookup_timeout_is_not_found() {
        let m = matcher(InMemoryRegistry::new().with_asn(asn(1, 64500, true)), SlowLookup);
        assert_eq!(m.match_asn(ip("203.0.113.9")).await, AsnMatch::NotFound);
    }
}
