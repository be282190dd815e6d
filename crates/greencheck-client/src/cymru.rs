//! Team Cymru IP-to-ASN mapping over DNS.
//!
//! Origin lookups are TXT queries on the reversed address under
//! `origin.asn.cymru.com` (IPv4) or `origin6.asn.cymru.com` (IPv6). The answer
//! looks like `"15169 | 8.8.8.0/24 | US | arin | 2014-03-14"`; when several
//! ASes announce the prefix the first field lists all of them separated by
//! spaces.

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use std::fmt::Write as _;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::config::CymruConfig;
use greencheck_core::{net, AsnLookup, AsnQueryResult, GreenCheckError, Result};

/// Origin AS lookup against Team Cymru's DNS service
#[derive(Clone)]
pub struct CymruDnsClient {
    resolver: Arc<TokioResolver>,
    config: CymruConfig,
}

impl CymruDnsClient {
    /// Create a client using the system resolver configuration
    pub fn new(config: CymruConfig) -> Result<Self> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| GreenCheckError::Config(format!("failed to create resolver: {e}")))?
            .build();
        Ok(Self::with_resolver(Arc::new(resolver), config))
    }

    /// Create a client sharing an existing resolver
    #[must_use]
    pub fn with_resolver(resolver: Arc<TokioResolver>, config: CymruConfig) -> Self {
        Self { resolver, config }
    }

    /// DNS name holding the origin record for `ip`
    #[must_use]
    pub fn origin_name(&self, ip: IpAddr) -> String {
        match net::canonical(ip) {
            IpAddr::V4(v4) => {
                let [a, b, c, d] = v4.octets();
                format!("{d}.{c}.{b}.{a}.{}.", self.config.origin_zone)
            }
            IpAddr::V6(v6) => {
                let mut name = String::with_capacity(72 + self.config.origin6_zone.len());
                for byte in v6.octets().iter().rev() {
                    let _ = write!(name, "{:x}.{:x}.", byte & 0x0f, byte >> 4);
                }
                name.push_str(&self.config.origin6_zone);
                name.push('.');
                name
            }
        }
    }
}

#[async_trait]
impl AsnLookup for CymruDnsClient {
    fn name(&self) -> &'static str {
        "cymru-dns"
    }

    #[instrument(skip(self), fields(service = "cymru-dns"))]
    async fn lookup_asn(&self, ip: IpAddr) -> Result<AsnQueryResult> {
        if net::is_reserved(ip) {
            return Err(GreenCheckError::PrivateOrReservedAddress(ip));
        }

        let name = self.origin_name(ip);
        debug!(name = %name, "querying origin TXT record");

        let lookup = tokio::time::timeout(self.config.timeout(), self.resolver.txt_lookup(name))
            .await
            .map_err(|_| GreenCheckError::Timeout(self.config.timeout_ms))?
            .map_err(|e| GreenCheckError::LookupService(e.to_string()))?;

        let record = lookup
            .iter()
            .next()
            .map(|txt| {
                txt.iter()
                    .map(|data| String::from_utf8_lossy(data).into_owned())
                    .collect::<String>()
            })
            .ok_or_else(|| GreenCheckError::LookupService("empty origin answer".into()))?;

        parse_origin_record(&record)
    }
}

/// Parse the AS field out of a Cymru origin TXT record
pub fn parse_origin_record(record: &str) -> Result<AsnQueryResult> {
    let field = record
        .split('|')
        .next()
        .ok_or_else(|| GreenCheckError::LookupService(format!("malformed origin record {record:?}")))?;
    AsnQueryResult::parse(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::config::ResolverConfig;
    use hickory_resolver::name_server::TokioConnectionProvider;

    fn client() -> CymruDnsClient {
        let resolver = TokioResolver::builder_with_config(
            ResolverConfig::default(),
            TokioConnectionProvider::default(),
        )
        .build();
        CymruDnsClient::with_resolver(Arc::new(resolver), CymruConfig::default())
    }

    #[test]
    fn test_parse_origin_record_single() {
        let parsed = parse_origin_record("15169 | 8.8.8.0/24 | US | arin | 2014-03-14").unwrap();
        assert_eq!(parsed, AsnQueryResult::Single(15169));
    }

    #[test]
    fn test_parse_origin_record_multiple() {
        let parsed = parse_origin_record("1111 2222 | 192.0.2.0/24 | GB | ripencc | ").unwrap();
        assert_eq!(parsed, AsnQueryResult::Multiple(vec![1111, 2222]));
    }

    #[test]
    fn test_parse_origin_record_garbage() {
        assert!(parse_origin_record("nothing useful here").is_err());
    }

    #[tokio::test]
    async fn test_origin_name_ipv4() {
        let name = client().origin_name("8.8.4.1".parse().unwrap());
        assert_eq!(name, "1.4.8.8.origin.asn.cymru.com.");
    }

    #[tokio::test]
    async fn test_origin_name_ipv6() {
        let name = client().origin_name("2001:db8::1".parse().unwrap());
        assert!(name.starts_with("1.0.0.0.0.0.0.0."));
        assert!(name.ends_with("8.b.d.0.1.0.0.2.origin6.asn.cymru.com."));
    }

    #[tokio::test]
    async fn test_reserved_address_is_refused_without_query() {
        let err = client().lookup_asn("127.0.0.1".parse().unwrap()).await.unwrap_err();
        assert!(err.is_private_or_reserved());
    }
}
