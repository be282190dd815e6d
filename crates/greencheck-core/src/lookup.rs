//! Network collaborators: host resolution and IP-to-ASN lookup.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;
use crate::types::AsnQueryResult;

/// Turns a host into an address
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve `host`, or parse it if it is already an IP literal.
    ///
    /// Fails with [`GreenCheckError::Resolution`](crate::GreenCheckError::Resolution)
    /// when no address can be obtained.
    async fn resolve(&self, host: &str) -> Result<IpAddr>;
}

/// Queries an IP-to-ASN mapping service
#[async_trait]
pub trait AsnLookup: Send + Sync {
    /// Short name of the backing service, for logs
    fn name(&self) -> &'static str;

    /// Origin AS(es) announcing `ip`.
    ///
    /// Fails with
    /// [`GreenCheckError::PrivateOrReservedAddress`](crate::GreenCheckError::PrivateOrReservedAddress)
    /// for addresses that have no public AS.
    async fn lookup_asn(&self, ip: IpAddr) -> Result<AsnQueryResult>;
}
