//! Read-only access to the green hosting registries.
//!
//! The classification engine only ever reads registry data. Storage backends
//! implement these traits; [`InMemoryRegistry`] is provided for tests, demos
//! and small file-backed deployments.

mod memory;

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;
use crate::types::{AsnEntry, HostingProvider, IpRange};

pub use memory::InMemoryRegistry;

/// Registry of IP ranges
#[async_trait]
pub trait IpRangeRepository: Send + Sync {
    /// All ranges with `start <= ip <= end`, in any order
    async fn ranges_containing(&self, ip: IpAddr) -> Result<Vec<IpRange>>;
}

/// Registry of autonomous systems
#[async_trait]
pub trait AsnRepository: Send + Sync {
    /// Entries with the given AS number that are still active
    async fn active_entries(&self, asn: u32) -> Result<Vec<AsnEntry>>;
}

/// Registry of hosting providers
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Provider with the given identifier
    async fn provider(&self, id: u64) -> Result<Option<HostingProvider>>;
}
