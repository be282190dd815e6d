//! Host resolution using system DNS.

use async_trait::async_trait;
use greencheck_core::{net, GreenCheckError, HostResolver, Result};
use std::net::IpAddr;
use std::time::Duration;
use tokio::net::lookup_host;
use tracing::debug;

use crate::config::CheckerConfig;

/// Resolver that asks the operating system, like `getaddrinfo`
#[derive(Debug, Clone)]
pub struct SystemResolver {
    timeout: Duration,
    prefer_ipv4: bool,
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::from_config(&CheckerConfig::default())
    }
}

impl SystemResolver {
    /// Create a resolver with an explicit timeout and family preference
    #[must_use]
    pub const fn new(timeout: Duration, prefer_ipv4: bool) -> Self {
        Self {
            timeout,
            prefer_ipv4,
        }
    }

    /// Create a resolver from checker settings
    #[must_use]
    pub const fn from_config(config: &CheckerConfig) -> Self {
        Self::new(config.resolve_timeout(), config.prefer_ipv4)
    }
}

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve(&self, host: &str) -> Result<IpAddr> {
        let literal = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = literal.parse::<IpAddr>() {
            return Ok(net::canonical(ip));
        }
        if host.is_empty() {
            return Err(GreenCheckError::resolution(host, "empty host"));
        }

        let start = std::time::Instant::now();

        // Port 0: only the address part is used
        let addrs = tokio::time::timeout(self.timeout, lookup_host((host, 0)))
            .await
            .map_err(|_| GreenCheckError::resolution(host, format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| GreenCheckError::resolution(host, e))?;

        let addrs: Vec<IpAddr> = addrs.map(|a| net::canonical(a.ip())).collect();
        debug!(host, count = addrs.len(), elapsed = ?start.elapsed(), "resolved host");

        pick_address(&addrs, self.prefer_ipv4)
            .ok_or_else(|| GreenCheckError::resolution(host, "no addresses returned"))
    }
}

/// Choose one address, taking the first IPv4 when `prefer_ipv4` is set
#[must_use]
pub fn pick_address(addrs: &[IpAddr], prefer_ipv4: bool) -> Option<IpAddr> {
    if prefer_ipv4 {
        if let Some(v4) = addrs.iter().find(|ip| ip.is_ipv4()) {
            return Some(*v4);
        }
    }
    addrs.first().copied()
}
