//! Single-domain classification.

use greencheck_core::{
    net, AsnLookup, AsnMatch, AsnRepository, GreenCheckError, GreenDomain, HostResolver,
    IpRangeRepository, ProviderRepository, Result, SiteCheck,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::config::CheckerConfig;
use crate::matcher::RegistryMatcher;
use crate::resolve::SystemResolver;

/// Classifies hosts as green or grey.
///
/// A checker holds no mutable state; clones share the same collaborators and
/// can run checks concurrently.
#[derive(Clone)]
pub struct GreenDomainChecker {
    resolver: Arc<dyn HostResolver>,
    matcher: RegistryMatcher,
    providers: Option<Arc<dyn ProviderRepository>>,
}

impl GreenDomainChecker {
    /// Create a builder
    #[must_use]
    pub fn builder() -> GreenDomainCheckerBuilder {
        GreenDomainCheckerBuilder::default()
    }

    /// Resolve `domain` and match its address against the registries.
    ///
    /// Only a failure to resolve is returned as an error; registry and ASN
    /// lookup problems produce a grey verdict.
    #[instrument(skip(self))]
    pub async fn check_domain(&self, domain: &str) -> Result<SiteCheck> {
        let ip = net::canonical(self.resolver.resolve(domain).await?);
        debug!(%ip, "resolved");

        if let Some(range) = self.matcher.match_ip_range(ip).await {
            return Ok(SiteCheck::green_by_ip_range(domain, ip, &range));
        }

        if let AsnMatch::Found(entry) = self.matcher.match_asn(ip).await {
            return Ok(SiteCheck::green_by_asn(domain, ip, &entry));
        }

        Ok(SiteCheck::grey(domain, ip))
    }

    /// Check `domain` and project the verdict into a [`GreenDomain`].
    ///
    /// Grey summaries carry `domain` exactly as given.
    pub async fn perform_full_lookup(&self, domain: &str) -> Result<GreenDomain> {
        let check = self.check_domain(domain).await?;

        if !check.green {
            return Ok(GreenDomain::grey_result(domain));
        }

        let provider = match (&self.providers, check.hosting_provider_id) {
            (Some(providers), Some(id)) => match providers.provider(id).await {
                Ok(provider) => provider,
                Err(e) => {
                    warn!(provider_id = id, error = %e, "provider lookup failed");
                    None
                }
            },
            _ => None,
        };

        Ok(GreenDomain::from_sitecheck(&check, provider.as_ref()))
    }
}

/// Builder for a [`GreenDomainChecker`]
#[derive(Default)]
pub struct GreenDomainCheckerBuilder {
    config: CheckerConfig,
    resolver: Option<Arc<dyn HostResolver>>,
    lookup: Option<Arc<dyn AsnLookup>>,
    ranges: Option<Arc<dyn IpRangeRepository>>,
    asns: Option<Arc<dyn AsnRepository>>,
    providers: Option<Arc<dyn ProviderRepository>>,
}

impl GreenDomainCheckerBuilder {
    /// Set timeouts and resolver policy
    #[must_use]
    pub fn config(mut self, config: CheckerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom resolver instead of [`SystemResolver`]
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn HostResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Set the IP-to-ASN service
    #[must_use]
    pub fn asn_lookup(mut self, lookup: Arc<dyn AsnLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Set the IP range registry
    #[must_use]
    pub fn ip_ranges(mut self, ranges: Arc<dyn IpRangeRepository>) -> Self {
        self.ranges = Some(ranges);
        self
    }

    /// Set the ASN registry
    #[must_use]
    pub fn asns(mut self, asns: Arc<dyn AsnRepository>) -> Self {
        self.asns = Some(asns);
        self
    }

    /// Set the hosting provider registry
    #[must_use]
    pub fn providers(mut self, providers: Arc<dyn ProviderRepository>) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Use one backend for all three registries
    #[must_use]
    pub fn registry<R>(self, registry: Arc<R>) -> Self
    where
        R: IpRangeRepository + AsnRepository + ProviderRepository + 'static,
    {
        self.ip_ranges(registry.clone())
            .asns(registry.clone())
            .providers(registry)
    }

    /// Build the checker
    pub fn build(self) -> Result<GreenDomainChecker> {
        let missing = |what: &str| GreenCheckError::Config(format!("checker needs {what}"));

        let ranges = self.ranges.ok_or_else(|| missing("an IP range registry"))?;
        let asns = self.asns.ok_or_else(|| missing("an ASN registry"))?;
        let lookup = self.lookup.ok_or_else(|| missing("an ASN lookup service"))?;
        let resolver = self
            .resolver
            .unwrap_or_else(|| Arc::new(SystemResolver::from_config(&self.config)));

        Ok(GreenDomainChecker {
            resolver,
            matcher: RegistryMatcher::new(ranges, asns, lookup, self.config.asn_timeout()),
            providers: self.providers,
        })
    }
}
