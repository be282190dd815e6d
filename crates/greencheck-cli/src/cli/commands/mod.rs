//! Command implementations.

pub mod asn;
pub mod batch;
pub mod check;
pub mod config;

use anyhow::Context as _;
use greencheck::{
    AsnLookup, CymruDnsClient, GreenDomainChecker, HttpAsnClient, InMemoryRegistry,
    InputNormalizer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::config::{Config, LookupBackend};
use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,

    /// Where the configuration lives
    pub config_path: PathBuf,

    /// Registry data file, from flags or config
    pub registry: Option<PathBuf>,

    /// ASN backend, from flags or config
    pub lookup: LookupBackend,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,
}

impl Context {
    /// Get the registry path, returning an error if not set.
    pub fn require_registry(&self) -> anyhow::Result<&PathBuf> {
        self.registry.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "Registry data file required.\n\n\
                 Set it with one of:\n  \
                 1. --registry <FILE>\n  \
                 2. GREENCHECK_REGISTRY environment variable\n  \
                 3. greencheck config set registry <FILE>"
            )
        })
    }

    /// Load the registry data file.
    pub fn load_registry(&self) -> anyhow::Result<InMemoryRegistry> {
        let path = self.require_registry()?;
        let registry = InMemoryRegistry::load(path)
            .with_context(|| format!("loading registry {}", path.display()))?;
        debug!(
            path = %path.display(),
            ranges = registry.range_count(),
            asns = registry.asn_count(),
            "registry loaded"
        );
        Ok(registry)
    }

    /// Create the configured IP-to-ASN client.
    pub fn asn_lookup(&self) -> anyhow::Result<Arc<dyn AsnLookup>> {
        let lookup: Arc<dyn AsnLookup> = match self.lookup {
            LookupBackend::Cymru => Arc::new(CymruDnsClient::new(self.config.cymru.clone())?),
            LookupBackend::Http => Arc::new(
                HttpAsnClient::builder()
                    .config(self.config.http.clone())
                    .build()?,
            ),
        };
        Ok(lookup)
    }

    /// Create a checker over the registry and ASN backend.
    pub fn checker(&self) -> anyhow::Result<GreenDomainChecker> {
        let checker = GreenDomainChecker::builder()
            .config(self.config.checker.clone())
            .registry(Arc::new(self.load_registry()?))
            .asn_lookup(self.asn_lookup()?)
            .build()?;
        Ok(checker)
    }

    /// Input normalizer with the public suffix list
    pub fn normalizer(&self) -> InputNormalizer {
        InputNormalizer::default()
    }
}
