//! Configuration management.

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use greencheck::{CheckerConfig, CymruConfig, HttpLookupConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Which IP-to-ASN service to query.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LookupBackend {
    /// Team Cymru origin lookups over DNS
    #[default]
    Cymru,
    /// iptoasn-style JSON API over HTTP
    Http,
}

impl std::str::FromStr for LookupBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cymru" | "dns" => Ok(Self::Cymru),
            "http" => Ok(Self::Http),
            _ => anyhow::bail!("Unknown lookup backend: {s}\nValid backends: cymru, http"),
        }
    }
}

impl std::fmt::Display for LookupBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cymru => write!(f, "cymru"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Registry data file (TOML).
    pub registry: Option<PathBuf>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,

    /// IP-to-ASN backend.
    #[serde(default)]
    pub lookup: LookupBackend,

    /// Checks in flight at once during `batch`.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Resolver and ASN timeouts.
    #[serde(default)]
    pub checker: CheckerConfig,

    /// Team Cymru settings.
    #[serde(default)]
    pub cymru: CymruConfig,

    /// HTTP lookup settings.
    #[serde(default)]
    pub http: HttpLookupConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: None,
            output_format: None,
            lookup: LookupBackend::default(),
            concurrency: default_concurrency(),
            checker: CheckerConfig::default(),
            cymru: CymruConfig::default(),
            http: HttpLookupConfig::default(),
        }
    }
}

const fn default_concurrency() -> usize {
    8
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("org", "thegreenwebfoundation", "greencheck")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Update one setting by its `config set` key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "registry" => self.registry = Some(PathBuf::from(value)),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            "lookup" => self.lookup = value.parse()?,
            "concurrency" => {
                let n: usize = value.parse()?;
                anyhow::ensure!(n > 0, "concurrency must be at least 1");
                self.concurrency = n;
            }
            "prefer_ipv4" => self.checker.prefer_ipv4 = value.parse()?,
            "resolve_timeout_ms" => self.checker.resolve_timeout_ms = value.parse()?,
            "asn_timeout_ms" => self.checker.asn_timeout_ms = value.parse()?,
            "http_base_url" => self.http.base_url = value.to_string(),
            _ => anyhow::bail!(
                "Unknown config key: {}\n\n\
                 Available keys:\n  \
                 registry           - Registry data file (TOML)\n  \
                 output_format      - Default output format (pretty/json/csv)\n  \
                 lookup             - ASN backend (cymru/http)\n  \
                 concurrency        - Parallel checks during batch\n  \
                 prefer_ipv4        - Prefer IPv4 addresses (true/false)\n  \
                 resolve_timeout_ms - DNS resolution timeout\n  \
                 asn_timeout_ms     - ASN lookup timeout\n  \
                 http_base_url      - Base URL of the HTTP ASN service",
                key
            ),
        }
        Ok(())
    }
}
