//! Classify domains and IP addresses as green or grey hosted.
//!
//! A domain is green when the address it resolves to falls inside an IP range
//! registered to a renewable-energy hosting provider, or is announced by an
//! autonomous system registered to one. Anything else is grey.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use greencheck::{CymruConfig, CymruDnsClient, GreenDomainChecker, InMemoryRegistry};
//!
//! #[tokio::main]
//! async fn main() -> greencheck::Result<()> {
//!     let registry = InMemoryRegistry::load("registry.toml".as_ref())?;
//!
//!     let checker = GreenDomainChecker::builder()
//!         .registry(Arc::new(registry))
//!         .asn_lookup(Arc::new(CymruDnsClient::new(CymruConfig::default())?))
//!         .build()?;
//!
//!     let summary = checker.perform_full_lookup("example.com").await?;
//!     println!("{} green: {}", summary.url, summary.green);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for the HTTP ASN client
//! - `native-tls` - Use system native TLS for the HTTP ASN client

#![doc(html_root_url = "https://docs.rs/greencheck/0.3.0")]

// Re-export core types
pub use greencheck_core::*;

// Re-export lookup clients
pub use greencheck_client::{
    CymruConfig, CymruDnsClient, HttpAsnClient, HttpAsnClientBuilder, HttpLookupConfig,
};

// Re-export the engine
pub use greencheck_engine::{
    batch, build_green_grey_list, grey_only, matcher, normalize, resolve, CheckerConfig,
    GreenDomainChecker, GreenDomainCheckerBuilder, InputNormalizer, PublicSuffixList,
    RegistryMatcher, SystemResolver, TldRegistry,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
