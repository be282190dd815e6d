//! Core types and traits for green hosting classification.
//!
//! This crate provides the foundational types used across greencheck:
//!
//! - **Types**: registry records ([`IpRange`], [`AsnEntry`], [`HostingProvider`])
//!   and verdicts ([`SiteCheck`], [`GreenDomain`])
//! - **Traits**: registry repositories and network lookups the engine depends on
//! - **Errors**: [`GreenCheckError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use greencheck_core::{InMemoryRegistry, IpRangeRepository, Result};
//!
//! async fn ranges(ip: std::net::IpAddr) -> Result<usize> {
//!     let registry = InMemoryRegistry::load("registry.toml".as_ref())?;
//!     Ok(registry.ranges_containing(ip).await?.len())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/greencheck-core/0.3.0")]

mod error;
pub mod lookup;
pub mod net;
pub mod registry;
pub mod types;

pub use error::{GreenCheckError, Result};
pub use lookup::{AsnLookup, HostResolver};
pub use registry::{AsnRepository, InMemoryRegistry, IpRangeRepository, ProviderRepository};
pub use types::*;
