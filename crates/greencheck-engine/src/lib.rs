//! Domain and IP green hosting classification.
//!
//! The pipeline for a single input:
//!
//! 1. [`InputNormalizer`] cleans raw input down to a host
//! 2. a [`HostResolver`](greencheck_core::HostResolver) turns it into an address
//! 3. [`RegistryMatcher`] looks for the smallest registered IP range, then
//!    falls back to the ASNs announcing the address
//! 4. [`GreenDomainChecker`] assembles the [`SiteCheck`](greencheck_core::SiteCheck)
//!
//! [`grey_only`] and [`build_green_grey_list`] combine verdicts for bulk
//! reports. Fan-out across many domains is left to the caller.

#![doc(html_root_url = "https://docs.rs/greencheck-engine/0.3.0")]

pub mod batch;
mod checker;
mod config;
pub mod matcher;
pub mod normalize;
pub mod resolve;

pub use batch::{build_green_grey_list, grey_only};
pub use checker::{GreenDomainChecker, GreenDomainCheckerBuilder};
pub use config::CheckerConfig;
pub use matcher::RegistryMatcher;
pub use normalize::{InputNormalizer, PublicSuffixList, TldRegistry};
pub use resolve::SystemResolver;
