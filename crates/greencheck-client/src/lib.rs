//! IP-to-ASN lookup clients for greencheck.
//!
//! Two backends implement [`greencheck_core::AsnLookup`]:
//!
//! - [`CymruDnsClient`]: Team Cymru origin lookups over DNS
//! - [`HttpAsnClient`]: an iptoasn-style JSON API, rate limited

#![doc(html_root_url = "https://docs.rs/greencheck-client/0.3.0")]

mod client;
mod config;
pub mod cymru;

pub use client::{HttpAsnClient, HttpAsnClientBuilder};
pub use config::*;
pub use cymru::CymruDnsClient;
pub use greencheck_core::{GreenCheckError, Result};
