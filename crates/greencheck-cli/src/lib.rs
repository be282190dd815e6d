//! # greencheck-cli
//!
//! Command-line interface for green hosting checks.
//!
//! ## Features
//!
//! - **Single checks**: classify one domain, URL or IP address
//! - **Bulk reports**: check many domains concurrently and list green before grey
//! - **ASN lookups**: show which autonomous systems announce an address
//! - **Multiple output formats**: Pretty, JSON, CSV

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::run;
