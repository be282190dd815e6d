//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::LookupBackend;
use crate::output::OutputFormat;

/// Check whether domains are hosted green
///
/// A domain is green when its address sits in an IP range, or is announced
/// by an autonomous system, registered to a renewable-energy hosting
/// provider. Everything else is grey.
#[derive(Parser, Debug)]
#[command(name = "greencheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Registry data file (or set GREENCHECK_REGISTRY env var)
    #[arg(short, long, env = "GREENCHECK_REGISTRY", global = true)]
    pub registry: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(short, long, env = "GREENCHECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// IP-to-ASN backend
    #[arg(short, long, global = true, value_enum)]
    pub lookup: Option<LookupBackend>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a single domain, URL or IP address
    Check(CheckArgs),

    /// Check many domains and report green before grey
    Batch(BatchArgs),

    /// Show the autonomous systems announcing an IP address
    Asn(AsnArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Check command
// ============================================================================

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Domain, URL or IP address to check
    pub input: String,

    /// Show the raw check (address and match) instead of the summary
    #[arg(long)]
    pub details: bool,
}

// ============================================================================
// Batch command
// ============================================================================

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Domains, URLs or IP addresses to check
    pub inputs: Vec<String>,

    /// Read inputs from a file, one per line ("-" for stdin)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Checks in flight at once
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Only print green domains
    #[arg(long, conflicts_with = "grey_only")]
    pub green_only: bool,

    /// Only print grey domains
    #[arg(long)]
    pub grey_only: bool,
}

// ============================================================================
// ASN command
// ============================================================================

#[derive(Args, Debug)]
pub struct AsnArgs {
    /// IP address to look up
    pub ip: std::net::IpAddr,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "greencheck", "check", "example.com", "-o", "json", "--lookup", "http",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.lookup, Some(LookupBackend::Http));
        assert!(matches!(cli.command, Commands::Check(ref a) if a.input == "example.com"));
    }

    #[test]
    fn test_batch_filters_conflict() {
        let res = Cli::try_parse_from(["greencheck", "batch", "a.com", "--green-only", "--grey-only"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_asn_requires_ip() {
        assert!(Cli::try_parse_from(["greencheck", "asn", "example.com"]).is_err());
        assert!(Cli::try_parse_from(["greencheck", "asn", "2001:db8::1"]).is_ok());
    }
}
