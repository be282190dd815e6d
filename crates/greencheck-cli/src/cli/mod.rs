//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    crate::logging::init(cli.verbose);

    // Load configuration
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let config = Config::load_from(&config_path)?;

    // Flags win over the config file
    let output_format = cli.output.or(config.output_format).unwrap_or_default();
    let lookup = cli.lookup.unwrap_or(config.lookup);
    let registry = cli.registry.or_else(|| config.registry.clone());

    let ctx = commands::Context {
        config,
        config_path,
        registry,
        lookup,
        output_format,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Check(args) => commands::check::execute(ctx, args).await,
        Commands::Batch(args) => commands::batch::execute(ctx, args).await,
        Commands::Asn(args) => commands::asn::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}
