//! `greencheck config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&ctx, &key, &value),
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Csv | OutputFormat::Pretty => {
            println!("{}", "Current Configuration:".bold());
            println!();

            let registry = config
                .registry
                .as_ref()
                .map_or_else(|| "(not set)".dimmed().to_string(), |p| p.display().to_string());
            println!("  {} {}", "registry:".bold(), registry);
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
            println!("  {} {}", "lookup:".bold(), config.lookup);
            println!("  {} {}", "concurrency:".bold(), config.concurrency);
            println!("  {} {}", "prefer_ipv4:".bold(), config.checker.prefer_ipv4);
            println!("  {} {}", "resolve_timeout_ms:".bold(), config.checker.resolve_timeout_ms);
            println!("  {} {}", "asn_timeout_ms:".bold(), config.checker.asn_timeout_ms);
            println!("  {} {}", "http_base_url:".bold(), config.http.base_url);
        }
    }

    Ok(())
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_from(&ctx.config_path)?;
    config.set(key, value)?;
    config.save_to(&ctx.config_path)?;

    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());
    Ok(())
}
