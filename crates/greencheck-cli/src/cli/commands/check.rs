//! `greencheck check` - Classify a single domain, URL or IP address.

use anyhow::Result;
use colored::Colorize;
use greencheck::SiteCheck;

use super::Context;
use crate::cli::args::CheckArgs;
use crate::output::{self, OutputFormat};

pub async fn execute(ctx: Context, args: CheckArgs) -> Result<()> {
    let host = ctx.normalizer().normalize(&args.input)?;
    let checker = ctx.checker()?;

    if args.details {
        // Resolution errors read "could not resolve <host>: <reason>"
        let check = checker.check_domain(&host).await?;
        return print_check(ctx.output_format, &check);
    }

    let summary = checker.perform_full_lookup(&host).await?;

    output::print_domains(ctx.output_format, std::slice::from_ref(&summary))
}

fn print_check(format: OutputFormat, check: &SiteCheck) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(check)?);
        }
        OutputFormat::Csv => {
            println!("url,ip,green,match_type,match_id,hosting_provider_id");
            println!(
                "{},{},{},{},{},{}",
                check.url,
                check.ip,
                check.green,
                check.match_type.map(|kind| kind.to_string()).unwrap_or_default(),
                check.match_id.map(|id| id.to_string()).unwrap_or_default(),
                check.hosting_provider_id.map(|id| id.to_string()).unwrap_or_default(),
            );
        }
        OutputFormat::Pretty => {
            let verdict = if check.green {
                "green".green().bold()
            } else {
                "grey".bright_black().bold()
            };
            println!("{} {}", "Host:".bold(), check.url.cyan().bold());
            println!();
            println!("  {} {}", "Address:".bold(), check.ip);
            println!("  {} {}", "Verdict:".bold(), verdict);
            if let (Some(kind), Some(id)) = (check.match_type, check.match_id) {
                println!("  {} {kind} #{id}", "Matched:".bold());
            }
            if let Some(provider) = check.hosting_provider_id {
                println!("  {} #{}", "Provider:".bold(), provider);
            }
        }
    }
    Ok(())
}
