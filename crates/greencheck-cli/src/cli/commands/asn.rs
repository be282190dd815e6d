//! `greencheck asn` - Show which autonomous systems announce an address.

use anyhow::Result;
use colored::Colorize;
use greencheck::{AsnEntry, AsnLookup, AsnRepository};
use serde::Serialize;
use std::net::IpAddr;

use super::Context;
use crate::cli::args::AsnArgs;
use crate::output::OutputFormat;

#[derive(Serialize)]
struct AsnRow {
    asn: u32,
    registered: Option<AsnEntry>,
}

#[derive(Serialize)]
struct AsnReport {
    ip: IpAddr,
    service: &'static str,
    asns: Vec<AsnRow>,
}

pub async fn execute(ctx: Context, args: AsnArgs) -> Result<()> {
    let lookup = ctx.asn_lookup()?;
    let ip = greencheck::net::canonical(args.ip);

    if greencheck::net::is_reserved(ip) {
        anyhow::bail!("{ip} is private or reserved and has no public AS");
    }

    let announced = lookup.lookup_asn(ip).await?;

    // Registry is optional here; without it we only list what is announced
    let registry = match ctx.registry {
        Some(_) => Some(ctx.load_registry()?),
        None => None,
    };

    let mut rows = Vec::with_capacity(announced.candidates().len());
    for &asn in announced.candidates() {
        let registered = match &registry {
            Some(registry) => registry.active_entries(asn).await?.into_iter().find(|e| e.active),
            None => None,
        };
        rows.push(AsnRow { asn, registered });
    }

    let report = AsnReport {
        ip,
        service: lookup.name(),
        asns: rows,
    };

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Csv => {
            println!("ip,asn,registered,provider_id");
            for row in &report.asns {
                println!(
                    "{},{},{},{}",
                    report.ip,
                    row.asn,
                    row.registered.is_some(),
                    row.registered.as_ref().map(|e| e.provider_id.to_string()).unwrap_or_default()
                );
            }
        }
        OutputFormat::Pretty => {
            println!("{} {}", "Address:".bold(), report.ip.to_string().cyan().bold());
            println!("  {} {}", "Service:".bold(), report.service);
            if report.asns.is_empty() {
                println!("  {}", "not announced by any AS".dimmed());
            }
            for row in &report.asns {
                match &row.registered {
                    Some(entry) => println!(
                        "  AS{}  {} provider #{}",
                        row.asn,
                        "registered".green(),
                        entry.provider_id
                    ),
                    None if registry.is_some() => {
                        println!("  AS{}  {}", row.asn, "not registered".dimmed());
                    }
                    None => println!("  AS{}", row.asn),
                }
            }
        }
    }

    Ok(())
}
