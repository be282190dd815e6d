//! `greencheck batch` - Check many domains and report green before grey.

use anyhow::{Context as _, Result};
use colored::Colorize;
use futures_util::stream::{self, StreamExt};
use greencheck::{build_green_grey_list, grey_only, GreenCheckError, GreenDomain, InputNormalizer};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

use super::Context;
use crate::cli::args::BatchArgs;
use crate::output::{self, OutputFormat};

/// Outcome of a bulk run
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    /// Green summaries first, then grey placeholders
    pub domains: Vec<GreenDomain>,
    /// Hosts that did not resolve
    pub unresolvable: Vec<String>,
    /// Inputs that could not be normalized to a host
    pub invalid: Vec<String>,
}

pub async fn execute(ctx: Context, args: BatchArgs) -> Result<()> {
    let mut raw = args.inputs.clone();
    if let Some(path) = &args.file {
        raw.extend(read_inputs(path)?);
    }
    anyhow::ensure!(!raw.is_empty(), "no domains given; pass them as arguments or with --file");

    let (hosts, invalid) = normalize_all(&ctx.normalizer(), &raw);
    let checker = ctx.checker()?;
    let concurrency = args.concurrency.unwrap_or(ctx.config.concurrency).max(1);

    let outcomes: Vec<(String, greencheck::Result<GreenDomain>)> = stream::iter(hosts)
        .map(|host| {
            let checker = checker.clone();
            async move {
                let outcome = checker.perform_full_lookup(&host).await;
                (host, outcome)
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let mut report = summarize(outcomes);
    report.invalid = invalid;

    if args.green_only {
        report.domains.retain(|d| d.green);
    } else if args.grey_only {
        report.domains.retain(|d| !d.green);
    }

    print_report(ctx.output_format, &report)
}

/// Read one input per non-blank line; `-` reads stdin.
pub fn read_inputs(path: &Path) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = if path == Path::new("-") {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening {}", path.display()))?;
        Box::new(BufReader::new(file))
    };

    let mut inputs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() && !line.starts_with('#') {
            inputs.push(line.to_string());
        }
    }
    Ok(inputs)
}

/// Normalize every input, splitting off the ones that have no host.
///
/// Hosts are deduplicated, keeping the first occurrence.
pub fn normalize_all(normalizer: &InputNormalizer, raw: &[String]) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut hosts = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();

    for input in raw {
        match normalizer.normalize(input) {
            Ok(host) => {
                if seen.insert(host.clone()) {
                    hosts.push(host);
                }
            }
            Err(e) => {
                warn!(input = %input, error = %e, "skipping input");
                invalid.push(input.clone());
            }
        }
    }
    (hosts, invalid)
}

/// Fold per-host outcomes into the green-then-grey report.
///
/// Unresolvable hosts are kept out of the grey list. Any other failure is
/// logged and reported as grey.
pub fn summarize(outcomes: Vec<(String, Result<GreenDomain, GreenCheckError>)>) -> BatchReport {
    let mut checked = Vec::with_capacity(outcomes.len());
    let mut green = Vec::new();
    let mut unresolvable = Vec::new();

    for (host, outcome) in outcomes {
        match outcome {
            Ok(summary) => {
                if summary.green {
                    green.push(summary);
                }
                checked.push(host);
            }
            Err(e) if e.is_resolution_error() => unresolvable.push(host),
            Err(e) => {
                warn!(host = %host, error = %e, "check failed");
                checked.push(host);
            }
        }
    }

    let grey = grey_only(&checked, &green);
    BatchReport {
        domains: build_green_grey_list(grey, green),
        unresolvable,
        invalid: Vec::new(),
    }
}

fn print_report(format: OutputFormat, report: &BatchReport) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }
        OutputFormat::Csv | OutputFormat::Pretty => output::print_domains(format, &report.domains)?,
    }

    for host in &report.unresolvable {
        eprintln!("{} {}", "could not resolve".red().bold(), host);
    }
    for input in &report.invalid {
        eprintln!("{} {}", "invalid input".red().bold(), input);
    }

    if format == OutputFormat::Pretty {
        let green = report.domains.iter().filter(|d| d.green).count();
        eprintln!(
            "{} green, {} grey, {} unresolvable",
            green.to_string().green().bold(),
            report.domains.len() - green,
            report.unresolvable.len()
        );
    }
    Ok(())
}
