//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use greencheck::GreenDomain;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored, human readable lines
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, csv",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// One CSV line of a report
#[derive(Serialize)]
struct CsvRow<'a> {
    url: &'a str,
    green: bool,
    hosted_by: &'a str,
    hosted_by_id: Option<u64>,
    hosted_by_website: &'a str,
    partner: &'a str,
    listed_provider: bool,
}

impl<'a> From<&'a GreenDomain> for CsvRow<'a> {
    fn from(d: &'a GreenDomain) -> Self {
        Self {
            url: &d.url,
            green: d.green,
            hosted_by: d.hosted_by.as_deref().unwrap_or(""),
            hosted_by_id: d.hosted_by_id,
            hosted_by_website: d.hosted_by_website.as_deref().unwrap_or(""),
            partner: d.partner.as_deref().unwrap_or(""),
            listed_provider: d.listed_provider,
        }
    }
}

/// Write summaries as CSV with a header row.
pub fn write_csv<W: Write>(out: W, domains: &[GreenDomain]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for domain in domains {
        writer.serialize(CsvRow::from(domain))?;
    }
    writer.flush()?;
    Ok(())
}

/// Render one summary as a pretty line.
pub fn pretty_line(domain: &GreenDomain) -> String {
    if domain.green {
        let host = match (&domain.hosted_by, domain.hosted_by_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("provider #{id}"),
            (None, None) => "unknown provider".to_string(),
        };
        format!("{} {}  {} {}", "green".green().bold(), domain.url.bold(), "hosted by".dimmed(), host)
    } else {
        format!("{}  {}", "grey".bright_black().bold(), domain.url.bold())
    }
}

/// Print summaries in the requested format.
pub fn print_domains(format: OutputFormat, domains: &[GreenDomain]) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(domains)?);
        }
        OutputFormat::Csv => {
            write_csv(std::io::stdout().lock(), domains)?;
        }
        OutputFormat::Pretty => {
            for domain in domains {
                println!("{}", pretty_line(domain));
            }
        }
    }
    Ok(())
}
