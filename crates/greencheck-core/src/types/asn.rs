use serde::{Deserialize, Serialize};
use std::fmt;

use super::AsnEntry;
use crate::error::{GreenCheckError, Result};

/// What an IP-to-ASN service announced for an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "asns")]
pub enum AsnQueryResult {
    /// Exactly one origin AS
    Single(u32),
    /// Several origin ASes, in the order the service listed them
    Multiple(Vec<u32>),
    /// The service has no AS for this address
    NotApplicable,
}

impl AsnQueryResult {
    /// Parse the AS field of a lookup answer, e.g. `"15169"`, `"AS1111 AS2222"` or `"NA"`.
    ///
    /// Tokens that are not AS numbers are skipped; a field with no usable
    /// token at all is a malformed answer.
    pub fn parse(field: &str) -> Result<Self> {
        let field = field.trim().trim_matches('"').trim();
        if field.is_empty() || field.eq_ignore_ascii_case("na") {
            return Ok(Self::NotApplicable);
        }

        let asns: Vec<u32> = field
            .split_whitespace()
            .filter_map(|token| {
                let digits = token
                    .strip_prefix("AS")
                    .or_else(|| token.strip_prefix("as"))
                    .unwrap_or(token);
                digits.parse().ok()
            })
            .collect();

        match asns.as_slice() {
            [] => Err(GreenCheckError::LookupService(format!(
                "no AS number in {field:?}"
            ))),
            [asn] => Ok(Self::Single(*asn)),
            _ => Ok(Self::Multiple(asns)),
        }
    }

    /// Candidate AS numbers, in service order
    #[must_use]
    pub fn candidates(&self) -> &[u32] {
        match self {
            Self::Single(asn) => std::slice::from_ref(asn),
            Self::Multiple(asns) => asns,
            Self::NotApplicable => &[],
        }
    }
}

impl fmt::Display for AsnQueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(asn) => write!(f, "AS{asn}"),
            Self::Multiple(asns) => {
                let joined: Vec<String> = asns.iter().map(|a| format!("AS{a}")).collect();
                write!(f, "{}", joined.join(" "))
            }
            Self::NotApplicable => write!(f, "NA"),
        }
    }
}

/// Outcome of matching an address against the ASN registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsnMatch {
    /// An active registry entry owns one of the announced ASes
    Found(AsnEntry),
    /// Lookup failed, nothing was announced, or no announced AS is registered
    NotFound,
    /// The address is private or reserved, so it has no public AS
    Invalid,
}

impl AsnMatch {
    /// The matched entry, if any
    #[must_use]
    pub fn into_entry(self) -> Option<AsnEntry> {
        match self {
            Self::Found(entry) => Some(entry),
            Self::NotFound | Self::Invalid => None,
        }
    }
}
