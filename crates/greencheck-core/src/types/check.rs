use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::{AsnEntry, IpRange};

/// Which registry produced a green verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// Address fell inside a registered IP range
    IpRange,
    /// Address is announced by a registered AS
    Asn,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IpRange => write!(f, "ip-range"),
            Self::Asn => write!(f, "asn"),
        }
    }
}

/// The verdict of a single domain check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCheck {
    /// Host as submitted by the caller
    pub url: String,

    /// Address the host resolved to
    pub ip: IpAddr,

    /// Whether any registry data matched
    pub data: bool,

    /// Whether the host is green
    pub green: bool,

    /// Provider owning the matched registry entry
    pub hosting_provider_id: Option<u64>,

    /// Registry that matched
    pub match_type: Option<MatchKind>,

    /// Identifier of the matched range or ASN entry
    pub match_id: Option<u64>,

    /// Whether this verdict came from a cache
    pub cached: bool,

    /// When the check ran
    pub checked_at: DateTime<Utc>,
}

impl SiteCheck {
    /// Green verdict from an IP range match
    #[must_use]
    pub fn green_by_ip_range(url: impl Into<String>, ip: IpAddr, range: &IpRange) -> Self {
        Self {
            url: url.into(),
            ip,
            data: true,
            green: true,
            hosting_provider_id: Some(range.provider_id),
            match_type: Some(MatchKind::IpRange),
            match_id: Some(range.id),
            cached: false,
            checked_at: Utc::now(),
        }
    }

    /// Green verdict from an ASN match
    #[must_use]
    pub fn green_by_asn(url: impl Into<String>, ip: IpAddr, entry: &AsnEntry) -> Self {
        Self {
            url: url.into(),
            ip,
            data: true,
            green: true,
            hosting_provider_id: Some(entry.provider_id),
            match_type: Some(MatchKind::Asn),
            match_id: Some(entry.id),
            cached: false,
            checked_at: Utc::now(),
        }
    }

    /// Grey verdict: resolved, but nothing matched
    #[must_use]
    pub fn grey(url: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            url: url.into(),
            ip,
            data: false,
            green: false,
            hosting_provider_id: None,
            match_type: None,
            match_id: None,
            cached: false,
            checked_at: Utc::now(),
        }
    }

    /// Compare two verdicts, ignoring when they were made
    #[must_use]
    pub fn same_verdict(&self, other: &Self) -> bool {
        self.url == other.url
            && self.ip == other.ip
            && self.data == other.data
            && self.green == other.green
            && self.hosting_provider_id == other.hosting_provider_id
            && self.match_type == other.match_type
            && self.match_id == other.match_id
            && self.cached == other.cached
    }
}
