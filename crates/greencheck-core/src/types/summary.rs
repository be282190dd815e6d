use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HostingProvider, SiteCheck};

/// Cache-shaped green/grey verdict for a domain, as delivered in bulk reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreenDomain {
    /// Domain as the caller submitted it
    pub url: String,

    /// Whether the domain is green
    pub green: bool,

    /// Provider name
    #[serde(default)]
    pub hosted_by: Option<String>,

    /// Provider identifier
    #[serde(default)]
    pub hosted_by_id: Option<u64>,

    /// Provider website
    #[serde(default)]
    pub hosted_by_website: Option<String>,

    /// Provider partner level
    #[serde(default)]
    pub partner: Option<String>,

    /// Whether the provider is publicly listed
    #[serde(default)]
    pub listed_provider: bool,

    /// When this summary was produced
    pub modified: DateTime<Utc>,
}

impl GreenDomain {
    /// Placeholder for a domain with no green match
    #[must_use]
    pub fn grey_result(domain: impl Into<String>) -> Self {
        Self {
            url: domain.into(),
            green: false,
            hosted_by: None,
            hosted_by_id: None,
            hosted_by_website: None,
            partner: None,
            listed_provider: false,
            modified: Utc::now(),
        }
    }

    /// Project a check into a summary, filling in provider details when known
    #[must_use]
    pub fn from_sitecheck(check: &SiteCheck, provider: Option<&HostingProvider>) -> Self {
        Self {
            url: check.url.clone(),
            green: check.green,
            hosted_by: provider.map(|p| p.name.clone()),
            hosted_by_id: check.hosting_provider_id,
            hosted_by_website: provider.and_then(|p| p.website.clone()),
            partner: provider.and_then(|p| p.partner.clone()),
            listed_provider: provider.is_some_and(|p| p.show_on_website),
            modified: check.checked_at,
        }
    }
}
