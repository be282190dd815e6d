//! Cleaning user-supplied input down to a host.

use greencheck_core::{GreenCheckError, Result};
use std::net::IpAddr;
use url::{Host, Url};

/// Knows which top-level domains exist
pub trait TldRegistry: Send + Sync {
    /// Returns true if `host` is a name under a recognised public suffix
    fn is_recognized_tld(&self, host: &str) -> bool;
}

/// [`TldRegistry`] backed by the compiled-in Public Suffix List
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicSuffixList;

impl TldRegistry for PublicSuffixList {
    fn is_recognized_tld(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        psl::suffix(host.as_bytes()).is_some_and(|suffix| suffix.is_known())
            && psl::domain(host.as_bytes()).is_some()
    }
}

/// Turns raw input such as `"https://www.example.com:8443/about"` into the
/// host to check (`"www.example.com"`).
pub struct InputNormalizer<T = PublicSuffixList> {
    tlds: T,
}

impl Default for InputNormalizer {
    fn default() -> Self {
        Self::new(PublicSuffixList)
    }
}

impl<T: TldRegistry> InputNormalizer<T> {
    /// Create a normalizer using the given TLD registry
    pub const fn new(tlds: T) -> Self {
        Self { tlds }
    }

    /// Extract the host from `raw`.
    ///
    /// Returns [`GreenCheckError::InvalidInput`] when nothing usable remains.
    pub fn normalize(&self, raw: &str) -> Result<String> {
        let raw = raw.trim();

        // Bare IPv6 literals are not valid URL authorities without brackets.
        if let Ok(ip) = raw.parse::<IpAddr>() {
            return Ok(ip.to_string());
        }

        let host = match with_protocol(raw) {
            Some(url) => match url.host() {
                Some(Host::Domain(domain)) if self.tlds.is_recognized_tld(domain) => {
                    Some(domain.trim_end_matches('.').to_string())
                }
                Some(_) => bare_host(&url),
                None => None,
            },
            None => None,
        };

        match host {
            Some(host) if !host.is_empty() => Ok(host),
            _ => Err(GreenCheckError::InvalidInput(raw.to_string())),
        }
    }
}

/// Parse `raw` as a URL, assuming `http` when no scheme is given
fn with_protocol(raw: &str) -> Option<Url> {
    if raw.is_empty() {
        return None;
    }
    if raw.contains("://") {
        Url::parse(raw).ok()
    } else {
        Url::parse(&format!("http://{}", raw.trim_start_matches("//"))).ok()
    }
}

/// Host of a URL that does not carry a recognised domain
fn bare_host(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Ipv4(v4) => Some(v4.to_string()),
        Host::Ipv6(v6) => Some(v6.to_string()),
        Host::Domain(domain) => Some(domain.trim_end_matches('.').to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> Result<String> {
        InputNormalizer::default().normalize(raw)
    }

    #[test]
    fn test_plain_domain() {
        assert_eq!(normalize("example.com").unwrap(), "example.com");
        assert_eq!(normalize("  Example.COM ").unwrap(), "example.com");
    }

    #[test]
    fn test_url_is_stripped_to_host() {
        assert_eq!(
            normalize("https://www.example.co.uk:8443/about?x=1").unwrap(),
            "www.example.co.uk"
        );
        assert_eq!(normalize("www.example.org/path").unwrap(), "www.example.org");
    }

    #[test]
    fn test_ip_literals() {
        assert_eq!(normalize("192.0.2.1").unwrap(), "192.0.2.1");
        assert_eq!(normalize("http://192.0.2.1:8080/").unwrap(), "192.0.2.1");
        assert_eq!(normalize("2001:db8::1").unwrap(), "2001:db8::1");
        assert_eq!(normalize("http://[2001:db8::1]/").unwrap(), "2001:db8::1");
    }

    #[test]
    fn test_host_without_known_tld_falls_back() {
        assert_eq!(normalize("localhost").unwrap(), "localhost");
        assert_eq!(normalize("//intranet:8080").unwrap(), "intranet");
    }

    #[test]
    fn test_empty_input_is_invalid() {
        assert!(matches!(normalize(""), Err(GreenCheckError::InvalidInput(_))));
        assert!(matches!(normalize("http://"), Err(GreenCheckError::InvalidInput(_))));
    }

    #[test]
    fn test_public_suffix_list() {
        let psl = PublicSuffixList;
        assert!(psl.is_recognized_tld("example.com"));
        assert!(psl.is_recognized_tld("www.example.co.uk."));
        assert!(!psl.is_recognized_tld("localhost"));
        assert!(!psl.is_recognized_tld("co.uk"));
    }
}
