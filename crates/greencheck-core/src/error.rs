use std::net::IpAddr;
use thiserror::Error;

/// Result type alias for greencheck operations
pub type Result<T> = std::result::Result<T, GreenCheckError>;

/// Errors that can occur while classifying a domain
#[derive(Error, Debug)]
pub enum GreenCheckError {
    /// Host could not be turned into an IP address
    #[error("could not resolve {host}: {reason}")]
    Resolution {
        /// Host as submitted for resolution
        host: String,
        /// Resolver failure description
        reason: String,
    },

    /// Input did not yield a usable host
    #[error("invalid input: {0:?}")]
    InvalidInput(String),

    /// Address is private or reserved and has no public ASN
    #[error("address is private or reserved: {0}")]
    PrivateOrReservedAddress(IpAddr),

    /// IP-to-ASN service failed or answered with garbage
    #[error("ASN lookup failed: {0}")]
    LookupService(String),

    /// Request timed out
    #[error("operation timed out after {0} ms")]
    Timeout(u64),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Registry backend failed
    #[error("registry error: {0}")]
    Registry(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GreenCheckError {
    /// Build a resolution error for `host`
    pub fn resolution(host: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Resolution {
            host: host.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the host could not be resolved
    #[must_use]
    pub const fn is_resolution_error(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }

    /// Returns true if the address was refused as private or reserved
    #[must_use]
    pub const fn is_private_or_reserved(&self) -> bool {
        matches!(self, Self::PrivateOrReservedAddress(_))
    }

    /// Returns true if a classification should fall back to grey on this error
    /// instead of failing the check
    #[must_use]
    pub const fn is_degradable(&self) -> bool {
        matches!(
            self,
            Self::PrivateOrReservedAddress(_)
                | Self::LookupService(_)
                | Self::Timeout(_)
                | Self::Http(_)
                | Self::Json(_)
                | Self::Registry(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_error_is_not_degradable() {
        let err = GreenCheckError::resolution("nope.invalid", "no such host");
        assert!(err.is_resolution_error());
        assert!(!err.is_degradable());
        assert_eq!(err.to_string(), "could not resolve nope.invalid: no such host");
    }

    #[test]
    fn test_lookup_failures_degrade() {
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        assert!(GreenCheckError::PrivateOrReservedAddress(ip).is_degradable());
        assert!(GreenCheckError::PrivateOrReservedAddress(ip).is_private_or_reserved());
        assert!(GreenCheckError::LookupService("bad txt".into()).is_degradable());
        assert!(GreenCheckError::Timeout(500).is_degradable());
        assert!(!GreenCheckError::InvalidInput(String::new()).is_degradable());
    }
}
