//! HTTP JSON IP-to-ASN client.

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use greencheck_core::{net, AsnLookup, AsnQueryResult, GreenCheckError, Result};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::HttpLookupConfig;

/// Answer from `GET /v1/as/ip/{ip}`
#[derive(Debug, Clone, Deserialize)]
struct AsAnswer {
    announced: bool,
    #[serde(default)]
    as_number: Option<u32>,
}

/// IP-to-ASN lookup over an iptoasn-style HTTP API
#[derive(Clone)]
pub struct HttpAsnClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    base_url: url::Url,
    timeout_ms: u64,
    rate_limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl HttpAsnClient {
    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> HttpAsnClientBuilder {
        HttpAsnClientBuilder::new()
    }

    async fn get(&self, ip: IpAddr) -> Result<AsAnswer> {
        self.inner.rate_limiter.until_ready().await;

        let url = self
            .inner
            .base_url
            .join(&format!("v1/as/ip/{ip}"))
            .map_err(|e| GreenCheckError::Config(e.to_string()))?;
        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                warn!("rate limited by ASN service");
            }
            return Err(GreenCheckError::LookupService(format!(
                "service returned {}: {body}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(&e))?;
        serde_json::from_str(&body).map_err(GreenCheckError::Json)
    }

    fn map_transport_error(&self, err: &reqwest::Error) -> GreenCheckError {
        if err.is_timeout() {
            GreenCheckError::Timeout(self.inner.timeout_ms)
        } else {
            GreenCheckError::Http(err.to_string())
        }
    }
}

#[async_trait]
impl AsnLookup for HttpAsnClient {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self), fields(service = "http"))]
    async fn lookup_asn(&self, ip: IpAddr) -> Result<AsnQueryResult> {
        if net::is_reserved(ip) {
            return Err(GreenCheckError::PrivateOrReservedAddress(ip));
        }

        let answer = self.get(net::canonical(ip)).await?;
        match (answer.announced, answer.as_number) {
            (true, Some(asn)) if asn != 0 => Ok(AsnQueryResult::Single(asn)),
            _ => Ok(AsnQueryResult::NotApplicable),
        }
    }
}

/// Builder for configuring an [`HttpAsnClient`]
pub struct HttpAsnClientBuilder {
    config: HttpLookupConfig,
    user_agent: String,
}

impl Default for HttpAsnClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpAsnClientBuilder {
    /// Create a builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HttpLookupConfig::default(),
            user_agent: format!("greencheck-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Start from an existing configuration
    #[must_use]
    pub fn config(mut self, config: HttpLookupConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HttpAsnClient> {
        let mut base = self.config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = url::Url::parse(&base)
            .map_err(|e| GreenCheckError::Config(format!("invalid base URL {base:?}: {e}")))?;

        let http = HttpClient::builder()
            .timeout(self.config.timeout())
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| GreenCheckError::Config(e.to_string()))?;

        let quota = Quota::per_second(
            NonZeroU32::new(self.config.requests_per_second).unwrap_or(NonZeroU32::MIN),
        )
        .allow_burst(NonZeroU32::new(self.config.burst).unwrap_or(NonZeroU32::MIN));

        Ok(HttpAsnClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout_ms: self.config.timeout_ms,
                rate_limiter: RateLimiter::direct(quota),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> HttpAsnClient {
        HttpAsnClient::builder().base_url(server.uri()).build().unwrap()
    }

    #[tokio::test]
    async fn test_announced_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/as/ip/8.8.8.8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "announced": true,
                "as_number": 15169,
                "as_description": "GOOGLE",
                "ip": "8.8.8.8"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).await.lookup_asn("8.8.8.8".parse().unwrap()).await.unwrap();
        assert_eq!(result, AsnQueryResult::Single(15169));
    }

    #[tokio::test]
    async fn test_unannounced_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/as/ip/1.2.3.4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "announced": false,
                "ip": "1.2.3.4"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).await.lookup_asn("1.2.3.4".parse().unwrap()).await.unwrap();
        assert_eq!(result, AsnQueryResult::NotApplicable);
    }

    #[tokio::test]
    async fn test_server_error_is_lookup_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.lookup_asn("1.2.3.4".parse().unwrap()).await.unwrap_err();
        assert!(matches!(err, GreenCheckError::LookupService(_)));
        assert!(err.is_degradable());
    }

    #[tokio::test]
    async fn test_malformed_body_is_degradable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.lookup_asn("1.2.3.4".parse().unwrap()).await.unwrap_err();
        assert!(matches!(err, GreenCheckError::Json(_)));
        assert!(err.is_degradable());
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"announced": false}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = HttpAsnClient::builder()
            .base_url(server.uri())
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = client.lookup_asn("1.2.3.4".parse().unwrap()).await.unwrap_err();
        assert!(matches!(err, GreenCheckError::Timeout(50)));
    }

    #[tokio::test]
    async fn test_private_address_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).await.lookup_asn("192.168.0.10".parse().unwrap()).await.unwrap_err();
        assert!(err.is_private_or_reserved());
    }
}
