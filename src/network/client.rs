//! HTTP client used for engine reachability checks

use crate::config::OutgoingSettings;
use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// HTTP client wrapper with VizualNetwork-specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = Duration::from_secs_f64(settings.request_timeout);

        let mut headers = HeaderMap::new();
        for (key, value) in &settings.extra_headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Skipping invalid extra header: {}", key),
            }
        }

        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .default_headers(headers)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        Ok(Self {
            client: builder.build()?,
            default_timeout: timeout,
        })
    }

    /// Send a HEAD request and return the status code
    pub async fn head(&self, url: &str) -> Result<u16> {
        self.head_with_timeout(url, self.default_timeout).await
    }

    /// HEAD request with a custom timeout
    pub async fn head_with_timeout(&self, url: &str, timeout: Duration) -> Result<u16> {
        let response = self.client.head(url).timeout(timeout).send().await?;
        Ok(response.status().as_u16())
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

/// User agent sent with every request
pub fn user_agent() -> String {
    format!("VizualNetwork/{}", crate::VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxySettings;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_proxy_rejected() {
        let settings = OutgoingSettings {
            proxies: ProxySettings {
                all: Some("not a url".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(HttpClient::with_settings(&settings).is_err());
    }

    #[tokio::test]
    async fn test_head_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(header("user-agent", user_agent().as_str()))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        assert_eq!(client.head(&server.uri()).await.unwrap(), 204);
    }
}
