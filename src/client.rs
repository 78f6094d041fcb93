//! HTTP transport used by the prober

use crate::{
    defaults,
    error::{AppError, Result},
};
use async_trait::async_trait;
use reqwest::{redirect, Client, Url};
use std::time::Duration;
use thiserror::Error;

/// Why a single HEAD request produced no status code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// HTTP client trait for abstraction and testing
#[async_trait]
pub trait ProbeClient: Send + Sync {
    /// Send a HEAD request and return the status code once the response
    /// headers have arrived. The body is never read.
    async fn head(&self, url: &Url) -> std::result::Result<u16, TransportError>;
}

/// Prepend `https://` when the candidate has no http(s) scheme
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Root-path URL that a candidate is probed at
pub fn probe_target(raw: &str) -> std::result::Result<Url, TransportError> {
    let mut url = Url::parse(&normalize_url(raw))
        .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if url.host_str().is_none() {
        return Err(TransportError::InvalidUrl(format!("{}: missing host", raw)));
    }

    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// reqwest-backed transport
pub struct NetworkClient {
    client: Client,
}

impl NetworkClient {
    /// Create a new network client whose own timeout matches the probe window
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            // A 3xx answer already proves the endpoint is alive
            .redirect(redirect::Policy::none())
            .user_agent(defaults::USER_AGENT)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ProbeClient for NetworkClient {
    async fn head(&self, url: &Url) -> std::result::Result<u16, TransportError> {
        let response = self.client.head(url.clone()).send().await?;
        let status = response.status().as_u16();
        // Dropping the response releases the connection without reading a body
        drop(response);
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn test_normalize_url_adds_https() {
        assert_eq!(normalize_url("api.example.com"), "https://api.example.com");
        assert_eq!(normalize_url("api.example.com/v1"), "https://api.example.com/v1");
        assert_eq!(normalize_url("http://a.com"), "http://a.com");
        assert_eq!(normalize_url("HTTPS://a.com"), "HTTPS://a.com");
        assert_eq!(normalize_url("  b.com "), "https://b.com");
    }

    #[test]
    fn test_probe_target_uses_root_path() {
        let url = probe_target("https://a.com/api/v1?x=1#frag").unwrap();
        assert_eq!(url.as_str(), "https://a.com/");

        let url = probe_target("b.com:8443/proxy").unwrap();
        assert_eq!(url.as_str(), "https://b.com:8443/");
    }

    #[test]
    fn test_probe_target_rejects_garbage() {
        assert!(matches!(probe_target("http://"), Err(TransportError::InvalidUrl(_))));
        assert!(matches!(probe_target("exa mple.com"), Err(TransportError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_head_returns_status() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = NetworkClient::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        assert_eq!(client.head(&url).await, Ok(204));
    }

    #[tokio::test]
    async fn test_redirect_is_not_followed() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "http://127.0.0.1:9/"))
            .mount(&server)
            .await;

        let client = NetworkClient::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        assert_eq!(client.head(&url).await, Ok(302));
    }

    #[tokio::test]
    async fn test_refused_connection_is_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = NetworkClient::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        assert!(matches!(client.head(&url).await, Err(TransportError::Connect(_))));
    }
}
