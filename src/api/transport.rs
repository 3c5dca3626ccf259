use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("azure-maps-search/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed HTTP exchange.
///
/// Non-2xx responses are data here, not errors; the builder decides what a
/// status means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The HTTP seam used by [`QueryBuilder`](super::QueryBuilder).
///
/// Implementations perform one GET of `url` with `query` appended as the
/// query string. An `Err` means the exchange did not complete at all.
pub trait Transport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<TransportResponse>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<TransportResponse> {
        (**self).get(url, query)
    }
}

/// Blocking reqwest transport.
///
/// Errors never carry the request URL, since its query string holds the
/// subscription key.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport with the default user agent and a 30 second timeout.
    pub fn new() -> Result<Self> {
        Self::with_settings(DEFAULT_USER_AGENT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(String, String)]) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to Azure Maps")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(reqwest::Error::without_url)
            .context("Failed to read Azure Maps response body")?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u16);

    impl Transport for Fixed {
        fn get(&self, _url: &str, _query: &[(String, String)]) -> Result<TransportResponse> {
            Ok(TransportResponse::new(self.0, "{}"))
        }
    }

    #[test]
    fn test_boxed_transport_delegates() {
        let boxed: Box<dyn Transport> = Box::new(Fixed(418));
        let response = boxed.get("http://unused", &[]).unwrap();
        assert_eq!(response.status, 418);
        assert_eq!(response.body, "{}");
    }

    #[test]
    fn test_default_user_agent_names_crate() {
        assert!(DEFAULT_USER_AGENT.starts_with("azure-maps-search/"));
    }
}
