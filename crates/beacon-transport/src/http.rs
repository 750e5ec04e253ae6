//! HTTP client abstraction.
//!
//! Transports talk to the network through [`HttpClient`] so hosts can supply
//! their own client and tests can record requests.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::error::Result;

/// Status and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Minimal async HTTP client used by the transports.
///
/// Implementations must be thread-safe (Send + Sync). An `Err` means no
/// response was received at all; HTTP error statuses are returned as `Ok`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POST a JSON document.
    async fn post_json(&self, url: &Url, body: String) -> Result<HttpResponse>;

    /// GET a resource.
    async fn get(&self, url: &Url) -> Result<HttpResponse>;
}

/// [`HttpClient`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_json(&self, url: &Url, body: String) -> Result<HttpResponse> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(HttpResponse { status, body })
    }

    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_post_json_sends_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/events/abc"))
            .and(header("content-type", "application/json"))
            .and(body_string(r#"{"a":1}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = ReqwestClient::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/events/abc", server.uri())).unwrap();
        let response = client.post_json(&url, r#"{"a":1}"#.to_string()).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(&response.body[..], br#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_error_status_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ReqwestClient::new(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let response = client.get(&url).await.unwrap();
        assert_eq!(response.status, 503);
    }
}
