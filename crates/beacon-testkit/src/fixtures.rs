//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Mutex;

use async_trait::async_trait;
use beacon_core::{decode_event, Account, PropertyMap, StaticPage, Value};
use beacon_transport::{HttpClient, HttpResponse, TransportError, Url};
use bytes::Bytes;

/// Account used across tests.
pub fn test_account() -> Account {
    Account::new("test-input", "test-token")
}

/// A page with every field populated.
pub fn test_page() -> StaticPage {
    StaticPage::new(
        "https://shop.example/checkout",
        "beacon-testkit/1.0",
        "https://search.example/?q=shoes",
    )
}

/// One request seen by a [`RecordingHttpClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: Url,
    pub body: Option<String>,
}

impl RecordedRequest {
    /// The POST body parsed as JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(self.body.as_deref()?).ok()
    }
}

/// An [`HttpClient`] that records requests and answers with a canned response.
pub struct RecordingHttpClient {
    reply: Option<HttpResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingHttpClient {
    /// Answer every request with `status` and `body`.
    pub fn responding(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            reply: Some(HttpResponse::new(status, body)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request as if the network were down.
    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: RecordedRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.reply
            .clone()
            .ok_or_else(|| TransportError::Network("connection refused".to_string()))
    }
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn post_json(&self, url: &Url, body: String) -> Result<HttpResponse, TransportError> {
        self.record(RecordedRequest {
            method: "POST",
            url: url.clone(),
            body: Some(body),
        })
    }

    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        self.record(RecordedRequest {
            method: "GET",
            url: url.clone(),
            body: None,
        })
    }
}

/// Decode the `event` parameter of a script-transport URL.
pub fn decode_script_event(src: &str) -> Option<PropertyMap> {
    let url = Url::parse(src).ok()?;
    let (_, event) = url.query_pairs().find(|(key, _)| key == "event")?;
    let bytes = decode_event(&event).ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        Value::Object(event) => Some(event),
        _ => None,
    }
}

/// A query parameter of a script-transport URL.
pub fn script_param(src: &str, name: &str) -> Option<String> {
    let url = Url::parse(src).ok()?;
    let (_, value) = url.query_pairs().find(|(key, _)| key == name)?;
    Some(value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::{encode_event, json};

    #[tokio::test]
    async fn test_recording_client() {
        let client = RecordingHttpClient::responding(200, "{}");
        let url = Url::parse("https://e.example/events/abc").unwrap();

        let response = client.post_json(&url, r#"{"a":1}"#.into()).await.unwrap();
        assert_eq!(response.status, 200);

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].json(), Some(json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = RecordingHttpClient::failing();
        let url = Url::parse("https://e.example/").unwrap();
        assert!(client.get(&url).await.is_err());
        assert_eq!(client.requests().len(), 1);
    }

    #[test]
    fn test_decode_script_event() {
        let src = format!(
            "https://e.example/events/abc?auth=t&event={}",
            encode_event(br#"{"k":"v"}"#)
        );
        assert_eq!(
            decode_script_event(&src).map(Value::Object),
            Some(json!({"k": "v"}))
        );
        assert_eq!(script_param(&src, "auth").as_deref(), Some("t"));
        assert_eq!(script_param(&src, "uid"), None);
    }
}
