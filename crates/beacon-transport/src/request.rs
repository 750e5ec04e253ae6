//! A single event delivery, built at send time.

use beacon_core::{Envelope, PropertyMap};
use reqwest::Url;

use crate::error::{Result, TransportError};

/// Everything needed to deliver one event: target URL and envelope.
///
/// The envelope is a snapshot; later changes to stored properties do not
/// affect a request already built.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRequest {
    url: Url,
    envelope: Envelope,
}

impl EventRequest {
    /// Target `<endpoint>/<input_id>`.
    pub fn new(endpoint: &str, input_id: &str, envelope: Envelope) -> Result<Self> {
        let mut url =
            Url::parse(endpoint).map_err(|e| TransportError::InvalidUrl(format!("{endpoint}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| TransportError::InvalidUrl(format!("{endpoint}: cannot be a base")))?
            .pop_if_empty()
            .push(input_id);
        Ok(Self { url, envelope })
    }

    /// `<endpoint>/<input_id>`, without query.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The event object carried by this request.
    pub fn event(&self) -> &PropertyMap {
        &self.envelope.event
    }

    /// JSON body for a POST.
    pub fn body(&self) -> Result<String> {
        Ok(self.envelope.to_json()?)
    }

    /// GET URL carrying the envelope in its query string.
    pub fn script_url(&self) -> Result<Url> {
        let mut url = self.url.clone();
        let params = self.envelope.to_query()?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::{decode_event, json, Value};

    fn envelope() -> Envelope {
        let event = json!({"action": "click"}).as_object().cloned().unwrap();
        Envelope::new("tok", Some("uid-1".to_string()), event)
    }

    #[test]
    fn test_url_joins_input_id() {
        let request = EventRequest::new("https://events.example.com/events", "abc", envelope()).unwrap();
        assert_eq!(request.url().as_str(), "https://events.example.com/events/abc");
    }

    #[test]
    fn test_url_trailing_slash() {
        let request = EventRequest::new("https://events.example.com/events/", "abc", envelope()).unwrap();
        assert_eq!(request.url().as_str(), "https://events.example.com/events/abc");
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            EventRequest::new("not a url", "abc", envelope()),
            Err(TransportError::InvalidUrl(_))
        ));
        assert!(matches!(
            EventRequest::new("mailto:events@example.com", "abc", envelope()),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_body() {
        let request = EventRequest::new("https://e.example/events", "abc", envelope()).unwrap();
        let body: Value = serde_json::from_str(&request.body().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"auth": "tok", "uid": "uid-1", "event": {"action": "click"}})
        );
    }

    #[test]
    fn test_script_url_query() {
        let request = EventRequest::new("https://e.example/events", "abc", envelope()).unwrap();
        let url = request.script_url().unwrap();
        assert_eq!(url.path(), "/events/abc");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("auth".to_string(), "tok".to_string()));
        assert_eq!(pairs[1], ("uid".to_string(), "uid-1".to_string()));
        assert_eq!(pairs[2].0, "event");

        let decoded: Value = serde_json::from_slice(&decode_event(&pairs[2].1).unwrap()).unwrap();
        assert_eq!(decoded, json!({"action": "click"}));
    }
}
