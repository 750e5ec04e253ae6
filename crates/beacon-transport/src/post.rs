//! JSON POST transport.

use std::sync::Arc;

use beacon_core::{TrackCallback, TrackResponse};
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

use crate::http::HttpClient;
use crate::request::EventRequest;
use crate::transport::{Dispatch, Transport, TransportKind};

/// Sends `{auth, uid, event}` as a JSON POST and reports the answer.
///
/// Each request runs on its own task. The callback receives the classified
/// response and the event object exactly as it was sent.
pub struct PostTransport {
    client: Arc<dyn HttpClient>,
    runtime: Handle,
}

impl PostTransport {
    pub fn new(client: Arc<dyn HttpClient>, runtime: Handle) -> Self {
        Self { client, runtime }
    }
}

impl Transport for PostTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Post
    }

    fn dispatch(&self, request: EventRequest, callback: Option<TrackCallback>) -> Dispatch {
        let body = match request.body() {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "dropping event that could not be encoded");
                return Dispatch::Dropped;
            }
        };

        let client = Arc::clone(&self.client);
        let handle = self.runtime.spawn(async move {
            trace!(url = %request.url(), "posting event");
            let response = match client.post_json(request.url(), body).await {
                Ok(response) => TrackResponse::from_http(response.status, &response.body),
                Err(e) => {
                    debug!(url = %request.url(), error = %e, "event delivery failed");
                    TrackResponse::Failed
                }
            };
            if let Some(callback) = callback {
                callback(response, request.event().clone());
            }
        });

        Dispatch::Pending(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ReqwestClient;
    use beacon_core::{json, Envelope, PropertyMap};
    use std::time::Duration;
    use tokio::sync::oneshot;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn post_with(template: ResponseTemplate) -> (TrackResponse, PropertyMap) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/events/abc"))
            .respond_with(template)
            .expect(1)
            .mount(&server)
            .await;

        let client = Arc::new(ReqwestClient::new(Duration::from_secs(5)).unwrap());
        let transport = PostTransport::new(client, Handle::current());

        let event = json!({"action": "click"}).as_object().cloned().unwrap();
        let endpoint = format!("{}/events", server.uri());
        let request =
            EventRequest::new(&endpoint, "abc", Envelope::new("tok", None, event)).unwrap();

        let (tx, rx) = oneshot::channel();
        let dispatch = transport.dispatch(
            request,
            Some(Box::new(move |response: TrackResponse, event: PropertyMap| {
                let _ = tx.send((response, event));
            })),
        );
        assert!(dispatch.is_pending());
        dispatch.finished().await;
        rx.await.unwrap()
    }

    #[tokio::test]
    async fn test_callback_receives_parsed_body() {
        let (response, event) =
            post_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#)).await;
        assert_eq!(response, TrackResponse::Body(json!({"ok": true})));
        assert_eq!(event.get("action"), Some(&json!("click")));
    }

    #[tokio::test]
    async fn test_callback_receives_failed_on_500() {
        let (response, _) = post_with(ResponseTemplate::new(500)).await;
        assert_eq!(response, TrackResponse::Failed);
    }

    #[tokio::test]
    async fn test_callback_receives_unparseable() {
        let (response, _) = post_with(ResponseTemplate::new(200).set_body_string("nope")).await;
        assert_eq!(response, TrackResponse::Unparseable);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_failed() {
        let client = Arc::new(ReqwestClient::new(Duration::from_secs(2)).unwrap());
        let transport = PostTransport::new(client, Handle::current());
        let request = EventRequest::new(
            "http://127.0.0.1:9/events",
            "abc",
            Envelope::new("tok", None, PropertyMap::new()),
        )
        .unwrap();

        let (tx, rx) = oneshot::channel();
        transport
            .dispatch(
                request,
                Some(Box::new(move |response: TrackResponse, _: PropertyMap| {
                    let _ = tx.send(response);
                })),
            )
            .finished()
            .await;
        assert_eq!(rx.await.unwrap(), TrackResponse::Failed);
    }
}
