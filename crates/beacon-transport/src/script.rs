//! Script-tag (JSONP) transport.
//!
//! Used when the host cannot make credentialed cross-origin requests. The
//! envelope travels in the query string of a script URL; the response is
//! never observed.

use std::sync::{Arc, Mutex};

use beacon_core::TrackCallback;
use reqwest::Url;
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

use crate::http::HttpClient;
use crate::request::EventRequest;
use crate::transport::{Dispatch, Transport, TransportKind};

/// Something that can load a script by URL.
pub trait ScriptHost: Send + Sync {
    /// Insert a script element referencing `src`.
    fn inject_script(&self, src: &Url);
}

/// A document model holding an ordered list of script sources.
///
/// New scripts are inserted immediately before the first existing script,
/// or appended when the document has none.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    scripts: Mutex<Vec<String>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document that already contains scripts, in order.
    pub fn with_scripts<I, S>(scripts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scripts: Mutex::new(scripts.into_iter().map(Into::into).collect()),
        }
    }

    /// Script sources in document order.
    ///
    /// A poisoned lock still yields the scripts recorded before the panic.
    pub fn scripts(&self) -> Vec<String> {
        match self.scripts.lock() {
            Ok(scripts) => scripts.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ScriptHost for MemoryDocument {
    fn inject_script(&self, src: &Url) {
        let mut scripts = self.scripts.lock().unwrap_or_else(|poisoned| {
            warn!("document lock poisoned, recovering");
            poisoned.into_inner()
        });
        // Inserting at 0 places the script before the first existing one.
        scripts.insert(0, src.to_string());
    }
}

/// Loads script URLs over HTTP and discards the body.
pub struct HttpScriptLoader {
    client: Arc<dyn HttpClient>,
    runtime: Handle,
}

impl HttpScriptLoader {
    pub fn new(client: Arc<dyn HttpClient>, runtime: Handle) -> Self {
        Self { client, runtime }
    }
}

impl ScriptHost for HttpScriptLoader {
    fn inject_script(&self, src: &Url) {
        let client = Arc::clone(&self.client);
        let src = src.clone();
        self.runtime.spawn(async move {
            match client.get(&src).await {
                Ok(response) => trace!(status = response.status, "script loaded"),
                Err(e) => debug!(error = %e, "script load failed"),
            }
        });
    }
}

/// Fire-and-forget delivery through a [`ScriptHost`].
///
/// Callbacks are dropped without being invoked.
pub struct ScriptTransport {
    host: Arc<dyn ScriptHost>,
}

impl ScriptTransport {
    pub fn new(host: Arc<dyn ScriptHost>) -> Self {
        Self { host }
    }
}

impl Transport for ScriptTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Script
    }

    fn dispatch(&self, request: EventRequest, _callback: Option<TrackCallback>) -> Dispatch {
        match request.script_url() {
            Ok(src) => {
                trace!(url = %request.url(), "injecting event script");
                self.host.inject_script(&src);
                Dispatch::Detached
            }
            Err(e) => {
                warn!(error = %e, "dropping event that could not be encoded");
                Dispatch::Dropped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::{decode_event, json, Envelope, PropertyMap, TrackResponse, Value};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn request() -> EventRequest {
        let event = json!({"action": "click"}).as_object().cloned().unwrap();
        EventRequest::new(
            "https://e.example/events",
            "abc",
            Envelope::new("tok", Some("uid-1".into()), event),
        )
        .unwrap()
    }

    #[test]
    fn test_inserts_before_first_script() {
        let document = Arc::new(MemoryDocument::with_scripts(["https://cdn.example/beacon.js", "app.js"]));
        let transport = ScriptTransport::new(document.clone());

        let dispatch = transport.dispatch(request(), None);
        assert!(matches!(dispatch, Dispatch::Detached));

        let scripts = document.scripts();
        assert_eq!(scripts.len(), 3);
        assert!(scripts[0].starts_with("https://e.example/events/abc?"));
        assert_eq!(scripts[1], "https://cdn.example/beacon.js");
    }

    #[test]
    fn test_script_src_carries_event() {
        let document = Arc::new(MemoryDocument::new());
        ScriptTransport::new(document.clone()).dispatch(request(), None);

        let src = Url::parse(&document.scripts()[0]).unwrap();
        let event = src
            .query_pairs()
            .find(|(k, _)| k == "event")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        let decoded: PropertyMap = serde_json::from_slice(&decode_event(&event).unwrap()).unwrap();
        assert_eq!(Value::Object(decoded), json!({"action": "click"}));
    }

    #[test]
    fn test_callback_never_invoked() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();
        let transport = ScriptTransport::new(Arc::new(MemoryDocument::new()));

        transport.dispatch(
            request(),
            Some(Box::new(move |_: TrackResponse, _: PropertyMap| {
                flag.store(true, Ordering::SeqCst)
            })),
        );
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_poisoned_document_keeps_scripts() {
        let document = Arc::new(MemoryDocument::with_scripts(["app.js"]));
        ScriptTransport::new(document.clone()).dispatch(request(), None);

        let held = document.clone();
        let panicked = std::thread::spawn(move || {
            let _guard = held.scripts.lock().unwrap();
            panic!("panic while holding the document lock");
        })
        .join();
        assert!(panicked.is_err());
        assert!(document.scripts.is_poisoned());

        let scripts = document.scripts();
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].starts_with("https://e.example/events/abc?"));
        assert_eq!(scripts[1], "app.js");

        ScriptTransport::new(document.clone()).dispatch(request(), None);
        assert_eq!(document.scripts().len(), 3);
    }
}
