//! # Beacon Transport
//!
//! Delivery of event envelopes to the ingestion endpoint.
//!
//! ## Overview
//!
//! Two strategies implement the [`Transport`] trait:
//!
//! - [`PostTransport`] - JSON `POST <endpoint>/<inputId>`, asynchronous, and
//!   reports the endpoint's answer to the caller's callback
//! - [`ScriptTransport`] - `GET <endpoint>/<inputId>?auth=..&uid=..&event=..`
//!   handed to a [`ScriptHost`], fire-and-forget
//!
//! Which one a tracker uses is decided once from [`HostCapabilities`] by
//! [`select`].
//!
//! ## Delivery Semantics
//!
//! - **One request per event**: no batching, no connection reuse guarantees
//! - **No retries**: a failed send is dropped
//! - **Snapshot payloads**: a request owns the envelope built at send time
//!
//! ```text
//! Tracker ──EventRequest──> Transport
//!                             ├─ Post:   spawn POST ──> callback(response, event)
//!                             └─ Script: ScriptHost::inject_script(src)
//! ```

pub mod error;
pub mod http;
pub mod post;
pub mod request;
pub mod script;
pub mod selector;
pub mod transport;

pub use error::{Result, TransportError};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use post::PostTransport;
pub use request::EventRequest;
pub use script::{HttpScriptLoader, MemoryDocument, ScriptHost, ScriptTransport};
pub use selector::{select, HostCapabilities};
pub use transport::{Dispatch, Transport, TransportKind};

pub use reqwest::Url;
