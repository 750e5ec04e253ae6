//! Transport abstraction for event delivery.
//!
//! A transport takes ownership of a built request and the caller's optional
//! callback. Whether the callback is ever invoked depends on the strategy.

use beacon_core::TrackCallback;
use tokio::task::JoinHandle;

use crate::request::EventRequest;

/// Which delivery strategy a transport implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// JSON POST with response handling.
    Post,
    /// Script-tag GET, no response observed.
    Script,
}

/// What happened to a request handed to a transport.
#[derive(Debug)]
pub enum Dispatch {
    /// Sent asynchronously; the task completes after the callback has run.
    Pending(JoinHandle<()>),
    /// Handed off with no completion to observe.
    Detached,
    /// Never sent.
    Dropped,
}

impl Dispatch {
    /// Wait for an in-flight request to finish. Returns immediately otherwise.
    pub async fn finished(self) {
        if let Dispatch::Pending(handle) = self {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "delivery task failed");
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Dispatch::Pending(_))
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, Dispatch::Dropped)
    }
}

/// A delivery strategy.
///
/// `dispatch` must not block: network work happens on a spawned task or in
/// the host.
pub trait Transport: Send + Sync {
    /// The strategy implemented.
    fn kind(&self) -> TransportKind;

    /// Deliver one request.
    fn dispatch(&self, request: EventRequest, callback: Option<TrackCallback>) -> Dispatch;
}
