//! The call queue.
//!
//! Hosts record calls before the tracker exists. When the queue attaches it
//! drains that buffer in dispatch order; afterwards every push runs at once.

use beacon_core::{Call, CallCategory, Command, Value};
use tracing::{debug, trace};

use crate::tracker::Tracker;

/// Calls recorded before the tracker attached.
#[derive(Debug, Default)]
pub struct PendingBuffer {
    calls: Vec<Call>,
}

impl PendingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, call: Call) {
        self.calls.push(call);
    }

    /// Record a raw `[methodName, ...args]` tuple. Ill-formed entries are
    /// dropped and reported as `false`.
    pub fn push_json(&mut self, value: Value) -> bool {
        match Call::from_json(value) {
            Some(call) => {
                self.calls.push(call);
                true
            }
            None => {
                debug!("dropping ill-formed queued call");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn into_calls(self) -> Vec<Call> {
        self.calls
    }
}

impl FromIterator<Call> for PendingBuffer {
    fn from_iter<I: IntoIterator<Item = Call>>(iter: I) -> Self {
        Self {
            calls: iter.into_iter().collect(),
        }
    }
}

impl Extend<Call> for PendingBuffer {
    fn extend<I: IntoIterator<Item = Call>>(&mut self, iter: I) {
        self.calls.extend(iter);
    }
}

/// Order a batch of calls for dispatch.
///
/// The last `setAccount` call comes first (earlier ones are discarded), then
/// the other non-tracking calls, then the tracking calls. Within each group
/// calls keep the order they were pushed in.
pub fn dispatch_order(calls: impl IntoIterator<Item = Call>) -> Vec<Call> {
    let mut account = None;
    let mut config = Vec::new();
    let mut tracking = Vec::new();

    for call in calls {
        match call.category() {
            CallCategory::Account => {
                if let Some(previous) = account.replace(call) {
                    trace!(method = previous.method(), "superseded by a later setAccount");
                }
            }
            CallCategory::Config => config.push(call),
            CallCategory::Tracking => tracking.push(call),
        }
    }

    account.into_iter().chain(config).chain(tracking).collect()
}

/// Dispatches calls to a tracker.
pub struct CallQueue {
    tracker: Tracker,
}

impl CallQueue {
    /// Attach to a tracker, draining the calls recorded so far.
    pub fn attach(tracker: Tracker, pending: PendingBuffer) -> Self {
        let mut queue = Self { tracker };
        debug!(pending = pending.len(), "attaching call queue");
        queue.execute_all(pending.into_calls());
        queue
    }

    /// Run one call immediately.
    pub fn push(&mut self, call: Call) {
        self.execute_all([call]);
    }

    /// Run a raw `[methodName, ...args]` tuple. Ill-formed entries are dropped.
    pub fn push_json(&mut self, value: Value) {
        match Call::from_json(value) {
            Some(call) => self.push(call),
            None => debug!("dropping ill-formed call"),
        }
    }

    /// Run several calls pushed together.
    pub fn push_many(&mut self, calls: impl IntoIterator<Item = Call>) {
        self.execute_all(calls);
    }

    /// Run a batch in dispatch order. See [`dispatch_order`].
    pub fn execute_all(&mut self, calls: impl IntoIterator<Item = Call>) {
        for call in dispatch_order(calls) {
            self.tracker.execute(Command::from_call(call));
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }

    pub fn into_tracker(self) -> Tracker {
        self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::json;

    fn methods(calls: &[Call]) -> Vec<&str> {
        calls.iter().map(Call::method).collect()
    }

    #[test]
    fn test_dispatch_order_groups() {
        let calls = vec![
            Call::new("trackEvent").arg(1),
            Call::new("set").arg(2),
            Call::new("setAccount").arg("a"),
            Call::new("trackPageview").arg(3),
            Call::new("identify").arg(4),
            Call::new("_setAccount").arg("b"),
        ];

        let ordered = dispatch_order(calls);
        assert_eq!(
            methods(&ordered),
            ["_setAccount", "set", "identify", "trackEvent", "trackPageview"]
        );
        assert_eq!(ordered[0].args()[0].as_value(), Some(&json!("b")));
    }

    #[test]
    fn test_dispatch_order_without_account() {
        let ordered = dispatch_order(vec![Call::new("trackEvent"), Call::new("unset")]);
        assert_eq!(methods(&ordered), ["unset", "trackEvent"]);
    }

    #[test]
    fn test_pending_buffer_drops_ill_formed() {
        let mut pending = PendingBuffer::new();
        assert!(pending.push_json(json!(["set", {"a": 1}])));
        assert!(!pending.push_json(json!({"method": "set"})));
        assert!(!pending.push_json(json!([1, 2])));
        assert!(!pending.push_json(json!([])));
        pending.extend([Call::new("identify").arg("u")]);
        assert_eq!(pending.len(), 2);
    }
}
