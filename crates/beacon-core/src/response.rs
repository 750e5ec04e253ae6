//! Outcome of a delivered event, as seen by a tracking callback.

use serde_json::Value;

/// What the ingestion endpoint answered.
///
/// Hosts that expect the numeric sentinels of the queue protocol can use
/// [`TrackResponse::into_value`]: `1` for an unparsable body, `0` for a
/// failed request.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackResponse {
    /// Success status with a JSON body.
    Body(Value),
    /// Success status, but the body was not valid JSON.
    Unparseable,
    /// Non-success status, or no response at all.
    Failed,
}

impl TrackResponse {
    /// Sentinel for a successful response whose body is not JSON.
    pub const UNPARSEABLE_SENTINEL: u8 = 1;
    /// Sentinel for a failed request.
    pub const FAILED_SENTINEL: u8 = 0;

    /// Classify an HTTP status and raw body.
    pub fn from_http(status: u16, body: &[u8]) -> Self {
        if !(200..300).contains(&status) {
            return TrackResponse::Failed;
        }
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => TrackResponse::Body(value),
            Err(_) => TrackResponse::Unparseable,
        }
    }

    /// Whether the endpoint accepted the event.
    pub fn is_success(&self) -> bool {
        !matches!(self, TrackResponse::Failed)
    }

    /// Flatten into the value handed to queue-protocol callbacks.
    pub fn into_value(self) -> Value {
        match self {
            TrackResponse::Body(value) => value,
            TrackResponse::Unparseable => Value::from(Self::UNPARSEABLE_SENTINEL),
            TrackResponse::Failed => Value::from(Self::FAILED_SENTINEL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_json_body() {
        let response = TrackResponse::from_http(200, br#"{"ok":true}"#);
        assert_eq!(response, TrackResponse::Body(json!({"ok": true})));
        assert_eq!(response.into_value(), json!({"ok": true}));
    }

    #[test]
    fn test_server_error_is_failed() {
        let response = TrackResponse::from_http(500, br#"{"ok":true}"#);
        assert_eq!(response, TrackResponse::Failed);
        assert_eq!(response.into_value(), json!(0));
    }

    #[test]
    fn test_garbage_body_is_unparseable() {
        let response = TrackResponse::from_http(200, b"<html>");
        assert_eq!(response, TrackResponse::Unparseable);
        assert!(response.is_success());
        assert_eq!(response.into_value(), json!(1));
    }

    #[test]
    fn test_empty_body_is_unparseable() {
        assert_eq!(TrackResponse::from_http(204, b""), TrackResponse::Unparseable);
    }
}
