//! The event envelope sent to the ingestion endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::encoding::encode_event;
use crate::error::Result;
use crate::types::{merge, PropertyMap, SetMode};

/// `{auth, uid, event}` as delivered to `<endpoint>/<inputId>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Write token of the account.
    pub auth: String,
    /// Visitor identifier, if one is known.
    pub uid: Option<String>,
    /// The event properties.
    pub event: PropertyMap,
}

impl Envelope {
    pub fn new(auth: impl Into<String>, uid: Option<String>, event: PropertyMap) -> Self {
        Self {
            auth: auth.into(),
            uid,
            event,
        }
    }

    /// JSON body for the POST transport.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Query parameters for the script transport.
    ///
    /// `auth` and `uid` are omitted when empty; `event` is the encoded JSON
    /// of the event object.
    pub fn to_query(&self) -> Result<Vec<(&'static str, String)>> {
        let mut params = Vec::with_capacity(3);
        if !self.auth.is_empty() {
            params.push(("auth", self.auth.clone()));
        }
        if let Some(uid) = self.uid.as_deref().filter(|uid| !uid.is_empty()) {
            params.push(("uid", uid.to_string()));
        }
        let event = serde_json::to_vec(&Value::Object(self.event.clone()))?;
        params.push(("event", encode_event(&event)));
        Ok(params)
    }
}

/// Layer property maps into one event, later layers overriding earlier ones.
///
/// Callers pass metadata first, persisted properties next, call-site
/// properties last.
pub fn compose_event<'a>(layers: impl IntoIterator<Item = &'a PropertyMap>) -> PropertyMap {
    let mut event = PropertyMap::new();
    for layer in layers {
        merge(&mut event, layer, SetMode::Overwrite);
    }
    event
}
