//! Page context captured with every event.
//!
//! The collector snapshots the host page at send time. Empty fields are
//! dropped and every string is cut to [`MAX_STRING_LEN`] characters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::PropertyMap;

/// Longest string value sent in page metadata, in characters.
pub const MAX_STRING_LEN: usize = 1023;

/// Nesting depth past which values are replaced by `null` during truncation.
pub const MAX_DEPTH: usize = 32;

/// Library name reported with every event.
pub const LIB_NAME: &str = "beacon-rust";

/// The hosting page, as seen at the moment an event is sent.
pub trait PageContext: Send + Sync {
    /// Address of the current document.
    fn url(&self) -> String;

    /// User agent of the client.
    fn user_agent(&self) -> String;

    /// Address of the referring document, empty if none.
    fn referrer(&self) -> String;
}

/// A fixed page context.
///
/// Useful for hosts without a live document and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPage {
    pub url: String,
    pub user_agent: String,
    pub referrer: String,
}

impl StaticPage {
    pub fn new(
        url: impl Into<String>,
        user_agent: impl Into<String>,
        referrer: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            user_agent: user_agent.into(),
            referrer: referrer.into(),
        }
    }
}

impl PageContext for StaticPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn referrer(&self) -> String {
        self.referrer.clone()
    }
}

/// Snapshot `{url, ua, referrer}` from the page.
pub fn page_info(page: &dyn PageContext) -> PropertyMap {
    let mut info = PropertyMap::new();
    for (key, value) in [
        ("url", page.url()),
        ("ua", page.user_agent()),
        ("referrer", page.referrer()),
    ] {
        if !value.is_empty() {
            info.insert(key.to_string(), Value::String(value));
        }
    }

    match truncate(Value::Object(info), MAX_STRING_LEN) {
        Value::Object(info) => info,
        _ => PropertyMap::new(),
    }
}

/// Library markers merged into every event.
pub fn library_info() -> PropertyMap {
    let mut info = PropertyMap::new();
    info.insert("$lib".to_string(), Value::from(LIB_NAME));
    info.insert(
        "$lib_version".to_string(),
        Value::from(env!("CARGO_PKG_VERSION")),
    );
    info
}

/// Cut every string inside `value` to at most `max_len` characters.
///
/// Recurses into arrays and objects up to [`MAX_DEPTH`]; anything nested
/// deeper is replaced by `null`. Object keys are left intact.
pub fn truncate(value: Value, max_len: usize) -> Value {
    truncate_at(value, max_len, 0)
}

fn truncate_at(value: Value, max_len: usize, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        return Value::Null;
    }
    match value {
        Value::String(s) => Value::String(truncate_str(s, max_len)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| truncate_at(item, max_len, depth + 1))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, truncate_at(v, max_len, depth + 1)))
                .collect(),
        ),
        other => other,
    }
}

fn truncate_str(s: String, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((cut, _)) => s[..cut].to_string(),
        None => s,
    }
}
