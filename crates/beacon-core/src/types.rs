//! Shared data types: property maps and account credentials.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A set of named properties, as attached to a visitor or an event.
pub type PropertyMap = Map<String, Value>;

/// Reserved property holding the visitor identifier.
pub const UID_KEY: &str = "$uid";

/// Properties that are persisted but never merged into outgoing events.
pub const HIDDEN_KEYS: &[&str] = &[UID_KEY];

/// How incoming properties are merged into an existing map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetMode {
    /// Every given key replaces the current value.
    #[default]
    Overwrite,
    /// Only keys that are currently absent are filled.
    Once,
}

/// Merge `source` into `target` according to `mode`.
pub fn merge(target: &mut PropertyMap, source: &PropertyMap, mode: SetMode) {
    for (key, value) in source {
        match mode {
            SetMode::Overwrite => {
                target.insert(key.clone(), value.clone());
            }
            SetMode::Once => {
                if !target.contains_key(key) {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

/// Credentials for the tracked project.
///
/// The input id is public and appears in the endpoint path; the token is the
/// write credential sent with every event.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub input_id: String,
    pub token: String,
}

impl Account {
    /// Create credentials from an input id and token.
    pub fn new(input_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            input_id: input_id.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("input_id", &self.input_id)
            .field("token", &"<redacted>")
            .finish()
    }
}
