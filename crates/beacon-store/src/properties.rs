//! The visitor property store.
//!
//! One [`PropertyStore`] holds the properties of one account's visitor. The
//! in-memory map is authoritative for reads; every mutation rewrites the
//! whole slot.

use std::sync::Arc;

use beacon_core::{merge, PropertyMap, SetMode, Value, HIDDEN_KEYS};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::key::StoreKey;
use crate::traits::{SaveOptions, Storage};

/// A persisted property map with set / set-once / unset semantics.
pub struct PropertyStore {
    storage: Arc<dyn Storage>,
    key: StoreKey,
    options: SaveOptions,
    props: PropertyMap,
}

impl PropertyStore {
    /// Create an empty store bound to a slot, without reading it.
    pub fn new(storage: Arc<dyn Storage>, key: StoreKey, options: SaveOptions) -> Self {
        Self {
            storage,
            key,
            options,
            props: PropertyMap::new(),
        }
    }

    /// Create a store and load its slot.
    ///
    /// A corrupt slot is logged and the store starts empty; the next mutation
    /// overwrites it. Backend failures are returned.
    pub fn open(storage: Arc<dyn Storage>, key: StoreKey, options: SaveOptions) -> Result<Self> {
        let mut store = Self::new(storage, key, options);
        match store.load() {
            Ok(()) => Ok(store),
            Err(StoreError::Corrupt { key, reason }) => {
                warn!(%key, %reason, "discarding corrupt property slot");
                store.props.clear();
                Ok(store)
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the in-memory map with the slot's contents.
    ///
    /// An absent slot yields an empty map. A slot that is not a JSON object
    /// is [`StoreError::Corrupt`] and leaves the map untouched.
    pub fn load(&mut self) -> Result<()> {
        let Some(blob) = self.storage.load(&self.key)? else {
            self.props = PropertyMap::new();
            return Ok(());
        };

        let corrupt = |reason: String| StoreError::Corrupt {
            key: self.key.to_string(),
            reason,
        };
        match serde_json::from_str::<Value>(&blob).map_err(|e| corrupt(e.to_string()))? {
            Value::Object(props) => {
                debug!(key = %self.key, count = props.len(), "loaded properties");
                self.props = props;
                Ok(())
            }
            other => Err(corrupt(format!("expected object, found {}", json_kind(&other)))),
        }
    }

    /// Write the full map to the slot.
    pub fn save(&self) -> Result<()> {
        self.persist(&self.props)
    }

    /// Write `props` to the slot; memory is updated by the caller on success.
    fn persist(&self, props: &PropertyMap) -> Result<()> {
        let blob = serde_json::to_string(props)?;
        self.storage.save(&self.key, &blob, &self.options)
    }

    /// The slot this store persists to.
    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    /// Current value of a property, hidden ones included.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// The full map, hidden keys included.
    pub fn all(&self) -> &PropertyMap {
        &self.props
    }

    /// Properties merged into outgoing events: everything but hidden keys.
    pub fn properties(&self) -> PropertyMap {
        self.props
            .iter()
            .filter(|(key, _)| !HIDDEN_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Overwrite every given property. Returns `false` if `props` is not an object.
    pub fn set(&mut self, props: &Value) -> Result<bool> {
        self.set_with(props, SetMode::Overwrite)
    }

    /// Fill only properties that are currently absent.
    pub fn set_once(&mut self, props: &Value) -> Result<bool> {
        self.set_with(props, SetMode::Once)
    }

    /// Merge `props` according to `mode` and persist.
    ///
    /// Memory only changes once the write succeeds.
    pub fn set_with(&mut self, props: &Value, mode: SetMode) -> Result<bool> {
        let Value::Object(props) = props else {
            debug!(kind = json_kind(props), "ignoring non-object properties");
            return Ok(false);
        };
        let mut next = self.props.clone();
        merge(&mut next, props, mode);
        self.persist(&next)?;
        self.props = next;
        Ok(true)
    }

    /// Remove a property. Returns `false` if it was not present.
    ///
    /// On a failed write the property stays in memory.
    pub fn unset(&mut self, key: &str) -> Result<bool> {
        if !self.props.contains_key(key) {
            return Ok(false);
        }
        let mut next = self.props.clone();
        next.remove(key);
        self.persist(&next)?;
        self.props = next;
        Ok(true)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
