//! In-memory implementation of the Storage trait.
//!
//! This is primarily for testing. It has the same expiry semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::key::StoreKey;
use crate::traits::{now_millis, SaveOptions, Storage};

/// In-memory storage implementation.
///
/// All data is lost when the storage is dropped. Thread-safe via RwLock.
pub struct MemoryStorage {
    slots: RwLock<HashMap<StoreKey, Slot>>,
}

#[derive(Debug, Clone)]
struct Slot {
    value: String,
    path: String,
    expires_at: i64,
}

impl MemoryStorage {
    /// Create a new empty in-memory storage.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of slots held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path scope a slot was written with.
    pub fn slot_path(&self, key: &StoreKey) -> Option<String> {
        let slots = self.slots.read().ok()?;
        slots.get(key).map(|slot| slot.path.clone())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Lock(e.to_string())
}

impl Storage for MemoryStorage {
    fn load(&self, key: &StoreKey) -> Result<Option<String>> {
        let now = now_millis();
        {
            let slots = self.slots.read().map_err(poisoned)?;
            match slots.get(key) {
                None => return Ok(None),
                Some(slot) if slot.expires_at > now => return Ok(Some(slot.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: evict, unless a writer refreshed the slot since the read.
        let mut slots = self.slots.write().map_err(poisoned)?;
        if let Some(slot) = slots.get(key) {
            if slot.expires_at > now {
                return Ok(Some(slot.value.clone()));
            }
            slots.remove(key);
        }
        Ok(None)
    }

    fn save(&self, key: &StoreKey, value: &str, options: &SaveOptions) -> Result<()> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        slots.insert(
            key.clone(),
            Slot {
                value: value.to_string(),
                path: options.path.clone(),
                expires_at: options.expires_at(now_millis()),
            },
        );
        Ok(())
    }

    fn remove(&self, key: &StoreKey) -> Result<bool> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        Ok(slots.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<StoreKey>> {
        let now = now_millis();
        let slots = self.slots.read().map_err(poisoned)?;
        let mut keys: Vec<StoreKey> = slots
            .iter()
            .filter(|(_, slot)| slot.expires_at > now)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
