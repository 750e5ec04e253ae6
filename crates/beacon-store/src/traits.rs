//! Storage trait: the abstract interface for durable slots.
//!
//! A slot holds one opaque string under a [`StoreKey`], scoped to a path and
//! valid until an expiry horizon. Implementations include SQLite (primary)
//! and in-memory (for tests).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::key::StoreKey;

/// Default lifetime of a property slot, in days.
pub const DEFAULT_EXPIRY_DAYS: u32 = 365;

/// How a slot is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Time from now after which the slot reads as absent.
    pub expires: Duration,
    /// Path scope of the slot.
    pub path: String,
}

impl SaveOptions {
    /// Root-scoped options expiring after `days`.
    pub fn expiring_in_days(days: u32) -> Self {
        Self {
            expires: Duration::from_secs(u64::from(days) * 24 * 60 * 60),
            path: "/".to_string(),
        }
    }

    /// Absolute expiry in Unix milliseconds, counted from `now`.
    pub fn expires_at(&self, now: i64) -> i64 {
        now.saturating_add(self.expires.as_millis().min(i64::MAX as u128) as i64)
    }
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self::expiring_in_days(DEFAULT_EXPIRY_DAYS)
    }
}

/// The Storage trait: synchronous slot persistence.
///
/// All tracker operations complete within one turn, so reads and writes are
/// blocking and expected to be fast.
///
/// # Design Notes
///
/// - **Expiry**: `load` returns `None` for slots past their horizon.
/// - **Whole values**: `save` replaces the slot's value, path and expiry.
pub trait Storage: Send + Sync {
    /// Read a slot.
    fn load(&self, key: &StoreKey) -> Result<Option<String>>;

    /// Write a slot, replacing any previous value.
    fn save(&self, key: &StoreKey, value: &str, options: &SaveOptions) -> Result<()>;

    /// Delete a slot. Returns whether it existed.
    fn remove(&self, key: &StoreKey) -> Result<bool>;

    /// Keys of all live slots.
    fn keys(&self) -> Result<Vec<StoreKey>>;
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
