//! # Beacon Store
//!
//! Durable client-side state for the Beacon tracker. A [`Storage`] backend
//! holds opaque string slots with an expiry horizon; a [`PropertyStore`]
//! keeps one account's visitor properties in such a slot.
//!
//! ## Key Types
//!
//! - [`Storage`] - The trait for slot persistence
//! - [`SqliteStorage`] - SQLite-based persistent slots
//! - [`MemoryStorage`] - In-memory slots for tests and ephemeral hosts
//! - [`StoreKey`] - Namespaced slot key derived from account credentials
//! - [`PropertyStore`] - The visitor property map with set/setOnce/unset
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use beacon_core::{json, Account};
//! use beacon_store::{PropertyStore, SaveOptions, SqliteStorage, StoreKey};
//!
//! let storage = Arc::new(SqliteStorage::open("beacon.db").unwrap());
//! let key = StoreKey::derive("bcn_", &Account::new("input", "token"));
//!
//! let mut store = PropertyStore::open(storage, key, SaveOptions::default()).unwrap();
//! store.set(&json!({"plan": "pro"})).unwrap();
//! assert_eq!(store.get("plan"), Some(&json!("pro")));
//! ```
//!
//! ## Design Notes
//!
//! - **Full rewrites**: every mutation persists the whole map, never a delta
//! - **Expiry**: slots past their horizon read as absent
//! - **Hidden keys**: `$uid` is stored but excluded from [`PropertyStore::properties`]

pub mod error;
pub mod key;
pub mod memory;
pub mod migration;
pub mod properties;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use key::StoreKey;
pub use memory::MemoryStorage;
pub use properties::PropertyStore;
pub use sqlite::SqliteStorage;
pub use traits::{SaveOptions, Storage};
