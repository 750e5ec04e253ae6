//! # Beacon
//!
//! Client-side event tracking: a call queue, a persistent visitor, and
//! delivery over whichever transport the host supports.
//!
//! ## Overview
//!
//! A host page records instrumentation as `[methodName, ...args]` calls,
//! possibly before the library has loaded. Once a [`Tracker`] exists, a
//! [`CallQueue`] drains those calls and dispatches every later one:
//!
//! - **`setAccount(inputId, token)`**: binds the account and loads its visitor
//! - **`identify(uid)`**: replaces the visitor identifier
//! - **`set` / `setOnce` / `unset`**: edit the persisted visitor properties
//! - **`trackEvent(props, callback?)`**: sends one event
//!
//! ## Dispatch Order
//!
//! A batch runs as: the last `setAccount`, then configuration calls, then
//! tracking calls, so account state exists before any event is built.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use beacon::{json, Call, CallQueue, PendingBuffer, Tracker, TrackerConfig};
//! use beacon::store::SqliteStorage;
//!
//! # async fn example() -> beacon::Result<()> {
//! let mut pending = PendingBuffer::new();
//! pending.push(Call::new("trackEvent").arg(json!({"action": "signup"})));
//! pending.push(Call::new("setAccount").arg("my-input").arg("my-token"));
//!
//! let tracker = Tracker::builder(TrackerConfig::default())
//!     .storage(Arc::new(SqliteStorage::open("beacon.db")?))
//!     .build()?;
//!
//! let mut queue = CallQueue::attach(tracker, pending);
//! queue.push(Call::new("set").arg(json!({"plan": "pro"})));
//! # Ok(())
//! # }
//! ```
//!
//! ## Re-exports
//!
//! - `beacon::core` - Calls, commands, envelopes, metadata
//! - `beacon::store` - Storage backends and the property store
//! - `beacon::transport` - POST and script transports

pub mod config;
pub mod error;
pub mod queue;
pub mod tracker;

// Re-export component crates
pub use beacon_core as core;
pub use beacon_store as store;
pub use beacon_transport as transport;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use queue::{dispatch_order, CallQueue, PendingBuffer};
pub use tracker::{Tracker, TrackerBuilder};

pub use beacon_core::{
    json, Account, Call, Command, PropertyMap, TrackResponse, Value, UID_KEY,
};
pub use beacon_transport::{Dispatch, HostCapabilities, TransportKind};
