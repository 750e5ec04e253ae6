//! # Beacon Core
//!
//! Pure primitives for the Beacon tracker: property maps, queued calls,
//! visitor identifiers, page metadata and the wire encodings.
//!
//! This crate contains no storage and no networking. Everything here is
//! computation over JSON values.
//!
//! ## Key Types
//!
//! - [`Call`] - A queued `(methodName, ...args)` tuple as pushed by the host page
//! - [`Command`] - The closed set of operations a call resolves to
//! - [`Envelope`] - The payload sent to the ingestion endpoint
//! - [`Account`] - Input id + write token identifying the tracked project
//! - [`TrackResponse`] - Outcome handed to a tracking callback
//!
//! ## Dispatch Categories
//!
//! Calls are partitioned by method name before dispatch. See [`CallCategory`].

pub mod call;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod response;
pub mod types;

pub use call::{Arg, Call, CallCategory, Command, TrackCallback};
pub use encoding::{decode_event, encode_event};
pub use envelope::{compose_event, Envelope};
pub use error::{CoreError, Result};
pub use identity::generate_uid;
pub use metadata::{library_info, page_info, truncate, PageContext, StaticPage};
pub use response::TrackResponse;
pub use types::{merge, Account, PropertyMap, SetMode, HIDDEN_KEYS, UID_KEY};

pub use serde_json::{json, Value};
