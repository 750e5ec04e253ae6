//! # Beacon Testkit
//!
//! Testing utilities for Beacon.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a recording HTTP client, a populated page, and helpers to
//!   read script-transport URLs
//! - **Generators**: Proptest strategies for call queues and property maps
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use beacon_testkit::generators::{expected_order, indexed_calls, method_queue};
//!
//! proptest! {
//!     #[test]
//!     fn dispatch_matches_model(methods in method_queue(16)) {
//!         let ordered = beacon::dispatch_order(indexed_calls(&methods));
//!         // compare against expected_order(&methods)
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{
    decode_script_event, script_param, test_account, test_page, RecordedRequest,
    RecordingHttpClient,
};
