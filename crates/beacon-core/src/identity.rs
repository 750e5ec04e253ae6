//! Visitor identifier generation.
//!
//! An identifier is a monotonic millisecond time component followed by a
//! version-4 UUID: `<hex millis>-<uuid>`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::OsRng;
use rand::RngCore;
use uuid::{Builder, Uuid};

/// Last time component handed out by this process.
static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh visitor identifier.
pub fn generate_uid() -> String {
    format!("{:x}-{}", next_time_component(), random_uuid())
}

/// Wall-clock milliseconds, bumped so that no two calls return the same value
/// and values never decrease within the process.
pub fn next_time_component() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut last = LAST_MILLIS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_MILLIS.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => last = observed,
        }
    }
}

/// A random RFC 4122 version-4 UUID.
///
/// Random bits come from the operating system; if that source fails the
/// thread-local generator is used instead.
pub fn random_uuid() -> Uuid {
    let mut bytes = [0u8; 16];
    if OsRng.try_fill_bytes(&mut bytes).is_err() {
        rand::thread_rng().fill_bytes(&mut bytes);
    }
    Builder::from_random_bytes(bytes).into_uuid()
}
