//! Visitor state across tracker instances sharing SQLite storage.

use std::sync::Arc;

use beacon::store::{PropertyStore, SqliteStorage, Storage, StoreKey};
use beacon::transport::MemoryDocument;
use beacon::{json, HostCapabilities, Tracker, TrackerConfig, UID_KEY};
use beacon_testkit::test_account;
use tempfile::TempDir;

fn script_tracker(storage: Arc<dyn Storage>) -> Tracker {
    let config = TrackerConfig {
        capabilities: HostCapabilities {
            cors_credentials: false,
        },
        ..TrackerConfig::default()
    };
    Tracker::builder(config)
        .storage(storage)
        .script_host(Arc::new(MemoryDocument::new()))
        .build()
        .unwrap()
}

#[test]
fn test_uid_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("beacon.db");

    let uid = {
        let mut tracker = script_tracker(Arc::new(SqliteStorage::open(&db_path).unwrap()));
        assert!(tracker.set_account(test_account()));
        assert!(tracker.set(&json!({"plan": "pro"})));
        tracker.uid().unwrap().to_string()
    };

    let mut tracker = script_tracker(Arc::new(SqliteStorage::open(&db_path).unwrap()));
    assert!(tracker.set_account(test_account()));
    assert_eq!(tracker.uid(), Some(uid.as_str()));
    assert_eq!(tracker.store().unwrap().get("plan"), Some(&json!("pro")));
}

#[test]
fn test_accounts_do_not_share_visitors() {
    let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::open_memory().unwrap());

    let mut first = script_tracker(Arc::clone(&storage));
    first.set_account(test_account());
    first.set(&json!({"plan": "pro"}));

    let mut second = script_tracker(Arc::clone(&storage));
    second.set_account(beacon::Account::new("other-input", "other-token"));
    assert_ne!(first.uid(), second.uid());
    assert_eq!(second.store().unwrap().get("plan"), None);
}

#[test]
fn test_corrupt_slot_is_replaced() {
    let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::open_memory().unwrap());
    let key = StoreKey::derive("bcn_", &test_account());
    storage
        .save(&key, "{not json", &Default::default())
        .unwrap();

    let mut tracker = script_tracker(Arc::clone(&storage));
    assert!(tracker.set_account(test_account()));
    let uid = tracker.uid().unwrap().to_string();

    let mut reloaded = PropertyStore::new(storage, key, Default::default());
    reloaded.load().unwrap();
    assert_eq!(reloaded.get(UID_KEY), Some(&json!(uid)));
}

#[test]
fn test_unset_persists() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("beacon.db");

    {
        let mut tracker = script_tracker(Arc::new(SqliteStorage::open(&db_path).unwrap()));
        tracker.set_account(test_account());
        tracker.set(&json!({"plan": "pro", "tier": 2}));
        assert!(tracker.unset("plan"));
        assert!(!tracker.unset("plan"));
    }

    let mut tracker = script_tracker(Arc::new(SqliteStorage::open(&db_path).unwrap()));
    tracker.set_account(test_account());
    assert_eq!(tracker.store().unwrap().get("plan"), None);
    assert_eq!(tracker.store().unwrap().get("tier"), Some(&json!(2)));
}
