//! Cache Module Tests
//!
//! Validates the storage layer underneath every group.
//!
//! ## Test Scopes
//! - **Byte accounting**: usage always equals the byte total of the present entries
//!   and never exceeds a non-zero budget.
//! - **Recency ordering**: lookups protect entries; eviction removes the coldest one.
//! - **Value immutability**: bytes handed out by a view are detached copies.

use crate::cache::byteview::ByteView;
use crate::cache::lru::LruCache;
use parking_lot::Mutex;
use std::sync::Arc;

// ============================================================
// LRU TESTS - lookups and accounting
// ============================================================

#[test]
fn test_get_returns_inserted_value() {
    let mut cache: LruCache<String> = LruCache::new(0);
    cache.add("key1", "1234".to_string());

    assert_eq!(cache.get("key1").map(String::as_str), Some("1234"));
    assert!(cache.get("key2").is_none());
}

#[test]
fn test_usage_tracks_entry_bytes() {
    let mut cache: LruCache<String> = LruCache::new(0);
    cache.add("k1", "v1".to_string());
    cache.add("key2", "value2".to_string());

    assert_eq!(cache.used_bytes(), "k1v1".len() + "key2value2".len());
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_replacement_adjusts_usage() {
    let mut cache: LruCache<String> = LruCache::new(0);
    cache.add("k1", "a-long-initial-value".to_string());
    cache.add("k1", "v".to_string());

    // The key stays charged once; the value charge shrinks with it.
    assert_eq!(cache.used_bytes(), "k1".len() + "v".len());
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_zero_budget_is_unbounded() {
    let mut cache: LruCache<String> = LruCache::new(0);
    for i in 0..1000 {
        cache.add(&format!("key-{}", i), format!("value-{}", i));
    }

    assert_eq!(cache.len(), 1000);
}

// ============================================================
// LRU TESTS - eviction
// ============================================================

#[test]
fn test_eviction_removes_least_recently_used() {
    let budget = "k1v1k2v2".len();
    let mut cache: LruCache<String> = LruCache::new(budget);

    cache.add("k1", "v1".to_string());
    cache.add("k2", "v2".to_string());
    cache.add("k3", "v3".to_string());

    assert!(cache.get("k1").is_none());
    assert_eq!(cache.get("k2").map(String::as_str), Some("v2"));
    assert_eq!(cache.get("k3").map(String::as_str), Some("v3"));
    assert_eq!(cache.len(), 2);
    assert!(cache.used_bytes() <= budget);
}

#[test]
fn test_lookup_protects_entry_from_eviction() {
    let budget = "k1v1k2v2".len();
    let mut cache: LruCache<String> = LruCache::new(budget);

    cache.add("k1", "v1".to_string());
    cache.add("k2", "v2".to_string());

    // Touching k1 makes k2 the coldest entry.
    assert!(cache.get("k1").is_some());
    cache.add("k3", "v3".to_string());

    assert!(cache.get("k2").is_none());
    assert!(cache.get("k1").is_some());
    assert!(cache.get("k3").is_some());
}

#[test]
fn test_oversized_entry_clears_cache() {
    let mut cache: LruCache<String> = LruCache::new(4);
    cache.add("key-larger-than-budget", "value".to_string());

    // Nothing fits, so nothing stays.
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.used_bytes(), 0);
}

#[test]
fn test_eviction_callback_sees_evicted_entries() {
    let evicted: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let log = evicted.clone();

    let budget = "k1v1k2v2".len();
    let mut cache: LruCache<String> = LruCache::with_eviction_callback(
        budget,
        Box::new(move |key, _value| {
            log.lock().push(key.to_string());
        }),
    );

    cache.add("k1", "v1".to_string());
    cache.add("k2", "v2".to_string());
    cache.add("k3", "v3".to_string());
    cache.add("k4", "v4".to_string());

    assert_eq!(*evicted.lock(), vec!["k1".to_string(), "k2".to_string()]);
}

// ============================================================
// BYTEVIEW TESTS
// ============================================================

#[test]
fn test_byteview_length_and_display() {
    let view = ByteView::from(b"630".as_slice());

    assert_eq!(view.len(), 3);
    assert!(!view.is_empty());
    assert_eq!(view.to_string(), "630");
}

#[test]
fn test_byteview_copies_are_detached() {
    let view = ByteView::from(b"immutable".as_slice());

    let mut copy = view.to_vec();
    copy[0] = b'X';

    assert_eq!(view.to_vec(), b"immutable");
    assert_eq!(view.as_slice(), b"immutable");
}

#[test]
fn test_byteview_clones_share_content() {
    let view = ByteView::from(b"shared".to_vec());
    let clone = view.clone();

    assert_eq!(view, clone);
    assert_eq!(clone.len(), view.len());
}
