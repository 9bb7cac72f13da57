//! Group Module Tests
//!
//! Validates the read-through flow end to end on a single node.
//!
//! ## Test Scopes
//! - **Read-through coherence**: loaded values are cached; repeat reads do not call
//!   the loader again until the entry is evicted.
//! - **Peer fallback**: a failing peer degrades to the local loader instead of
//!   failing the request.
//! - **Registry**: name-based lookup of registered groups, injected and global.

use crate::group::coordinator::{Group, PeerClient, PeerPicker};
use crate::group::registry::{self, Registry};

use anyhow::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn score_db() -> HashMap<String, String> {
    [("Tom", "630"), ("Jack", "589"), ("Sam", "567")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Peer client whose fetches always fail, simulating an unreachable node.
struct FailingPeer;

impl PeerClient for FailingPeer {
    fn fetch<'a>(
        &'a self,
        _group: &'a str,
        _key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async { Err(anyhow::anyhow!("peer unavailable")) })
    }
}

/// Picker that routes every key to the same remote client.
struct AlwaysRemotePicker {
    client: Arc<FailingPeer>,
}

impl PeerPicker for AlwaysRemotePicker {
    fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerClient>> {
        Some(self.client.clone())
    }
}

// ============================================================
// READ-THROUGH TESTS
// ============================================================

#[tokio::test]
async fn test_read_through_caches_loader_results() {
    let db = score_db();
    let load_counts: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));

    let loader_db = db.clone();
    let loader_counts = load_counts.clone();
    let group = Group::new("scores", 2 << 10, move |key: String| {
        let db = loader_db.clone();
        let counts = loader_counts.clone();
        async move {
            match db.get(&key) {
                Some(value) => {
                    *counts.lock().entry(key.clone()).or_insert(0) += 1;
                    Ok(value.as_bytes().to_vec())
                }
                None => Err(anyhow::anyhow!("{} does not exist", key)),
            }
        }
    });

    for (key, value) in &db {
        let view = group.get(key).await.unwrap();
        assert_eq!(view.to_string(), *value);
        assert_eq!(load_counts.lock()[key], 1);

        // Second read is served from the cache; the loader is not consulted.
        let view = group.get(key).await.unwrap();
        assert_eq!(view.to_string(), *value);
        assert_eq!(load_counts.lock()[key], 1);
    }

    assert!(group.get("unknown").await.is_err());
}

#[tokio::test]
async fn test_empty_key_is_rejected() {
    let group = Group::new("empty-key", 0, |_key: String| async {
        Ok::<Vec<u8>, anyhow::Error>(Vec::new())
    });

    let err = group.get("").await.unwrap_err();
    assert!(err.to_string().contains("key is required"));
}

#[tokio::test]
async fn test_loader_errors_are_not_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader_calls = calls.clone();
    let group = Group::new("no-negative-caching", 0, move |key: String| {
        let calls = loader_calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<Vec<u8>, _>(anyhow::anyhow!("{} does not exist", key))
        }
    });

    assert!(group.get("missing").await.is_err());
    assert!(group.get("missing").await.is_err());

    // Each miss reaches the loader again; failures leave no cache entry behind.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_eviction_reopens_the_read_through_path() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader_calls = calls.clone();

    // Budget fits a single k?/v? entry.
    let group = Group::new("tiny", 4, move |key: String| {
        let calls = loader_calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("v{}", key).into_bytes())
        }
    });

    group.get("1").await.unwrap();
    group.get("2").await.unwrap();
    group.get("1").await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(group.stats().evictions.load(Ordering::Relaxed) >= 1);
}

// ============================================================
// PEER FALLBACK TESTS
// ============================================================

#[tokio::test]
async fn test_peer_failure_falls_back_to_loader() {
    let calls = Arc::new(AtomicUsize::new(0));
    let loader_calls = calls.clone();
    let group = Group::new("fallback", 2 << 10, move |key: String| {
        let calls = loader_calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            if key == "Tom" {
                Ok(b"630".to_vec())
            } else {
                Err(anyhow::anyhow!("{} does not exist", key))
            }
        }
    });

    group.register_peers(Arc::new(AlwaysRemotePicker {
        client: Arc::new(FailingPeer),
    }));

    let view = group.get("Tom").await.unwrap();
    assert_eq!(view.to_string(), "630");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(group.stats().peer_failures.load(Ordering::Relaxed), 1);
}

#[tokio::test]
#[should_panic(expected = "register_peers called more than once")]
async fn test_register_peers_twice_panics() {
    let group = Group::new("double-register", 0, |_key: String| async {
        Ok::<Vec<u8>, anyhow::Error>(Vec::new())
    });

    let picker = || {
        Arc::new(AlwaysRemotePicker {
            client: Arc::new(FailingPeer),
        })
    };
    group.register_peers(picker());
    group.register_peers(picker());
}

// ============================================================
// STATS TESTS
// ============================================================

#[tokio::test]
async fn test_snapshot_reflects_hits_and_misses() {
    let group = Group::new("stats", 0, |key: String| async move {
        Ok(key.into_bytes())
    });

    group.get("a").await.unwrap();
    group.get("a").await.unwrap();
    group.get("b").await.unwrap();

    let snapshot = group.snapshot();
    assert_eq!(snapshot.name, "stats");
    assert_eq!(snapshot.hits, 1);
    assert_eq!(snapshot.misses, 2);
    assert_eq!(snapshot.loads, 2);
    assert_eq!(snapshot.entries, 2);
    assert_eq!(snapshot.used_bytes, "aa".len() + "bb".len());
}

// ============================================================
// REGISTRY TESTS
// ============================================================

#[tokio::test]
async fn test_injected_registry_lookup() {
    let registry = Registry::new();
    let group = Group::new("registry-scores", 0, |_key: String| async {
        Ok::<Vec<u8>, anyhow::Error>(b"1".to_vec())
    });

    registry.register(group.clone());

    assert!(registry.get("registry-scores").is_some());
    assert!(registry.get("missing").is_none());
}

#[tokio::test]
async fn test_global_registry_lookup() {
    let group = registry::new_group("global-registry-demo", 0, |_key: String| async {
        Ok::<Vec<u8>, anyhow::Error>(b"1".to_vec())
    });

    let found = registry::get_group("global-registry-demo").unwrap();
    assert_eq!(found.name(), group.name());
    assert!(registry::get_group("global-registry-missing").is_none());
}
