use crate::cache::byteview::ByteView;
use crate::cache::lru::LruCache;
use crate::singleflight::flight::SingleFlight;

use anyhow::Result;
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Boxed async callback that fetches origin data for a key on a cache miss.
pub type LoaderFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>> + Send + Sync>;

/// Client handle for one remote node, able to fetch a key from one of its groups.
pub trait PeerClient: Send + Sync {
    fn fetch<'a>(
        &'a self,
        group: &'a str,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

/// Maps a key to the client for its owning node.
///
/// Returns `None` when the key is owned by the local node, which must answer
/// from its own loader instead of calling itself over the network.
pub trait PeerPicker: Send + Sync {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerClient>>;
}

/// Lifetime counters for one group.
#[derive(Debug, Default)]
pub struct GroupStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub loads: AtomicU64,
    pub peer_fetches: AtomicU64,
    pub peer_failures: AtomicU64,
    pub evictions: AtomicU64,
}

/// Point-in-time view of a group, served by the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSnapshot {
    pub name: String,
    pub entries: usize,
    pub used_bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub peer_fetches: u64,
    pub peer_failures: u64,
    pub evictions: u64,
}

/// A named cache partition with its own byte budget and origin loader.
///
/// Groups are created once, registered under their name, and live for the rest
/// of the process.
pub struct Group {
    name: String,
    loader: LoaderFn,
    main_cache: Mutex<LruCache<ByteView>>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    flights: SingleFlight<ByteView>,
    stats: Arc<GroupStats>,
}

impl Group {
    /// Creates a group with a byte budget (`0` means unbounded) and an async
    /// loader invoked on cache misses the peers can not serve.
    pub fn new<F, Fut>(name: &str, max_bytes: usize, loader: F) -> Arc<Self>
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>>> + Send + 'static,
    {
        let loader: LoaderFn = Arc::new(move |key: String| {
            Box::pin(loader(key)) as Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>>
        });

        let stats = Arc::new(GroupStats::default());
        let eviction_stats = stats.clone();
        let main_cache = LruCache::with_eviction_callback(
            max_bytes,
            Box::new(move |key, _value: &ByteView| {
                eviction_stats.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Evicted key {}", key);
            }),
        );

        Arc::new(Self {
            name: name.to_string(),
            loader,
            main_cache: Mutex::new(main_cache),
            peers: OnceLock::new(),
            flights: SingleFlight::new(),
            stats,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Injects the peer picker used to route misses to remote owners.
    ///
    /// # Panics
    /// Panics when called a second time; wiring peers is a one-shot setup step.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        if self.peers.set(picker).is_err() {
            panic!("register_peers called more than once for group {}", self.name);
        }
    }

    /// Returns the cached value for `key`, loading it through a peer or the
    /// origin loader on a miss.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            anyhow::bail!("key is required");
        }

        if let Some(view) = self.main_cache.lock().get(key).cloned() {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("[{}] cache hit for {}", self.name, key);
            return Ok(view);
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        self.load(key).await
    }

    /// Miss path. Coalesced per key so that a thundering herd on one key costs
    /// a single fetch no matter how many callers are waiting.
    async fn load(&self, key: &str) -> Result<ByteView> {
        self.flights
            .run(key, || async {
                if let Some(picker) = self.peers.get()
                    && let Some(peer) = picker.pick_peer(key)
                {
                    match self.get_from_peer(peer.as_ref(), key).await {
                        Ok(view) => return Ok(view),
                        Err(err) => {
                            self.stats.peer_failures.fetch_add(1, Ordering::Relaxed);
                            tracing::warn!(
                                "[{}] peer fetch for {} failed, falling back to loader: {:#}",
                                self.name,
                                key,
                                err
                            );
                        }
                    }
                }

                self.get_locally(key).await
            })
            .await
    }

    async fn get_from_peer(&self, peer: &dyn PeerClient, key: &str) -> Result<ByteView> {
        let bytes = peer.fetch(&self.name, key).await?;
        self.stats.peer_fetches.fetch_add(1, Ordering::Relaxed);
        Ok(ByteView::from(bytes))
    }

    /// Fetches from the origin loader and populates the local cache.
    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = (self.loader)(key.to_string()).await?;
        self.stats.loads.fetch_add(1, Ordering::Relaxed);

        let view = ByteView::from(bytes);
        self.populate_cache(key, view.clone());
        Ok(view)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.lock().add(key, value);
    }

    pub fn stats(&self) -> &GroupStats {
        &self.stats
    }

    pub fn snapshot(&self) -> GroupSnapshot {
        let (entries, used_bytes) = {
            let cache = self.main_cache.lock();
            (cache.len(), cache.used_bytes())
        };

        GroupSnapshot {
            name: self.name.clone(),
            entries,
            used_bytes,
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            loads: self.stats.loads.load(Ordering::Relaxed),
            peer_fetches: self.stats.peer_fetches.load(Ordering::Relaxed),
            peer_failures: self.stats.peer_failures.load(Ordering::Relaxed),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
        }
    }
}
