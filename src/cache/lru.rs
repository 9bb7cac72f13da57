//! Bounded LRU Cache
//!
//! A key-value store with a byte budget. Entries are charged by
//! `key length + value length`; once the budget is exceeded the least recently
//! used entries are evicted until usage fits again.
//!
//! ## Mechanism
//! - **Ordering**: a `LinkedHashMap` keeps entries in access order. A lookup or an
//!   update moves the entry to the back; eviction pops from the front.
//! - **Accounting**: usage is adjusted on every insert, replace, and eviction, so it
//!   always equals the exact byte total of the entries currently present.

use linked_hash_map::LinkedHashMap;

/// Byte footprint of a cached value, used for the cache budget.
pub trait ByteSize {
    fn byte_size(&self) -> usize;
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

/// Invoked with the key and value of every evicted entry.
pub type EvictionCallback<V> = Box<dyn Fn(&str, &V) + Send + Sync>;

/// Size constrained LRU cache.
///
/// Not synchronized; the owner is expected to guard it with a lock.
pub struct LruCache<V: ByteSize> {
    /// Maximum byte budget. Zero disables the bound entirely.
    max_bytes: usize,
    /// Current usage: the sum of `key.len() + value.byte_size()` over all entries.
    used_bytes: usize,
    /// Entries in access order, least recently used at the front.
    entries: LinkedHashMap<String, V>,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: ByteSize> LruCache<V> {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            entries: LinkedHashMap::new(),
            on_evicted: None,
        }
    }

    pub fn with_eviction_callback(max_bytes: usize, on_evicted: EvictionCallback<V>) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            entries: LinkedHashMap::new(),
            on_evicted: Some(on_evicted),
        }
    }

    /// Looks up a key and marks it as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        self.entries.get_refresh(key).map(|value| &*value)
    }

    /// Inserts or replaces an entry and evicts from the cold end until the
    /// budget is respected again.
    ///
    /// A replacement only re-charges the value bytes; the key bytes stay
    /// accounted from the original insert.
    pub fn add(&mut self, key: &str, value: V) {
        if let Some(existing) = self.entries.get_refresh(key) {
            self.used_bytes -= existing.byte_size();
            self.used_bytes += value.byte_size();
            *existing = value;
        } else {
            self.used_bytes += key.len() + value.byte_size();
            self.entries.insert(key.to_string(), value);
        }

        while self.max_bytes > 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    /// Evicts the least recently used entry, if any.
    pub fn remove_oldest(&mut self) {
        if let Some((key, value)) = self.entries.pop_front() {
            self.used_bytes -= key.len() + value.byte_size();
            if let Some(on_evicted) = &self.on_evicted {
                on_evicted(&key, &value);
            }
        }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current byte usage across all entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }
}
