use std::collections::HashMap;

/// Hash function placing raw bytes on the `u32` ring space.
///
/// Injectable so tests can control placement deterministically. The default is
/// CRC32/IEEE, which all nodes must share for routing to agree.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

/// Consistent hash ring with virtual nodes.
pub struct HashRing {
    hash: HashFn,
    /// Number of virtual nodes created per real node.
    replicas: usize,
    /// Sorted hashes of all virtual nodes.
    keys: Vec<u32>,
    /// Maps a virtual node hash back to the real node address.
    ///
    /// A hash collision between two virtual nodes overwrites the earlier
    /// binding. With CRC32 over short addresses this is rare enough to accept.
    nodes: HashMap<u32, String>,
}

impl HashRing {
    /// Creates a ring using the default CRC32/IEEE hash.
    pub fn new(replicas: usize) -> Self {
        Self::with_hash(replicas, Box::new(crc32fast::hash))
    }

    pub fn with_hash(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            keys: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    /// Adds nodes to the ring, creating `replicas` virtual nodes for each.
    ///
    /// Adding the same node twice is not supported; callers must rebuild the
    /// ring instead.
    pub fn add<S: Into<String>>(&mut self, nodes: impl IntoIterator<Item = S>) {
        for node in nodes {
            let node = node.into();
            for index in 0..self.replicas {
                let hash = (self.hash)(Self::virtual_name(index, &node).as_bytes());
                self.keys.push(hash);
                self.nodes.insert(hash, node.clone());
            }
        }
        self.keys.sort_unstable();
    }

    /// Returns the node owning `key`, or `None` on an empty ring.
    ///
    /// The owner is the first virtual node whose hash is >= the key's hash,
    /// wrapping around to the start of the ring past the highest hash.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = match self.keys.binary_search(&hash) {
            Ok(idx) => idx,
            Err(idx) => idx,
        };
        let idx = idx % self.keys.len();

        self.nodes.get(&self.keys[idx]).map(String::as_str)
    }

    /// Removes a node and all of its virtual nodes from the ring.
    pub fn remove(&mut self, node: &str) {
        for index in 0..self.replicas {
            let hash = (self.hash)(Self::virtual_name(index, node).as_bytes());
            if let Ok(position) = self.keys.binary_search(&hash) {
                self.keys.remove(position);
            }
            self.nodes.remove(&hash);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Virtual nodes are distinguished by prefixing the replica index.
    fn virtual_name(index: usize, node: &str) -> String {
        format!("{}{}", index, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_deterministic() {
        let mut ring = HashRing::new(50);
        ring.add(["http://127.0.0.1:8001", "http://127.0.0.1:8002"]);

        let first = ring.get("book_100").map(str::to_string);
        let second = ring.get("book_100").map(str::to_string);
        assert_eq!(first, second);
        assert!(first.is_some());
    }
}
