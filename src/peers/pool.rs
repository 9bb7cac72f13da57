use super::client::HttpPeer;
use super::protocol::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS};
use crate::group::coordinator::{PeerClient, PeerPicker};
use crate::routing::ring::HashRing;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Ring and client table are replaced together, so `pick_peer` never observes
/// a half-rebuilt topology.
struct PoolState {
    ring: HashRing,
    clients: HashMap<String, Arc<HttpPeer>>,
}

/// Owns the routing state for one node: which peers exist, which keys they
/// own, and the HTTP client handle for each of them.
///
/// The local node is identified by exact string comparison between `self_addr`
/// and the addresses passed to [`set`](Self::set), so all addresses must be
/// given in one canonical form (`http://host:port`, no trailing slash).
pub struct HttpPool {
    self_addr: String,
    base_path: String,
    state: Mutex<PoolState>,
}

impl HttpPool {
    pub fn new(self_addr: &str) -> Arc<Self> {
        Self::with_base_path(self_addr, DEFAULT_BASE_PATH)
    }

    pub fn with_base_path(self_addr: &str, base_path: &str) -> Arc<Self> {
        Arc::new(Self {
            self_addr: self_addr.to_string(),
            base_path: base_path.to_string(),
            state: Mutex::new(PoolState {
                ring: HashRing::new(DEFAULT_REPLICAS),
                clients: HashMap::new(),
            }),
        })
    }

    /// Replaces the peer set wholesale.
    ///
    /// Builds a fresh ring and a fresh client table from the given addresses
    /// (the local address included) and swaps both in atomically. Not
    /// incremental: the previous topology is discarded.
    pub fn set<S: Into<String>>(&self, peers: impl IntoIterator<Item = S>) {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();

        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        ring.add(peers.iter().cloned());

        let clients = peers
            .into_iter()
            .map(|peer| {
                let base_url = format!("{}{}", peer, self.base_path);
                (peer, Arc::new(HttpPeer::new(&base_url)))
            })
            .collect();

        let mut state = self.state.lock();
        state.ring = ring;
        state.clients = clients;

        tracing::info!(
            "[{}] peer set replaced ({} peers)",
            self.self_addr,
            state.clients.len()
        );
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

impl PeerPicker for HttpPool {
    /// Asks the ring for the key's owner and returns its client handle, unless
    /// the owner is the local node (or the ring is empty).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerClient>> {
        let state = self.state.lock();
        let owner = state.ring.get(key)?;
        if owner == self.self_addr {
            return None;
        }

        tracing::debug!("[{}] picked peer {} for {}", self.self_addr, owner, key);
        state
            .clients
            .get(owner)
            .map(|client| client.clone() as Arc<dyn PeerClient>)
    }
}
