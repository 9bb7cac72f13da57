//! Distributed Group Cache Library
//!
//! This library crate defines the core modules of a distributed, read-through,
//! in-process cache. A cluster of identical nodes shares a partitioned, bounded
//! cache over HTTP: a client may ask any node for a key, and the node answers
//! from its own cache, from the peer owning the key, or from the user-supplied
//! origin loader.
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`cache`**: The local storage layer. An immutable byte-value wrapper and a
//!   bounded LRU cache with byte accounting.
//! - **`routing`**: The placement layer. A consistent-hash ring with virtual nodes
//!   deterministically maps every key to its owning node.
//! - **`singleflight`**: The coalescing layer. Concurrent misses on one key are
//!   collapsed into a single underlying fetch shared by all callers.
//! - **`group`**: The coordination layer. Named cache partitions compose the cache,
//!   the coalescer, and the peer transport into the read-through flow, and a
//!   process-wide registry resolves partition names for inbound peer requests.
//! - **`peers`**: The transport layer. The HTTP pool, per-peer clients, and the
//!   server handlers that move cache values between nodes.

pub mod cache;
pub mod group;
pub mod peers;
pub mod routing;
pub mod singleflight;
