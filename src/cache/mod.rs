//! Local Cache Storage Module
//!
//! Implements the per-node storage layer: an immutable byte-value wrapper and a
//! bounded, byte-accounted LRU cache.
//!
//! ## Core Concepts
//! - **Byte accounting**: every entry is charged `key length + value length` against the
//!   cache budget, so eviction tracks real memory pressure instead of entry counts.
//! - **Recency ordering**: entries are kept in strict access order; when the budget is
//!   exceeded, the least recently used entry is evicted first.
//! - **Immutable values**: cached bytes are wrapped in [`byteview::ByteView`], which never
//!   hands out a mutable reference to the shared buffer.
//!
//! The LRU cache is deliberately not synchronized. The owning
//! [`Group`](crate::group::coordinator::Group) serializes all access behind its own mutex.

pub mod byteview;
pub mod lru;

#[cfg(test)]
mod tests;
