//! Key Routing Module
//!
//! Responsible for mapping keys to owning nodes in the cluster. It ensures a
//! deterministic distribution of data: every node computes the same owner for a
//! given key without any coordination.
//!
//! ## Mechanism
//! - **Consistent hashing**: node addresses are placed on a `u32` hash ring; a key is
//!   owned by the first node hash clockwise from the key's own hash.
//! - **Virtual nodes**: each real node is inserted multiple times under derived names,
//!   which evens out the key distribution across a small cluster.

pub mod ring;
