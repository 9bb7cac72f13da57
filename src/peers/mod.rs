//! Peer Transport Module
//!
//! HTTP plumbing that lets nodes serve cache values to each other.
//!
//! ## Overview
//! Every node runs the same three pieces:
//! - **`pool`**: owns the consistent-hash ring and one client handle per peer, and
//!   implements the peer picker consumed by groups. `set` rebuilds ring and client
//!   table atomically; `pick_peer` excludes the local node so it never calls itself.
//! - **`client`**: a thin HTTP GET client fetching `<base><group>/<key>` from a peer
//!   with a short timeout and one retry.
//! - **`handlers`**: the Axum routes serving those requests on the other side by
//!   resolving the group in the registry and running its normal read path.
//!
//! ## Submodules
//! - **`protocol`**: the shared URL shape and tunables both sides must agree on.
//! - **`pool`**, **`client`**, **`handlers`**: as above.

pub mod client;
pub mod handlers;
pub mod pool;
pub mod protocol;
