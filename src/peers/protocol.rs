//! Peer Wire Protocol
//!
//! The URL shape and routing constants shared by the peer client and server.
//! Peers interoperate only if these match on every node.
//!
//! A value is fetched with `GET <base path><group>/<key>`, where group and key
//! are percent-encoded by the client and decoded by the server. Success is a
//! `200` with the raw value bytes as an `application/octet-stream` body; `400`
//! marks a malformed path, `404` an unknown group, and `500` a failed load.

/// Path prefix separating peer traffic from anything else a node serves.
pub const DEFAULT_BASE_PATH: &str = "/_geecache/";

/// Virtual nodes placed on the ring per peer.
pub const DEFAULT_REPLICAS: usize = 50;
