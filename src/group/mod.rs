//! Group Coordination Module
//!
//! The core component tying the cache together: a named cache partition (group)
//! that composes the local LRU store, the request coalescer, and the peer
//! transport into a single read-through flow.
//!
//! ## Read Path
//! 1. A caller asks a group for a key. On a local cache hit the value is returned
//!    immediately.
//! 2. On a miss, the load is coalesced per key. Inside the coalesced section the
//!    group asks the peer picker for the key's owner; a remote owner is queried
//!    over the transport.
//! 3. A peer failure falls back to the user-supplied loader, so a flaky peer
//!    degrades to local work instead of failing the request. Loader failures are
//!    surfaced to the caller.
//! 4. Values loaded locally are inserted into the LRU store before returning.
//!
//! ## Submodules
//! - **`coordinator`**: the `Group` itself plus the loader and peer seams.
//! - **`registry`**: process-wide mapping of group names to instances, used by the
//!   HTTP dispatch to resolve inbound peer requests.

pub mod coordinator;
pub mod registry;

#[cfg(test)]
mod tests;
