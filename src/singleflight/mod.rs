//! Request Coalescing Module
//!
//! Collapses concurrent identical cache misses into a single underlying fetch.
//!
//! ## Mechanism
//! - **In-flight table**: the first caller for a key becomes the leader and registers a
//!   completion channel; every caller arriving while the fetch is running subscribes to
//!   that channel instead of fetching again.
//! - **Fan-out**: when the leader finishes, all subscribers observe the same value or
//!   error. The table entry is then removed, so later callers start a fresh fetch —
//!   coalescing covers the in-flight window only and never acts as a cache.

pub mod flight;
