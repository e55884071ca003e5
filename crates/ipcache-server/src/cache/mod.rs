//! Cache module for the IP cache server.
//!
//! A single-entry, read-through cache in front of the upstream IP lookup.
//! Refreshes are serialized under one lock so that at most one upstream call
//! is ever in flight.

pub mod ip_cache;

pub use ip_cache::{CacheEntry, IpCache};
