//! Cache Module
//!
//! Provides the in-process key/value store with per-entry TTL expiration.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{Entry, Ttl};
pub use stats::StoreStats;
pub use store::Store;
