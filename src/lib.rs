//! Heap Cache - an in-process key/value cache store
//!
//! A single shared table maps string keys to JSON values, each entry
//! tagged with an expiration policy: a fixed number of minutes, or
//! never. Expired entries are evicted lazily by the read that discovers
//! them, and get-or-compute runs each caller-supplied computation at
//! most once per key, even under concurrent callers.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;

pub use cache::{Entry, Store, StoreStats, Ttl};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Result, StoreError};
