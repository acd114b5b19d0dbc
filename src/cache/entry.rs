//! Cache Entry Module
//!
//! Defines the stored record and its expiration policy.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Result, StoreError};

// == Expiration Policy ==
/// Expiration policy attached to an entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ttl {
    /// Never expires
    Forever,
    /// Expires the given number of minutes after creation
    Minutes(f64),
}

impl Ttl {
    /// Validates the policy for use in a write operation.
    ///
    /// Any finite, non-negative minute count is storable, fractional
    /// counts included; a half-minute entry expires after thirty
    /// seconds like any other duration. Negative, NaN, or infinite
    /// counts are rejected; "lives forever" is expressed only through
    /// the explicit `Forever` variant.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Ttl::Forever => Ok(()),
            Ttl::Minutes(minutes) if minutes.is_finite() && minutes >= 0.0 => Ok(()),
            Ttl::Minutes(minutes) => Err(StoreError::InvalidTtl(format!(
                "minute count must be finite and non-negative, got {}",
                minutes
            ))),
        }
    }
}

// == Cache Entry ==
/// One stored record: payload, policy, and creation time.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored payload
    pub value: Value,
    /// Expiration policy
    pub ttl: Ttl,
    /// Creation timestamp (store-assigned, not caller-controlled)
    pub created_at: DateTime<Utc>,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry stamped with the given creation time.
    pub fn new(value: Value, ttl: Ttl, created_at: DateTime<Utc>) -> Self {
        Self {
            value,
            ttl,
            created_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// An entry with a minute policy is expired once strictly more than
    /// `minutes * 60` seconds have elapsed since creation, measured at
    /// millisecond precision. `Forever` entries never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.ttl {
            Ttl::Forever => false,
            Ttl::Minutes(minutes) => {
                let elapsed_ms = (now - self.created_at).num_milliseconds();
                elapsed_ms as f64 > minutes * 60_000.0
            }
        }
    }
}
