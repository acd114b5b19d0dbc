//! Configuration Module
//!
//! Handles loading the store's advisory settings from environment variables.

use std::env;

/// Store configuration parameters.
///
/// The only value consumed by the core is an advisory key prefix, owned
/// by the host application. The store reports it back verbatim and never
/// enforces it on keys.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Advisory key prefix reported by `Store::prefix` (default: unset)
    pub prefix: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PREFIX` - Advisory key prefix (default: unset)
    pub fn from_env() -> Self {
        Self {
            prefix: env::var("CACHE_PREFIX").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Sets the advisory prefix, builder-style.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}
