//! Cache Store Module
//!
//! The storage-and-expiration engine: a keyed table of entries behind a
//! single lock, lazy expiry on access, and per-key in-flight guards so
//! get-or-compute runs each computation at most once.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde_json::{Number, Value};
use tracing::{debug, trace};

use crate::cache::{Entry, StoreStats, Ttl};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Result, StoreError};

// == In-Flight Marker ==
/// Per-key guard for a running `remember` computation.
///
/// The first caller to miss a key installs one of these and runs the
/// computation; everyone else racing on the same key blocks on the
/// condvar and reuses the published outcome.
#[derive(Debug)]
struct InFlight {
    outcome: Mutex<Option<Result<Value>>>,
    done: Condvar,
}

impl InFlight {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            done: Condvar::new(),
        }
    }

    /// Publishes the computation outcome and wakes all waiters.
    fn publish(&self, outcome: Result<Value>) {
        let mut slot = self.outcome.lock().expect("in-flight lock poisoned");
        *slot = Some(outcome);
        self.done.notify_all();
    }

    /// Blocks until the leader publishes, then returns a copy of the outcome.
    fn wait(&self) -> Result<Value> {
        let mut slot = self.outcome.lock().expect("in-flight lock poisoned");
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            slot = self.done.wait(slot).expect("in-flight lock poisoned");
        }
    }
}

/// Role a `remember` caller ends up with after the fast path misses.
enum Role {
    /// This caller installed the marker and must run the computation
    Leader(Arc<InFlight>),
    /// Another caller is already computing; wait for its outcome
    Follower(Arc<InFlight>),
}

/// Publishes a failure for the in-flight key if the leader unwinds
/// before completing, so waiters are never left blocked.
struct CompletionGuard<'a> {
    store: &'a Store,
    key: &'a str,
    marker: &'a InFlight,
    armed: bool,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        {
            let mut state = self.store.state();
            state.in_flight.remove(self.key);
        }
        self.marker.publish(Err(StoreError::Compute(format!(
            "Computation for key '{}' panicked",
            self.key
        ))));
    }
}

// == Shared State ==
/// Everything guarded by the store's single lock.
#[derive(Debug, Default)]
struct State {
    /// Key-value table
    entries: HashMap<String, Entry>,
    /// Markers for keys with a computation currently running
    in_flight: HashMap<String, Arc<InFlight>>,
    /// Activity counters
    stats: StoreStats,
}

#[derive(Debug)]
struct StoreInner {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
    config: Config,
}

// == Cache Store ==
/// In-process key/value cache store with per-entry TTL.
///
/// One table maps string keys to JSON values, each entry tagged with an
/// expiration policy (a number of minutes, or never). Expired entries
/// are evicted lazily by the read that discovers them; no background
/// sweep runs and no capacity bound is enforced.
///
/// Cloning a `Store` yields another handle to the same table, so a
/// store can be shared across threads. Stores constructed separately
/// are fully independent.
///
/// # Example
/// ```
/// use heap_cache::{Config, Store, Ttl};
///
/// let cache = Store::new(Config::default());
///
/// cache.put("user:1", "Alice", Ttl::Minutes(5.0)).unwrap();
/// assert_eq!(cache.get("user:1"), Some("Alice".into()));
///
/// cache.forever("site:name", "example.org");
/// assert!(cache.has("site:name"));
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    // == Constructors ==
    /// Creates a new store running on wall-clock time.
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new store with an injected time source.
    ///
    /// Expiration is judged against `clock`, which tests can drive
    /// across minute-scale TTL boundaries without sleeping.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(State::default()),
                clock,
                config,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().expect("store lock poisoned")
    }

    /// Looks up `key` in the locked state, lazily evicting an expired
    /// entry. Returns the live value, if any. Leaves hit/miss counters
    /// to the caller.
    fn lookup(state: &mut State, key: &str, now: DateTime<Utc>) -> Option<Value> {
        match state.entries.get(key) {
            None => None,
            Some(entry) if entry.is_expired(now) => {
                state.entries.remove(key);
                state.stats.record_expiration();
                state.stats.entries = state.entries.len();
                debug!("Expired entry '{}' evicted on access", key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
        }
    }

    /// Writes an entry stamped at the current instant. Must be called
    /// with the state lock held.
    fn insert_locked(&self, state: &mut State, key: String, value: Value, ttl: Ttl) {
        trace!("Storing key '{}'", key);
        let entry = Entry::new(value, ttl, self.inner.clock.now());
        state.entries.insert(key, entry);
        state.stats.record_write();
        state.stats.entries = state.entries.len();
    }

    // == Has ==
    /// Checks whether `key` holds a live value.
    ///
    /// Expiration-aware: an entry whose policy has elapsed counts as
    /// absent even though the table still holds it. Pure check: the
    /// stale entry is left for the next `get` to evict.
    pub fn has(&self, key: &str) -> bool {
        let state = self.state();
        let now = self.inner.clock.now();
        match state.entries.get(key) {
            Some(entry) => !entry.is_expired(now),
            None => false,
        }
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// Returns `None` if the key is absent or expired. A read that
    /// discovers an expired entry removes it as a side effect, so
    /// absence and "present but expired" are indistinguishable to
    /// callers.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut state = self.state();
        let now = self.inner.clock.now();
        match Self::lookup(&mut state, key, now) {
            Some(value) => {
                state.stats.record_hit();
                Some(value)
            }
            None => {
                state.stats.record_miss();
                None
            }
        }
    }

    // == Pull ==
    /// Retrieves the value stored under `key` and deletes the entry,
    /// in one critical section.
    pub fn pull(&self, key: &str) -> Option<Value> {
        let mut state = self.state();
        let now = self.inner.clock.now();
        match Self::lookup(&mut state, key, now) {
            Some(value) => {
                state.entries.remove(key);
                state.stats.record_hit();
                state.stats.entries = state.entries.len();
                Some(value)
            }
            None => {
                state.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores `value` under `key` with the given policy.
    ///
    /// Unconditional upsert: any existing entry is overwritten and the
    /// creation time reset to now. Fails only on an unusable minute
    /// count (negative, NaN, or infinite).
    pub fn put(&self, key: impl Into<String>, value: impl Into<Value>, ttl: Ttl) -> Result<()> {
        ttl.validate()?;
        let mut state = self.state();
        self.insert_locked(&mut state, key.into(), value.into(), ttl);
        Ok(())
    }

    // == Add ==
    /// Stores `value` under `key` only if the key holds no live value.
    ///
    /// Expiration-aware: an expired-but-present entry counts as absent
    /// and is overwritten. Returns whether a write happened.
    pub fn add(&self, key: impl Into<String>, value: impl Into<Value>, ttl: Ttl) -> Result<bool> {
        ttl.validate()?;
        let key = key.into();
        let mut state = self.state();
        let now = self.inner.clock.now();
        if Self::lookup(&mut state, &key, now).is_some() {
            return Ok(false);
        }
        self.insert_locked(&mut state, key, value.into(), ttl);
        Ok(true)
    }

    // == Increment / Decrement ==
    /// Adds `delta` to the number stored under `key`.
    ///
    /// Returns `Ok(None)` without writing when the key is absent or
    /// expired, and `Err(StoreError::TypeMismatch)` without writing
    /// when the stored value is not a number. On success the adjusted
    /// number is written back under the entry's original minute count
    /// with a fresh creation time, so the TTL re-bases from the moment
    /// of the adjustment rather than from the original write.
    pub fn increment(&self, key: &str, delta: i64) -> Result<Option<Value>> {
        self.adjust(key, delta)
    }

    /// Subtracts `delta` from the number stored under `key`.
    ///
    /// Same contract as `increment`, including the TTL re-base.
    pub fn decrement(&self, key: &str, delta: i64) -> Result<Option<Value>> {
        self.adjust(key, -delta)
    }

    fn adjust(&self, key: &str, delta: i64) -> Result<Option<Value>> {
        let mut state = self.state();
        let now = self.inner.clock.now();

        let (current, ttl) = match state.entries.get(key) {
            None => {
                state.stats.record_miss();
                return Ok(None);
            }
            Some(entry) if entry.is_expired(now) => {
                state.entries.remove(key);
                state.stats.record_expiration();
                state.stats.record_miss();
                state.stats.entries = state.entries.len();
                debug!("Expired entry '{}' evicted on access", key);
                return Ok(None);
            }
            Some(entry) => (entry.value.clone(), entry.ttl),
        };

        let adjusted = match &current {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::from(i.saturating_add(delta))
                } else if let Some(f) = n.as_f64() {
                    match Number::from_f64(f + delta as f64) {
                        Some(n) => Value::Number(n),
                        None => {
                            return Err(StoreError::TypeMismatch(format!(
                                "adjusting key '{}' by {} left no representable number",
                                key, delta
                            )))
                        }
                    }
                } else {
                    return Err(StoreError::TypeMismatch(format!(
                        "key '{}' holds a number outside the adjustable range",
                        key
                    )));
                }
            }
            other => {
                return Err(StoreError::TypeMismatch(format!(
                    "key '{}' holds a non-numeric value ({})",
                    key,
                    type_name(other)
                )))
            }
        };

        state.stats.record_hit();
        self.insert_locked(&mut state, key.to_string(), adjusted.clone(), ttl);
        Ok(Some(adjusted))
    }

    // == Forever ==
    /// Stores `value` under `key` with no expiration.
    pub fn forever(&self, key: impl Into<String>, value: impl Into<Value>) {
        let mut state = self.state();
        self.insert_locked(&mut state, key.into(), value.into(), Ttl::Forever);
    }

    // == Remember ==
    /// Returns the value under `key`, computing and caching it on a miss.
    ///
    /// A live cached value is returned without invoking `compute`.
    /// Otherwise `compute` runs exactly once, synchronously, and its
    /// result is stored under `ttl` and returned. Concurrent callers
    /// racing on the same missing key block until the one running the
    /// computation finishes, then reuse its outcome, success and
    /// failure alike. A failed computation caches nothing and its error
    /// is handed to the invoking caller and every waiter.
    ///
    /// Calling `remember` for the same key from inside `compute` will
    /// deadlock, as the inner call waits on the outer computation.
    pub fn remember<F>(&self, key: impl Into<String>, ttl: Ttl, compute: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        ttl.validate()?;
        let key = key.into();

        let role = {
            let mut state = self.state();
            let now = self.inner.clock.now();
            if let Some(value) = Self::lookup(&mut state, &key, now) {
                state.stats.record_hit();
                return Ok(value);
            }
            state.stats.record_miss();
            match state.in_flight.get(&key) {
                Some(existing) => Role::Follower(Arc::clone(existing)),
                None => {
                    let marker = Arc::new(InFlight::new());
                    state.in_flight.insert(key.clone(), Arc::clone(&marker));
                    Role::Leader(marker)
                }
            }
        };

        match role {
            Role::Follower(marker) => marker.wait(),
            Role::Leader(marker) => self.lead_compute(&key, ttl, compute, &marker),
        }
    }

    /// Runs the computation as the key's leader: publish the outcome,
    /// store on success, and release the in-flight marker.
    fn lead_compute<F>(&self, key: &str, ttl: Ttl, compute: F, marker: &InFlight) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        let mut guard = CompletionGuard {
            store: self,
            key,
            marker,
            armed: true,
        };
        // Runs without the table lock held, so other keys stay usable.
        let result = compute();
        guard.armed = false;
        drop(guard);

        let outcome = match result {
            Ok(value) => {
                let mut state = self.state();
                state.in_flight.remove(key);
                self.insert_locked(&mut state, key.to_string(), value.clone(), ttl);
                Ok(value)
            }
            Err(err) => {
                let mut state = self.state();
                state.in_flight.remove(key);
                debug!("Computation for key '{}' failed, nothing cached", key);
                Err(err)
            }
        };

        marker.publish(outcome.clone());
        outcome
    }

    /// Returns the value under `key`, computing and caching it
    /// permanently on a miss. Same single-execution guarantee as
    /// `remember`.
    pub fn remember_forever<F>(&self, key: impl Into<String>, compute: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        self.remember(key, Ttl::Forever, compute)
    }

    /// Alias for `remember_forever`.
    pub fn sear<F>(&self, key: impl Into<String>, compute: F) -> Result<Value>
    where
        F: FnOnce() -> Result<Value>,
    {
        self.remember_forever(key, compute)
    }

    // == Batch Operations ==
    /// Retrieves every key in `keys`, mapping absent or expired keys to
    /// `Value::Null` rather than omitting them.
    pub fn many(&self, keys: &[&str]) -> HashMap<String, Value> {
        keys.iter()
            .map(|&key| (key.to_string(), self.get(key).unwrap_or(Value::Null)))
            .collect()
    }

    /// Stores every pair in `entries` under one shared policy, in a
    /// single critical section.
    pub fn put_many<I>(&self, entries: I, ttl: Ttl) -> Result<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        ttl.validate()?;
        let mut state = self.state();
        for (key, value) in entries {
            self.insert_locked(&mut state, key, value, ttl);
        }
        Ok(())
    }

    // == Forget ==
    /// Removes the entry under `key`, if any.
    ///
    /// Idempotent: removing a missing key is not an error. Returns true
    /// once the key is guaranteed absent, which is always.
    pub fn forget(&self, key: &str) -> bool {
        let mut state = self.state();
        if state.entries.remove(key).is_some() {
            state.stats.entries = state.entries.len();
            debug!("Forgot key '{}'", key);
        }
        true
    }

    // == Flush ==
    /// Removes every entry. Always returns true.
    pub fn flush(&self) -> bool {
        let mut state = self.state();
        let dropped = state.entries.len();
        state.entries.clear();
        state.stats.entries = 0;
        debug!("Flushed {} entries", dropped);
        true
    }

    // == Prefix ==
    /// Returns the advisory key prefix from configuration.
    ///
    /// Purely informational: keys are stored verbatim and the prefix
    /// is never enforced. Empty when unconfigured.
    pub fn prefix(&self) -> &str {
        self.inner.config.prefix.as_deref().unwrap_or("")
    }

    // == Introspection ==
    /// Returns the current number of entries in the table.
    ///
    /// May count expired entries that no read has evicted yet.
    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    /// Returns a snapshot of the activity counters.
    pub fn stats(&self) -> StoreStats {
        let state = self.state();
        let mut stats = state.stats.clone();
        stats.entries = state.entries.len();
        stats
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Human-readable name of a JSON value's type, for error messages.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Duration;
    use serde_json::json;
    use std::cell::Cell;

    fn manual_store() -> (Store, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let store = Store::with_clock(Config::default(), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_store_starts_empty() {
        let store = Store::default();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert!(!store.has("anything"));
    }

    #[test]
    fn test_put_and_get_roundtrip() {
        let store = Store::default();

        store.put("name", "Alice", Ttl::Minutes(5.0)).unwrap();
        store.put("count", 42, Ttl::Minutes(5.0)).unwrap();
        store
            .put("profile", json!({"admin": true}), Ttl::Forever)
            .unwrap();

        assert_eq!(store.get("name"), Some(json!("Alice")));
        assert_eq!(store.get("count"), Some(json!(42)));
        assert_eq!(store.get("profile"), Some(json!({"admin": true})));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = Store::default();
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_put_overwrites_and_resets_creation() {
        let (store, clock) = manual_store();

        store.put("key", "v1", Ttl::Minutes(1.0)).unwrap();
        clock.advance(Duration::seconds(50));
        store.put("key", "v2", Ttl::Minutes(1.0)).unwrap();

        // 50s after the second write the first would have expired
        clock.advance(Duration::seconds(50));
        assert_eq!(store.get("key"), Some(json!("v2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_evicts_expired_entry() {
        let (store, clock) = manual_store();

        store.put("short", "lived", Ttl::Minutes(1.0)).unwrap();
        clock.advance(Duration::seconds(61));

        assert_eq!(store.get("short"), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_has_is_expiration_aware_without_evicting() {
        let (store, clock) = manual_store();

        store.put("short", "lived", Ttl::Minutes(1.0)).unwrap();
        assert!(store.has("short"));

        clock.advance(Duration::seconds(61));
        assert!(!store.has("short"));
        // The stale entry stays until a read trips over it
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("short"), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_pull_returns_and_removes() {
        let store = Store::default();

        store.put("token", "abc123", Ttl::Minutes(5.0)).unwrap();
        assert_eq!(store.pull("token"), Some(json!("abc123")));
        assert_eq!(store.get("token"), None);
        assert_eq!(store.pull("token"), None);
    }

    #[test]
    fn test_add_writes_only_when_absent() {
        let store = Store::default();

        assert!(store.add("key", "first", Ttl::Minutes(5.0)).unwrap());
        assert!(!store.add("key", "second", Ttl::Minutes(5.0)).unwrap());
        assert_eq!(store.get("key"), Some(json!("first")));
    }

    #[test]
    fn test_add_treats_expired_entry_as_absent() {
        let (store, clock) = manual_store();

        store.put("key", "old", Ttl::Minutes(1.0)).unwrap();
        clock.advance(Duration::seconds(61));

        assert!(store.add("key", "new", Ttl::Minutes(1.0)).unwrap());
        assert_eq!(store.get("key"), Some(json!("new")));
    }

    #[test]
    fn test_increment_adjusts_integer() {
        let store = Store::default();

        store.put("counter", 10, Ttl::Minutes(5.0)).unwrap();
        assert_eq!(store.increment("counter", 5).unwrap(), Some(json!(15)));
        assert_eq!(store.get("counter"), Some(json!(15)));
    }

    #[test]
    fn test_decrement_adjusts_integer() {
        let store = Store::default();

        store.put("counter", 10, Ttl::Minutes(5.0)).unwrap();
        assert_eq!(store.decrement("counter", 3).unwrap(), Some(json!(7)));
    }

    #[test]
    fn test_adjust_float_values() {
        let store = Store::default();

        store.put("ratio", 1.5, Ttl::Minutes(5.0)).unwrap();
        assert_eq!(store.increment("ratio", 1).unwrap(), Some(json!(2.5)));
    }

    #[test]
    fn test_increment_missing_key_is_a_miss() {
        let store = Store::default();
        assert_eq!(store.increment("missing", 1).unwrap(), None);
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_increment_expired_key_is_a_miss() {
        let (store, clock) = manual_store();

        store.put("counter", 10, Ttl::Minutes(1.0)).unwrap();
        clock.advance(Duration::seconds(61));

        assert_eq!(store.increment("counter", 1).unwrap(), None);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_increment_non_numeric_is_type_mismatch() {
        let store = Store::default();

        store.put("name", "Alice", Ttl::Minutes(5.0)).unwrap();
        let err = store.increment("name", 1).unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch(_)));
        // State untouched
        assert_eq!(store.get("name"), Some(json!("Alice")));
    }

    #[test]
    fn test_increment_rebases_ttl_from_adjustment() {
        let (store, clock) = manual_store();

        store.put("counter", 10, Ttl::Minutes(10.0)).unwrap();
        clock.advance(Duration::minutes(9));
        store.increment("counter", 1).unwrap();

        // 18 minutes after the original write, 9 after the adjustment:
        // the original deadline has passed but the re-based one has not
        clock.advance(Duration::minutes(9));
        assert_eq!(store.get("counter"), Some(json!(11)));

        clock.advance(Duration::minutes(2));
        assert_eq!(store.get("counter"), None);
    }

    #[test]
    fn test_forever_entry_survives_any_elapsed_time() {
        let (store, clock) = manual_store();

        store.forever("pinned", "value");
        clock.advance(Duration::days(365 * 10));
        assert_eq!(store.get("pinned"), Some(json!("value")));
    }

    #[test]
    fn test_remember_computes_on_miss_and_caches() {
        let store = Store::default();
        let calls = Cell::new(0);

        let value = store
            .remember("expensive", Ttl::Minutes(5.0), || {
                calls.set(calls.get() + 1);
                Ok(json!("computed"))
            })
            .unwrap();

        assert_eq!(value, json!("computed"));
        assert_eq!(calls.get(), 1);

        let value = store
            .remember("expensive", Ttl::Minutes(5.0), || {
                calls.set(calls.get() + 1);
                Ok(json!("recomputed"))
            })
            .unwrap();

        assert_eq!(value, json!("computed"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_remember_recomputes_after_expiry() {
        let (store, clock) = manual_store();

        store
            .remember("key", Ttl::Minutes(1.0), || Ok(json!("first")))
            .unwrap();
        clock.advance(Duration::seconds(61));

        let value = store
            .remember("key", Ttl::Minutes(1.0), || Ok(json!("second")))
            .unwrap();
        assert_eq!(value, json!("second"));
    }

    #[test]
    fn test_remember_failure_caches_nothing() {
        let store = Store::default();

        let err = store
            .remember("flaky", Ttl::Minutes(5.0), || {
                Err(StoreError::Compute("backend unavailable".to_string()))
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Compute(_)));
        assert!(!store.has("flaky"));

        // The key is usable again immediately
        let value = store
            .remember("flaky", Ttl::Minutes(5.0), || Ok(json!("recovered")))
            .unwrap();
        assert_eq!(value, json!("recovered"));
    }

    #[test]
    fn test_remember_forever_and_sear() {
        let (store, clock) = manual_store();

        let value = store
            .remember_forever("permanent", || Ok(json!("kept")))
            .unwrap();
        assert_eq!(value, json!("kept"));

        clock.advance(Duration::days(3650));
        let value = store.sear("permanent", || Ok(json!("never"))).unwrap();
        assert_eq!(value, json!("kept"));
    }

    #[test]
    fn test_many_maps_absent_keys_to_null() {
        let store = Store::default();

        store
            .put_many(
                vec![("a".to_string(), json!(1)), ("b".to_string(), json!(2))],
                Ttl::Minutes(5.0),
            )
            .unwrap();

        let values = store.many(&["a", "b", "c"]);
        assert_eq!(values.len(), 3);
        assert_eq!(values["a"], json!(1));
        assert_eq!(values["b"], json!(2));
        assert_eq!(values["c"], Value::Null);
    }

    #[test]
    fn test_forget_is_idempotent() {
        let store = Store::default();

        store.put("key", "value", Ttl::Minutes(5.0)).unwrap();
        assert!(store.forget("key"));
        assert!(!store.has("key"));
        assert!(store.forget("key"));
        assert!(store.forget("never-existed"));
    }

    #[test]
    fn test_flush_clears_everything() {
        let store = Store::default();

        store.put("a", 1, Ttl::Minutes(5.0)).unwrap();
        store.forever("b", 2);
        assert!(store.flush());
        assert!(store.is_empty());
        assert!(!store.has("a"));
        assert!(!store.has("b"));
    }

    #[test]
    fn test_invalid_ttl_is_rejected_everywhere() {
        let store = Store::default();

        assert!(store.put("k", 1, Ttl::Minutes(-1.0)).is_err());
        assert!(store.add("k", 1, Ttl::Minutes(f64::NAN)).is_err());
        assert!(store
            .put_many(vec![("k".to_string(), json!(1))], Ttl::Minutes(f64::INFINITY))
            .is_err());
        assert!(store
            .remember("k", Ttl::Minutes(-0.5), || Ok(json!(1)))
            .is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_prefix_comes_from_config() {
        let store = Store::new(Config::default().with_prefix("app"));
        assert_eq!(store.prefix(), "app");

        let bare = Store::default();
        assert_eq!(bare.prefix(), "");
    }

    #[test]
    fn test_clones_share_one_table() {
        let store = Store::default();
        let handle = store.clone();

        handle.put("shared", "value", Ttl::Minutes(5.0)).unwrap();
        assert_eq!(store.get("shared"), Some(json!("value")));
    }

    #[test]
    fn test_separate_stores_are_independent() {
        let first = Store::default();
        let second = Store::default();

        first.put("key", "value", Ttl::Minutes(5.0)).unwrap();
        assert!(!second.has("key"));
        second.flush();
        assert!(first.has("key"));
    }

    #[test]
    fn test_stats_track_activity() {
        let (store, clock) = manual_store();

        store.put("a", 1, Ttl::Minutes(1.0)).unwrap();
        let _ = store.get("a"); // hit
        let _ = store.get("b"); // miss
        clock.advance(Duration::seconds(61));
        let _ = store.get("a"); // miss + lazy expiration

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.writes, 1);
        assert_eq!(stats.entries, 0);
        assert!(stats.hit_rate() > 0.3 && stats.hit_rate() < 0.4);
    }
}
