//! Rate-limited diagnostic tracing.
//!
//! Interception points can fire every frame. Diagnostics for a given key are
//! emitted at most once per interval; the decision never feeds back into
//! policy.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{info, warn};

/// Keys remembered before the stalest one is evicted.
const DEFAULT_CAPACITY: usize = 256;

/// Whether a message last emitted at `last` may be emitted again at `now`.
pub fn should_emit(now: Instant, last: Option<Instant>, min_interval: Duration) -> bool {
    match last {
        Some(last) => now.saturating_duration_since(last) >= min_interval,
        None => true,
    }
}

/// Bounded map from key to last emission time.
#[derive(Debug)]
pub struct LogThrottle {
    last_emitted: Mutex<HashMap<String, Instant>>,
    capacity: usize,
}

impl Default for LogThrottle {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl LogThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            last_emitted: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Record an emission for `key` at `now` if allowed.
    pub fn check_at(&self, key: &str, min_interval: Duration, now: Instant) -> bool {
        let mut map = self.last_emitted.lock();
        if !should_emit(now, map.get(key).copied(), min_interval) {
            return false;
        }

        if !map.contains_key(key) && map.len() >= self.capacity {
            let stalest = map
                .iter()
                .min_by_key(|(_, at)| **at)
                .map(|(k, _)| k.clone());
            if let Some(stalest) = stalest {
                map.remove(&stalest);
            }
        }
        map.insert(key.to_string(), now);
        true
    }

    pub fn check(&self, key: &str, min_interval: Duration) -> bool {
        self.check_at(key, min_interval, Instant::now())
    }

    pub fn info_throttled(&self, key: &str, min_interval: Duration, message: &str) {
        if self.check(key, min_interval) {
            info!(key, "{}", message);
        }
    }

    pub fn warn_throttled(&self, key: &str, min_interval: Duration, message: &str) {
        if self.check(key, min_interval) {
            warn!(key, "{}", message);
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.last_emitted.lock().len()
    }
}
