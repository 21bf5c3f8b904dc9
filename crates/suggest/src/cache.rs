//! Time-bounded memoization for suggestion results.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// How long a cached suggestion stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The process monotonic clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// A string-keyed cache whose entries expire after a fixed TTL.
///
/// Expired entries are removed when they are read, and all of them are swept
/// whenever a new value is stored.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    ttl: Duration,
    clock: Box<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache backed by the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Box::new(SystemClock))
    }

    /// Create a cache with an injected clock.
    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Get a fresh value for `key`.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if now.saturating_duration_since(entry.stored_at) < self.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        let stored_at = self.clock.now();
        let mut entries = self.entries.lock().await;

        let ttl = self.ttl;
        entries.retain(|_, entry| stored_at.saturating_duration_since(entry.stored_at) < ttl);
        entries.insert(key.into(), Entry { value, stored_at });
    }

    /// Number of entries currently held, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Build a cache key from a kind tag and the JSON form of the input.
pub fn cache_key<T: serde::Serialize + ?Sized>(kind: &str, input: &T) -> String {
    let canonical = serde_json::to_string(input).unwrap_or_default();
    format!("{kind}:{canonical}")
}
