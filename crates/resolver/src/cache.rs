use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, RwLock};

/// Time source for cache freshness decisions.
///
/// Injected so tests can drive freshness deterministically instead of
/// sleeping against the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone)]
struct CacheSlot {
    channel_id: String,
    resolved_at: DateTime<Utc>,
}

/// Single-entry store for the resolved channel identifier.
///
/// The slot is empty until the first successful resolution and is only ever
/// overwritten by a later successful resolution, so a failed re-fetch leaves
/// the previous value (and its timestamp) in place. There is no negative
/// caching.
pub struct IdentifierCache {
    slot: RwLock<Option<CacheSlot>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl IdentifierCache {
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl: Duration::seconds(ttl_secs as i64),
            clock,
        }
    }

    /// Returns the cached identifier while the entry is still fresh.
    pub fn get(&self) -> Option<String> {
        let slot = self.slot.read().expect("identifier cache lock poisoned");
        slot.as_ref().and_then(|entry| {
            let age = self.clock.now().signed_duration_since(entry.resolved_at);
            (age < self.ttl).then(|| entry.channel_id.clone())
        })
    }

    /// Stores a freshly resolved identifier, stamped with the current time.
    pub fn put(&self, channel_id: &str) {
        let mut slot = self.slot.write().expect("identifier cache lock poisoned");
        *slot = Some(CacheSlot {
            channel_id: channel_id.to_owned(),
            resolved_at: self.clock.now(),
        });
    }
}

#[cfg(test)]
pub(crate) mod test_clock {
    use super::*;
    use std::sync::Mutex;

    /// Manually driven clock for deterministic freshness tests.
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn starting_at(now: DateTime<Utc>) -> Self {
            Self { now: Mutex::new(now) }
        }

        pub fn set(&self, now: DateTime<Utc>) {
            *self.now.lock().unwrap() = now;
        }

        pub fn advance(&self, seconds: i64) {
            let mut now = self.now.lock().unwrap();
            *now += Duration::seconds(seconds);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}
