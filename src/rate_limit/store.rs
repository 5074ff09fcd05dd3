use std::time::Duration;

use dashmap::DashMap;

use super::key::ClientKey;

/// Counter identity: one bucket per client and rule scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub client: ClientKey,
    pub scope: String,
}

impl CounterKey {
    pub fn new(client: ClientKey, scope: impl Into<String>) -> Self {
        Self {
            client,
            scope: scope.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterEntry {
    pub window_start: Duration,
    pub window_end: Duration,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Request counted; `count` includes it.
    Admitted { count: u64 },
    /// Quota used up until `window_end`.
    Exhausted { window_end: Duration },
}

/// Storage for fixed-window counters.
///
/// `acquire` must be atomic per key: two concurrent calls for the same key
/// may never both observe the same count.
pub trait CounterStore: Send + Sync + 'static {
    fn acquire(&self, key: &CounterKey, window_start: Duration, window: Duration, limit: u64)
        -> Admission;

    fn remove(&self, key: &CounterKey);

    fn clear(&self);

    /// Drops every counter whose window ended at or before `now`.
    fn evict_elapsed(&self, now: Duration) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process store on a sharded map. The entry guard holds its shard lock
/// for the whole read-modify-write, so unrelated keys only contend when they
/// hash to the same shard.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    counters: DashMap<CounterKey, CounterEntry>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CounterKey) -> Option<CounterEntry> {
        self.counters.get(key).map(|entry| *entry)
    }
}

impl CounterStore for InMemoryStore {
    fn acquire(
        &self,
        key: &CounterKey,
        window_start: Duration,
        window: Duration,
        limit: u64,
    ) -> Admission {
        let window_end = window_start + window;

        let mut entry = self
            .counters
            .entry(key.clone())
            .or_insert(CounterEntry {
                window_start,
                window_end,
                count: 0,
            });

        // Only a newer window restarts the count. A request stamped before
        // the live window began is counted against the live window, so the
        // entry never moves backwards.
        if window_start > entry.window_start {
            *entry = CounterEntry {
                window_start,
                window_end,
                count: 0,
            };
        }

        if entry.count >= limit {
            return Admission::Exhausted {
                window_end: entry.window_end,
            };
        }

        entry.count += 1;
        Admission::Admitted { count: entry.count }
    }

    fn remove(&self, key: &CounterKey) {
        self.counters.remove(key);
    }

    fn clear(&self) {
        self.counters.clear();
    }

    fn evict_elapsed(&self, now: Duration) -> usize {
        let before = self.counters.len();
        self.counters.retain(|_, entry| entry.window_end > now);
        before.saturating_sub(self.counters.len())
    }

    fn len(&self) -> usize {
        self.counters.len()
    }
}
