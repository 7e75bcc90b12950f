//! Keyed entry table with absolute expiry

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

/// A stored value and the instant it stops being readable
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    value: String,
    /// `None` never expires
    expires_at: Option<Instant>,
}

impl Entry {
    pub(crate) fn new(value: String, ttl: Duration, now: Instant) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            // Overflowing deadlines are treated as "never"
            now.checked_add(ttl)
        };
        Self { value, expires_at }
    }

    pub(crate) fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}

/// Owned store behind one engine instance
///
/// Sharded by `DashMap`, so a sweep pass locks one shard at a time instead
/// of the whole table. Every single-key operation is linearizable.
#[derive(Debug, Default)]
pub(crate) struct Table {
    entries: DashMap<String, Entry>,
}

impl Table {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Live value for `key`, ignoring entries past their deadline
    pub(crate) fn get(&self, key: &str, now: Instant) -> Option<String> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    /// Insert or replace; last write wins
    pub(crate) fn insert(&self, key: &str, entry: Entry) {
        self.entries.insert(key.to_string(), entry);
    }

    /// Returns `true` if the key was present
    pub(crate) fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry expired at `now`, returning how many were removed
    pub(crate) fn sweep(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Number of stored entries, including expired ones not yet swept
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
