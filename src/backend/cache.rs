//! Last-good JSON per (user, view), shown when a later fetch fails.
//!
//! Every fetch takes a ticket from the view's [`RequestSequencer`] before it
//! is sent. Only the response holding the latest ticket may replace the
//! cached blob, so a slow response that lost the race to a newer one can
//! still render for its own request but never becomes the fallback.
//!
//! Views that show one date or month at a time keep a single entry. The
//! blob remembers which date it was fetched for (its variant) and is only
//! handed back for that same variant, so browsing dates replaces the entry
//! instead of adding one per date.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Blobs kept across all users before the least recently written is evicted.
pub const DEFAULT_MAX_ENTRIES: usize = 4096;

/// Position of one request in its view's sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    key: String,
    variant: String,
    seq: u64,
}

impl Ticket {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Monotonic per-key request counter.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: HashMap<String, u64>,
}

impl RequestSequencer {
    pub fn issue(&mut self, key: &str) -> Ticket {
        self.issue_variant(key, "")
    }

    pub fn issue_variant(&mut self, key: &str, variant: &str) -> Ticket {
        let seq = self.issued.entry(key.to_string()).or_insert(0);
        *seq += 1;
        Ticket { key: key.to_string(), variant: variant.to_string(), seq: *seq }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        self.issued.get(&ticket.key) == Some(&ticket.seq)
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    fn forget(&mut self, key: &str) {
        self.issued.remove(key);
    }

    fn forget_prefix(&mut self, prefix: &str) {
        self.issued.retain(|key, _| !key.starts_with(prefix));
    }
}

#[derive(Debug)]
struct Entry {
    variant: String,
    value: serde_json::Value,
    written: u64,
}

#[derive(Debug, Default)]
struct Inner {
    sequencer: RequestSequencer,
    blobs: HashMap<String, Entry>,
    writes: u64,
}

impl Inner {
    fn evict_oldest(&mut self) {
        let oldest = self.blobs.iter().min_by_key(|(_, e)| e.written).map(|(k, _)| k.clone());
        if let Some(key) = oldest {
            log::debug!("Evicting cached view {key}");
            self.blobs.remove(&key);
            self.sequencer.forget(&key);
        }
    }
}

/// Shared across workers through `web::Data`.
#[derive(Debug, Clone)]
pub struct ViewCache {
    inner: Arc<Mutex<Inner>>,
    max_entries: usize,
}

impl Default for ViewCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }
}

pub fn view_key(user_id: &str, view: &str) -> String {
    format!("{user_id}:{view}")
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panics when `max_entries` is zero.
    pub fn with_capacity(max_entries: usize) -> Self {
        assert!(max_entries > 0, "view cache needs room for at least one entry");
        ViewCache { inner: Arc::new(Mutex::new(Inner::default())), max_entries }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Take a ticket before sending the request for `user_id`'s `view`.
    pub fn begin(&self, user_id: &str, view: &str) -> Ticket {
        self.begin_variant(user_id, view, "")
    }

    /// Like [`ViewCache::begin`] for a view showing one `variant` (a date,
    /// a month) at a time.
    pub fn begin_variant(&self, user_id: &str, view: &str, variant: &str) -> Ticket {
        let mut inner = self.lock();
        // Keys that were requested but never stored (failed fetches) are
        // dropped once the counters outgrow the blobs.
        if inner.sequencer.len() >= self.max_entries * 2 {
            let Inner { sequencer, blobs, .. } = &mut *inner;
            sequencer.issued.retain(|key, _| blobs.contains_key(key));
        }
        inner.sequencer.issue_variant(&view_key(user_id, view), variant)
    }

    /// Store a successful response. Returns `false`, leaving the cache
    /// untouched, when a newer request for the same view was issued since.
    pub fn complete<T: Serialize>(&self, ticket: &Ticket, data: &T) -> bool {
        let mut inner = self.lock();
        if !inner.sequencer.is_latest(ticket) {
            log::debug!("Dropping stale response #{} for {}", ticket.seq, ticket.key);
            return false;
        }
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Could not cache response for {}: {}", ticket.key, e);
                return false;
            }
        };
        inner.writes += 1;
        let written = inner.writes;
        inner.blobs.insert(ticket.key.clone(), Entry { variant: ticket.variant.clone(), value, written });
        while inner.blobs.len() > self.max_entries {
            inner.evict_oldest();
        }
        true
    }

    /// Last stored blob for the view, decoded into `T`.
    pub fn fallback<T: DeserializeOwned>(&self, user_id: &str, view: &str) -> Option<T> {
        self.fallback_variant(user_id, view, "")
    }

    /// Last stored blob for the view, only if it was fetched for `variant`.
    pub fn fallback_variant<T: DeserializeOwned>(&self, user_id: &str, view: &str, variant: &str) -> Option<T> {
        let value = {
            let inner = self.lock();
            let entry = inner.blobs.get(&view_key(user_id, view))?;
            if entry.variant != variant {
                return None;
            }
            entry.value.clone()
        };
        serde_json::from_value(value).ok()
    }

    /// Number of stored blobs across all users.
    pub fn len(&self) -> usize {
        self.lock().blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything held for a user, on logout or session expiry.
    pub fn forget_user(&self, user_id: &str) {
        let prefix = format!("{user_id}:");
        let mut inner = self.lock();
        inner.blobs.retain(|key, _| !key.starts_with(&prefix));
        inner.sequencer.forget_prefix(&prefix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase_per_key() {
        let mut seq = RequestSequencer::default();
        let a1 = seq.issue("u:a");
        let a2 = seq.issue("u:a");
        let b1 = seq.issue("u:b");
        assert_eq!((a1.seq(), a2.seq(), b1.seq()), (1, 2, 1));
        assert!(!seq.is_latest(&a1));
        assert!(seq.is_latest(&a2));
        assert!(seq.is_latest(&b1));
    }

    #[test]
    fn stale_response_does_not_overwrite() {
        let cache = ViewCache::new();
        let first = cache.begin("7", "faculty");
        let second = cache.begin("7", "faculty");
        assert!(cache.complete(&second, &vec![2, 2]));
        assert!(!cache.complete(&first, &vec![1]));
        assert_eq!(cache.fallback::<Vec<i32>>("7", "faculty"), Some(vec![2, 2]));
    }

    #[test]
    fn users_are_isolated() {
        let cache = ViewCache::new();
        let t = cache.begin("1", "students");
        cache.complete(&t, &vec!["a"]);
        assert_eq!(cache.fallback::<Vec<String>>("2", "students"), None);
        cache.forget_user("1");
        assert_eq!(cache.fallback::<Vec<String>>("1", "students"), None);
    }

    #[test]
    fn oldest_write_is_evicted_past_capacity() {
        let cache = ViewCache::with_capacity(2);
        for user in ["1", "2", "3"] {
            let t = cache.begin(user, "admin.students");
            assert!(cache.complete(&t, &user));
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.fallback::<String>("1", "admin.students").is_none());
        assert_eq!(cache.fallback::<String>("3", "admin.students").as_deref(), Some("3"));
    }

    #[test]
    fn unanswered_tickets_are_pruned() {
        let cache = ViewCache::with_capacity(1);
        let kept = cache.begin("1", "admin.overview");
        cache.complete(&kept, &1);
        for user in 2..6 {
            cache.begin(&user.to_string(), "admin.overview");
        }
        assert!(cache.lock().sequencer.len() <= 3);
        assert_eq!(cache.fallback::<i32>("1", "admin.overview"), Some(1));
    }
}
