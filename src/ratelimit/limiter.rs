//! Sliding window rate limiter.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::decision::RateLimitDecision;
use crate::duration::parse_duration_ms;
use crate::error::Result;
use crate::store::ActivityStore;

/// A handle on one key's entry in the lock map.
///
/// Dropping the handle removes the entry when no other check holds it, also
/// when the check's future is cancelled mid-flight.
struct KeyLock<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
    mutex: Arc<Mutex<()>>,
}

impl<'a> KeyLock<'a> {
    fn new(locks: &'a DashMap<String, Arc<Mutex<()>>>, key: &'a str) -> Self {
        let mutex = locks.entry(key.to_string()).or_default().clone();
        Self { locks, key, mutex }
    }
}

impl Drop for KeyLock<'_> {
    fn drop(&mut self) {
        // Only the map and this handle still reference the mutex
        self.locks.remove_if(self.key, |_, mutex| {
            Arc::ptr_eq(mutex, &self.mutex) && Arc::strong_count(mutex) == 2
        });
    }
}

/// Admits or rejects submissions based on how many the same key recorded
/// within a trailing window.
///
/// Every check evicts expired entries, counts what remains, and records the
/// new submission only when the count is below the limit. Checks on the same
/// key are serialized so the evict/count/insert sequence is never
/// interleaved; checks on different keys run independently.
pub struct WindowedRateLimiter<S: ActivityStore> {
    /// Backing store for activity entries
    store: Arc<S>,
    /// Per-key locks, held only while a check is in flight
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<S: ActivityStore> WindowedRateLimiter<S> {
    /// Create a new limiter over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    /// Get the backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Check a submission against a window given as a duration string.
    ///
    /// A `limit` of zero means unlimited: the submission is admitted without
    /// parsing the window or touching the store. Unknown units in
    /// `window_spec` are returned as [`crate::error::PostlimitError::InvalidUnit`].
    pub async fn check_and_record(
        &self,
        key: &str,
        member_id: &str,
        limit: u64,
        window_spec: &str,
        now_ms: i64,
    ) -> Result<RateLimitDecision> {
        if limit == 0 {
            return Ok(RateLimitDecision::Admit);
        }

        let window_ms = parse_duration_ms(window_spec)?;
        self.check_and_record_window(key, member_id, limit, window_ms, now_ms)
            .await
    }

    /// Check a submission against a window already resolved to milliseconds.
    ///
    /// Callers are expected to have rejected non-positive windows when the
    /// configuration was validated; a zero window evicts everything and so
    /// admits every submission.
    pub async fn check_and_record_window(
        &self,
        key: &str,
        member_id: &str,
        limit: u64,
        window_ms: f64,
        now_ms: i64,
    ) -> Result<RateLimitDecision> {
        if limit == 0 {
            return Ok(RateLimitDecision::Admit);
        }

        // Scores are whole milliseconds, so `score <= now - window` is the
        // same as `score <= floor(now - window)`.
        let threshold = (now_ms as f64 - window_ms).floor() as i64;

        trace!(
            key = %key,
            member = %member_id,
            limit = limit,
            threshold = threshold,
            "Checking rate limit"
        );

        let key_lock = KeyLock::new(&self.locks, key);
        let _held = key_lock.mutex.lock().await;
        self.evict_count_insert(key, member_id, limit, threshold, now_ms)
            .await
    }

    async fn evict_count_insert(
        &self,
        key: &str,
        member_id: &str,
        limit: u64,
        threshold: i64,
        now_ms: i64,
    ) -> Result<RateLimitDecision> {
        self.store.evict_up_to(key, threshold).await?;
        let count = self.store.count(key).await?;

        if count < limit {
            self.store.insert(key, member_id, now_ms).await?;
            trace!(key = %key, count = count + 1, limit = limit, "Submission recorded");
            return Ok(RateLimitDecision::Admit);
        }

        debug!(
            key = %key,
            member = %member_id,
            count = count,
            limit = limit,
            "Rate limit exceeded"
        );
        Ok(RateLimitDecision::Reject)
    }

    /// Get the number of keys with a check in flight.
    pub fn in_flight_keys(&self) -> usize {
        self.locks.len()
    }
}
