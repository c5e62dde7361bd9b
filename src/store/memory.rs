//! In-process activity store.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::trace;

use super::ActivityStore;
use crate::error::Result;

/// One key's entries, indexed both by score and by member.
#[derive(Debug, Default)]
struct SortedSet {
    by_score: BTreeSet<(i64, String)>,
    by_member: HashMap<String, i64>,
}

impl SortedSet {
    fn insert(&mut self, member: &str, score: i64) {
        if let Some(previous) = self.by_member.insert(member.to_string(), score) {
            self.by_score.remove(&(previous, member.to_string()));
        }
        self.by_score.insert((score, member.to_string()));
    }

    /// Drop entries scored at or below `threshold`, returning how many went.
    fn evict_up_to(&mut self, threshold: i64) -> usize {
        let kept = match threshold.checked_add(1) {
            Some(first_kept) => self.by_score.split_off(&(first_kept, String::new())),
            None => BTreeSet::new(),
        };
        let evicted = std::mem::replace(&mut self.by_score, kept);
        for (_, member) in &evicted {
            self.by_member.remove(member);
        }
        evicted.len()
    }

    fn len(&self) -> usize {
        self.by_score.len()
    }

    fn is_empty(&self) -> bool {
        self.by_score.is_empty()
    }
}

/// A sorted-set store held in memory.
///
/// Keys whose entries have all been evicted are dropped, so resident size
/// tracks the number of actors active within their window.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: DashMap<String, SortedSet>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Score stored for `member` under `key`, if any.
    pub fn score(&self, key: &str, member: &str) -> Option<i64> {
        self.sets
            .get(key)
            .and_then(|set| set.by_member.get(member).copied())
    }

    /// Number of keys holding at least one entry.
    pub fn key_count(&self) -> usize {
        self.sets.len()
    }

    /// Remove every key.
    ///
    /// This is primarily useful for testing.
    pub fn clear(&self) {
        self.sets.clear();
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn evict_up_to(&self, key: &str, threshold: i64) -> Result<()> {
        let evicted = match self.sets.get_mut(key) {
            Some(mut set) => set.evict_up_to(threshold),
            None => return Ok(()),
        };
        self.sets.remove_if(key, |_, set| set.is_empty());

        trace!(key = %key, threshold = threshold, evicted = evicted, "Evicted expired entries");
        Ok(())
    }

    async fn count(&self, key: &str) -> Result<u64> {
        Ok(self.sets.get(key).map_or(0, |set| set.len() as u64))
    }

    async fn insert(&self, key: &str, member: &str, score: i64) -> Result<()> {
        self.sets
            .entry(key.to_string())
            .or_default()
            .insert(member, score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_count_missing_key_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.count("post:nobody").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_and_count() {
        let store = MemoryStore::new();
        store.insert("post:a", "t3_1", 100).await.unwrap();
        store.insert("post:a", "t3_2", 200).await.unwrap();
        store.insert("post:b", "t3_3", 300).await.unwrap();

        assert_eq!(store.count("post:a").await.unwrap(), 2);
        assert_eq!(store.count("post:b").await.unwrap(), 1);
        assert_eq!(store.key_count(), 2);
    }

    #[tokio::test]
    async fn test_reinsert_updates_score() {
        let store = MemoryStore::new();
        store.insert("post:a", "t3_1", 100).await.unwrap();
        store.insert("post:a", "t3_1", 500).await.unwrap();

        assert_eq!(store.count("post:a").await.unwrap(), 1);
        assert_eq!(store.score("post:a", "t3_1"), Some(500));

        // The old score no longer holds the member in place
        store.evict_up_to("post:a", 100).await.unwrap();
        assert_eq!(store.count("post:a").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_evict_is_inclusive() {
        let store = MemoryStore::new();
        store.insert("post:a", "t3_1", 100).await.unwrap();
        store.insert("post:a", "t3_2", 200).await.unwrap();
        store.insert("post:a", "t3_3", 201).await.unwrap();

        store.evict_up_to("post:a", 200).await.unwrap();

        assert_eq!(store.count("post:a").await.unwrap(), 1);
        assert_eq!(store.score("post:a", "t3_1"), None);
        assert_eq!(store.score("post:a", "t3_2"), None);
        assert_eq!(store.score("post:a", "t3_3"), Some(201));
    }

    #[tokio::test]
    async fn test_evict_leaves_count_of_newer_entries() {
        let store = MemoryStore::new();
        let scores = [5, 10, 10, 15, 20, 25];
        for (i, score) in scores.iter().enumerate() {
            store
                .insert("comment:a", &format!("t1_{}", i), *score)
                .await
                .unwrap();
        }

        store.evict_up_to("comment:a", 10).await.unwrap();

        let expected = scores.iter().filter(|s| **s > 10).count() as u64;
        assert_eq!(store.count("comment:a").await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_evict_drops_empty_keys() {
        let store = MemoryStore::new();
        store.insert("post:a", "t3_1", 100).await.unwrap();
        assert_eq!(store.key_count(), 1);

        store.evict_up_to("post:a", 100).await.unwrap();
        assert_eq!(store.key_count(), 0);
        assert_eq!(store.count("post:a").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_evict_extreme_threshold() {
        let store = MemoryStore::new();
        store.insert("post:a", "t3_1", i64::MAX).await.unwrap();
        store.insert("post:a", "t3_2", i64::MIN).await.unwrap();

        store.evict_up_to("post:a", i64::MIN).await.unwrap();
        assert_eq!(store.count("post:a").await.unwrap(), 1);

        store.evict_up_to("post:a", i64::MAX).await.unwrap();
        assert_eq!(store.count("post:a").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_evict_missing_key_is_noop() {
        let store = MemoryStore::new();
        store.evict_up_to("post:nobody", 1_000).await.unwrap();
        assert_eq!(store.key_count(), 0);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryStore::new();
        store.insert("post:a", "t3_1", 1).await.unwrap();
        store.insert("comment:a", "t1_1", 1).await.unwrap();

        store.clear();
        assert_eq!(store.key_count(), 0);
    }
}
