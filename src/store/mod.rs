//! Activity storage used by the sliding window limiter.
//!
//! Each key holds a set of members ordered by score, where the score is the
//! submission time in epoch milliseconds. This is the shape of a Redis sorted
//! set; `MemoryStore` provides the same operations in-process.

mod memory;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStore;

/// Sorted-set operations the limiter needs from its backing store.
///
/// Members are unique within a key: inserting an existing member replaces
/// its score rather than adding a second entry.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Remove every entry under `key` whose score is at or below `threshold`.
    async fn evict_up_to(&self, key: &str, threshold: i64) -> Result<()>;

    /// Number of entries currently stored under `key`.
    async fn count(&self, key: &str) -> Result<u64>;

    /// Insert `member` under `key` with `score`, or move it to `score` if present.
    async fn insert(&self, key: &str, member: &str, score: i64) -> Result<()>;
}
