//! Capabilities the guard needs from the hosting platform.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use crate::error::Result;

/// Decides whether an actor is exempt from limits in a community.
#[async_trait]
pub trait PrivilegeCheck: Send + Sync {
    async fn is_privileged(&self, actor_id: &str, community: &str) -> Result<bool>;
}

/// Actions taken on rejected content.
#[async_trait]
pub trait ContentActions: Send + Sync {
    /// Post `text` as a reply to the content.
    async fn reply(&self, content_id: &str, text: &str) -> Result<()>;

    /// Remove the content.
    async fn remove(&self, content_id: &str) -> Result<()>;
}

/// A fixed set of moderators, privileged in every community.
#[derive(Debug, Clone, Default)]
pub struct StaticPrivileges {
    moderators: HashSet<String>,
}

impl StaticPrivileges {
    pub fn new(moderators: HashSet<String>) -> Self {
        Self { moderators }
    }
}

#[async_trait]
impl PrivilegeCheck for StaticPrivileges {
    async fn is_privileged(&self, actor_id: &str, _community: &str) -> Result<bool> {
        Ok(self.moderators.contains(actor_id))
    }
}

/// Records actions instead of performing them.
#[derive(Debug, Default)]
pub struct LoggingActions {
    replies: Mutex<Vec<(String, String)>>,
    removals: Mutex<Vec<String>>,
}

impl LoggingActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies recorded so far, as `(content_id, text)`.
    pub fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().clone()
    }

    /// Content ids removed so far.
    pub fn removals(&self) -> Vec<String> {
        self.removals.lock().clone()
    }
}

#[async_trait]
impl ContentActions for LoggingActions {
    async fn reply(&self, content_id: &str, text: &str) -> Result<()> {
        info!(content = %content_id, text = %text, "Replying to content");
        self.replies
            .lock()
            .push((content_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn remove(&self, content_id: &str) -> Result<()> {
        info!(content = %content_id, "Removing content");
        self.removals.lock().push(content_id.to_string());
        Ok(())
    }
}
