//! Applies category limits to incoming content.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, info, instrument, warn};

use super::actions::{ContentActions, PrivilegeCheck};
use super::event::{ContentEvent, Outcome, SkipReason};
use crate::clock::{Clock, SystemClock};
use crate::config::Policies;
use crate::error::Result;
use crate::ratelimit::{ActivityKey, RateLimitDecision, WindowedRateLimiter};
use crate::store::ActivityStore;

/// Checks each new post or comment against its category's limit and removes
/// content from actors who are over it.
pub struct ContentGuard<S: ActivityStore> {
    limiter: WindowedRateLimiter<S>,
    privileges: Arc<dyn PrivilegeCheck>,
    actions: Arc<dyn ContentActions>,
    clock: Arc<dyn Clock>,
    /// Validated policies; replaced wholesale on reload
    policies: RwLock<Policies>,
}

impl<S: ActivityStore> ContentGuard<S> {
    /// Create a new guard using the system clock.
    pub fn new(
        store: Arc<S>,
        policies: Policies,
        privileges: Arc<dyn PrivilegeCheck>,
        actions: Arc<dyn ContentActions>,
    ) -> Self {
        Self {
            limiter: WindowedRateLimiter::new(store),
            privileges,
            actions,
            clock: Arc::new(SystemClock),
            policies: RwLock::new(policies),
        }
    }

    /// Replace the clock used for events without a timestamp.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Update the policies.
    pub fn set_policies(&self, policies: Policies) {
        let mut current = self.policies.write();
        *current = policies;
    }

    /// Get the current policies.
    pub fn policies(&self) -> Policies {
        self.policies.read().clone()
    }

    /// Get the underlying limiter.
    pub fn limiter(&self) -> &WindowedRateLimiter<S> {
        &self.limiter
    }

    /// Handle a newly created post or comment.
    ///
    /// A failed reply is logged and does not prevent removal; a failed
    /// removal is returned as an error.
    #[instrument(
        skip(self, event),
        fields(
            category = %event.category,
            content = ?event.content_id,
        )
    )]
    pub async fn handle(&self, event: &ContentEvent) -> Result<Outcome> {
        let Some(author_id) = event.author_id.as_deref() else {
            error!("author ID missing");
            return Ok(skipped(SkipReason::MissingAuthor));
        };
        let Some(content_id) = event.content_id.as_deref() else {
            error!("{} ID missing", event.category);
            return Ok(skipped(SkipReason::MissingContent));
        };
        let Some(community) = event.community.as_deref() else {
            error!("community name missing");
            return Ok(skipped(SkipReason::MissingCommunity));
        };

        if self.privileges.is_privileged(author_id, community).await? {
            info!(author = %author_id, "Ignoring moderator {}", event.category);
            return Ok(skipped(SkipReason::Privileged));
        }

        let policy = self.policies.read().get(event.category).clone();
        if policy.is_unlimited() {
            return Ok(skipped(SkipReason::Unlimited));
        }

        let key = ActivityKey::new(event.category, author_id);
        let now_ms = event
            .created_at_ms
            .unwrap_or_else(|| self.clock.now_ms());

        let decision = self
            .limiter
            .check_and_record_window(
                &key.to_store_key(),
                content_id,
                policy.limit,
                policy.window_ms,
                now_ms,
            )
            .await?;

        if decision == RateLimitDecision::Admit {
            debug!(key = %key, "Content admitted");
            return Ok(Outcome::Admitted);
        }

        let mut replied = false;
        if let Some(text) = policy.reply_text() {
            match self.actions.reply(content_id, text).await {
                Ok(()) => replied = true,
                Err(e) => warn!(error = %e, "Failed to reply to rejected content"),
            }
        }

        self.actions.remove(content_id).await?;

        info!(
            key = %key,
            limit = policy.limit,
            replied = replied,
            "Content removed for exceeding limit"
        );
        Ok(Outcome::Rejected { replied })
    }
}

fn skipped(reason: SkipReason) -> Outcome {
    Outcome::Skipped { reason }
}
