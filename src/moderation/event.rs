//! Content submission events and their outcomes.

use serde::{Deserialize, Serialize};

use crate::ratelimit::ContentCategory;

/// A newly created post or comment.
///
/// Identifier fields are optional because upstream deliveries can omit them;
/// such events are skipped rather than counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEvent {
    /// Whether this is a post or a comment
    pub category: ContentCategory,
    /// The submitting actor
    #[serde(default)]
    pub author_id: Option<String>,
    /// The submitted content
    #[serde(default)]
    pub content_id: Option<String>,
    /// Community the content was submitted to
    #[serde(default)]
    pub community: Option<String>,
    /// Submission time in epoch milliseconds; the clock is used when absent
    #[serde(default)]
    pub created_at_ms: Option<i64>,
}

impl ContentEvent {
    /// Create an event with every identifier present and no timestamp.
    pub fn new(category: ContentCategory, author_id: &str, content_id: &str, community: &str) -> Self {
        Self {
            category,
            author_id: Some(author_id.to_string()),
            content_id: Some(content_id.to_string()),
            community: Some(community.to_string()),
            created_at_ms: None,
        }
    }

    /// Set the submission time.
    pub fn at(mut self, created_at_ms: i64) -> Self {
        self.created_at_ms = Some(created_at_ms);
        self
    }
}

/// Why an event was not checked against a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingAuthor,
    MissingContent,
    MissingCommunity,
    /// The author is a moderator
    Privileged,
    /// The category has no limit configured
    Unlimited,
}

/// What happened to a content event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Within the limit and recorded
    Admitted,
    /// Over the limit and removed; `replied` is true when a reply was posted
    Rejected { replied: bool },
    /// Not subject to the limit
    Skipped { reason: SkipReason },
}
