//! Activity key generation.

use serde::{Deserialize, Serialize};

/// The kind of content a counter tracks. Each category has its own counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Post,
    Comment,
}

impl ContentCategory {
    /// Prefix used in store keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Post => "post",
            ContentCategory::Comment => "comment",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key that identifies one actor's activity in one category.
///
/// Rendered as `<category>:<actor>`. Category names contain no `:`, so the
/// first `:` always ends the category and keys cannot collide across
/// categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivityKey {
    /// The content category
    pub category: ContentCategory,
    /// Identifier of the submitting actor
    pub actor_id: String,
}

impl ActivityKey {
    /// Create a new activity key.
    pub fn new(category: ContentCategory, actor_id: &str) -> Self {
        Self {
            category,
            actor_id: actor_id.to_string(),
        }
    }

    /// The string key used in the activity store.
    pub fn to_store_key(&self) -> String {
        format!("{}:{}", self.category, self.actor_id)
    }
}

impl std::fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_store_key())
    }
}
