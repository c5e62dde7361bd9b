//! Per-category limit rules and their validation.
//!
//! A rule is what an administrator writes: a limit, a window as a duration
//! string, and an optional reply. Validating a rule resolves the window once
//! into milliseconds, producing the policy the per-event path runs with.

use serde::{Deserialize, Serialize};

use super::key::ContentCategory;
use crate::duration::parse_duration_ms;
use crate::error::{PostlimitError, Result};

/// Window applied when a rule does not name one.
pub const DEFAULT_WINDOW: &str = "1d";

/// A submission limit for one content category, as configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Maximum submissions per window; 0 disables the limit
    #[serde(default)]
    pub limit: u64,
    /// Window length as a duration string, e.g. `1d` or `1h30m`
    #[serde(default = "default_window")]
    pub window: String,
    /// Reply posted on rejected content; empty for none
    #[serde(default)]
    pub reply: String,
}

impl Default for CategoryRule {
    fn default() -> Self {
        Self {
            limit: 0,
            window: default_window(),
            reply: String::new(),
        }
    }
}

fn default_window() -> String {
    DEFAULT_WINDOW.to_string()
}

impl CategoryRule {
    /// Create a rule with no reply text.
    pub fn new(limit: u64, window: &str) -> Self {
        Self {
            limit,
            window: window.to_string(),
            reply: String::new(),
        }
    }

    /// Set the reply text.
    pub fn with_reply(mut self, reply: &str) -> Self {
        self.reply = reply.to_string();
        self
    }

    /// Validate the rule, resolving its window.
    ///
    /// The window is checked even when the limit is zero so a later change
    /// to the limit alone cannot activate a broken window.
    pub fn validate(&self, category: ContentCategory) -> Result<CategoryPolicy> {
        let window_ms = validate_window(&self.window)?;
        Ok(CategoryPolicy {
            category,
            limit: self.limit,
            window_ms,
            reply: self.reply.clone(),
        })
    }
}

/// Parse a window string and reject windows that resolve to zero or less.
pub fn validate_window(window: &str) -> Result<f64> {
    let window_ms = parse_duration_ms(window)?;
    if window_ms <= 0.0 {
        return Err(PostlimitError::InvalidConfiguration(
            "Duration cannot resolve to 0s".to_string(),
        ));
    }
    Ok(window_ms)
}

/// A validated rule, ready for enforcement.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPolicy {
    /// Category this policy applies to
    pub category: ContentCategory,
    /// Maximum submissions per window; 0 disables the limit
    pub limit: u64,
    /// Window length in milliseconds, always positive
    pub window_ms: f64,
    /// Reply posted on rejected content; empty for none
    pub reply: String,
}

impl CategoryPolicy {
    pub fn is_unlimited(&self) -> bool {
        self.limit == 0
    }

    /// The reply to post on rejection, if one is configured.
    pub fn reply_text(&self) -> Option<&str> {
        if self.reply.is_empty() {
            None
        } else {
            Some(&self.reply)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults() {
        let rule: CategoryRule = serde_yaml::from_str("{}").unwrap();
        assert_eq!(rule, CategoryRule::default());
        assert_eq!(rule.limit, 0);
        assert_eq!(rule.window, "1d");
        assert!(rule.reply.is_empty());
    }

    #[test]
    fn test_parse_rule_yaml() {
        let yaml = r#"
limit: 3
window: 1h30m
reply: "Slow down, you have posted too often."
"#;
        let rule: CategoryRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.limit, 3);
        assert_eq!(rule.window, "1h30m");

        let policy = rule.validate(ContentCategory::Post).unwrap();
        assert_eq!(policy.window_ms, 5_400_000.0);
        assert_eq!(policy.reply_text(), Some("Slow down, you have posted too often."));
        assert!(!policy.is_unlimited());
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        for window in ["0", "0s", "0d0h", "", "ms"] {
            let err = CategoryRule::new(5, window)
                .validate(ContentCategory::Comment)
                .unwrap_err();
            assert!(matches!(err, PostlimitError::InvalidConfiguration(_)), "{}", window);
            assert_eq!(err.to_string(), "Duration cannot resolve to 0s");
        }
    }

    #[test]
    fn test_validate_rejects_unknown_unit() {
        let err = CategoryRule::new(5, "2weeks")
            .validate(ContentCategory::Post)
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown unit: 'weeks'");
    }

    #[test]
    fn test_validate_checks_window_of_unlimited_rule() {
        assert!(CategoryRule::new(0, "1y").validate(ContentCategory::Post).is_err());

        let policy = CategoryRule::new(0, "1d").validate(ContentCategory::Post).unwrap();
        assert!(policy.is_unlimited());
    }

    #[test]
    fn test_empty_reply_is_none() {
        let policy = CategoryRule::new(1, "1m")
            .validate(ContentCategory::Comment)
            .unwrap();
        assert_eq!(policy.reply_text(), None);

        let policy = CategoryRule::new(1, "1m")
            .with_reply("Too many comments")
            .validate(ContentCategory::Comment)
            .unwrap();
        assert_eq!(policy.reply_text(), Some("Too many comments"));
    }

    #[test]
    fn test_sub_millisecond_window_is_positive() {
        let window_ms = validate_window("0.5ms").unwrap();
        assert_eq!(window_ms, 0.5);
    }
}
