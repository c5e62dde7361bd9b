//! Configuration management for postlimit.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PostlimitError, Result};
use crate::ratelimit::{CategoryPolicy, CategoryRule, ContentCategory};

/// Prefix for environment overrides, e.g. `POSTLIMIT_LIMITS__POST__LIMIT=3`.
pub const ENV_PREFIX: &str = "POSTLIMIT";

/// Main configuration for postlimit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Submission limits per content category
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Actors exempt from every limit
    #[serde(default)]
    pub moderators: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Limits for each content category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Post limit
    #[serde(default)]
    pub post: CategoryRule,

    /// Comment limit
    #[serde(default)]
    pub comment: CategoryRule,
}

impl LimitsConfig {
    /// Get the rule for a category.
    pub fn rule(&self, category: ContentCategory) -> &CategoryRule {
        match category {
            ContentCategory::Post => &self.post,
            ContentCategory::Comment => &self.comment,
        }
    }
}

/// Limits after validation, with windows resolved to milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Policies {
    pub post: CategoryPolicy,
    pub comment: CategoryPolicy,
}

impl Policies {
    /// Get the policy for a category.
    pub fn get(&self, category: ContentCategory) -> &CategoryPolicy {
        match category {
            ContentCategory::Post => &self.post,
            ContentCategory::Comment => &self.comment,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, with environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(path.as_ref(), ENV_PREFIX)
    }

    fn load(path: &Path, env_prefix: &str) -> Result<Self> {
        let config = ::config::Config::builder()
            .add_source(::config::File::from(path).format(::config::FileFormat::Yaml))
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("moderators")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| PostlimitError::Config(format!("Failed to parse configuration: {}", e)))
    }

    /// Validate both categories and resolve their windows.
    pub fn validate(&self) -> Result<Policies> {
        let resolve = |category: ContentCategory| {
            self.limits.rule(category).validate(category).map_err(|e| {
                PostlimitError::InvalidConfiguration(format!("{} window: {}", category, e))
            })
        };

        Ok(Policies {
            post: resolve(ContentCategory::Post)?,
            comment: resolve(ContentCategory::Comment)?,
        })
    }

    /// Moderator ids as a set.
    pub fn moderator_set(&self) -> HashSet<String> {
        self.moderators.iter().cloned().collect()
    }
}
