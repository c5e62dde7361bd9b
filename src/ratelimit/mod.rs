//! Sliding window rate limiting.

mod decision;
mod key;
mod limiter;
mod rules;

pub use decision::RateLimitDecision;
pub use key::{ActivityKey, ContentCategory};
pub use limiter::WindowedRateLimiter;
pub use rules::{validate_window, CategoryPolicy, CategoryRule, DEFAULT_WINDOW};
