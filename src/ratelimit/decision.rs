//! Limiter outcomes.

/// The result of checking a submission against its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The submission was within the limit and has been recorded.
    Admit,
    /// The actor is at the limit; nothing was recorded.
    Reject,
}

impl RateLimitDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, RateLimitDecision::Admit)
    }
}
