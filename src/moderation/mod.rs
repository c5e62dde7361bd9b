//! Enforcement of submission limits on incoming content.
//!
//! `ContentGuard` sits between the platform's content events and the
//! limiter. It skips events that cannot or should not be counted, and on
//! rejection replies to and removes the offending content through the
//! injected `ContentActions`.

mod actions;
mod event;
mod guard;

pub use actions::{ContentActions, LoggingActions, PrivilegeCheck, StaticPrivileges};
pub use event::{ContentEvent, Outcome, SkipReason};
pub use guard::ContentGuard;
