//! Postlimit - Sliding Window Submission Limits
//!
//! This crate limits how many posts or comments a single actor may submit
//! within a rolling window. Windows are written as compact duration strings
//! (`1d`, `1h30m`, `1.5s`); each submission is checked against the actor's
//! recent activity held in a sorted-set store.

pub mod clock;
pub mod config;
pub mod duration;
pub mod error;
pub mod moderation;
pub mod ratelimit;
pub mod store;
