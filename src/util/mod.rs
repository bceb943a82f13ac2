//! Utility functions module
//!
//! Contains helpers for clock, duration and score formatting.

pub mod format;

// Re-export commonly used functions
pub use format::{format_clock, format_remaining, format_score, parse_time_limit, Urgency};
