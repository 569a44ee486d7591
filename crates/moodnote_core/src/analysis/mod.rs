//! Heuristic text analysis over note content.
//!
//! # Responsibility
//! - Detect a mood from keyword overlap.
//! - Derive summaries, key themes and collection statistics.
//!
//! # Invariants
//! - Everything here is pure; nothing touches storage or logging.

pub mod insight;
pub mod mood;
