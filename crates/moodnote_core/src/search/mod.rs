//! In-memory search entry points.
//!
//! # Responsibility
//! - Filter a note collection with free text and structured predicates.
//! - Order results with the chosen comparator and the pinned-first rule.

pub mod pipeline;
