//! Domain model for notes, labels and moods.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own normalization rules shared by storage, filters and the client.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod label;
pub mod mood;
pub mod note;
