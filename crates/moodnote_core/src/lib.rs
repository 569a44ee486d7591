//! Core domain logic for MoodNote.
//! This crate is the single source of truth for note invariants, mood
//! detection and the note filter/sort pipeline.

pub mod analysis;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use analysis::insight::{extract_keywords, summarize, NoteStats};
pub use analysis::mood::{classify_mood, mood_keywords, MoodAnalysis};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::label::{normalize_label, normalize_labels, Label, LabelId};
pub use model::mood::Mood;
pub use model::note::{
    ChecklistItem, Note, NoteColor, NoteId, NoteKind, NoteValidationError, ParseEnumError,
};
pub use repo::error::{RepoError, RepoResult};
pub use repo::label_repo::{LabelRepository, SqliteLabelRepository};
pub use repo::note_repo::{NoteListQuery, NoteRepository, SqliteNoteRepository};
pub use search::pipeline::{filter_and_sort_notes, NoteQuery, SortKey};
pub use service::label_service::{LabelService, LabelServiceError};
pub use service::note_service::{NoteDraft, NotePatch, NoteService, NoteServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
