//! Note use-case service.
//!
//! # Responsibility
//! - Turn submitted drafts and partial patches into persisted notes.
//! - Run automatic mood detection whenever analyzable text changes.
//! - Normalize and atomically replace note labels.
//!
//! # Invariants
//! - A note is never created with both title and content blank.
//! - Blank titles are stored as `Untitled`.
//! - A manually chosen mood has confidence `1.0` and disables detection.
//! - Every mutation bumps `updated_at`.

use crate::analysis::insight::NoteStats;
use crate::analysis::mood::classify_mood;
use crate::model::label::normalize_labels;
use crate::model::mood::Mood;
use crate::model::note::{ChecklistItem, Note, NoteColor, NoteId, NoteKind, UNTITLED};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::note_repo::{normalize_note_limit, NoteListQuery, NoteRepository};
use crate::search::pipeline::{filter_and_sort_notes, NoteQuery};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Confidence recorded for moods picked by the user.
pub const MANUAL_MOOD_CONFIDENCE: f64 = 1.0;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Draft has neither a title nor content.
    EmptyNote,
    /// Label input contains a blank value.
    InvalidLabel(String),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note needs a title or content"),
            Self::InvalidLabel(value) => write!(f, "invalid label: `{value}`"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Input of the note editor's submit action.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub kind: NoteKind,
    pub checklist: Vec<ChecklistItem>,
    pub drawing_data: Option<String>,
    /// Used only when detection is off or there is no text to analyze.
    pub mood: Option<Mood>,
    pub mood_detection: bool,
    pub category: Option<String>,
    pub labels: Vec<String>,
    pub color: NoteColor,
    pub is_pinned: bool,
    pub is_favorite: bool,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub reminder_at: Option<i64>,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            kind: NoteKind::default(),
            checklist: Vec::new(),
            drawing_data: None,
            mood: None,
            mood_detection: true,
            category: None,
            labels: Vec::new(),
            color: NoteColor::default(),
            is_pinned: false,
            is_favorite: false,
            image_url: None,
            audio_url: None,
            link_url: None,
            link_text: None,
            reminder_at: None,
        }
    }
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Partial update. `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kind: Option<NoteKind>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub drawing_data: Option<Option<String>>,
    /// Manual mood choice; `Some(None)` clears the mood.
    pub mood: Option<Option<Mood>>,
    pub mood_detection: Option<bool>,
    pub category: Option<Option<String>>,
    pub labels: Option<Vec<String>>,
    pub color: Option<NoteColor>,
    pub is_pinned: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_favorite: Option<bool>,
    pub image_url: Option<Option<String>>,
    pub audio_url: Option<Option<String>>,
    pub link_url: Option<Option<String>>,
    pub link_text: Option<Option<String>>,
    pub reminder_at: Option<Option<i64>>,
}

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq)]
pub struct NotesListResult {
    /// List items sorted by `updated_at DESC, id ASC`.
    pub items: Vec<Note>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note from an editor draft.
    pub fn create_note(&mut self, draft: NoteDraft) -> Result<Note, NoteServiceError> {
        if draft.title.trim().is_empty() && draft.content.trim().is_empty() {
            return Err(NoteServiceError::EmptyNote);
        }
        let labels = checked_labels(&draft.labels)?;

        let mut note = Note::new(display_title(&draft.title), draft.content);
        note.kind = draft.kind;
        note.checklist = draft.checklist;
        note.drawing_data = draft.drawing_data;
        note.mood_detection = draft.mood_detection;
        note.category = non_blank(draft.category);
        note.labels = labels;
        note.color = draft.color;
        note.is_pinned = draft.is_pinned;
        note.is_favorite = draft.is_favorite;
        note.image_url = non_blank(draft.image_url);
        note.audio_url = non_blank(draft.audio_url);
        note.link_url = non_blank(draft.link_url);
        note.link_text = non_blank(draft.link_text);
        note.reminder_at = draft.reminder_at;

        if !detect_mood(&mut note) {
            if let Some(mood) = draft.mood {
                note.set_mood(Some(mood), MANUAL_MOOD_CONFIDENCE);
                note.mood_detection = false;
            }
        }

        let id = self.repo.create_note(&note)?;
        info!(
            "event=note_create module=service status=ok note_id={} kind={} mood={}",
            id,
            note.kind,
            note.mood.map_or("none", Mood::as_str)
        );
        self.read_back(id, "created note not found in read-back")
    }

    /// Applies a partial update and re-runs detection when text changed.
    pub fn update_note(&mut self, id: NoteId, patch: NotePatch) -> Result<Note, NoteServiceError> {
        let mut note = self.require_note(id)?;
        let text_before = note.analyzable_text();

        if let Some(title) = patch.title {
            note.title = display_title(&title);
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(kind) = patch.kind {
            note.kind = kind;
        }
        if let Some(checklist) = patch.checklist {
            note.checklist = checklist;
        }
        if let Some(drawing_data) = patch.drawing_data {
            note.drawing_data = drawing_data;
        }
        if let Some(category) = patch.category {
            note.category = non_blank(category);
        }
        if let Some(labels) = patch.labels {
            note.labels = checked_labels(&labels)?;
        }
        if let Some(color) = patch.color {
            note.color = color;
        }
        if let Some(pinned) = patch.is_pinned {
            note.is_pinned = pinned;
        }
        if let Some(archived) = patch.is_archived {
            note.is_archived = archived;
        }
        if let Some(favorite) = patch.is_favorite {
            note.is_favorite = favorite;
        }
        if let Some(url) = patch.image_url {
            note.image_url = non_blank(url);
        }
        if let Some(url) = patch.audio_url {
            note.audio_url = non_blank(url);
        }
        if let Some(url) = patch.link_url {
            note.link_url = non_blank(url);
        }
        if let Some(text) = patch.link_text {
            note.link_text = non_blank(text);
        }
        if let Some(reminder_at) = patch.reminder_at {
            note.reminder_at = reminder_at;
        }

        let detection_switched_on = patch.mood_detection == Some(true) && !note.mood_detection;
        if let Some(enabled) = patch.mood_detection {
            note.mood_detection = enabled;
        }

        match patch.mood {
            Some(mood) => {
                note.set_mood(mood, MANUAL_MOOD_CONFIDENCE);
                note.mood_detection = false;
            }
            None => {
                if detection_switched_on || note.analyzable_text() != text_before {
                    detect_mood(&mut note);
                }
            }
        }

        note.touch();
        self.repo.update_note(&note)?;
        info!(
            "event=note_update module=service status=ok note_id={} mood={}",
            id,
            note.mood.map_or("none", Mood::as_str)
        );
        self.read_back(id, "updated note not found in read-back")
    }

    pub fn toggle_pin(&mut self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.mutate(id, Note::toggle_pin)
    }

    pub fn toggle_archive(&mut self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.mutate(id, Note::toggle_archive)
    }

    pub fn toggle_favorite(&mut self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.mutate(id, Note::toggle_favorite)
    }

    pub fn set_color(&mut self, id: NoteId, color: NoteColor) -> Result<Note, NoteServiceError> {
        self.mutate(id, |note| {
            note.color = color;
            note.touch();
        })
    }

    /// Sets or clears the mood manually and turns automatic detection off.
    pub fn set_mood(&mut self, id: NoteId, mood: Option<Mood>) -> Result<Note, NoteServiceError> {
        self.mutate(id, |note| {
            note.set_mood(mood, MANUAL_MOOD_CONFIDENCE);
            note.mood_detection = false;
            note.touch();
        })
    }

    /// Atomically replaces the full label set for one note.
    pub fn set_labels(&mut self, id: NoteId, labels: Vec<String>) -> Result<Note, NoteServiceError> {
        let normalized = checked_labels(&labels)?;
        self.repo.set_note_labels(id, &normalized)?;
        info!(
            "event=note_labels_set module=service status=ok note_id={} label_count={}",
            id,
            normalized.len()
        );
        self.read_back(id, "note missing after label replacement")
    }

    pub fn delete_note(&mut self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Gets one note by stable id.
    pub fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note(id)
    }

    /// Lists one page of notes in storage order.
    pub fn list_notes(
        &self,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<NotesListResult, NoteServiceError> {
        let applied_limit = normalize_note_limit(limit);
        let items = self.repo.list_notes(&NoteListQuery {
            limit: Some(applied_limit),
            offset,
        })?;
        Ok(NotesListResult {
            items,
            applied_limit,
        })
    }

    /// Loads every note and runs the filter/sort pipeline over it.
    pub fn query_notes(&self, query: &NoteQuery) -> Result<Vec<Note>, NoteServiceError> {
        let notes = self.repo.list_all_notes()?;
        let loaded = notes.len();
        let matched = filter_and_sort_notes(notes, query);
        info!(
            "event=note_query module=service status=ok sort={} loaded={} matched={}",
            query.sort.as_str(),
            loaded,
            matched.len()
        );
        Ok(matched)
    }

    /// Mood tracker counters over the whole collection.
    pub fn stats(&self) -> Result<NoteStats, NoteServiceError> {
        let notes = self.repo.list_all_notes()?;
        Ok(NoteStats::collect(&notes))
    }

    fn mutate(
        &mut self,
        id: NoteId,
        apply: impl FnOnce(&mut Note),
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.require_note(id)?;
        apply(&mut note);
        self.repo.update_note(&note)?;
        Ok(note)
    }

    fn require_note(&self, id: NoteId) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))
    }

    fn read_back(&self, id: NoteId, details: &'static str) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(details))
    }
}

/// Runs the classifier when detection is on and there is text to analyze.
///
/// Returns whether detection ran. A note whose text became blank loses its
/// detected mood.
fn detect_mood(note: &mut Note) -> bool {
    if !note.mood_detection {
        return false;
    }
    let text = note.analyzable_text();
    if text.trim().is_empty() {
        note.set_mood(None, 0.0);
        return false;
    }
    let analysis = classify_mood(&text);
    note.set_mood(Some(analysis.mood), analysis.confidence);
    true
}

fn display_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn checked_labels(labels: &[String]) -> Result<Vec<String>, NoteServiceError> {
    if let Some(blank) = labels.iter().find(|label| label.trim().is_empty()) {
        return Err(NoteServiceError::InvalidLabel(blank.clone()));
    }
    Ok(normalize_labels(labels))
}
