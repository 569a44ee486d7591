//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record used by storage, filters and the client.
//! - Provide toggle/edit helpers that keep timestamps consistent.
//!
//! # Invariants
//! - `id` is stable, never nil, and never reused for another note.
//! - A note carries at most one mood; `mood_confidence` is set iff `mood` is.
//! - `mood_confidence` stays within `0.0..=1.0`.
//! - Labels are normalized (trimmed, lowercase), unique and sorted.
//! - `updated_at >= created_at`.

use crate::model::label::normalize_label;
use crate::model::mood::Mood;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for notes.
pub type NoteId = Uuid;

/// Title given to notes submitted with a blank title.
pub const UNTITLED: &str = "Untitled";

/// Returns the current wall clock in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

/// Error for unknown enum names coming from storage, CLI or wire input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }

    /// Enum family that failed to parse (`mood`, `color`, `note kind`).
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl Display for ParseEnumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.value)
    }
}

impl Error for ParseEnumError {}

/// Card color of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteColor {
    #[default]
    White,
    Yellow,
    Green,
    Blue,
    Pink,
    Purple,
    Orange,
    Red,
    Teal,
    Gray,
    Indigo,
    Rose,
}

impl NoteColor {
    pub const ALL: [NoteColor; 12] = [
        NoteColor::White,
        NoteColor::Yellow,
        NoteColor::Green,
        NoteColor::Blue,
        NoteColor::Pink,
        NoteColor::Purple,
        NoteColor::Orange,
        NoteColor::Red,
        NoteColor::Teal,
        NoteColor::Gray,
        NoteColor::Indigo,
        NoteColor::Rose,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Pink => "pink",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Teal => "teal",
            Self::Gray => "gray",
            Self::Indigo => "indigo",
            Self::Rose => "rose",
        }
    }
}

impl Display for NoteColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteColor {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == normalized)
            .ok_or_else(|| ParseEnumError::new("color", value))
    }
}

/// Payload family of a note body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// Plain or markdown-ish text in `content`.
    #[default]
    Text,
    /// Ordered `checklist` items; `content` is optional free text.
    Checklist,
    /// Opaque `drawing_data` payload.
    Drawing,
}

impl NoteKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Checklist => "checklist",
            Self::Drawing => "drawing",
        }
    }
}

impl Display for NoteKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteKind {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "checklist" => Ok(Self::Checklist),
            "drawing" => Ok(Self::Drawing),
            _ => Err(ParseEnumError::new("note kind", value)),
        }
    }
}

/// One checklist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// Validation failures for [`Note`] invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteValidationError {
    NilId,
    MoodConfidenceOutOfRange(f64),
    ConfidenceWithoutMood,
    BlankLabel,
    UnnormalizedLabel(String),
    UnsortedOrDuplicateLabels,
    TimestampOrder { created_at: i64, updated_at: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "note id must not be nil"),
            Self::MoodConfidenceOutOfRange(value) => {
                write!(f, "mood_confidence ({value}) must be within 0.0..=1.0")
            }
            Self::ConfidenceWithoutMood => {
                write!(f, "mood_confidence must be empty when mood is empty")
            }
            Self::BlankLabel => write!(f, "labels must not be blank"),
            Self::UnnormalizedLabel(label) => {
                write!(f, "label `{label}` is not normalized")
            }
            Self::UnsortedOrDuplicateLabels => {
                write!(f, "labels must be unique and sorted")
            }
            Self::TimestampOrder {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNote")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub kind: NoteKind,
    pub checklist: Vec<ChecklistItem>,
    pub drawing_data: Option<String>,
    pub mood: Option<Mood>,
    pub mood_confidence: Option<f64>,
    /// Whether saving content re-runs mood detection.
    pub mood_detection: bool,
    pub category: Option<String>,
    pub labels: Vec<String>,
    pub color: NoteColor,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub is_favorite: bool,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    /// Unix epoch milliseconds.
    pub reminder_at: Option<i64>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Always >= `created_at`.
    pub updated_at: i64,
}

impl Note {
    /// Creates a text note with a generated id and current timestamps.
    ///
    /// Mood detection starts enabled; everything optional starts empty.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            kind: NoteKind::Text,
            checklist: Vec::new(),
            drawing_data: None,
            mood: None,
            mood_confidence: None,
            mood_detection: true,
            category: None,
            labels: Vec::new(),
            color: NoteColor::default(),
            is_pinned: false,
            is_archived: false,
            is_favorite: false,
            image_url: None,
            audio_url: None,
            link_url: None,
            link_text: None,
            reminder_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a note with a caller-provided stable id.
    ///
    /// Used by import paths where identity already exists externally.
    ///
    /// # Errors
    /// - Returns [`NoteValidationError::NilId`] for the nil UUID.
    pub fn with_id(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, NoteValidationError> {
        if id.is_nil() {
            return Err(NoteValidationError::NilId);
        }
        let mut note = Self::new(title, content);
        note.id = id;
        Ok(note)
    }

    /// Checks every model invariant.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.is_nil() {
            return Err(NoteValidationError::NilId);
        }

        match (self.mood, self.mood_confidence) {
            (None, Some(_)) => return Err(NoteValidationError::ConfidenceWithoutMood),
            (_, Some(value)) if !(0.0..=1.0).contains(&value) => {
                return Err(NoteValidationError::MoodConfidenceOutOfRange(value));
            }
            _ => {}
        }

        for label in &self.labels {
            match normalize_label(label) {
                None => return Err(NoteValidationError::BlankLabel),
                Some(normalized) if normalized != *label => {
                    return Err(NoteValidationError::UnnormalizedLabel(label.clone()));
                }
                Some(_) => {}
            }
        }
        if self.labels.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(NoteValidationError::UnsortedOrDuplicateLabels);
        }

        if self.updated_at < self.created_at {
            return Err(NoteValidationError::TimestampOrder {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }

        Ok(())
    }

    /// Advances `updated_at` to now, never moving it before `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = now_epoch_ms().max(self.created_at).max(self.updated_at);
    }

    pub fn toggle_pin(&mut self) {
        self.is_pinned = !self.is_pinned;
        self.touch();
    }

    pub fn toggle_archive(&mut self) {
        self.is_archived = !self.is_archived;
        self.touch();
    }

    pub fn toggle_favorite(&mut self) {
        self.is_favorite = !self.is_favorite;
        self.touch();
    }

    /// Replaces the mood pair. Confidence is clamped into `0.0..=1.0`.
    pub fn set_mood(&mut self, mood: Option<Mood>, confidence: f64) {
        self.mood = mood;
        self.mood_confidence = mood.map(|_| confidence.clamp(0.0, 1.0));
    }

    pub fn has_reminder(&self) -> bool {
        self.reminder_at.is_some()
    }

    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    pub fn has_audio(&self) -> bool {
        self.audio_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    /// Returns `(completed, total)` checklist counts.
    pub fn checklist_progress(&self) -> (usize, usize) {
        let done = self.checklist.iter().filter(|item| item.completed).count();
        (done, self.checklist.len())
    }

    /// Text fed to mood detection: content plus checklist item text.
    pub fn analyzable_text(&self) -> String {
        let mut text = self.content.clone();
        for item in &self.checklist {
            text.push('\n');
            text.push_str(&item.text);
        }
        text
    }
}

#[derive(Deserialize)]
struct RawNote {
    id: NoteId,
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    kind: NoteKind,
    #[serde(default)]
    checklist: Vec<ChecklistItem>,
    #[serde(default)]
    drawing_data: Option<String>,
    #[serde(default)]
    mood: Option<Mood>,
    #[serde(default)]
    mood_confidence: Option<f64>,
    #[serde(default)]
    mood_detection: bool,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    color: NoteColor,
    #[serde(default)]
    is_pinned: bool,
    #[serde(default)]
    is_archived: bool,
    #[serde(default)]
    is_favorite: bool,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    audio_url: Option<String>,
    #[serde(default)]
    link_url: Option<String>,
    #[serde(default)]
    link_text: Option<String>,
    #[serde(default)]
    reminder_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<RawNote> for Note {
    type Error = NoteValidationError;

    fn try_from(raw: RawNote) -> Result<Self, Self::Error> {
        let note = Note {
            id: raw.id,
            title: raw.title,
            content: raw.content,
            kind: raw.kind,
            checklist: raw.checklist,
            drawing_data: raw.drawing_data,
            mood: raw.mood,
            mood_confidence: raw.mood_confidence,
            mood_detection: raw.mood_detection,
            category: raw.category,
            labels: raw.labels,
            color: raw.color,
            is_pinned: raw.is_pinned,
            is_archived: raw.is_archived,
            is_favorite: raw.is_favorite,
            image_url: raw.image_url,
            audio_url: raw.audio_url,
            link_url: raw.link_url,
            link_text: raw.link_text,
            reminder_at: raw.reminder_at,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        };
        note.validate()?;
        Ok(note)
    }
}
