//! Backend request/response bodies and their mapping onto core types.
//!
//! # Invariants
//! - Field names are the backend's snake_case names.
//! - Optional request fields are omitted, not sent as `null`, so partial
//!   updates only touch what was set.
//! - A remote integer id always maps to the same non-nil [`NoteId`].

use crate::error::{ClientError, ClientResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use moodnote_core::model::label::DEFAULT_LABEL_COLOR;
use moodnote_core::{
    normalize_labels, ChecklistItem, Label, LabelId, Mood, Note, NoteColor, NoteId, NoteKind,
};
use serde::{Deserialize, Serialize};

/// High half of UUIDs derived from remote ids (`moodnote` in ASCII).
const REMOTE_ID_NAMESPACE: u64 = 0x6d6f_6f64_6e6f_7465;

/// Maps a backend integer id onto a stable core id.
pub fn remote_note_id(id: i64) -> NoteId {
    NoteId::from_u64_pair(REMOTE_ID_NAMESPACE, id as u64)
}

/// Parses backend datetimes into epoch milliseconds.
///
/// Accepts RFC 3339 and naive ISO datetimes; naive values are read as UTC.
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.timestamp_millis());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc().timestamp_millis())
}

fn epoch_ms_to_datetime(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub access_token: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub new_password: &'a str,
}

/// Plain `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: Option<String>,
    pub database: Option<String>,
    pub version: Option<String>,
}

/// Body of `POST /notes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub note_type: String,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_items: Option<Vec<ChecklistItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawing_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl From<&Note> for NoteCreate {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: Some(note.content.clone()).filter(|content| !content.is_empty()),
            note_type: note.kind.as_str().to_string(),
            is_pinned: note.is_pinned,
            is_archived: note.is_archived,
            color: note.color.as_str().to_string(),
            checklist_items: Some(note.checklist.clone()).filter(|items| !items.is_empty()),
            image_url: note.image_url.clone(),
            audio_url: note.audio_url.clone(),
            drawing_data: note.drawing_data.clone(),
            reminder_time: note.reminder_at.and_then(epoch_ms_to_datetime),
            link_url: note.link_url.clone(),
            link_text: note.link_text.clone(),
            labels: Some(note.labels.clone()).filter(|labels| !labels.is_empty()),
        }
    }
}

/// Body of `PUT /notes/{id}`. Unset fields are left alone by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_items: Option<Vec<ChecklistItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawing_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl From<&Note> for NoteUpdate {
    /// Full snapshot of `note`, detected mood included.
    fn from(note: &Note) -> Self {
        let create = NoteCreate::from(note);
        Self {
            title: Some(create.title),
            content: Some(note.content.clone()),
            note_type: Some(create.note_type),
            is_pinned: Some(create.is_pinned),
            is_archived: Some(create.is_archived),
            color: Some(create.color),
            checklist_items: Some(note.checklist.clone()),
            image_url: create.image_url,
            audio_url: create.audio_url,
            drawing_data: create.drawing_data,
            reminder_time: create.reminder_time,
            detected_mood: note.mood.map(|mood| mood.as_str().to_string()),
            mood_confidence: note.mood_confidence,
            link_url: create.link_url,
            link_text: create.link_text,
            labels: Some(note.labels.clone()),
        }
    }
}

/// Note as returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub note_type: String,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub color: String,
    pub checklist_items: Option<Vec<ChecklistItem>>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>,
    pub drawing_data: Option<String>,
    pub reminder_time: Option<String>,
    pub detected_mood: Option<String>,
    pub mood_confidence: Option<f64>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub labels: Option<Vec<String>>,
    pub user_id: i64,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl NoteResponse {
    /// Converts into a core note.
    ///
    /// Unknown color and note type names fall back to the defaults; an
    /// unknown mood name is dropped together with its confidence.
    ///
    /// # Errors
    /// - [`ClientError::InvalidResponse`] for unparseable timestamps or a
    ///   record that breaks note invariants.
    pub fn into_note(self) -> ClientResult<Note> {
        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| {
            ClientError::InvalidResponse(format!(
                "note {} created_at `{}`",
                self.id, self.created_at
            ))
        })?;
        let updated_at = match self.updated_at.as_deref() {
            Some(value) => parse_timestamp(value).ok_or_else(|| {
                ClientError::InvalidResponse(format!("note {} updated_at `{value}`", self.id))
            })?,
            None => created_at,
        };
        let mood = self
            .detected_mood
            .as_deref()
            .and_then(|value| value.parse::<Mood>().ok());

        let mut note = Note::new(self.title, self.content.unwrap_or_default());
        note.id = remote_note_id(self.id);
        note.kind = self.note_type.parse::<NoteKind>().unwrap_or_default();
        note.checklist = self.checklist_items.unwrap_or_default();
        note.drawing_data = self.drawing_data;
        note.set_mood(mood, self.mood_confidence.unwrap_or(0.0));
        note.labels = normalize_labels(&self.labels.unwrap_or_default());
        note.color = self.color.parse::<NoteColor>().unwrap_or_default();
        note.is_pinned = self.is_pinned;
        note.is_archived = self.is_archived;
        note.image_url = self.image_url;
        note.audio_url = self.audio_url;
        note.link_url = self.link_url;
        note.link_text = self.link_text;
        note.reminder_at = self.reminder_time.as_deref().and_then(parse_timestamp);
        note.created_at = created_at;
        note.updated_at = updated_at.max(created_at);

        note.validate()
            .map_err(|err| ClientError::InvalidResponse(err.to_string()))?;
        Ok(note)
    }
}

/// Body of `POST /labels`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCreate {
    pub name: String,
    pub color: String,
}

impl LabelCreate {
    /// `color` defaults to blue.
    pub fn new(name: impl Into<String>, color: Option<NoteColor>) -> Self {
        Self {
            name: name.into(),
            color: color.unwrap_or(DEFAULT_LABEL_COLOR).as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelResponse {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub user_id: i64,
    pub created_at: String,
}

impl LabelResponse {
    pub fn into_label(self) -> ClientResult<Label> {
        let created_at = parse_timestamp(&self.created_at).ok_or_else(|| {
            ClientError::InvalidResponse(format!(
                "label {} created_at `{}`",
                self.id, self.created_at
            ))
        })?;
        let color = self
            .color
            .parse::<NoteColor>()
            .unwrap_or(DEFAULT_LABEL_COLOR);
        let mut label = Label::new(&self.name, color).ok_or_else(|| {
            ClientError::InvalidResponse(format!("label {} has a blank name", self.id))
        })?;
        label.id = LabelId::from_u64_pair(REMOTE_ID_NAMESPACE, self.id as u64);
        label.created_at = created_at;
        Ok(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkPreview {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub site_name: Option<String>,
}

/// Upload result. The backend always sends `file_url`; the rest is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileUploadResponse {
    pub file_url: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
}
