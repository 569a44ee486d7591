//! Label model and normalization rules.
//!
//! # Invariants
//! - Label names are trimmed and lowercased before comparison or storage.
//! - A normalized label set is deduplicated and sorted.

use crate::model::note::{now_epoch_ms, NoteColor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Stable identifier for labels.
pub type LabelId = Uuid;

/// A user-defined tag with its own display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub color: NoteColor,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Label {
    /// Creates a label with a generated id.
    ///
    /// Returns `None` when `name` is blank after trimming.
    pub fn new(name: &str, color: NoteColor) -> Option<Self> {
        let name = normalize_label(name)?;
        Some(Self {
            id: Uuid::new_v4(),
            name,
            color,
            created_at: now_epoch_ms(),
        })
    }
}

/// Default color for labels created without one.
pub const DEFAULT_LABEL_COLOR: NoteColor = NoteColor::Blue;

/// Normalizes one label value.
pub fn normalize_label(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes, deduplicates and sorts label values. Blank values are dropped.
pub fn normalize_labels<S: AsRef<str>>(labels: &[S]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for label in labels {
        if let Some(value) = normalize_label(label.as_ref()) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::{normalize_labels, Label, DEFAULT_LABEL_COLOR};

    #[test]
    fn normalize_labels_dedupes_case_insensitively() {
        let labels = normalize_labels(&["Work", " IMPORTANT ", "work", "  "]);
        assert_eq!(labels, vec!["important".to_string(), "work".to_string()]);
    }

    #[test]
    fn label_new_rejects_blank_names() {
        assert!(Label::new("   ", DEFAULT_LABEL_COLOR).is_none());
        let label = Label::new(" Travel ", DEFAULT_LABEL_COLOR).unwrap();
        assert_eq!(label.name, "travel");
    }
}
