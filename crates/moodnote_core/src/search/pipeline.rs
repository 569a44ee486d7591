//! Filter/sort pipeline over a plain note list.
//!
//! # Responsibility
//! - Apply search text and structured filters with AND semantics.
//! - Sort by the selected key, then move pinned notes to the front.
//!
//! # Invariants
//! - Both sorting passes are stable, so equal keys keep input order.
//! - Pinned notes always precede unpinned notes.
//! - Running the pipeline on its own output returns the same list.
//! - An empty result is valid and not an error.

use crate::model::mood::Mood;
use crate::model::note::{Note, NoteColor, ParseEnumError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest `created_at` first.
    Created,
    /// Most recently modified first.
    #[default]
    Updated,
    /// Case-insensitive A-Z.
    Title,
    /// Mood name A-Z; notes without a mood go last.
    Mood,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Title => "title",
            Self::Mood => "mood",
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "created" | "date" => Ok(Self::Created),
            "updated" | "modified" => Ok(Self::Updated),
            "title" => Ok(Self::Title),
            "mood" => Ok(Self::Mood),
            _ => Err(ParseEnumError::new("sort key", value)),
        }
    }
}

/// Search text, structured filters and sort key for one pipeline run.
///
/// The default query shows every unarchived note, most recently updated first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    /// Case-insensitive substring over title, content, checklist and labels.
    pub search: String,
    pub mood: Option<Mood>,
    /// Case-insensitive exact match.
    pub category: Option<String>,
    /// Case-insensitive exact match against any label.
    pub label: Option<String>,
    pub color: Option<NoteColor>,
    pub has_reminder: bool,
    pub has_image: bool,
    pub has_audio: bool,
    pub favorites_only: bool,
    /// `false` shows the active view, `true` the archive.
    pub archived: bool,
    pub sort: SortKey,
}

impl NoteQuery {
    /// Default query with a search term.
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            ..Self::default()
        }
    }

    /// Returns whether `note` passes every predicate of this query.
    pub fn matches(&self, note: &Note) -> bool {
        self.matches_with_needle(note, &normalize_needle(&self.search))
    }

    fn matches_with_needle(&self, note: &Note, needle: &str) -> bool {
        if note.is_archived != self.archived {
            return false;
        }
        if self.favorites_only && !note.is_favorite {
            return false;
        }
        if self.has_reminder && !note.has_reminder() {
            return false;
        }
        if self.has_image && !note.has_image() {
            return false;
        }
        if self.has_audio && !note.has_audio() {
            return false;
        }
        if self.mood.is_some() && note.mood != self.mood {
            return false;
        }
        if self.color.is_some_and(|color| note.color != color) {
            return false;
        }
        if let Some(category) = self.category.as_deref() {
            let wanted = category.trim().to_lowercase();
            let matches = note
                .category
                .as_deref()
                .is_some_and(|value| value.trim().to_lowercase() == wanted);
            if !matches {
                return false;
            }
        }
        if let Some(label) = self.label.as_deref() {
            let wanted = label.trim().to_lowercase();
            if !note.labels.iter().any(|value| value.to_lowercase() == wanted) {
                return false;
            }
        }

        needle.is_empty() || text_matches(note, needle)
    }
}

/// Filters, sorts and partitions notes according to `query`.
pub fn filter_and_sort_notes(notes: Vec<Note>, query: &NoteQuery) -> Vec<Note> {
    let needle = normalize_needle(&query.search);
    let mut kept = notes
        .into_iter()
        .filter(|note| query.matches_with_needle(note, &needle))
        .collect::<Vec<_>>();

    kept.sort_by(|left, right| compare_notes(left, right, query.sort));
    kept.sort_by_key(|note| !note.is_pinned);
    kept
}

fn normalize_needle(search: &str) -> String {
    search.trim().to_lowercase()
}

fn text_matches(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle)
        || note.content.to_lowercase().contains(needle)
        || note
            .checklist
            .iter()
            .any(|item| item.text.to_lowercase().contains(needle))
        || note
            .labels
            .iter()
            .any(|label| label.to_lowercase().contains(needle))
}

fn compare_notes(left: &Note, right: &Note, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Created => right.created_at.cmp(&left.created_at),
        SortKey::Updated => right.updated_at.cmp(&left.updated_at),
        SortKey::Title => left.title.to_lowercase().cmp(&right.title.to_lowercase()),
        SortKey::Mood => match (left.mood, right.mood) {
            (Some(a), Some(b)) => a.as_str().cmp(b.as_str()),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_and_sort_notes, NoteQuery, SortKey};
    use crate::model::mood::Mood;
    use crate::model::note::{ChecklistItem, Note, NoteColor};

    fn note(title: &str, pinned: bool) -> Note {
        let mut note = Note::new(title, "");
        note.is_pinned = pinned;
        note
    }

    fn titles(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|note| note.title.as_str()).collect()
    }

    #[test]
    fn pinned_note_overrides_alphabetical_order() {
        let query = NoteQuery {
            sort: SortKey::Title,
            ..NoteQuery::default()
        };
        let sorted = filter_and_sort_notes(vec![note("A", false), note("B", true)], &query);
        assert_eq!(titles(&sorted), vec!["B", "A"]);
    }

    #[test]
    fn pinned_first_holds_for_every_sort_key() {
        for sort in [SortKey::Created, SortKey::Updated, SortKey::Title, SortKey::Mood] {
            let mut notes = Vec::new();
            for (idx, title) in ["delta", "Alpha", "charlie", "bravo"].iter().enumerate() {
                let mut item = note(title, idx % 2 == 1);
                item.created_at = idx as i64;
                item.updated_at = 10 - idx as i64;
                if idx == 0 {
                    item.set_mood(Some(Mood::Sad), 0.5);
                }
                notes.push(item);
            }
            let query = NoteQuery {
                sort,
                ..NoteQuery::default()
            };
            let sorted = filter_and_sort_notes(notes, &query);
            let first_unpinned = sorted.iter().position(|n| !n.is_pinned).unwrap();
            assert!(sorted[first_unpinned..].iter().all(|n| !n.is_pinned), "{sort}");
        }
    }

    #[test]
    fn search_matches_title_content_checklist_and_labels() {
        let by_title = Note::new("Groceries", "");
        let by_content = Note::new("x", "remember the GROCERIES");
        let mut by_checklist = Note::new("y", "");
        by_checklist.checklist.push(ChecklistItem::new("groceries run"));
        let mut by_label = Note::new("z", "");
        by_label.labels = vec!["groceries".to_string()];
        let miss = Note::new("unrelated", "nothing here");

        let found = filter_and_sort_notes(
            vec![by_title, by_content, by_checklist, by_label, miss],
            &NoteQuery::search("  groCeries "),
        );
        assert_eq!(found.len(), 4);
        assert!(found.iter().all(|note| note.title != "unrelated"));
    }

    #[test]
    fn archived_view_toggle_is_exclusive() {
        let active = note("active", false);
        let mut archived = note("archived", false);
        archived.is_archived = true;

        let active_view = filter_and_sort_notes(
            vec![active.clone(), archived.clone()],
            &NoteQuery::default(),
        );
        assert_eq!(titles(&active_view), vec!["active"]);

        let archive_view = filter_and_sort_notes(
            vec![active, archived],
            &NoteQuery {
                archived: true,
                ..NoteQuery::default()
            },
        );
        assert_eq!(titles(&archive_view), vec!["archived"]);
    }

    #[test]
    fn structured_filters_combine_with_and_semantics() {
        let mut target = Note::new("target", "");
        target.set_mood(Some(Mood::Calm), 0.6);
        target.color = NoteColor::Teal;
        target.category = Some("Work".to_string());
        target.labels = vec!["focus".to_string()];
        target.is_favorite = true;
        target.reminder_at = Some(1_700_000_000_000);
        target.image_url = Some("/uploads/images/a.png".to_string());
        target.audio_url = Some("/uploads/audio/a.mp3".to_string());

        let mut wrong_color = target.clone();
        wrong_color.title = "wrong color".to_string();
        wrong_color.color = NoteColor::Red;

        let mut no_audio = target.clone();
        no_audio.title = "no audio".to_string();
        no_audio.audio_url = None;

        let query = NoteQuery {
            mood: Some(Mood::Calm),
            category: Some("work".to_string()),
            label: Some("FOCUS".to_string()),
            color: Some(NoteColor::Teal),
            has_reminder: true,
            has_image: true,
            has_audio: true,
            favorites_only: true,
            ..NoteQuery::default()
        };
        let found = filter_and_sort_notes(vec![target, wrong_color, no_audio], &query);
        assert_eq!(titles(&found), vec!["target"]);
    }

    #[test]
    fn category_filter_folds_non_ascii_case() {
        let mut studies = note("studies", false);
        studies.category = Some("Études".to_string());
        let mut other = note("other", false);
        other.category = Some("Work".to_string());

        let query = NoteQuery {
            category: Some(" ÉTUDES ".to_string()),
            ..NoteQuery::default()
        };
        let found = filter_and_sort_notes(vec![studies.clone(), other], &query);
        assert_eq!(titles(&found), vec!["studies"]);

        let query = NoteQuery {
            category: Some("études".to_string()),
            ..NoteQuery::default()
        };
        assert!(query.matches(&studies));
    }

    #[test]
    fn mood_sort_places_unlabeled_notes_last() {
        let mut sad = note("sad", false);
        sad.set_mood(Some(Mood::Sad), 0.5);
        let mut calm = note("calm", false);
        calm.set_mood(Some(Mood::Calm), 0.5);
        let none = note("none", false);

        let query = NoteQuery {
            sort: SortKey::Mood,
            ..NoteQuery::default()
        };
        let sorted = filter_and_sort_notes(vec![none, sad, calm], &query);
        assert_eq!(titles(&sorted), vec!["calm", "sad", "none"]);
    }

    #[test]
    fn date_sorts_are_newest_first() {
        let mut old = note("old", false);
        old.created_at = 1;
        old.updated_at = 50;
        let mut new = note("new", false);
        new.created_at = 2;
        new.updated_at = 3;

        let by_created = filter_and_sort_notes(
            vec![old.clone(), new.clone()],
            &NoteQuery {
                sort: SortKey::Created,
                ..NoteQuery::default()
            },
        );
        assert_eq!(titles(&by_created), vec!["new", "old"]);

        let by_updated = filter_and_sort_notes(vec![new, old], &NoteQuery::default());
        assert_eq!(titles(&by_updated), vec!["old", "new"]);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let mut notes = Vec::new();
        for (idx, title) in ["b", "a", "c", "a", "d"].iter().enumerate() {
            let mut item = note(title, idx == 2 || idx == 3);
            item.content = "shared text".to_string();
            item.updated_at = (idx % 2) as i64;
            notes.push(item);
        }

        for sort in [SortKey::Title, SortKey::Updated, SortKey::Mood] {
            let query = NoteQuery {
                search: "shared".to_string(),
                sort,
                ..NoteQuery::default()
            };
            let once = filter_and_sort_notes(notes.clone(), &query);
            let twice = filter_and_sort_notes(once.clone(), &query);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn empty_result_is_valid() {
        let found = filter_and_sort_notes(vec![note("a", false)], &NoteQuery::search("zzz"));
        assert!(found.is_empty());
    }

    #[test]
    fn sort_key_parses_aliases() {
        assert_eq!("date".parse::<SortKey>().unwrap(), SortKey::Created);
        assert_eq!("Modified".parse::<SortKey>().unwrap(), SortKey::Updated);
        assert!("size".parse::<SortKey>().is_err());
    }
}
