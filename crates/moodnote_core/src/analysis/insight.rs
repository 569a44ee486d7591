//! Lightweight text insights and collection statistics.
//!
//! # Responsibility
//! - Extract key themes and bullet summaries from note text.
//! - Aggregate mood/flag counters over a note collection.

use crate::model::mood::Mood;
use crate::model::note::Note;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

const MAX_KEYWORDS: usize = 5;
const SUMMARY_THEMES: usize = 3;
const MIN_SENTENCE_CHARS: usize = 10;
const EMPTY_SUMMARY: &str = "• Brief note entry";

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "a", "an",
    "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can", "i", "you", "he", "she", "it",
    "we", "they", "me", "him", "her", "us", "them", "my", "your", "his", "its", "our", "their",
];

/// Returns up to five distinct theme words in first-seen order.
///
/// Words are lowercased, split on whitespace, and kept only when longer than
/// three characters and not a stop word.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    lowered
        .split_whitespace()
        .filter(|word| word.chars().count() > 3 && !STOP_WORDS.contains(word))
        .filter(|word| seen.insert(*word))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// Builds a short bullet summary of `text`.
///
/// The first sentence longer than ten characters becomes the first bullet,
/// up to three key themes the second.
pub fn summarize(text: &str) -> String {
    let mut summary = String::new();

    if let Some(sentence) = text
        .split('.')
        .map(str::trim)
        .find(|sentence| sentence.chars().count() > MIN_SENTENCE_CHARS)
    {
        summary.push_str("• ");
        summary.push_str(sentence);
        summary.push('\n');
    }

    let keywords = extract_keywords(text);
    if !keywords.is_empty() {
        let themes = keywords
            .iter()
            .take(SUMMARY_THEMES)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        summary.push_str("• Key themes: ");
        summary.push_str(&themes);
        summary.push('\n');
    }

    if summary.is_empty() {
        EMPTY_SUMMARY.to_string()
    } else {
        summary
    }
}

/// Counters shown by the dashboard and mood tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteStats {
    pub total: usize,
    pub pinned: usize,
    pub archived: usize,
    pub favorites: usize,
    /// Notes that carry any mood.
    pub mood_tagged: usize,
    pub by_mood: BTreeMap<Mood, usize>,
}

impl NoteStats {
    pub fn collect<'a>(notes: impl IntoIterator<Item = &'a Note>) -> Self {
        let mut stats = Self::default();
        for note in notes {
            stats.total += 1;
            stats.pinned += usize::from(note.is_pinned);
            stats.archived += usize::from(note.is_archived);
            stats.favorites += usize::from(note.is_favorite);
            if let Some(mood) = note.mood {
                stats.mood_tagged += 1;
                *stats.by_mood.entry(mood).or_insert(0) += 1;
            }
        }
        stats
    }

    /// Most frequent mood; ties go to the mood declared first.
    pub fn dominant_mood(&self) -> Option<Mood> {
        let mut best: Option<(Mood, usize)> = None;
        for (mood, count) in &self.by_mood {
            if best.map_or(true, |(_, top)| *count > top) {
                best = Some((*mood, *count));
            }
        }
        best.map(|(mood, _)| mood)
    }
}
