//! Keyword-based mood classifier.
//!
//! # Responsibility
//! - Score free text against fixed per-mood keyword tables.
//! - Report the winning mood with a saturating confidence value.
//!
//! # Invariants
//! - Pure and deterministic; the tables are compiled once per process.
//! - No keyword appears under two moods, and no keyword contains another
//!   mood's keyword, so text made only of one mood's keywords wins for it.
//! - Ties resolve to the mood listed first in the table.
//! - Text without any match yields `Mood::Neutral` at `MIN_CONFIDENCE`.

use crate::model::mood::Mood;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Confidence reported when no keyword matched.
pub const MIN_CONFIDENCE: f64 = 0.1;
/// Upper bound for any detected confidence.
pub const MAX_CONFIDENCE: f64 = 0.95;
/// Confidence gained per score point.
pub const CONFIDENCE_PER_POINT: f64 = 0.3;
/// Extra score per whole-word match of an alphabetic keyword.
pub const WHOLE_WORD_BONUS: f64 = 0.5;

const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (
        Mood::Happy,
        &[
            "happy", "amazing", "wonderful", "great", "awesome", "fantastic", "love",
            "delighted", "cheerful", "joy", "🥳", "✨", "🌈",
        ],
    ),
    (
        Mood::Sad,
        &[
            "sad", "depressed", "crying", "tears", "miserable", "heartbroken", "devastated",
            "gloomy", "sorrow", "💔", "🥀", "😢",
        ],
    ),
    (
        Mood::Angry,
        &[
            "angry", "furious", "mad", "rage", "irritated", "frustrated", "annoyed", "pissed",
            "hate", "😡", "🤬",
        ],
    ),
    (
        Mood::Anxious,
        &[
            "anxious", "worried", "nervous", "stressed", "panic", "fear", "scared",
            "overwhelmed", "uneasy", "😰", "😨",
        ],
    ),
    (
        Mood::Calm,
        &[
            "calm", "peaceful", "relaxed", "serene", "tranquil", "zen", "meditative", "quiet",
            "chill", "🧘", "🍃",
        ],
    ),
    (
        Mood::Excited,
        &[
            "excited", "pumped", "energetic", "enthusiastic", "hyped", "thrilled", "eager",
            "passionate", "🎉", "⚡", "🔥",
        ],
    ),
    (
        Mood::Grateful,
        &[
            "grateful", "thankful", "blessed", "appreciate", "gratitude", "fortunate", "lucky",
            "🙏", "💝", "🌻",
        ],
    ),
    (
        Mood::Confused,
        &[
            "confused", "lost", "uncertain", "unclear", "puzzled", "bewildered", "perplexed",
            "🤔", "❓", "🤷",
        ],
    ),
    (
        Mood::Tired,
        &[
            "tired", "exhausted", "sleepy", "weary", "drained", "fatigue", "worn out", "😴",
            "🥱",
        ],
    ),
    (
        Mood::Hopeful,
        &[
            "hopeful", "optimistic", "confident", "positive", "upbeat", "inspired", "motivated",
            "🌅", "🌟",
        ],
    ),
    (
        Mood::Neutral,
        &[
            "okay", "fine", "normal", "regular", "standard", "typical", "😐", "😑",
        ],
    ),
];

struct CompiledKeyword {
    text: &'static str,
    whole_word: Option<Regex>,
}

static COMPILED_TABLE: Lazy<Vec<(Mood, Vec<CompiledKeyword>)>> = Lazy::new(|| {
    MOOD_KEYWORDS
        .iter()
        .map(|(mood, keywords)| {
            let compiled = keywords
                .iter()
                .map(|keyword| CompiledKeyword {
                    text: keyword,
                    whole_word: is_wordlike(keyword).then(|| {
                        Regex::new(&format!(r"\b{}\b", regex::escape(keyword)))
                            .expect("valid keyword regex")
                    }),
                })
                .collect();
            (*mood, compiled)
        })
        .collect()
});

/// Result of one classifier run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodAnalysis {
    pub mood: Mood,
    /// Within `MIN_CONFIDENCE..=MAX_CONFIDENCE`.
    pub confidence: f64,
    /// Keywords of the winning mood found in the text, in table order.
    pub keywords: Vec<String>,
    /// Aggregate score for every mood.
    #[serde(rename = "emotions")]
    pub scores: BTreeMap<Mood, f64>,
}

impl MoodAnalysis {
    /// Whether any keyword matched at all.
    pub fn is_match(&self) -> bool {
        self.scores.get(&self.mood).copied().unwrap_or(0.0) > 0.0
    }
}

/// Returns the keyword table for one mood.
pub fn mood_keywords(mood: Mood) -> &'static [&'static str] {
    MOOD_KEYWORDS
        .iter()
        .find(|(candidate, _)| *candidate == mood)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

/// Classifies free text into a mood.
///
/// Scoring, on lowercased text: each keyword adds its substring occurrence
/// count, and alphabetic keywords add `WHOLE_WORD_BONUS` per whole-word
/// match. Confidence is `min(score * CONFIDENCE_PER_POINT, MAX_CONFIDENCE)`.
pub fn classify_mood(text: &str) -> MoodAnalysis {
    let content = text.to_lowercase();
    let mut scores = BTreeMap::new();
    let mut best = (Mood::default(), 0.0_f64);

    for (mood, keywords) in COMPILED_TABLE.iter() {
        let score = if content.trim().is_empty() {
            0.0
        } else {
            keywords
                .iter()
                .map(|keyword| keyword_score(&content, keyword))
                .sum()
        };
        scores.insert(*mood, score);
        if score > best.1 {
            best = (*mood, score);
        }
    }

    let (mood, score) = best;
    if score <= 0.0 {
        return MoodAnalysis {
            mood,
            confidence: MIN_CONFIDENCE,
            keywords: Vec::new(),
            scores,
        };
    }

    let keywords = mood_keywords(mood)
        .iter()
        .filter(|keyword| content.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect();

    MoodAnalysis {
        mood,
        confidence: (score * CONFIDENCE_PER_POINT).min(MAX_CONFIDENCE),
        keywords,
        scores,
    }
}

fn keyword_score(content: &str, keyword: &CompiledKeyword) -> f64 {
    let occurrences = content.matches(keyword.text).count();
    if occurrences == 0 {
        return 0.0;
    }

    let whole_words = keyword
        .whole_word
        .as_ref()
        .map_or(0, |re| re.find_iter(content).count());
    occurrences as f64 + whole_words as f64 * WHOLE_WORD_BONUS
}

fn is_wordlike(keyword: &str) -> bool {
    keyword
        .chars()
        .all(|ch| ch.is_alphabetic() || ch == ' ')
}
