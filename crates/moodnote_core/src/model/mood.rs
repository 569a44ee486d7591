//! Mood enumeration shared by notes, filters and the classifier.
//!
//! # Invariants
//! - `Mood::ALL` order is the tie-break order used by mood detection.
//! - Wire form is the lowercase mood name.

use crate::model::note::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Mood label assigned to a note, either detected or set by the user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Anxious,
    Calm,
    Excited,
    Grateful,
    Confused,
    Tired,
    Hopeful,
    /// Fallback when nothing in the text points anywhere else.
    #[default]
    Neutral,
}

impl Mood {
    /// Every mood in classifier table order.
    pub const ALL: [Mood; 11] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Anxious,
        Mood::Calm,
        Mood::Excited,
        Mood::Grateful,
        Mood::Confused,
        Mood::Tired,
        Mood::Hopeful,
        Mood::Neutral,
    ];

    /// Stable lowercase name used for storage and wire payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Anxious => "anxious",
            Self::Calm => "calm",
            Self::Excited => "excited",
            Self::Grateful => "grateful",
            Self::Confused => "confused",
            Self::Tired => "tired",
            Self::Hopeful => "hopeful",
            Self::Neutral => "neutral",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Sad => "😢",
            Self::Angry => "😡",
            Self::Anxious => "😰",
            Self::Calm => "😌",
            Self::Excited => "🤩",
            Self::Grateful => "🙏",
            Self::Confused => "🤔",
            Self::Tired => "😴",
            Self::Hopeful => "🌟",
            Self::Neutral => "😐",
        }
    }

    /// Capitalized display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Angry => "Angry",
            Self::Anxious => "Anxious",
            Self::Calm => "Calm",
            Self::Excited => "Excited",
            Self::Grateful => "Grateful",
            Self::Confused => "Confused",
            Self::Tired => "Tired",
            Self::Hopeful => "Hopeful",
            Self::Neutral => "Neutral",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str() == normalized)
            .ok_or_else(|| ParseEnumError::new("mood", value))
    }
}

#[cfg(test)]
mod tests {
    use super::Mood;

    #[test]
    fn parse_accepts_any_case_and_rejects_unknown() {
        assert_eq!("Calm".parse::<Mood>().unwrap(), Mood::Calm);
        assert_eq!(" HOPEFUL ".parse::<Mood>().unwrap(), Mood::Hopeful);
        assert!("peaceful".parse::<Mood>().is_err());
    }

    #[test]
    fn default_is_neutral() {
        assert_eq!(Mood::default(), Mood::Neutral);
    }

    #[test]
    fn display_matches_wire_name() {
        for mood in Mood::ALL {
            let json = serde_json::to_value(mood).unwrap();
            assert_eq!(json, mood.to_string());
        }
    }
}
