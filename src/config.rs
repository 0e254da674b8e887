use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// How reference and spoken word sequences are paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentStrategy {
    /// Index-by-index pairing. A dropped or inserted word shifts every later
    /// pair, and tail words present on only one side are not reported.
    #[default]
    Positional,
    /// Levenshtein alignment over whole words; insertions and deletions are
    /// reported as mismatches with an empty side.
    EditDistance,
}

impl AlignmentStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positional => "positional",
            Self::EditDistance => "edit_distance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// CMUdict-format pronunciation file. Without one, phonemes fall back to
    /// whole words.
    pub dictionary_path: Option<String>,
    pub alignment: AlignmentStrategy,
    /// Mirror the "popular element" heuristic of the classic sequence matcher
    /// for phone strings of 200 characters or more.
    pub similarity_autojunk: bool,
}

impl ScoringConfig {
    pub const WORD_ACCURACY_WEIGHT: f64 = 0.6;
    pub const PHONEME_SIMILARITY_WEIGHT: f64 = 0.4;
    pub const FEEDBACK_MISMATCH_LIMIT: usize = 5;

    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ScoringError::io("read scoring config", e))?;
        serde_json::from_str(&data).map_err(|e| ScoringError::json("parse scoring config", e))
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            dictionary_path: None,
            alignment: AlignmentStrategy::Positional,
            similarity_autojunk: false,
        }
    }
}
