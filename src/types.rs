use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// A reference/spoken word pair that did not match.
///
/// An empty `expected` or `spoken` marks a word absent on that side; only the
/// edit-distance aligner produces those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordMismatch {
    pub expected: String,
    pub spoken: String,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordAlignment {
    pub matches: usize,
    pub mismatches: Vec<WordMismatch>,
}

/// Outcome of scoring one spoken utterance against its reference sentence.
///
/// All scores are percentages in `[0, 100]` rounded to one decimal.
/// `correct_words <= word_count` always holds, and `word_accuracy` is zero when
/// the reference has no words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoreResultRecord")]
pub struct ScoreResult {
    overall_score: f64,
    word_accuracy: f64,
    phoneme_similarity: f64,
    mispronounced_words: Vec<WordMismatch>,
    word_count: usize,
    correct_words: usize,
}

#[derive(Deserialize)]
struct ScoreResultRecord {
    overall_score: f64,
    word_accuracy: f64,
    phoneme_similarity: f64,
    #[serde(default)]
    mispronounced_words: Vec<WordMismatch>,
    word_count: usize,
    correct_words: usize,
}

impl TryFrom<ScoreResultRecord> for ScoreResult {
    type Error = ScoringError;

    fn try_from(record: ScoreResultRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.overall_score,
            record.word_accuracy,
            record.phoneme_similarity,
            record.mispronounced_words,
            record.word_count,
            record.correct_words,
        )
    }
}

impl ScoreResult {
    /// Builds a result from externally supplied values, validating every field.
    pub fn new(
        overall_score: f64,
        word_accuracy: f64,
        phoneme_similarity: f64,
        mispronounced_words: Vec<WordMismatch>,
        word_count: usize,
        correct_words: usize,
    ) -> Result<Self, ScoringError> {
        check_percentage("overall_score", overall_score)?;
        check_percentage("word_accuracy", word_accuracy)?;
        check_percentage("phoneme_similarity", phoneme_similarity)?;
        if correct_words > word_count {
            return Err(ScoringError::invalid_input(format!(
                "correct_words ({correct_words}) exceeds word_count ({word_count})"
            )));
        }
        if word_count == 0 && word_accuracy != 0.0 {
            return Err(ScoringError::invalid_input(format!(
                "word_accuracy must be 0 for an empty reference, got {word_accuracy}"
            )));
        }
        Ok(Self::from_parts(
            overall_score,
            word_accuracy,
            phoneme_similarity,
            mispronounced_words,
            word_count,
            correct_words,
        ))
    }

    pub(crate) fn from_parts(
        overall_score: f64,
        word_accuracy: f64,
        phoneme_similarity: f64,
        mispronounced_words: Vec<WordMismatch>,
        word_count: usize,
        correct_words: usize,
    ) -> Self {
        debug_assert!(correct_words <= word_count);
        Self {
            overall_score,
            word_accuracy,
            phoneme_similarity,
            mispronounced_words,
            word_count,
            correct_words,
        }
    }

    pub fn overall_score(&self) -> f64 {
        self.overall_score
    }

    pub fn word_accuracy(&self) -> f64 {
        self.word_accuracy
    }

    pub fn phoneme_similarity(&self) -> f64 {
        self.phoneme_similarity
    }

    pub fn mispronounced_words(&self) -> &[WordMismatch] {
        &self.mispronounced_words
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn correct_words(&self) -> usize {
        self.correct_words
    }
}

fn check_percentage(field: &str, value: f64) -> Result<(), ScoringError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ScoringError::invalid_input(format!(
            "{field} must be a finite percentage in [0, 100], got {value}"
        )));
    }
    Ok(())
}

/// Rhythm and intonation measurements of a spoken clip.
///
/// The all-zero value means "not measured"; it is what analyzers report when
/// audio analysis is unavailable or fails.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ProsodyRecord")]
pub struct ProsodyMetrics {
    /// Estimated syllable-like energy peaks per second.
    speaking_rate: f64,
    /// Standard deviation of the fundamental frequency, in Hz.
    pitch_variation: f64,
    /// Standard deviation of frame RMS energy.
    energy_variation: f64,
}

#[derive(Deserialize)]
struct ProsodyRecord {
    #[serde(default)]
    speaking_rate: f64,
    #[serde(default)]
    pitch_variation: f64,
    #[serde(default)]
    energy_variation: f64,
}

impl TryFrom<ProsodyRecord> for ProsodyMetrics {
    type Error = ScoringError;

    fn try_from(record: ProsodyRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.speaking_rate,
            record.pitch_variation,
            record.energy_variation,
        )
    }
}

impl ProsodyMetrics {
    pub fn new(
        speaking_rate: f64,
        pitch_variation: f64,
        energy_variation: f64,
    ) -> Result<Self, ScoringError> {
        for (field, value) in [
            ("speaking_rate", speaking_rate),
            ("pitch_variation", pitch_variation),
            ("energy_variation", energy_variation),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::invalid_input(format!(
                    "{field} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(Self {
            speaking_rate,
            pitch_variation,
            energy_variation,
        })
    }

    pub const fn unavailable() -> Self {
        Self {
            speaking_rate: 0.0,
            pitch_variation: 0.0,
            energy_variation: 0.0,
        }
    }

    /// A zero speaking rate is the "not measured" sentinel, never a real rate.
    pub fn is_measured(&self) -> bool {
        self.speaking_rate > 0.0
    }

    pub fn speaking_rate(&self) -> f64 {
        self.speaking_rate
    }

    pub fn pitch_variation(&self) -> f64 {
        self.pitch_variation
    }

    pub fn energy_variation(&self) -> f64 {
        self.energy_variation
    }
}

/// Mono PCM audio handed to the speech-to-text and prosody collaborators.
#[derive(Debug, Clone, Default)]
pub struct AudioClip {
    pub sample_rate_hz: u32,
    pub samples: Vec<f32>,
}

impl AudioClip {
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate_hz == 0 {
            return 0;
        }
        ((self.samples.len() as u128) * 1000 / self.sample_rate_hz as u128) as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub analyze_prosody: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            analyze_prosody: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullAnalysis {
    pub spoken_text: String,
    pub reference_text: String,
    pub pronunciation: ScoreResult,
    /// `None` when prosody analysis was not requested.
    pub prosody: Option<ProsodyMetrics>,
    pub feedback: String,
}
