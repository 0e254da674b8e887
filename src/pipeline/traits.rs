use crate::error::ScoringError;
use crate::types::{AudioClip, ProsodyMetrics, WordAlignment};

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Pronunciation lookup for a single lowercase word.
///
/// Returns every known variant in the dictionary's own order, or an empty
/// list for an unknown word. Lookups never fail.
pub trait PronunciationDictionary: Send + Sync {
    fn pronunciations(&self, word: &str) -> Vec<Vec<String>>;
}

pub trait PhonemeMapper: Send + Sync {
    fn phonemes(&self, tokens: &[String]) -> Vec<String>;
}

pub trait WordAligner: Send + Sync {
    fn align(&self, reference: &[String], spoken: &[String]) -> WordAlignment;
}

/// Speech-to-text. Implementations return lowercase text.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, clip: &AudioClip) -> Result<String, ScoringError>;
}

pub trait ProsodyAnalyzer: Send + Sync {
    fn analyze(&self, clip: &AudioClip) -> Result<ProsodyMetrics, ScoringError>;
}
