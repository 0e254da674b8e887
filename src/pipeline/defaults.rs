use crate::audio::analyze_prosody;
use crate::error::ScoringError;
use crate::pipeline::traits::{
    PhonemeMapper, PronunciationDictionary, ProsodyAnalyzer, Tokenizer, Transcriber, WordAligner,
};
use crate::scoring::phonemes::{phones_for_tokens, word_units};
use crate::scoring::tokenization::tokenize;
use crate::scoring::word_alignment::{align_edit_distance, align_positional};
use crate::types::{AudioClip, ProsodyMetrics, WordAlignment};

pub struct WordBoundaryTokenizer;

impl Tokenizer for WordBoundaryTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        tokenize(text)
    }
}

/// Dictionary phones with the per-character fallback for unknown words.
pub struct DictionaryPhonemeMapper {
    dictionary: Box<dyn PronunciationDictionary>,
}

impl DictionaryPhonemeMapper {
    pub fn new(dictionary: Box<dyn PronunciationDictionary>) -> Self {
        Self { dictionary }
    }
}

impl PhonemeMapper for DictionaryPhonemeMapper {
    fn phonemes(&self, tokens: &[String]) -> Vec<String> {
        phones_for_tokens(tokens, self.dictionary.as_ref())
    }
}

/// Words-only mode: every token is its own unit.
pub struct WordUnitPhonemeMapper;

impl PhonemeMapper for WordUnitPhonemeMapper {
    fn phonemes(&self, tokens: &[String]) -> Vec<String> {
        word_units(tokens)
    }
}

pub struct PositionalWordAligner;

impl WordAligner for PositionalWordAligner {
    fn align(&self, reference: &[String], spoken: &[String]) -> WordAlignment {
        align_positional(reference, spoken)
    }
}

pub struct EditDistanceWordAligner;

impl WordAligner for EditDistanceWordAligner {
    fn align(&self, reference: &[String], spoken: &[String]) -> WordAlignment {
        align_edit_distance(reference, spoken)
    }
}

/// Stand-in when no speech-to-text engine is wired in.
pub struct UnavailableTranscriber;

impl Transcriber for UnavailableTranscriber {
    fn transcribe(&self, _clip: &AudioClip) -> Result<String, ScoringError> {
        Err(ScoringError::unavailable("speech-to-text"))
    }
}

pub struct EnergyProsodyAnalyzer;

impl ProsodyAnalyzer for EnergyProsodyAnalyzer {
    fn analyze(&self, clip: &AudioClip) -> Result<ProsodyMetrics, ScoringError> {
        analyze_prosody(clip)
    }
}
