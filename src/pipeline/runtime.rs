use crate::config::AlignmentStrategy;
use crate::pipeline::traits::{PhonemeMapper, ProsodyAnalyzer, Tokenizer, Transcriber, WordAligner};
use crate::scoring::aggregate::{aggregate, round1};
use crate::scoring::feedback::{generate_feedback, Feedback};
use crate::scoring::similarity::SimilarityScorer;
use crate::scoring::word_alignment::word_accuracy;
use crate::types::{AnalysisOptions, AudioClip, FullAnalysis, ProsodyMetrics, ScoreResult};

/// Scores spoken text against a reference sentence.
///
/// Built by [`crate::PronunciationScorerBuilder`]. Scoring never fails:
/// collaborator errors are logged and replaced by empty transcripts or
/// unmeasured prosody.
pub struct PronunciationScorer {
    tokenizer: Box<dyn Tokenizer>,
    phoneme_mapper: Box<dyn PhonemeMapper>,
    word_aligner: Box<dyn WordAligner>,
    transcriber: Box<dyn Transcriber>,
    prosody_analyzer: Box<dyn ProsodyAnalyzer>,
    similarity: SimilarityScorer,
    dictionary_label: String,
    alignment_strategy: AlignmentStrategy,
}

pub(crate) struct PronunciationScorerParts {
    pub tokenizer: Box<dyn Tokenizer>,
    pub phoneme_mapper: Box<dyn PhonemeMapper>,
    pub word_aligner: Box<dyn WordAligner>,
    pub transcriber: Box<dyn Transcriber>,
    pub prosody_analyzer: Box<dyn ProsodyAnalyzer>,
    pub similarity: SimilarityScorer,
    pub dictionary_label: String,
    pub alignment_strategy: AlignmentStrategy,
}

impl PronunciationScorer {
    pub(crate) fn from_parts(parts: PronunciationScorerParts) -> Self {
        Self {
            tokenizer: parts.tokenizer,
            phoneme_mapper: parts.phoneme_mapper,
            word_aligner: parts.word_aligner,
            transcriber: parts.transcriber,
            prosody_analyzer: parts.prosody_analyzer,
            similarity: parts.similarity,
            dictionary_label: parts.dictionary_label,
            alignment_strategy: parts.alignment_strategy,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    /// Phone sequence for a whole text, as used by [`Self::score`].
    pub fn phonemes_for(&self, text: &str) -> Vec<String> {
        self.phoneme_mapper.phonemes(&self.tokenize(text))
    }

    pub fn score(&self, reference_text: &str, spoken_text: &str) -> ScoreResult {
        let reference = self.tokenize(reference_text);
        let spoken = self.tokenize(spoken_text);

        let alignment = self.word_aligner.align(&reference, &spoken);
        let correct_words = alignment.matches.min(reference.len());
        let word_acc = word_accuracy(correct_words, reference.len());

        let reference_phones = self.phoneme_mapper.phonemes(&reference);
        let spoken_phones = self.phoneme_mapper.phonemes(&spoken);
        let phoneme_sim = self
            .similarity
            .percent(&reference_phones, &spoken_phones)
            .clamp(0.0, 100.0);

        tracing::debug!(
            reference_words = reference.len(),
            spoken_words = spoken.len(),
            correct_words,
            mismatches = alignment.mismatches.len(),
            word_accuracy = word_acc,
            phoneme_similarity = phoneme_sim,
            "scored utterance"
        );

        ScoreResult::from_parts(
            aggregate(word_acc, phoneme_sim),
            round1(word_acc),
            round1(phoneme_sim),
            alignment.mismatches,
            reference.len(),
            correct_words,
        )
    }

    pub fn feedback(&self, result: &ScoreResult, prosody: Option<&ProsodyMetrics>) -> Feedback {
        generate_feedback(result, prosody)
    }

    /// Lowercase transcript of `clip`, or an empty string when the
    /// transcriber fails.
    pub fn transcribe(&self, clip: &AudioClip) -> String {
        match self.transcriber.transcribe(clip) {
            Ok(text) => text.trim().to_lowercase(),
            Err(err) => {
                tracing::warn!(error = %err, "transcription failed; scoring empty speech");
                String::new()
            }
        }
    }

    /// Prosody of `clip`, or the unmeasured sentinel when analysis fails.
    pub fn analyze_prosody(&self, clip: &AudioClip) -> ProsodyMetrics {
        match self.prosody_analyzer.analyze(clip) {
            Ok(metrics) => metrics,
            Err(err) => {
                tracing::warn!(error = %err, "prosody analysis failed; pace feedback omitted");
                ProsodyMetrics::unavailable()
            }
        }
    }

    pub fn analyze(
        &self,
        clip: &AudioClip,
        reference_text: &str,
        options: AnalysisOptions,
    ) -> FullAnalysis {
        let spoken_text = self.transcribe(clip);
        let prosody = options
            .analyze_prosody
            .then(|| self.analyze_prosody(clip));
        self.analyze_transcript(reference_text, &spoken_text, prosody)
    }

    /// Full analysis for an utterance whose transcript is already known.
    pub fn analyze_transcript(
        &self,
        reference_text: &str,
        spoken_text: &str,
        prosody: Option<ProsodyMetrics>,
    ) -> FullAnalysis {
        let pronunciation = self.score(reference_text, spoken_text);
        let feedback = self.feedback(&pronunciation, prosody.as_ref()).to_string();
        FullAnalysis {
            spoken_text: spoken_text.to_string(),
            reference_text: reference_text.to_string(),
            pronunciation,
            prosody,
            feedback,
        }
    }

    /// `"cmu:<path>"`, `"injected"` or `"words_only"`.
    pub fn dictionary_label(&self) -> &str {
        &self.dictionary_label
    }

    pub fn alignment_strategy(&self) -> AlignmentStrategy {
        self.alignment_strategy
    }
}
