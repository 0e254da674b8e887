use std::path::Path;

use crate::config::{AlignmentStrategy, ScoringConfig};
use crate::error::ScoringError;
use crate::lexicon::CmuDictionary;
use crate::pipeline::defaults::{
    DictionaryPhonemeMapper, EditDistanceWordAligner, EnergyProsodyAnalyzer,
    PositionalWordAligner, UnavailableTranscriber, WordBoundaryTokenizer, WordUnitPhonemeMapper,
};
use crate::pipeline::runtime::{PronunciationScorer, PronunciationScorerParts};
use crate::pipeline::traits::{
    PhonemeMapper, PronunciationDictionary, ProsodyAnalyzer, Tokenizer, Transcriber, WordAligner,
};
use crate::scoring::similarity::SimilarityScorer;

const INJECTED_DICTIONARY_LABEL: &str = "injected";
const WORDS_ONLY_LABEL: &str = "words_only";

pub struct PronunciationScorerBuilder {
    config: ScoringConfig,
    tokenizer: Option<Box<dyn Tokenizer>>,
    dictionary: Option<Box<dyn PronunciationDictionary>>,
    phoneme_mapper: Option<Box<dyn PhonemeMapper>>,
    word_aligner: Option<Box<dyn WordAligner>>,
    transcriber: Option<Box<dyn Transcriber>>,
    prosody_analyzer: Option<Box<dyn ProsodyAnalyzer>>,
}

impl PronunciationScorerBuilder {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            tokenizer: None,
            dictionary: None,
            phoneme_mapper: None,
            word_aligner: None,
            transcriber: None,
            prosody_analyzer: None,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Takes precedence over `ScoringConfig::dictionary_path`.
    pub fn with_dictionary(mut self, dictionary: Box<dyn PronunciationDictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Replaces dictionary lookup entirely; any dictionary is then ignored.
    pub fn with_phoneme_mapper(mut self, phoneme_mapper: Box<dyn PhonemeMapper>) -> Self {
        self.phoneme_mapper = Some(phoneme_mapper);
        self
    }

    pub fn with_word_aligner(mut self, word_aligner: Box<dyn WordAligner>) -> Self {
        self.word_aligner = Some(word_aligner);
        self
    }

    pub fn with_transcriber(mut self, transcriber: Box<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_prosody_analyzer(mut self, prosody_analyzer: Box<dyn ProsodyAnalyzer>) -> Self {
        self.prosody_analyzer = Some(prosody_analyzer);
        self
    }

    pub fn build(self) -> Result<PronunciationScorer, ScoringError> {
        let (phoneme_mapper, dictionary_label) = match self.phoneme_mapper {
            Some(mapper) => (mapper, INJECTED_DICTIONARY_LABEL.to_string()),
            None => resolve_phoneme_mapper(self.dictionary, self.config.dictionary_path.as_deref())?,
        };

        let word_aligner = self.word_aligner.unwrap_or_else(|| match self.config.alignment {
            AlignmentStrategy::Positional => Box::new(PositionalWordAligner),
            AlignmentStrategy::EditDistance => Box::new(EditDistanceWordAligner),
        });

        tracing::info!(
            dictionary = %dictionary_label,
            alignment = self.config.alignment.as_str(),
            autojunk = self.config.similarity_autojunk,
            "built pronunciation scorer"
        );

        Ok(PronunciationScorer::from_parts(PronunciationScorerParts {
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(WordBoundaryTokenizer)),
            phoneme_mapper,
            word_aligner,
            transcriber: self
                .transcriber
                .unwrap_or_else(|| Box::new(UnavailableTranscriber)),
            prosody_analyzer: self
                .prosody_analyzer
                .unwrap_or_else(|| Box::new(EnergyProsodyAnalyzer)),
            similarity: SimilarityScorer::new().with_autojunk(self.config.similarity_autojunk),
            dictionary_label,
            alignment_strategy: self.config.alignment,
        }))
    }
}

fn resolve_phoneme_mapper(
    injected: Option<Box<dyn PronunciationDictionary>>,
    dictionary_path: Option<&str>,
) -> Result<(Box<dyn PhonemeMapper>, String), ScoringError> {
    if let Some(dictionary) = injected {
        return Ok((
            Box::new(DictionaryPhonemeMapper::new(dictionary)),
            INJECTED_DICTIONARY_LABEL.to_string(),
        ));
    }
    if let Some(path) = dictionary_path {
        let dictionary = CmuDictionary::load(Path::new(path))?;
        return Ok((
            Box::new(DictionaryPhonemeMapper::new(Box::new(dictionary))),
            format!("cmu:{path}"),
        ));
    }
    tracing::warn!("no pronunciation dictionary configured; comparing whole words instead of phones");
    Ok((Box::new(WordUnitPhonemeMapper), WORDS_ONLY_LABEL.to_string()))
}
