pub mod audio;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod pipeline;
pub mod practice;
pub mod scoring;
pub mod types;

pub use config::{AlignmentStrategy, ScoringConfig};
pub use error::ScoringError;
pub use lexicon::{CmuDictionary, InMemoryDictionary};
pub use pipeline::builder::PronunciationScorerBuilder;
pub use pipeline::runtime::PronunciationScorer;
pub use pipeline::traits::{
    PhonemeMapper, PronunciationDictionary, ProsodyAnalyzer, Tokenizer, Transcriber, WordAligner,
};
pub use scoring::feedback::{generate_feedback, Feedback, Verdict};
pub use scoring::tokenization::tokenize;
pub use types::{
    AnalysisOptions, AudioClip, FullAnalysis, ProsodyMetrics, ScoreResult, WordAlignment,
    WordMismatch,
};
