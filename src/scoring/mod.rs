pub mod aggregate;
pub mod feedback;
pub mod phonemes;
pub mod report;
pub mod similarity;
pub mod tokenization;
pub mod word_alignment;
