//! Pronunciation dictionaries.
//!
//! [`CmuDictionary`] reads the CMU Pronouncing Dictionary text format, either
//! the classic `cmudict-0.7b` layout or the lowercase `cmudict.dict` one:
//!
//! ```text
//! ;;; comment
//! hello HH AH0 L OW1
//! hello(2) HH EH0 L OW1
//! achill AE1 K IH0 L # place, irish
//! ```
//!
//! A `(n)` suffix marks an alternative pronunciation. Variants keep their file
//! order, so the first one listed for a word is the one used for scoring.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ScoringError;
use crate::pipeline::traits::PronunciationDictionary;

#[derive(Debug, Clone, Default)]
pub struct CmuDictionary {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl CmuDictionary {
    pub fn load(path: &Path) -> Result<Self, ScoringError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ScoringError::io("read pronunciation dictionary", e))?;
        let dictionary = Self::parse(&data)?;
        tracing::info!(
            path = %path.display(),
            words = dictionary.word_count(),
            "loaded pronunciation dictionary"
        );
        Ok(dictionary)
    }

    pub fn parse(text: &str) -> Result<Self, ScoringError> {
        let mut entries: HashMap<String, Vec<Vec<String>>> = HashMap::new();
        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = match raw_line.find('#') {
                Some(comment_start) => &raw_line[..comment_start],
                None => raw_line,
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut fields = line.split_whitespace();
            let Some(term) = fields.next() else {
                continue;
            };
            let word = base_word(term).ok_or_else(|| {
                ScoringError::dictionary(line_no, format!("malformed term '{term}'"))
            })?;
            let phones: Vec<String> = fields.map(String::from).collect();
            if phones.is_empty() {
                return Err(ScoringError::dictionary(
                    line_no,
                    format!("entry '{term}' has no phones"),
                ));
            }
            entries.entry(word).or_default().push(phones);
        }
        Ok(Self { entries })
    }

    pub fn word_count(&self) -> usize {
        self.entries.len()
    }
}

/// Strip a trailing `(n)` variant marker and lowercase the term.
fn base_word(term: &str) -> Option<String> {
    let word = match term.find('(') {
        Some(open) => {
            let variant = term[open..].strip_prefix('(')?.strip_suffix(')')?;
            if variant.is_empty() || !variant.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            &term[..open]
        }
        None => term,
    };
    if word.is_empty() {
        return None;
    }
    Some(word.to_lowercase())
}

impl PronunciationDictionary for CmuDictionary {
    fn pronunciations(&self, word: &str) -> Vec<Vec<String>> {
        self.entries.get(word).cloned().unwrap_or_default()
    }
}

/// Dictionary over a caller-built word map, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDictionary {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl InMemoryDictionary {
    pub fn new(entries: HashMap<String, Vec<Vec<String>>>) -> Self {
        Self { entries }
    }

    pub fn insert(&mut self, word: &str, phones: &[&str]) {
        self.entries
            .entry(word.to_lowercase())
            .or_default()
            .push(phones.iter().map(|p| p.to_string()).collect());
    }
}

impl PronunciationDictionary for InMemoryDictionary {
    fn pronunciations(&self, word: &str) -> Vec<Vec<String>> {
        self.entries.get(word).cloned().unwrap_or_default()
    }
}
