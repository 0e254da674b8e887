use crate::pipeline::traits::PronunciationDictionary;

/// Map word tokens to a flat phone sequence using `dictionary`.
///
/// Each known word contributes its first listed pronunciation. A word the
/// dictionary does not know contributes one unit per character instead.
pub fn phones_for_tokens(
    tokens: &[String],
    dictionary: &dyn PronunciationDictionary,
) -> Vec<String> {
    let mut phones = Vec::new();
    let mut fallback_words = 0usize;
    for token in tokens {
        let variants = dictionary.pronunciations(token);
        if let Some(first) = variants.into_iter().next() {
            phones.extend(first);
            continue;
        }
        fallback_words += 1;
        phones.extend(token.chars().map(String::from));
    }
    if fallback_words > 0 {
        tracing::debug!(
            fallback_words,
            total_words = tokens.len(),
            "words missing from pronunciation dictionary were spelled out"
        );
    }
    phones
}

/// Phone units when no dictionary is available: one unit per whole word.
pub fn word_units(tokens: &[String]) -> Vec<String> {
    tokens.to_vec()
}
