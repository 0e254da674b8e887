/// Split free text into lowercase word tokens.
///
/// A token is a maximal run of word characters: Unicode alphanumerics and
/// `_`. Everything else separates tokens and is dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut cur = String::new();
    for c in lowered.chars() {
        if is_word_char(c) {
            cur.push(c);
            continue;
        }
        if !cur.is_empty() {
            tokens.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        tokens.push(cur);
    }
    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
