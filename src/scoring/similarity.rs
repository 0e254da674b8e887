use std::collections::HashMap;

/// Strings at least this long get the "popular element" filter when autojunk
/// is enabled.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Ratcliff–Obershelp similarity between phone sequences.
///
/// Sequences are joined with single spaces and compared character by
/// character. With `autojunk`, characters that make up more than 1% of a long
/// second string cannot seed a matching block, which reproduces the classic
/// sequence matcher's behaviour on long inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimilarityScorer {
    autojunk: bool,
}

impl SimilarityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_autojunk(mut self, autojunk: bool) -> Self {
        self.autojunk = autojunk;
        self
    }

    /// Similarity in `[0, 1]`; two empty sequences are a perfect match.
    ///
    /// Block search is anchored on `a`, so swapping the arguments can change
    /// the result. Pass the reference first.
    pub fn ratio(&self, a: &[String], b: &[String]) -> f64 {
        let a: Vec<char> = a.join(" ").chars().collect();
        let b: Vec<char> = b.join(" ").chars().collect();
        sequence_ratio(&a, &b, self.autojunk)
    }

    /// Similarity as a percentage in `[0, 100]`.
    pub fn percent(&self, a: &[String], b: &[String]) -> f64 {
        self.ratio(a, b) * 100.0
    }
}

pub fn sequence_ratio<T>(a: &[T], b: &[T], autojunk: bool) -> f64
where
    T: Eq + std::hash::Hash + Copy,
{
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_len(a, b, autojunk) as f64 / total as f64
}

/// Total length of the matching blocks found by recursive longest-block search.
fn matching_len<T>(a: &[T], b: &[T], autojunk: bool) -> usize
where
    T: Eq + std::hash::Hash + Copy,
{
    let b2j = index_b(b, autojunk);
    let mut matched = 0usize;
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, b, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

fn index_b<T>(b: &[T], autojunk: bool) -> HashMap<T, Vec<usize>>
where
    T: Eq + std::hash::Hash + Copy,
{
    let mut b2j: HashMap<T, Vec<usize>> = HashMap::new();
    for (j, &elt) in b.iter().enumerate() {
        b2j.entry(elt).or_default().push(j);
    }
    if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
        let ntest = b.len() / 100 + 1;
        b2j.retain(|_, indices| indices.len() <= ntest);
    }
    b2j
}

/// Longest block `a[i..i+k] == b[j..j+k]` inside the given window.
///
/// Ties go to the block that starts earliest in `a`, then earliest in `b`.
fn longest_match<T>(
    a: &[T],
    b: &[T],
    b2j: &HashMap<T, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize)
where
    T: Eq + std::hash::Hash + Copy,
{
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0usize);
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for (i, elt) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_j2len = HashMap::new();
        if let Some(indices) = b2j.get(elt) {
            for &j in indices {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_j2len.insert(j, k);
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        j2len = next_j2len;
    }

    // Filtered (popular) elements never seed a block but may extend one.
    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_k += 1;
    }
    while best_i + best_k < ahi && best_j + best_k < bhi && a[best_i + best_k] == b[best_j + best_k]
    {
        best_k += 1;
    }
    (best_i, best_j, best_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn phones(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn empty_pair_is_perfect_match() {
        let scorer = SimilarityScorer::new();
        assert_eq!(scorer.ratio(&[], &[]), 1.0);
        assert_eq!(scorer.percent(&[], &[]), 100.0);
    }

    #[test]
    fn empty_against_non_empty_is_zero() {
        let scorer = SimilarityScorer::new();
        assert_eq!(scorer.ratio(&[], &phones("a b c")), 0.0);
        assert_eq!(scorer.ratio(&phones("a b c"), &[]), 0.0);
    }

    #[test]
    fn identical_sequences_score_one() {
        let scorer = SimilarityScorer::new();
        let a = phones("DH AH0 W EH1 DH ER0 IH1 Z");
        assert_eq!(scorer.ratio(&a, &a), 1.0);
    }

    #[test]
    fn known_ratios() {
        assert!((sequence_ratio(&chars("abcd"), &chars("bcde"), false) - 0.75).abs() < 1e-12);
        let scorer = SimilarityScorer::new();
        let ratio = scorer.ratio(&phones("HH AH0 L OW1"), &phones("HH EH0 L OW1"));
        assert!((ratio - 0.916_666_666_666_666_6).abs() < 1e-12);
        let ratio = sequence_ratio(
            &chars("the weather is beautiful today"),
            &chars("the weater is butiful today"),
            false,
        );
        assert!((ratio - 0.947_368_421_052_631_5).abs() < 1e-12);
    }

    #[test]
    fn ratio_depends_on_argument_order() {
        // "tide" anchors on 't' and leaves nothing to its right in "diet";
        // "diet" anchors on 'd' and still matches 'e' afterwards.
        assert_eq!(sequence_ratio(&chars("tide"), &chars("diet"), false), 0.25);
        assert_eq!(sequence_ratio(&chars("diet"), &chars("tide"), false), 0.5);
    }

    #[test]
    fn sequences_are_joined_with_spaces() {
        let scorer = SimilarityScorer::new();
        // "ab" vs "a b": one block "a", one block "b" => 2 * 2 / 5
        let ratio = scorer.ratio(&phones("ab"), &phones("a b"));
        assert!((ratio - 0.8).abs() < 1e-12);
    }

    #[test]
    fn autojunk_only_affects_long_strings() {
        let a = chars(&"ab".repeat(150));
        let mut b = chars(&"ba".repeat(150));
        b.push('x');
        assert_eq!(sequence_ratio(&a, &b, true), 0.0);
        let plain = sequence_ratio(&a, &b, false);
        assert!((plain - 0.995_008_319_467_554_1).abs() < 1e-12);

        let short_a = chars("abab");
        let short_b = chars("baba");
        assert_eq!(
            sequence_ratio(&short_a, &short_b, true),
            sequence_ratio(&short_a, &short_b, false)
        );
    }

    #[test]
    fn autojunk_keeps_identity() {
        let a = chars(&"the quick brown fox ".repeat(20));
        assert_eq!(sequence_ratio(&a, &a, true), 1.0);
    }
}
