use crate::types::{WordAlignment, WordMismatch};

/// Pair reference and spoken words index by index.
///
/// Only indices where both sides have a word are judged. Extra words at the
/// tail of either sequence are neither matches nor mismatches, and a single
/// inserted or dropped word shifts every later pair.
pub fn align_positional(reference: &[String], spoken: &[String]) -> WordAlignment {
    let mut alignment = WordAlignment::default();
    let len = reference.len().max(spoken.len());
    for position in 0..len {
        let r = reference.get(position).map(String::as_str).unwrap_or("");
        let s = spoken.get(position).map(String::as_str).unwrap_or("");
        if r.is_empty() || s.is_empty() {
            continue;
        }
        if r == s {
            alignment.matches += 1;
        } else {
            alignment.mismatches.push(WordMismatch {
                expected: r.to_string(),
                spoken: s.to_string(),
                position,
            });
        }
    }
    alignment
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOp {
    Keep,
    Substitute,
    Delete,
    Insert,
}

/// Pair reference and spoken words with a minimum word-edit alignment.
///
/// Substitutions, deletions (`spoken == ""`) and insertions (`expected == ""`)
/// are reported in alignment order. Positions are reference indices; an
/// insertion carries the index of the reference word it precedes.
pub fn align_edit_distance(reference: &[String], spoken: &[String]) -> WordAlignment {
    let n = reference.len();
    let m = spoken.len();
    let width = m + 1;
    let mut dist = vec![0usize; (n + 1) * width];
    for i in 0..=n {
        dist[i * width] = i;
    }
    for j in 0..=m {
        dist[j] = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let sub_cost = usize::from(reference[i - 1] != spoken[j - 1]);
            let diag = dist[(i - 1) * width + j - 1] + sub_cost;
            let up = dist[(i - 1) * width + j] + 1;
            let left = dist[i * width + j - 1] + 1;
            dist[i * width + j] = diag.min(up).min(left);
        }
    }

    let mut ops = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        let here = dist[i * width + j];
        if i > 0 && j > 0 {
            let same = reference[i - 1] == spoken[j - 1];
            let diag = dist[(i - 1) * width + j - 1] + usize::from(!same);
            if here == diag {
                ops.push(if same { EditOp::Keep } else { EditOp::Substitute });
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && here == dist[(i - 1) * width + j] + 1 {
            ops.push(EditOp::Delete);
            i -= 1;
            continue;
        }
        ops.push(EditOp::Insert);
        j -= 1;
    }
    ops.reverse();

    let mut alignment = WordAlignment::default();
    let (mut ri, mut si) = (0usize, 0usize);
    for op in ops {
        match op {
            EditOp::Keep => {
                alignment.matches += 1;
                ri += 1;
                si += 1;
            }
            EditOp::Substitute => {
                alignment.mismatches.push(WordMismatch {
                    expected: reference[ri].clone(),
                    spoken: spoken[si].clone(),
                    position: ri,
                });
                ri += 1;
                si += 1;
            }
            EditOp::Delete => {
                alignment.mismatches.push(WordMismatch {
                    expected: reference[ri].clone(),
                    spoken: String::new(),
                    position: ri,
                });
                ri += 1;
            }
            EditOp::Insert => {
                alignment.mismatches.push(WordMismatch {
                    expected: String::new(),
                    spoken: spoken[si].clone(),
                    position: ri,
                });
                si += 1;
            }
        }
    }
    alignment
}

/// Percentage of reference words matched; zero for an empty reference.
pub fn word_accuracy(matches: usize, reference_len: usize) -> f64 {
    if reference_len == 0 {
        return 0.0;
    }
    matches as f64 / reference_len as f64 * 100.0
}
