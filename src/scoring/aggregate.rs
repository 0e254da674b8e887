use crate::config::ScoringConfig;

/// Round to one decimal place using the exact decimal value of `value`.
///
/// Exact ties such as `6.25` go to the even digit, so stored scores agree
/// with previously published results.
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Overall score from unrounded word accuracy and phoneme similarity.
pub fn aggregate(word_accuracy: f64, phoneme_similarity: f64) -> f64 {
    round1(
        word_accuracy * ScoringConfig::WORD_ACCURACY_WEIGHT
            + phoneme_similarity * ScoringConfig::PHONEME_SIMILARITY_WEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round1_rounds_to_one_decimal() {
        assert_eq!(round1(83.333_333_333_333_34), 83.3);
        assert_eq!(round1(94.736_842_105_263_15), 94.7);
        assert_eq!(round1(60.0), 60.0);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn round1_ties_go_to_even_digit() {
        assert_eq!(round1(6.25), 6.2);
        assert_eq!(round1(1.25), 1.2);
        assert_eq!(round1(18.75), 18.8);
    }

    #[test]
    fn round1_passes_non_finite_through() {
        assert!(round1(f64::NAN).is_nan());
        assert_eq!(round1(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn aggregate_weights_word_accuracy_more() {
        assert_eq!(aggregate(100.0, 100.0), 100.0);
        assert_eq!(aggregate(0.0, 0.0), 0.0);
        assert_eq!(aggregate(100.0, 0.0), 60.0);
        assert_eq!(aggregate(0.0, 100.0), 40.0);
        assert_eq!(aggregate(60.0, 90.0), 72.0);
    }

    #[test]
    fn aggregate_uses_unrounded_inputs() {
        let w = 83.333_333_333_333_34;
        let p = 91.666_666_666_666_66;
        assert_eq!(aggregate(w, p), round1(w * 0.6 + p * 0.4));
        assert_eq!(aggregate(w, p), 86.7);
    }
}
