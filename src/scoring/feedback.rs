use std::fmt;

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::types::{ProsodyMetrics, ScoreResult, WordMismatch};

const EXCELLENT_MIN: f64 = 90.0;
const GOOD_MIN: f64 = 75.0;
const ACCEPTABLE_MIN: f64 = 60.0;
const SLOW_RATE_MAX: f64 = 1.5;
const FAST_RATE_MIN: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Excellent,
    Good,
    Acceptable,
    NeedsPractice,
}

impl Verdict {
    pub fn from_score(overall_score: f64) -> Self {
        if overall_score >= EXCELLENT_MIN {
            Self::Excellent
        } else if overall_score >= GOOD_MIN {
            Self::Good
        } else if overall_score >= ACCEPTABLE_MIN {
            Self::Acceptable
        } else {
            Self::NeedsPractice
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::NeedsPractice => "needs_practice",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::Excellent => "🎉 Excellent! Your pronunciation is very accurate.",
            Self::Good => "👍 Good job! Your pronunciation is fairly accurate.",
            Self::Acceptable => "📚 Not bad. A little more practice will help.",
            Self::NeedsPractice => {
                "💪 Needs significant practice. Try repeating slowly, word by word."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    TooSlow,
    Appropriate,
    TooFast,
}

impl Pace {
    /// `None` for the unmeasured sentinel.
    pub fn from_prosody(prosody: &ProsodyMetrics) -> Option<Self> {
        if !prosody.is_measured() {
            return None;
        }
        let rate = prosody.speaking_rate();
        Some(if rate < SLOW_RATE_MAX {
            Self::TooSlow
        } else if rate > FAST_RATE_MIN {
            Self::TooFast
        } else {
            Self::Appropriate
        })
    }

    fn message(self) -> &'static str {
        match self {
            Self::TooSlow => "🐢 You are speaking slowly. Try a more natural pace.",
            Self::Appropriate => "✅ Your speaking pace is appropriate.",
            Self::TooFast => "🐇 You are speaking quickly. Slow down and articulate each word.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedbackSection {
    Verdict {
        verdict: Verdict,
    },
    Summary {
        overall_score: f64,
        word_accuracy: f64,
        phoneme_similarity: f64,
    },
    /// Leading mismatches only; the rest are dropped without a count.
    Mismatches {
        words: Vec<WordMismatch>,
    },
    Pace {
        pace: Pace,
    },
}

impl fmt::Display for FeedbackSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verdict { verdict } => f.write_str(verdict.message()),
            Self::Summary {
                overall_score,
                word_accuracy,
                phoneme_similarity,
            } => write!(
                f,
                "📊 Score: {overall_score:.1} (word accuracy: {word_accuracy:.1}%, \
                 phoneme similarity: {phoneme_similarity:.1}%)"
            ),
            Self::Mismatches { words } => {
                f.write_str("❌ Words to work on:")?;
                for word in words {
                    write!(
                        f,
                        "\n  • '{}' → you said: '{}'",
                        display_word(&word.expected),
                        display_word(&word.spoken)
                    )?;
                }
                Ok(())
            }
            Self::Pace { pace } => f.write_str(pace.message()),
        }
    }
}

fn display_word(word: &str) -> &str {
    if word.is_empty() {
        "(nothing)"
    } else {
        word
    }
}

/// Human-readable feedback for one scored utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    sections: Vec<FeedbackSection>,
}

impl Feedback {
    pub fn sections(&self) -> &[FeedbackSection] {
        &self.sections
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.sections.iter().find_map(|section| match section {
            FeedbackSection::Verdict { verdict } => Some(*verdict),
            _ => None,
        })
    }

    pub fn listed_mismatches(&self) -> &[WordMismatch] {
        self.sections
            .iter()
            .find_map(|section| match section {
                FeedbackSection::Mismatches { words } => Some(words.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn pace(&self) -> Option<Pace> {
        self.sections.iter().find_map(|section| match section {
            FeedbackSection::Pace { pace } => Some(*pace),
            _ => None,
        })
    }
}

impl fmt::Display for Feedback {
    /// Sections are separated by a blank line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

pub fn generate_feedback(result: &ScoreResult, prosody: Option<&ProsodyMetrics>) -> Feedback {
    let mut sections = vec![
        FeedbackSection::Verdict {
            verdict: Verdict::from_score(result.overall_score()),
        },
        FeedbackSection::Summary {
            overall_score: result.overall_score(),
            word_accuracy: result.word_accuracy(),
            phoneme_similarity: result.phoneme_similarity(),
        },
    ];

    let mismatches = result.mispronounced_words();
    if !mismatches.is_empty() {
        sections.push(FeedbackSection::Mismatches {
            words: mismatches
                .iter()
                .take(ScoringConfig::FEEDBACK_MISMATCH_LIMIT)
                .cloned()
                .collect(),
        });
    }

    if let Some(pace) = prosody.and_then(Pace::from_prosody) {
        sections.push(FeedbackSection::Pace { pace });
    }

    Feedback { sections }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mismatches(count: usize) -> Vec<WordMismatch> {
        (0..count)
            .map(|position| WordMismatch {
                expected: format!("word{position}"),
                spoken: format!("wurd{position}"),
                position,
            })
            .collect()
    }

    fn result(overall: f64, mismatch_count: usize) -> ScoreResult {
        ScoreResult::new(overall, 50.0, 50.0, mismatches(mismatch_count), 10, 3)
            .expect("valid result")
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_score(100.0), Verdict::Excellent);
        assert_eq!(Verdict::from_score(90.0), Verdict::Excellent);
        assert_eq!(Verdict::from_score(89.9), Verdict::Good);
        assert_eq!(Verdict::from_score(75.0), Verdict::Good);
        assert_eq!(Verdict::from_score(74.9), Verdict::Acceptable);
        assert_eq!(Verdict::from_score(60.0), Verdict::Acceptable);
        assert_eq!(Verdict::from_score(59.9), Verdict::NeedsPractice);
        assert_eq!(Verdict::from_score(0.0), Verdict::NeedsPractice);
    }

    #[test]
    fn summary_is_always_present() {
        let feedback = generate_feedback(&result(76.0, 0), None);
        assert_eq!(feedback.sections().len(), 2);
        assert_eq!(feedback.verdict(), Some(Verdict::Good));
        let text = feedback.to_string();
        assert!(text.starts_with("👍 Good job!"));
        assert!(text.contains("Score: 76.0 (word accuracy: 50.0%, phoneme similarity: 50.0%)"));
        assert!(!text.contains("Words to work on"));
    }

    #[test]
    fn mismatch_list_is_capped_at_five() {
        let feedback = generate_feedback(&result(40.0, 7), None);
        let listed = feedback.listed_mismatches();
        assert_eq!(listed.len(), 5);
        assert_eq!(listed[0].position, 0);
        assert_eq!(listed[4].position, 4);

        let text = feedback.to_string();
        assert_eq!(text.matches("  • ").count(), 5);
        assert!(text.contains("'word4' → you said: 'wurd4'"));
        assert!(!text.contains("word5"));
        assert!(!text.contains("word6"));
    }

    #[test]
    fn empty_side_is_rendered_explicitly() {
        let result = ScoreResult::new(
            50.0,
            50.0,
            50.0,
            vec![WordMismatch {
                expected: "today".to_string(),
                spoken: String::new(),
                position: 5,
            }],
            6,
            5,
        )
        .expect("valid result");
        let text = generate_feedback(&result, None).to_string();
        assert!(text.contains("'today' → you said: '(nothing)'"));
    }

    #[test]
    fn pace_remarks_follow_speaking_rate() {
        let slow = ProsodyMetrics::new(1.2, 10.0, 0.01).expect("valid");
        let fine = ProsodyMetrics::new(2.0, 10.0, 0.01).expect("valid");
        let fast = ProsodyMetrics::new(3.5, 10.0, 0.01).expect("valid");
        let edge_low = ProsodyMetrics::new(1.5, 0.0, 0.0).expect("valid");
        let edge_high = ProsodyMetrics::new(3.0, 0.0, 0.0).expect("valid");
        let r = result(95.0, 0);

        assert_eq!(generate_feedback(&r, Some(&slow)).pace(), Some(Pace::TooSlow));
        assert_eq!(generate_feedback(&r, Some(&fine)).pace(), Some(Pace::Appropriate));
        assert_eq!(generate_feedback(&r, Some(&fast)).pace(), Some(Pace::TooFast));
        assert_eq!(generate_feedback(&r, Some(&edge_low)).pace(), Some(Pace::Appropriate));
        assert_eq!(generate_feedback(&r, Some(&edge_high)).pace(), Some(Pace::Appropriate));
    }

    #[test]
    fn unmeasured_prosody_is_omitted() {
        let r = result(95.0, 0);
        let sentinel = ProsodyMetrics::unavailable();
        let feedback = generate_feedback(&r, Some(&sentinel));
        assert_eq!(feedback.pace(), None);
        assert_eq!(feedback, generate_feedback(&r, None));
    }

    #[test]
    fn sections_render_in_order_with_blank_lines() {
        let fast = ProsodyMetrics::new(3.5, 10.0, 0.01).expect("valid");
        let text = generate_feedback(&result(30.0, 1), Some(&fast)).to_string();
        let verdict_at = text.find("💪").expect("verdict");
        let summary_at = text.find("📊").expect("summary");
        let words_at = text.find("❌").expect("mismatches");
        let pace_at = text.find("🐇").expect("pace");
        assert!(verdict_at < summary_at && summary_at < words_at && words_at < pace_at);
        assert_eq!(text.matches("\n\n").count(), 3);
    }

    #[test]
    fn section_json_is_tagged() {
        let feedback = generate_feedback(&result(95.0, 0), None);
        let json = serde_json::to_value(&feedback).expect("serialize");
        assert_eq!(json["sections"][0]["kind"], "verdict");
        assert_eq!(json["sections"][0]["verdict"], "excellent");
        assert_eq!(json["sections"][1]["kind"], "summary");
    }
}
