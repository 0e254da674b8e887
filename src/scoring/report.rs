use std::cmp::Ordering;

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::scoring::aggregate::round1;
use crate::scoring::feedback::{Feedback, Verdict};
use crate::scoring::tokenization::tokenize;
use crate::types::ScoreResult;

pub const REPORT_SCHEMA_VERSION: u32 = 1;
const LOWEST_SCORES_TOP_N: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub cases: Vec<CaseReport>,
    pub aggregates: AggregateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    /// `"cmu:<path>"`, `"injected"` or `"words_only"`.
    pub dictionary: String,
    pub alignment: String,
    pub case_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub id: String,
    pub reference_text: String,
    pub spoken_text: String,
    pub verdict: Verdict,
    pub result: ScoreResult,
    pub feedback: String,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub counts: AggregateCounts,
    pub overall_score: Option<MetricDistribution>,
    pub word_accuracy: Option<MetricDistribution>,
    pub phoneme_similarity: Option<MetricDistribution>,
    pub verdicts: VerdictCounts,
    pub lowest_scores: Vec<OutlierEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateCounts {
    pub total: usize,
    pub perfect: usize,
    pub with_mismatches: usize,
    pub empty_reference: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub excellent: usize,
    pub good: usize,
    pub acceptable: usize,
    pub needs_practice: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDistribution {
    pub mean: f64,
    pub min: f64,
    pub p50: f64,
    pub p90: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierEntry {
    pub id: String,
    pub verdict: Verdict,
    pub value: f64,
}

pub fn compute_case_report(
    id: &str,
    reference_text: &str,
    spoken_text: &str,
    result: ScoreResult,
    feedback: &Feedback,
) -> CaseReport {
    let mut notes = Vec::new();
    let spoken_words = tokenize(spoken_text).len();

    if result.word_count() == 0 {
        notes.push("empty_reference".to_string());
    }
    if spoken_words == 0 {
        notes.push("no_spoken_words".to_string());
    }
    if result.word_count() != spoken_words {
        notes.push(format!(
            "word_count_mismatch:ref={} spoken={spoken_words}",
            result.word_count()
        ));
    }
    let omitted = result
        .mispronounced_words()
        .len()
        .saturating_sub(ScoringConfig::FEEDBACK_MISMATCH_LIMIT);
    if omitted > 0 {
        notes.push(format!("feedback_omitted_mismatches={omitted}"));
    }

    CaseReport {
        id: id.to_string(),
        reference_text: reference_text.to_string(),
        spoken_text: spoken_text.to_string(),
        verdict: feedback
            .verdict()
            .unwrap_or_else(|| Verdict::from_score(result.overall_score())),
        result,
        feedback: feedback.to_string(),
        notes,
    }
}

pub fn aggregate_reports(cases: &[CaseReport]) -> AggregateReport {
    let mut counts = AggregateCounts {
        total: cases.len(),
        ..AggregateCounts::default()
    };
    let mut verdicts = VerdictCounts::default();
    let mut overall = Vec::with_capacity(cases.len());
    let mut word = Vec::with_capacity(cases.len());
    let mut phoneme = Vec::with_capacity(cases.len());

    for case in cases {
        let result = &case.result;
        if result.word_count() == 0 {
            counts.empty_reference += 1;
        }
        if !result.mispronounced_words().is_empty() {
            counts.with_mismatches += 1;
        }
        if result.overall_score() >= 100.0 {
            counts.perfect += 1;
        }
        match case.verdict {
            Verdict::Excellent => verdicts.excellent += 1,
            Verdict::Good => verdicts.good += 1,
            Verdict::Acceptable => verdicts.acceptable += 1,
            Verdict::NeedsPractice => verdicts.needs_practice += 1,
        }
        overall.push(result.overall_score());
        word.push(result.word_accuracy());
        phoneme.push(result.phoneme_similarity());
    }

    AggregateReport {
        counts,
        overall_score: distribution_or_none(&overall),
        word_accuracy: distribution_or_none(&word),
        phoneme_similarity: distribution_or_none(&phoneme),
        verdicts,
        lowest_scores: lowest_scores(cases, LOWEST_SCORES_TOP_N),
    }
}

fn lowest_scores(cases: &[CaseReport], top_n: usize) -> Vec<OutlierEntry> {
    let mut entries: Vec<OutlierEntry> = cases
        .iter()
        .map(|case| OutlierEntry {
            id: case.id.clone(),
            verdict: case.verdict,
            value: case.result.overall_score(),
        })
        .collect();

    entries.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    entries.truncate(top_n);
    entries
}

fn distribution_or_none(values: &[f64]) -> Option<MetricDistribution> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(MetricDistribution {
        mean: round1(mean(&sorted)),
        min: sorted[0],
        p50: round1(percentile_sorted(&sorted, 0.5)),
        p90: round1(percentile_sorted(&sorted, 0.9)),
        max: sorted[sorted.len() - 1],
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    if sorted_values.len() == 1 {
        return sorted_values[0];
    }

    let clamped = percentile.clamp(0.0, 1.0);
    let max_index = (sorted_values.len() - 1) as f64;
    let rank = clamped * max_index;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = rank - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}
