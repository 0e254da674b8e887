use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use libtest_mimic::{Arguments, Failed, Trial};
use pronounce_rs::scoring::aggregate::{aggregate, round1};
use pronounce_rs::scoring::similarity::SimilarityScorer;
use pronounce_rs::{
    AlignmentStrategy, CmuDictionary, PronunciationScorer, PronunciationScorerBuilder,
    ScoringConfig, WordMismatch,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

const DEFAULT_PROPERTY_SEED: u64 = 42;
const DEFAULT_PROPERTY_ROUNDS: usize = 200;
const SCORE_EPSILON: f64 = 1e-9;
const SUITE_NAME: &str = "scoring_reference";

const VOCABULARY: [&str; 16] = [
    "hello", "world", "how", "are", "you", "today", "the", "weather", "is", "beautiful", "good",
    "morning", "qwerty", "zxcv", "coffee", "please",
];

#[derive(Debug, Deserialize)]
struct ReferenceCase {
    id: String,
    reference_text: String,
    spoken_text: String,
    alignment: AlignmentStrategy,
    use_dictionary: bool,
    expected: ExpectedScore,
}

#[derive(Debug, Deserialize)]
struct ExpectedScore {
    overall_score: f64,
    word_accuracy: f64,
    phoneme_similarity: f64,
    word_count: usize,
    correct_words: usize,
    /// `[expected, spoken, position]` triples.
    mismatches: Vec<(String, String, usize)>,
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let seed = env_u64("PRONOUNCE_IT_SEED", DEFAULT_PROPERTY_SEED);
    let rounds = env_u64("PRONOUNCE_IT_ROUNDS", DEFAULT_PROPERTY_ROUNDS as u64) as usize;

    let cases = match load_cases(&repo_root.join("test-data").join("scoring_cases.json")) {
        Ok(cases) => cases,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if cases.is_empty() {
        run_setup_failure(
            &args,
            "No reference cases found in test-data/scoring_cases.json.".to_string(),
        );
        return;
    }

    let mut tests = Vec::with_capacity(cases.len() + 3);
    for case in cases {
        let test_name = format!("{SUITE_NAME}::case::{}", case.id);
        tests.push(Trial::test(test_name, move || {
            run_reference_case(&case).map_err(Failed::from)
        }));
    }
    tests.push(Trial::test(
        format!("{SUITE_NAME}::property::identity_scores_perfectly"),
        move || identity_property(seed, rounds).map_err(Failed::from),
    ));
    tests.push(Trial::test(
        format!("{SUITE_NAME}::property::scores_stay_in_bounds"),
        move || bounds_property(seed, rounds).map_err(Failed::from),
    ));
    tests.push(Trial::test(
        format!("{SUITE_NAME}::property::overall_is_weighted_mean"),
        move || weighting_property(seed, rounds).map_err(Failed::from),
    ));

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn run_reference_case(case: &ReferenceCase) -> Result<(), String> {
    let scorer = build_scorer(case.alignment, case.use_dictionary)?;
    let result = scorer.score(&case.reference_text, &case.spoken_text);
    let expected = &case.expected;

    compare_score(&case.id, "overall_score", result.overall_score(), expected.overall_score)?;
    compare_score(&case.id, "word_accuracy", result.word_accuracy(), expected.word_accuracy)?;
    compare_score(
        &case.id,
        "phoneme_similarity",
        result.phoneme_similarity(),
        expected.phoneme_similarity,
    )?;
    if result.word_count() != expected.word_count {
        return Err(format!(
            "{}: word_count mismatch (expected {}, got {})",
            case.id,
            expected.word_count,
            result.word_count()
        ));
    }
    if result.correct_words() != expected.correct_words {
        return Err(format!(
            "{}: correct_words mismatch (expected {}, got {})",
            case.id,
            expected.correct_words,
            result.correct_words()
        ));
    }

    let expected_mismatches: Vec<WordMismatch> = expected
        .mismatches
        .iter()
        .map(|(expected, spoken, position)| WordMismatch {
            expected: expected.clone(),
            spoken: spoken.clone(),
            position: *position,
        })
        .collect();
    if result.mispronounced_words() != expected_mismatches.as_slice() {
        return Err(format!(
            "{}: mismatches differ\n  expected: {:?}\n  observed: {:?}",
            case.id,
            expected_mismatches,
            result.mispronounced_words()
        ));
    }
    Ok(())
}

fn compare_score(id: &str, field: &str, observed: f64, expected: f64) -> Result<(), String> {
    if (observed - expected).abs() > SCORE_EPSILON {
        return Err(format!(
            "{id}: {field} mismatch (expected {expected}, got {observed})"
        ));
    }
    Ok(())
}

fn build_scorer(
    alignment: AlignmentStrategy,
    use_dictionary: bool,
) -> Result<PronunciationScorer, String> {
    let config = ScoringConfig {
        alignment,
        ..ScoringConfig::default()
    };
    let builder = PronunciationScorerBuilder::new(config);
    let builder = if use_dictionary {
        builder.with_dictionary(Box::new(sample_dictionary()?.clone()))
    } else {
        builder
    };
    builder
        .build()
        .map_err(|err| format!("failed to build scorer: {err}"))
}

fn sample_dictionary() -> Result<&'static CmuDictionary, String> {
    static DICTIONARY: OnceLock<Result<CmuDictionary, String>> = OnceLock::new();
    DICTIONARY
        .get_or_init(|| {
            let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("test-data")
                .join("cmudict-sample.dict");
            require_path_exists(&path, "Missing sample pronunciation dictionary.")?;
            CmuDictionary::load(&path).map_err(|err| err.to_string())
        })
        .as_ref()
        .map_err(Clone::clone)
}

fn random_sentence(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0..8);
    (0..len)
        .filter_map(|_| VOCABULARY.choose(&mut *rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn identity_property(seed: u64, rounds: usize) -> Result<(), String> {
    let scorer = build_scorer(AlignmentStrategy::Positional, true)?;
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..rounds {
        let text = random_sentence(&mut rng);
        if scorer.tokenize(&text).is_empty() {
            continue;
        }
        let result = scorer.score(&text, &text.to_uppercase());
        if result.overall_score() != 100.0 || !result.mispronounced_words().is_empty() {
            return Err(format!("'{text}': identity scored {result:?}"));
        }
    }
    Ok(())
}

fn bounds_property(seed: u64, rounds: usize) -> Result<(), String> {
    let scorers = [
        build_scorer(AlignmentStrategy::Positional, true)?,
        build_scorer(AlignmentStrategy::EditDistance, true)?,
        build_scorer(AlignmentStrategy::Positional, false)?,
    ];
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    for _ in 0..rounds {
        let reference = random_sentence(&mut rng);
        let spoken = random_sentence(&mut rng);
        for scorer in &scorers {
            let result = scorer.score(&reference, &spoken);
            let in_range = |value: f64| (0.0..=100.0).contains(&value);
            if !in_range(result.overall_score())
                || !in_range(result.word_accuracy())
                || !in_range(result.phoneme_similarity())
                || result.correct_words() > result.word_count()
            {
                return Err(format!("'{reference}' vs '{spoken}': out of bounds {result:?}"));
            }
            if result.word_count() == 0 && result.word_accuracy() != 0.0 {
                return Err(format!("'{reference}': empty reference scored words"));
            }
        }
    }
    Ok(())
}

fn weighting_property(seed: u64, rounds: usize) -> Result<(), String> {
    let scorer = build_scorer(AlignmentStrategy::Positional, false)?;
    let similarity = SimilarityScorer::new();
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(2));
    for _ in 0..rounds {
        let reference = random_sentence(&mut rng);
        let spoken = random_sentence(&mut rng);
        let result = scorer.score(&reference, &spoken);

        let word_accuracy = if result.word_count() == 0 {
            0.0
        } else {
            result.correct_words() as f64 / result.word_count() as f64 * 100.0
        };
        let phoneme_similarity =
            similarity.percent(&scorer.tokenize(&reference), &scorer.tokenize(&spoken));
        let expected = aggregate(word_accuracy, phoneme_similarity);
        compare_score(&reference, "overall_score", result.overall_score(), expected)?;
        compare_score(
            &reference,
            "phoneme_similarity",
            result.phoneme_similarity(),
            round1(phoneme_similarity),
        )?;
    }
    Ok(())
}

fn load_cases(path: &Path) -> Result<Vec<ReferenceCase>, String> {
    require_path_exists(
        path,
        "Missing scoring fixture JSON. Regenerate it with scripts/generate_scoring_cases.py.",
    )?;
    let file = File::open(path)
        .map_err(|err| format!("Failed to open fixture '{}': {err}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| format!("Failed to parse fixture '{}': {err}", path.display()))
}

fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or_else(|err| {
            panic!(
                "Invalid value for {}='{}' (expected u64): {}",
                name, value, err
            )
        }),
        Err(_) => default,
    }
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}
