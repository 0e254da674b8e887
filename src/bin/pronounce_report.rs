use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use pronounce_rs::audio::read_flac_mono;
use pronounce_rs::practice::{practice_sentences, Category, Level};
use pronounce_rs::scoring::report::{
    aggregate_reports, compute_case_report, CaseReport, Meta, Report, REPORT_SCHEMA_VERSION,
};
use pronounce_rs::{
    AlignmentStrategy, AnalysisOptions, PronunciationScorer, PronunciationScorerBuilder,
    ScoringConfig,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[path = "pronounce_report/json_report_formatter.rs"]
mod json_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlignmentChoice {
    Positional,
    EditDistance,
}

impl AlignmentChoice {
    fn strategy(self) -> AlignmentStrategy {
        match self {
            Self::Positional => AlignmentStrategy::Positional,
            Self::EditDistance => AlignmentStrategy::EditDistance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LevelChoice {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<LevelChoice> for Level {
    fn from(value: LevelChoice) -> Self {
        match value {
            LevelChoice::Beginner => Level::Beginner,
            LevelChoice::Intermediate => Level::Intermediate,
            LevelChoice::Advanced => Level::Advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CategoryChoice {
    Daily,
    Business,
    Travel,
}

impl From<CategoryChoice> for Category {
    fn from(value: CategoryChoice) -> Self {
        match value {
            CategoryChoice::Daily => Category::Daily,
            CategoryChoice::Business => Category::Business,
            CategoryChoice::Travel => Category::Travel,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pronounce_report")]
#[command(about = "Score spoken English against reference sentences")]
struct Args {
    #[command(flatten)]
    scorer: ScorerArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct ScorerArgs {
    /// JSON scoring config; flags below override its fields.
    #[arg(long, env = "PRONOUNCE_CONFIG", global = true)]
    config: Option<PathBuf>,
    /// CMUdict-format pronunciation dictionary.
    #[arg(long, env = "PRONOUNCE_DICTIONARY", global = true)]
    dictionary: Option<PathBuf>,
    #[arg(long, env = "PRONOUNCE_ALIGNMENT", value_enum, global = true)]
    alignment: Option<AlignmentChoice>,
    #[arg(long, env = "PRONOUNCE_AUTOJUNK", global = true, default_value_t = false)]
    autojunk: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one utterance and print the full analysis as JSON.
    Score {
        #[arg(long)]
        reference: String,
        /// Transcript of what was said. Without it the audio is transcribed.
        #[arg(long)]
        spoken: Option<String>,
        /// FLAC recording used for prosody (and transcription when wired in).
        #[arg(long)]
        audio: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        no_prosody: bool,
    },
    /// Print the phone sequence used for scoring a text.
    Phonemes {
        #[arg(long)]
        text: String,
    },
    /// Score a JSON file of cases and write an aggregate report.
    Batch {
        #[arg(long, env = "PRONOUNCE_CASES_FILE")]
        cases: PathBuf,
        #[arg(long, env = "PRONOUNCE_REPORT_OUT")]
        out: Option<PathBuf>,
        #[arg(long, env = "PRONOUNCE_REPORT_LIMIT")]
        limit: Option<usize>,
    },
    /// Print the built-in practice sentences.
    Sentences {
        #[arg(long, value_enum, default_value_t = LevelChoice::Beginner)]
        level: LevelChoice,
        #[arg(long, value_enum, default_value_t = CategoryChoice::Daily)]
        category: CategoryChoice,
    },
}

#[derive(Debug, Deserialize)]
struct Case {
    #[serde(default)]
    id: Option<String>,
    reference_text: String,
    spoken_text: String,
}

#[derive(Debug, Serialize)]
struct PhonemeOutput<'a> {
    text: &'a str,
    dictionary: &'a str,
    phonemes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SentencesOutput {
    level: Level,
    category: Category,
    sentences: &'static [&'static str],
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Score {
            reference,
            spoken,
            audio,
            no_prosody,
        } => run_score(
            &build_scorer(&args.scorer)?,
            &reference,
            spoken.as_deref(),
            audio.as_deref(),
            !no_prosody,
        ),
        Command::Phonemes { text } => {
            let scorer = build_scorer(&args.scorer)?;
            json_report_formatter::print_json(&PhonemeOutput {
                text: &text,
                dictionary: scorer.dictionary_label(),
                phonemes: scorer.phonemes_for(&text),
            })
        }
        Command::Batch { cases, out, limit } => {
            run_batch(&build_scorer(&args.scorer)?, &cases, out.as_ref(), limit)
        }
        Command::Sentences { level, category } => {
            let (level, category) = (Level::from(level), Category::from(category));
            json_report_formatter::print_json(&SentencesOutput {
                level,
                category,
                sentences: practice_sentences(level, category),
            })
        }
    }
}

fn build_scorer(args: &ScorerArgs) -> Result<PronunciationScorer, String> {
    PronunciationScorerBuilder::new(resolve_config(args)?)
        .build()
        .map_err(|err| format!("Failed to build scorer: {err}"))
}

fn resolve_config(args: &ScorerArgs) -> Result<ScoringConfig, String> {
    let mut config = match args.config.as_ref() {
        Some(path) => ScoringConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ScoringConfig::default(),
    };
    if let Some(path) = args.dictionary.as_ref() {
        require_path_exists(path, "Pronunciation dictionary not found.")?;
        config.dictionary_path = Some(path.to_string_lossy().into_owned());
    }
    if let Some(choice) = args.alignment {
        config.alignment = choice.strategy();
    }
    if args.autojunk {
        config.similarity_autojunk = true;
    }
    Ok(config)
}

fn run_score(
    scorer: &PronunciationScorer,
    reference: &str,
    spoken: Option<&str>,
    audio: Option<&Path>,
    with_prosody: bool,
) -> Result<(), String> {
    let clip = audio
        .map(|path| {
            require_path_exists(path, "Audio file not found.")?;
            read_flac_mono(path).map_err(|err| err.to_string())
        })
        .transpose()?;

    let analysis = match (spoken, clip.as_ref()) {
        (Some(spoken), clip) => {
            let prosody = clip
                .filter(|_| with_prosody)
                .map(|clip| scorer.analyze_prosody(clip));
            scorer.analyze_transcript(reference, spoken, prosody)
        }
        (None, Some(clip)) => scorer.analyze(
            clip,
            reference,
            AnalysisOptions {
                analyze_prosody: with_prosody,
            },
        ),
        (None, None) => return Err("score needs --spoken, --audio, or both.".to_string()),
    };
    json_report_formatter::print_json(&analysis)
}

fn run_batch(
    scorer: &PronunciationScorer,
    cases_path: &Path,
    out: Option<&PathBuf>,
    limit: Option<usize>,
) -> Result<(), String> {
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let mut cases = load_cases(cases_path)?;
    if let Some(limit) = limit {
        cases.truncate(limit);
    }
    if cases.is_empty() {
        return Err("No cases selected after applying limit.".to_string());
    }

    let started = Instant::now();
    let progress = ProgressBar::new(cases.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");

    let mut case_reports: Vec<CaseReport> = Vec::with_capacity(cases.len());
    for (idx, case) in cases.iter().enumerate() {
        let id = case
            .id
            .clone()
            .unwrap_or_else(|| format!("case-{:04}", idx + 1));
        progress.set_message(id.clone());
        let result = scorer.score(&case.reference_text, &case.spoken_text);
        let feedback = scorer.feedback(&result, None);
        case_reports.push(compute_case_report(
            &id,
            &case.reference_text,
            &case.spoken_text,
            result,
            &feedback,
        ));
        progress.inc(1);
    }
    progress.finish_with_message("done");

    let aggregates = aggregate_reports(&case_reports);
    let report = Report {
        schema_version: REPORT_SCHEMA_VERSION,
        meta: Meta {
            generated_at: Utc::now().to_rfc3339(),
            dictionary: scorer.dictionary_label().to_string(),
            alignment: scorer.alignment_strategy().as_str().to_string(),
            case_count: case_reports.len(),
        },
        cases: case_reports,
        aggregates,
    };

    let out_path = resolve_out_path(&repo_root, out);
    json_report_formatter::write_report(&out_path, &report)?;
    tracing::info!(
        cases = report.meta.case_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch report written"
    );
    println!("{}", out_path.display());
    Ok(())
}

fn load_cases(path: &Path) -> Result<Vec<Case>, String> {
    require_path_exists(path, "Cases file not found.")?;
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read cases file '{}': {err}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|err| format!("Failed to parse cases file '{}': {err}", path.display()))
}

fn resolve_out_path(repo_root: &Path, out: Option<&PathBuf>) -> PathBuf {
    if let Some(path) = out {
        return resolve_path(repo_root, path);
    }

    let run_id = Utc::now().format("%Y%m%dT%H%M%SZ");
    repo_root
        .join("target")
        .join("pronounce_reports")
        .join(format!("pronounce-report-{run_id}.json"))
}

fn resolve_path(repo_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn global_scorer_flags_parse_after_any_subcommand() {
        let args = Args::try_parse_from([
            "pronounce_report",
            "sentences",
            "--level",
            "advanced",
            "--dictionary",
            "missing.dict",
            "--alignment",
            "edit-distance",
        ])
        .expect("sentences args");
        assert!(matches!(
            args.command,
            Command::Sentences {
                level: LevelChoice::Advanced,
                category: CategoryChoice::Daily,
            }
        ));
        assert_eq!(args.scorer.dictionary, Some(PathBuf::from("missing.dict")));
        assert_eq!(args.scorer.alignment, Some(AlignmentChoice::EditDistance));
    }

    #[test]
    fn scorer_flags_are_resolved_only_when_building() {
        let args = Args::try_parse_from([
            "pronounce_report",
            "phonemes",
            "--text",
            "hello",
            "--dictionary",
            "/nonexistent/missing.dict",
        ])
        .expect("phonemes args");
        match build_scorer(&args.scorer) {
            Ok(_) => panic!("missing dictionary should fail"),
            Err(err) => assert!(err.contains("Pronunciation dictionary not found."), "{err}"),
        }
    }
}
