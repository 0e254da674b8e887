use std::path::Path;

use claxon::FlacReader;

use crate::error::ScoringError;
use crate::types::{AudioClip, ProsodyMetrics};

const FRAME_MS: f64 = 20.0;
const PITCH_WINDOW_MS: f64 = 40.0;
const BASELINE_FRAMES: usize = 10;
const MIN_VOICED_RMS: f64 = 0.01;
const NOISE_FLOOR_MULTIPLIER: f64 = 4.0;
const MIN_VOICED_RUN_FRAMES: usize = 2;
const MIN_PITCH_HZ: f64 = 60.0;
const MAX_PITCH_HZ: f64 = 400.0;
/// Normalized autocorrelation below this means the window is not periodic.
const VOICING_CORRELATION: f64 = 0.3;
/// The shortest lag within this fraction of the best peak wins, so octave
/// multiples of the period are not picked.
const PEAK_TOLERANCE: f64 = 0.9;

/// Decode a FLAC file to mono f32 PCM, averaging channels.
pub fn read_flac_mono(path: &Path) -> Result<AudioClip, ScoringError> {
    let mut reader = FlacReader::open(path).map_err(|err| {
        ScoringError::runtime("decode FLAC", format!("{}: {err}", path.display()))
    })?;
    let streaminfo = reader.streaminfo();
    let channels = streaminfo.channels as usize;
    let bits_per_sample = streaminfo.bits_per_sample as i32;
    let scale = if bits_per_sample > 1 {
        ((1_i64 << (bits_per_sample - 1)) - 1) as f32
    } else {
        1.0
    };
    let sample_rate_hz = streaminfo.sample_rate;

    if channels == 0 {
        return Err(ScoringError::invalid_input(format!(
            "FLAC has zero channels: {}",
            path.display()
        )));
    }

    let mut mono = Vec::new();
    let mut frame = Vec::with_capacity(channels);
    for sample in reader.samples() {
        let sample = sample.map_err(|err| {
            ScoringError::runtime("read FLAC sample", format!("{}: {err}", path.display()))
        })?;
        frame.push(sample as f32 / scale);
        if frame.len() == channels {
            mono.push(frame.iter().sum::<f32>() / channels as f32);
            frame.clear();
        }
    }
    Ok(AudioClip {
        sample_rate_hz,
        samples: mono,
    })
}

/// Estimate speaking rate, pitch variation and energy variation of a clip.
///
/// Frames are voiced when their RMS clears four times the noise floor of the
/// leading frames. Each run of at least two voiced frames counts as one
/// syllable-like peak for the speaking rate.
pub fn analyze_prosody(clip: &AudioClip) -> Result<ProsodyMetrics, ScoringError> {
    if clip.samples.is_empty() || clip.sample_rate_hz == 0 {
        return Err(ScoringError::invalid_input(
            "prosody analysis needs a non-empty clip with a sample rate",
        ));
    }
    let sample_rate = clip.sample_rate_hz as f64;
    let frame_len = window_len(sample_rate, FRAME_MS);
    let frame_rms: Vec<f64> = clip.samples.chunks(frame_len).map(rms).collect();
    let threshold = voiced_threshold(&frame_rms);

    let duration_sec = clip.samples.len() as f64 / sample_rate;
    let runs = count_voiced_runs(&frame_rms, threshold);
    let speaking_rate = runs as f64 / duration_sec;

    let pitch_len = window_len(sample_rate, PITCH_WINDOW_MS);
    let pitches: Vec<f64> = clip
        .samples
        .chunks(pitch_len)
        .filter(|window| rms(window) >= threshold)
        .filter_map(|window| estimate_pitch_hz(window, sample_rate))
        .collect();

    tracing::debug!(
        frames = frame_rms.len(),
        voiced_runs = runs,
        pitched_windows = pitches.len(),
        threshold,
        "prosody analysis"
    );

    ProsodyMetrics::new(
        round_to(speaking_rate, 2),
        round_to(std_dev(&pitches), 2),
        round_to(std_dev(&frame_rms), 4),
    )
}

fn window_len(sample_rate: f64, window_ms: f64) -> usize {
    ((sample_rate * window_ms) / 1000.0).round().max(1.0) as usize
}

fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq = samples.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>();
    (sum_sq / samples.len() as f64).sqrt()
}

fn voiced_threshold(frame_rms: &[f64]) -> f64 {
    let baseline_frames = frame_rms.len().min(BASELINE_FRAMES);
    if baseline_frames == 0 {
        return MIN_VOICED_RMS;
    }
    let noise_floor = frame_rms.iter().take(baseline_frames).sum::<f64>() / baseline_frames as f64;
    (noise_floor * NOISE_FLOOR_MULTIPLIER).max(MIN_VOICED_RMS)
}

fn count_voiced_runs(frame_rms: &[f64], threshold: f64) -> usize {
    let mut runs = 0usize;
    let mut run_len = 0usize;
    for &value in frame_rms {
        if value >= threshold {
            run_len += 1;
            if run_len == MIN_VOICED_RUN_FRAMES {
                runs += 1;
            }
            continue;
        }
        run_len = 0;
    }
    runs
}

/// Autocorrelation pitch estimate for one window, `None` when unvoiced.
fn estimate_pitch_hz(window: &[f32], sample_rate: f64) -> Option<f64> {
    let min_lag = (sample_rate / MAX_PITCH_HZ).floor().max(1.0) as usize;
    let max_lag = (sample_rate / MIN_PITCH_HZ).ceil() as usize;
    if window.len() <= max_lag + 1 {
        return None;
    }

    let correlations: Vec<f64> = (min_lag..=max_lag)
        .map(|lag| normalized_autocorrelation(window, lag))
        .collect();
    let best = correlations.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if best < VOICING_CORRELATION {
        return None;
    }

    let cutoff = best * PEAK_TOLERANCE;
    let peak = (0..correlations.len()).find(|&idx| {
        let value = correlations[idx];
        let left_ok = idx == 0 || value >= correlations[idx - 1];
        let right_ok = idx + 1 == correlations.len() || value >= correlations[idx + 1];
        value >= cutoff && left_ok && right_ok
    })?;
    Some(sample_rate / (min_lag + peak) as f64)
}

fn normalized_autocorrelation(window: &[f32], lag: usize) -> f64 {
    let mut cross = 0.0f64;
    let mut head_energy = 0.0f64;
    let mut tail_energy = 0.0f64;
    for (a, b) in window.iter().zip(window[lag..].iter()) {
        let (a, b) = (*a as f64, *b as f64);
        cross += a * b;
        head_energy += a * a;
        tail_energy += b * b;
    }
    let denom = (head_energy * tail_energy).sqrt();
    if denom <= f64::EPSILON {
        0.0
    } else {
        cross / denom
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    var.sqrt()
}

/// Exact decimal rounding with ties to even, matching `round1`.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
