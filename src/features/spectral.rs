use super::stats::{FeatureGroups, SUMMARY_WIDTH};
use crate::error::{PipelineError, PipelineResult};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::f64::consts::PI;

/// Analysis frame length in samples
pub const FRAME_LENGTH: usize = 2048;
/// Hop between analysis frames in samples
pub const HOP_LENGTH: usize = 512;
/// Mel bands feeding the cepstral coefficients and the onset envelope
pub const N_MELS: usize = 40;
/// Pitch classes in a chroma vector, starting at C
pub const N_CHROMA: usize = 12;
/// Median filter length, in frames and in bins, for harmonic/percussive separation
pub const HPSS_KERNEL: usize = 31;

const ROLLOFF_PERCENT: f64 = 0.85;
const POWER_FLOOR: f64 = 1e-10;
const WINDOW_FLOOR: f64 = 1e-3;
const CHROMA_MIN_HZ: f64 = 20.0;
const TEMPO_MIN_BPM: f64 = 30.0;
const TEMPO_MAX_BPM: f64 = 320.0;
const TEMPO_PRIOR_BPM: f64 = 120.0;
/// Fifths, minor thirds and major thirds as (angle per pitch class / pi, radius)
const TONNETZ_INTERVALS: [(f64, f64); 3] = [(7.0 / 6.0, 1.0), (3.0 / 2.0, 1.0), (2.0 / 3.0, 0.5)];
const TONNETZ_DIMS: usize = 2 * TONNETZ_INTERVALS.len();
const BASE_GROUPS: [&str; 10] = [
    "cstft",
    "rolloff",
    "specband",
    "speccent",
    "srms",
    "tempo",
    "tonnetz",
    "y_harmoic",
    "y_percussive",
    "zero_crossing_rate",
];
const SUMMARY_NAMES: [&str; SUMMARY_WIDTH] = ["min", "mean", "max", "var"];

/// Spectral shape, tonal, rhythmic and MFCC statistics over short-time frames
#[derive(Debug, Clone)]
pub struct SpectralExtractor {
    /// Number of cepstral coefficients
    n_mfcc: usize,
    /// Periodic Hann window of `FRAME_LENGTH` samples
    window: Vec<f32>,
}

impl SpectralExtractor {
    /// Create an extractor producing `n_mfcc` cepstral coefficients
    pub fn new(n_mfcc: usize) -> PipelineResult<Self> {
        if n_mfcc == 0 || n_mfcc > N_MELS {
            return Err(PipelineError::ConfigError(format!(
                "mfcc count must be between 1 and {}, got {}",
                N_MELS, n_mfcc
            )));
        }

        Ok(SpectralExtractor {
            n_mfcc,
            window: hann_window(FRAME_LENGTH),
        })
    }

    /// Column names in output order, e.g. `speccent_mean`
    pub fn column_names(&self) -> Vec<String> {
        let groups: BTreeSet<String> = BASE_GROUPS
            .iter()
            .map(|name| name.to_string())
            .chain((0..self.n_mfcc).map(|k| format!("mfcc_{k}")))
            .collect();

        groups
            .iter()
            .flat_map(|group| SUMMARY_NAMES.iter().map(move |stat| format!("{group}_{stat}")))
            .collect()
    }
}

impl super::FeatureExtractor for SpectralExtractor {
    fn width(&self) -> usize {
        (BASE_GROUPS.len() + self.n_mfcc) * SUMMARY_WIDTH
    }

    fn extract(&self, samples: &[f32], sample_rate: u32) -> PipelineResult<Vec<f64>> {
        if sample_rate == 0 {
            return Err(PipelineError::InvalidSampleRate { rate: 0 });
        }
        if samples.is_empty() {
            return Err(PipelineError::ExtractError("empty segment".to_string()));
        }

        let span = frame_span(samples.len());
        let padded: Cow<[f32]> = if span > samples.len() {
            let mut owned = samples.to_vec();
            owned.resize(span, 0.0);
            Cow::Owned(owned)
        } else {
            Cow::Borrowed(samples)
        };

        let num_frames = 1 + (span - FRAME_LENGTH) / HOP_LENGTH;
        let bins = FRAME_LENGTH / 2 + 1;
        let freqs: Vec<f64> = (0..bins)
            .map(|k| k as f64 * sample_rate as f64 / FRAME_LENGTH as f64)
            .collect();
        let filterbank = mel_filterbank(sample_rate, &freqs);
        let pitch_classes: Vec<Option<usize>> = freqs.iter().map(|&f| pitch_class(f)).collect();

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(FRAME_LENGTH);
        let ifft = planner.plan_fft_inverse(FRAME_LENGTH);

        let mut rms = Vec::with_capacity(num_frames);
        let mut zcr = Vec::with_capacity(num_frames);
        let mut centroid = Vec::with_capacity(num_frames);
        let mut bandwidth = Vec::with_capacity(num_frames);
        let mut rolloff = Vec::with_capacity(num_frames);
        let mut chroma = Vec::with_capacity(num_frames * N_CHROMA);
        let mut tonal = Vec::with_capacity(num_frames * TONNETZ_DIMS);
        let mut onset = Vec::with_capacity(num_frames);
        let mut mfcc: Vec<Vec<f64>> = vec![Vec::with_capacity(num_frames); self.n_mfcc];
        let mut spectrogram: Vec<f32> = Vec::with_capacity(num_frames * bins);

        let mut buffer = vec![Complex::new(0.0f32, 0.0); FRAME_LENGTH];
        let mut magnitude = vec![0.0f64; bins];
        let mut mel_db = vec![0.0f64; N_MELS];
        let mut previous_mel_db = vec![0.0f64; N_MELS];

        for frame_idx in 0..num_frames {
            let start = frame_idx * HOP_LENGTH;
            let frame = &padded[start..start + FRAME_LENGTH];

            rms.push(frame_rms(frame));
            zcr.push(zero_crossing_rate(frame));

            for (slot, (&sample, &weight)) in buffer.iter_mut().zip(frame.iter().zip(&self.window)) {
                *slot = Complex::new(sample * weight, 0.0);
            }
            fft.process(&mut buffer);
            for (m, c) in magnitude.iter_mut().zip(&buffer[..bins]) {
                *m = c.norm() as f64;
            }
            spectrogram.extend(magnitude.iter().map(|&m| m as f32));

            let (cent, bw) = centroid_bandwidth(&magnitude, &freqs);
            centroid.push(cent);
            bandwidth.push(bw);
            rolloff.push(spectral_rolloff(&magnitude, &freqs));

            let frame_chroma = chroma_frame(&magnitude, &pitch_classes);
            tonal.extend(tonnetz(&frame_chroma));
            chroma.extend(frame_chroma);

            for (band, weights) in mel_db.iter_mut().zip(&filterbank) {
                let energy: f64 = weights
                    .iter()
                    .zip(&magnitude)
                    .map(|(w, m)| w * m * m)
                    .sum();
                *band = 10.0 * energy.max(POWER_FLOOR).log10();
            }
            for (k, series) in mfcc.iter_mut().enumerate() {
                series.push(dct_coefficient(&mel_db, k));
            }

            // Spectral flux: mean positive rise of the log-mel bands
            let flux = if frame_idx == 0 {
                0.0
            } else {
                mel_db
                    .iter()
                    .zip(&previous_mel_db)
                    .map(|(now, before)| (now - before).max(0.0))
                    .sum::<f64>()
                    / N_MELS as f64
            };
            onset.push(flux);
            previous_mel_db.copy_from_slice(&mel_db);
        }

        let masks = harmonic_masks(&spectrogram, num_frames, bins);
        drop(spectrogram);
        let (harmonic, percussive) = resynthesize(
            &padded,
            &self.window,
            &masks,
            bins,
            fft.as_ref(),
            ifft.as_ref(),
            samples.len(),
        );

        let mut groups = FeatureGroups::new();
        groups.insert("cstft", chroma);
        groups.insert("rolloff", rolloff);
        groups.insert("specband", bandwidth);
        groups.insert("speccent", centroid);
        groups.insert("srms", rms);
        groups.insert("tempo", [estimate_tempo(&onset, sample_rate)]);
        groups.insert("tonnetz", tonal);
        groups.insert("y_harmoic", harmonic);
        groups.insert("y_percussive", percussive);
        groups.insert("zero_crossing_rate", zcr);
        for (k, series) in mfcc.into_iter().enumerate() {
            groups.insert(format!("mfcc_{k}"), series);
        }

        Ok(groups.flatten())
    }
}

/// Samples covered by whole frames over a `len`-sample segment, at least one frame
fn frame_span(len: usize) -> usize {
    if len <= FRAME_LENGTH {
        FRAME_LENGTH
    } else {
        FRAME_LENGTH + (len - FRAME_LENGTH).div_ceil(HOP_LENGTH) * HOP_LENGTH
    }
}

/// Generate a periodic Hann window
fn hann_window(length: usize) -> Vec<f32> {
    (0..length)
        .map(|i| (0.5 - 0.5 * ((2.0 * PI * i as f64) / length as f64).cos()) as f32)
        .collect()
}

fn frame_rms(frame: &[f32]) -> f64 {
    let sum_squared: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squared / frame.len() as f64).sqrt()
}

fn zero_crossing_rate(frame: &[f32]) -> f64 {
    let crossings = frame
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f64 / frame.len() as f64
}

/// Magnitude-weighted mean frequency and spread around it
fn centroid_bandwidth(magnitude: &[f64], freqs: &[f64]) -> (f64, f64) {
    let total: f64 = magnitude.iter().sum();
    if total <= 0.0 {
        return (0.0, 0.0);
    }

    let centroid = magnitude.iter().zip(freqs).map(|(m, f)| m * f).sum::<f64>() / total;
    let spread = magnitude
        .iter()
        .zip(freqs)
        .map(|(m, f)| m * (f - centroid) * (f - centroid))
        .sum::<f64>()
        / total;

    (centroid, spread.sqrt())
}

/// Lowest frequency below which `ROLLOFF_PERCENT` of the magnitude lies
fn spectral_rolloff(magnitude: &[f64], freqs: &[f64]) -> f64 {
    let total: f64 = magnitude.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let threshold = ROLLOFF_PERCENT * total;
    let mut cumulative = 0.0;
    for (m, f) in magnitude.iter().zip(freqs) {
        cumulative += m;
        if cumulative >= threshold {
            return *f;
        }
    }
    freqs.last().copied().unwrap_or(0.0)
}

fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular HTK mel filters from 0 Hz to Nyquist, one row per band
fn mel_filterbank(sample_rate: u32, freqs: &[f64]) -> Vec<Vec<f64>> {
    let max_mel = hz_to_mel(sample_rate as f64 / 2.0);
    let points: Vec<f64> = (0..N_MELS + 2)
        .map(|i| mel_to_hz(max_mel * i as f64 / (N_MELS + 1) as f64))
        .collect();

    (0..N_MELS)
        .map(|band| {
            let (lower, center, upper) = (points[band], points[band + 1], points[band + 2]);
            freqs
                .iter()
                .map(|&f| {
                    let rising = (f - lower) / (center - lower);
                    let falling = (upper - f) / (upper - center);
                    rising.min(falling).max(0.0)
                })
                .collect()
        })
        .collect()
}

/// Orthonormal DCT-II coefficient `k` of the log-mel spectrum
fn dct_coefficient(mel_db: &[f64], k: usize) -> f64 {
    let n = mel_db.len() as f64;
    let scale = if k == 0 {
        (1.0 / n).sqrt()
    } else {
        (2.0 / n).sqrt()
    };
    let sum: f64 = mel_db
        .iter()
        .enumerate()
        .map(|(i, x)| x * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos())
        .sum();
    scale * sum
}

/// Pitch class of a frequency (C = 0), none below the audible range
fn pitch_class(freq: f64) -> Option<usize> {
    if freq < CHROMA_MIN_HZ {
        return None;
    }
    let midi = 69.0 + 12.0 * (freq / 440.0).log2();
    Some((midi.round() as i64).rem_euclid(N_CHROMA as i64) as usize)
}

/// Spectral power folded onto pitch classes, scaled so the loudest is 1
fn chroma_frame(magnitude: &[f64], pitch_classes: &[Option<usize>]) -> [f64; N_CHROMA] {
    let mut chroma = [0.0; N_CHROMA];
    for (m, class) in magnitude.iter().zip(pitch_classes) {
        if let Some(class) = class {
            chroma[*class] += m * m;
        }
    }

    let peak = chroma.iter().copied().fold(0.0, f64::max);
    if peak > 0.0 {
        for value in &mut chroma {
            *value /= peak;
        }
    }
    chroma
}

/// Tonal centroid of a chroma vector in the 6-D tonnetz space
fn tonnetz(chroma: &[f64; N_CHROMA]) -> [f64; TONNETZ_DIMS] {
    let mut centroid = [0.0; TONNETZ_DIMS];
    let total: f64 = chroma.iter().sum();
    if total <= 0.0 {
        return centroid;
    }

    for (pitch, &energy) in chroma.iter().enumerate() {
        let weight = energy / total;
        for (dim, &(step, radius)) in TONNETZ_INTERVALS.iter().enumerate() {
            let angle = PI * step * pitch as f64;
            centroid[2 * dim] += weight * radius * angle.sin();
            centroid[2 * dim + 1] += weight * radius * angle.cos();
        }
    }
    centroid
}

fn median(values: &mut [f32]) -> f32 {
    let mid = values.len() / 2;
    let (_, value, _) = values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    *value
}

/// Soft harmonic mask per time-frequency cell.
///
/// Harmonic energy is the median across neighbouring frames, percussive energy
/// the median across neighbouring bins; the mask is `H^2 / (H^2 + P^2)`.
fn harmonic_masks(spectrogram: &[f32], num_frames: usize, bins: usize) -> Vec<f32> {
    let half = HPSS_KERNEL / 2;
    let mut masks = Vec::with_capacity(spectrogram.len());
    let mut window = Vec::with_capacity(HPSS_KERNEL);

    for t in 0..num_frames {
        let frames = t.saturating_sub(half)..(t + half + 1).min(num_frames);
        let row = &spectrogram[t * bins..(t + 1) * bins];

        for k in 0..bins {
            window.clear();
            window.extend(frames.clone().map(|u| spectrogram[u * bins + k]));
            let harmonic = median(&mut window) as f64;

            window.clear();
            window.extend_from_slice(&row[k.saturating_sub(half)..(k + half + 1).min(bins)]);
            let percussive = median(&mut window) as f64;

            let (h, p) = (harmonic * harmonic, percussive * percussive);
            masks.push(if h + p > 0.0 { (h / (h + p)) as f32 } else { 0.5 });
        }
    }
    masks
}

/// Apply the harmonic mask and its complement to every frame and overlap-add
/// both parts back to `len` samples
fn resynthesize(
    padded: &[f32],
    window: &[f32],
    masks: &[f32],
    bins: usize,
    fft: &dyn Fft<f32>,
    ifft: &dyn Fft<f32>,
    len: usize,
) -> (Vec<f64>, Vec<f64>) {
    let num_frames = masks.len() / bins;
    let mut harmonic = vec![0.0f64; padded.len()];
    let mut percussive = vec![0.0f64; padded.len()];
    let mut norm = vec![0.0f64; padded.len()];

    let mut spectrum = vec![Complex::new(0.0f32, 0.0); FRAME_LENGTH];
    let mut harmonic_buf = spectrum.clone();
    let mut percussive_buf = spectrum.clone();
    let scale = 1.0 / FRAME_LENGTH as f64;

    for t in 0..num_frames {
        let start = t * HOP_LENGTH;
        let frame = &padded[start..start + FRAME_LENGTH];
        for (slot, (&sample, &weight)) in spectrum.iter_mut().zip(frame.iter().zip(window)) {
            *slot = Complex::new(sample * weight, 0.0);
        }
        fft.process(&mut spectrum);

        // Bins above Nyquist mirror the ones below
        let mask = &masks[t * bins..(t + 1) * bins];
        for (k, value) in spectrum.iter().enumerate() {
            let m = mask[k.min(FRAME_LENGTH - k)];
            harmonic_buf[k] = *value * m;
            percussive_buf[k] = *value * (1.0 - m);
        }
        ifft.process(&mut harmonic_buf);
        ifft.process(&mut percussive_buf);

        for (i, &weight) in window.iter().enumerate() {
            let weight = weight as f64;
            harmonic[start + i] += harmonic_buf[i].re as f64 * scale * weight;
            percussive[start + i] += percussive_buf[i].re as f64 * scale * weight;
            norm[start + i] += weight * weight;
        }
    }

    for ((h, p), &n) in harmonic.iter_mut().zip(&mut percussive).zip(&norm) {
        if n > WINDOW_FLOOR {
            *h /= n;
            *p /= n;
        } else {
            *h = 0.0;
            *p = 0.0;
        }
    }

    harmonic.truncate(len);
    percussive.truncate(len);
    (harmonic, percussive)
}

/// Tempo in whole BPM from the autocorrelation of the onset envelope,
/// weighted by a log-normal prior around 120 BPM.
///
/// Zero when the envelope is too short to hold one beat period or has no
/// onsets.
fn estimate_tempo(onset: &[f64], sample_rate: u32) -> f64 {
    let frame_rate = sample_rate as f64 / HOP_LENGTH as f64;
    let min_lag = ((60.0 * frame_rate / TEMPO_MAX_BPM).ceil() as usize).max(1);
    let max_lag = ((60.0 * frame_rate / TEMPO_MIN_BPM).floor() as usize)
        .min(onset.len().saturating_sub(1));

    let mut best_score = 0.0;
    let mut best_bpm = 0.0;
    for lag in min_lag..=max_lag {
        let correlation: f64 = onset.iter().zip(&onset[lag..]).map(|(a, b)| a * b).sum();
        let bpm = 60.0 * frame_rate / lag as f64;
        let prior = (-0.5 * (bpm / TEMPO_PRIOR_BPM).log2().powi(2)).exp();
        let score = correlation * prior;
        if score > best_score {
            best_score = score;
            best_bpm = bpm;
        }
    }
    best_bpm.round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureExtractor;

    fn sine(freq: f64, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (2.0 * PI * freq * n as f64 / sample_rate as f64).sin() as f32 * 0.5)
            .collect()
    }

    fn column(extractor: &SpectralExtractor, name: &str) -> usize {
        extractor
            .column_names()
            .iter()
            .position(|c| c == name)
            .unwrap()
    }

    #[test]
    fn test_width_matches_output() {
        let extractor = SpectralExtractor::new(20).unwrap();
        assert_eq!(extractor.width(), 120);
        assert_eq!(extractor.column_names().len(), 120);

        let values = extractor.extract(&sine(440.0, 16000, 16000), 16000).unwrap();
        assert_eq!(values.len(), extractor.width());
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_invalid_mfcc_count() {
        assert!(SpectralExtractor::new(0).is_err());
        assert!(SpectralExtractor::new(N_MELS + 1).is_err());
    }

    #[test]
    fn test_column_order_is_sorted() {
        let extractor = SpectralExtractor::new(12).unwrap();
        let names = extractor.column_names();
        assert_eq!(names[0], "cstft_min");
        assert_eq!(names[4], "mfcc_0_min");
        assert_eq!(names[12], "mfcc_10_min");
        assert_eq!(names[68], "tempo_min");
        assert_eq!(names.last().unwrap(), "zero_crossing_rate_var");
    }

    #[test]
    fn test_centroid_tracks_tone() {
        let extractor = SpectralExtractor::new(13).unwrap();
        let values = extractor.extract(&sine(1000.0, 16000, 16000), 16000).unwrap();

        let centroid = values[column(&extractor, "speccent_mean")];
        assert!((centroid - 1000.0).abs() < 150.0, "centroid {centroid}");

        let rms = values[column(&extractor, "srms_mean")];
        assert!((rms - 0.5 / 2f64.sqrt()).abs() < 0.01, "rms {rms}");
    }

    #[test]
    fn test_deterministic() {
        let extractor = SpectralExtractor::new(20).unwrap();
        let samples = sine(220.0, 22050, 30000);
        let a = extractor.extract(&samples, 22050).unwrap();
        let b = extractor.extract(&samples, 22050).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_segment_is_padded() {
        let extractor = SpectralExtractor::new(20).unwrap();
        let values = extractor.extract(&sine(440.0, 8000, 300), 8000).unwrap();
        assert_eq!(values.len(), extractor.width());
    }

    #[test]
    fn test_silence_is_finite() {
        let extractor = SpectralExtractor::new(20).unwrap();
        let values = extractor.extract(&vec![0.0; 5000], 8000).unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_rejects_empty_and_zero_rate() {
        let extractor = SpectralExtractor::new(20).unwrap();
        assert!(matches!(
            extractor.extract(&[], 8000),
            Err(PipelineError::ExtractError(_))
        ));
        assert!(extractor.extract(&[0.1, 0.2], 0).is_err());
    }

    #[test]
    fn test_pitch_class() {
        assert_eq!(pitch_class(440.0), Some(9));
        assert_eq!(pitch_class(261.63), Some(0));
        assert_eq!(pitch_class(880.0), Some(9));
        assert_eq!(pitch_class(10.0), None);
    }

    #[test]
    fn test_chroma_peaks_at_one() {
        let extractor = SpectralExtractor::new(13).unwrap();
        let values = extractor.extract(&sine(440.0, 16000, 16000), 16000).unwrap();
        let peak = values[column(&extractor, "cstft_max")];
        assert!((peak - 1.0).abs() < 1e-9, "chroma max {peak}");
    }

    #[test]
    fn test_tonnetz_of_single_pitch() {
        let mut chroma = [0.0; N_CHROMA];
        chroma[0] = 1.0;
        let centroid = tonnetz(&chroma);
        let expected = [0.0, 1.0, 0.0, 1.0, 0.0, 0.5];
        for (got, want) in centroid.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
        assert_eq!(tonnetz(&[0.0; N_CHROMA]), [0.0; TONNETZ_DIMS]);
    }

    #[test]
    fn test_steady_tone_is_harmonic() {
        let extractor = SpectralExtractor::new(13).unwrap();
        let values = extractor.extract(&sine(1000.0, 16000, 32000), 16000).unwrap();
        let harmonic = values[column(&extractor, "y_harmoic_var")];
        let percussive = values[column(&extractor, "y_percussive_var")];
        assert!(harmonic > 0.05, "harmonic var {harmonic}");
        assert!(harmonic > 10.0 * percussive, "{harmonic} vs {percussive}");
    }

    #[test]
    fn test_clicks_are_percussive() {
        let extractor = SpectralExtractor::new(13).unwrap();
        let clicks: Vec<f32> = (0..32000)
            .map(|n| if n % 8000 == 4000 { 1.0 } else { 0.0 })
            .collect();
        let values = extractor.extract(&clicks, 16000).unwrap();
        let harmonic = values[column(&extractor, "y_harmoic_var")];
        let percussive = values[column(&extractor, "y_percussive_var")];
        assert!(percussive > 10.0 * harmonic, "{percussive} vs {harmonic}");
    }

    #[test]
    fn test_tempo_from_onset_train() {
        let sample_rate = 22050;
        let frame_rate = sample_rate as f64 / HOP_LENGTH as f64;
        let onset: Vec<f64> = (0..440).map(|t| if t % 22 == 0 { 1.0 } else { 0.0 }).collect();

        let tempo = estimate_tempo(&onset, sample_rate);
        assert_eq!(tempo, (60.0 * frame_rate / 22.0).round());
    }

    #[test]
    fn test_tempo_needs_onsets() {
        assert_eq!(estimate_tempo(&[0.0; 400], 22050), 0.0);
        assert_eq!(estimate_tempo(&[1.0], 22050), 0.0);
    }

    #[test]
    fn test_tempo_summary_is_constant() {
        let extractor = SpectralExtractor::new(13).unwrap();
        let values = extractor.extract(&sine(440.0, 8000, 24000), 8000).unwrap();
        let at = column(&extractor, "tempo_min");
        assert_eq!(values[at], values[at + 2]);
        assert_eq!(values[at + 3], 0.0);
    }
}
