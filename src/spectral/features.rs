// Per-frame spectral feature extraction
//
// This module produces the feature arrays the event pipeline aligns peaks
// against: spectral centroid, spectral rolloff, zero-crossing rate, and MFCC,
// one value (or coefficient vector) per hop-aligned frame.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

use super::fft::FftProcessor;

/// Spectral rolloff threshold (85% of spectral energy)
const ROLLOFF_THRESHOLD: f32 = 0.85;

/// Number of MFCC coefficients per frame
pub const MFCC_COEFFICIENTS: usize = 13;

/// Number of triangular mel filters
const MEL_BANDS: usize = 26;

/// Per-frame feature arrays aligned to one hop length
///
/// All arrays share the same frame indexing; `mfcc` is frame-major with
/// `MFCC_COEFFICIENTS` values per frame.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    pub centroid: Vec<f32>,
    pub rolloff: Vec<f32>,
    pub zcr: Vec<f32>,
    pub mfcc: Vec<Vec<f32>>,
}

impl FeatureSet {
    /// Number of analysis frames represented
    pub fn len(&self) -> usize {
        self.centroid.len()
    }

    /// True when no frames were analyzed
    pub fn is_empty(&self) -> bool {
        self.centroid.is_empty()
    }

    /// Mean spectral centroid across frames (0.0 when empty)
    pub fn mean_centroid(&self) -> f32 {
        mean(&self.centroid)
    }

    /// Mean spectral rolloff across frames (0.0 when empty)
    pub fn mean_rolloff(&self) -> f32 {
        mean(&self.rolloff)
    }

    /// Mean zero-crossing rate across frames (0.0 when empty)
    pub fn mean_zcr(&self) -> f32 {
        mean(&self.zcr)
    }

    /// Per-coefficient MFCC means across frames
    ///
    /// Always `MFCC_COEFFICIENTS` values; all zero when no frames exist.
    pub fn mean_mfcc(&self) -> Vec<f32> {
        let mut means = vec![0.0f32; MFCC_COEFFICIENTS];
        if self.mfcc.is_empty() {
            return means;
        }
        for frame in &self.mfcc {
            for (mean, &value) in means.iter_mut().zip(frame.iter()) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= self.mfcc.len() as f32;
        }
        means
    }
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Extracts hop-aligned per-frame features from a waveform
pub struct SpectrumAnalyzer {
    sample_rate: u32,
    hop_length: usize,
    fft: FftProcessor,
    mel: MelBank,
}

impl SpectrumAnalyzer {
    /// Create an analyzer for the given sample rate and hop length
    pub fn new(sample_rate: u32, fft_size: usize, hop_length: usize) -> Self {
        let mel = MelBank::new(sample_rate, fft_size, MEL_BANDS, MFCC_COEFFICIENTS);
        Self {
            sample_rate,
            hop_length: hop_length.max(1),
            fft: FftProcessor::new(fft_size),
            mel,
        }
    }

    /// Extract all per-frame feature arrays from a signal
    ///
    /// Frame offsets advance by the hop length starting at 0 while they fall
    /// inside the signal, so the arrays index-align with an energy envelope
    /// computed at the same hop. Returns empty arrays for an empty signal.
    pub fn extract(&self, samples: &[f32]) -> FeatureSet {
        let mut features = FeatureSet::default();

        let mut offset = 0;
        while offset < samples.len() {
            let end = (offset + self.fft.fft_size()).min(samples.len());
            let frame = &samples[offset..end];

            let spectrum = self.fft.magnitude_spectrum(frame);
            features.centroid.push(self.centroid(&spectrum));
            features.rolloff.push(self.rolloff(&spectrum));
            features.zcr.push(zero_crossing_rate(frame));

            let power: Vec<f32> = spectrum.iter().map(|&m| m * m).collect();
            features.mfcc.push(self.mel.mfcc_from_power(&power));

            offset += self.hop_length;
        }

        features
    }

    /// Spectral centroid: energy-weighted mean frequency of one spectrum
    ///
    /// centroid = sum(f_k * |X[k]|) / sum(|X[k]|), 0.0 for a silent frame.
    fn centroid(&self, spectrum: &[f32]) -> f32 {
        let bin_width = self.sample_rate as f32 / self.fft.fft_size() as f32;

        let weighted_sum: f32 = spectrum
            .iter()
            .enumerate()
            .map(|(k, &mag)| k as f32 * bin_width * mag)
            .sum();
        let magnitude_sum: f32 = spectrum.iter().sum();

        if magnitude_sum > 1e-10 {
            weighted_sum / magnitude_sum
        } else {
            0.0
        }
    }

    /// Spectral rolloff: frequency below which 85% of the energy lies
    fn rolloff(&self, spectrum: &[f32]) -> f32 {
        let total_energy: f32 = spectrum.iter().map(|&mag| mag * mag).sum();
        if total_energy < 1e-10 {
            return 0.0;
        }

        let threshold = ROLLOFF_THRESHOLD * total_energy;
        let bin_width = self.sample_rate as f32 / self.fft.fft_size() as f32;

        let mut cumulative = 0.0;
        for (k, &mag) in spectrum.iter().enumerate() {
            cumulative += mag * mag;
            if cumulative >= threshold {
                return k as f32 * bin_width;
            }
        }

        (spectrum.len() - 1) as f32 * bin_width
    }
}

/// Zero-crossing rate: fraction of sign changes per frame (0.0 to 1.0)
pub fn zero_crossing_rate(frame: &[f32]) -> f32 {
    if frame.len() < 2 {
        return 0.0;
    }

    let mut crossings = 0;
    for i in 1..frame.len() {
        if (frame[i] >= 0.0 && frame[i - 1] < 0.0) || (frame[i] < 0.0 && frame[i - 1] >= 0.0) {
            crossings += 1;
        }
    }

    crossings as f32 / (frame.len() - 1) as f32
}

/// Triangular mel filterbank with DCT-II for MFCC computation
struct MelBank {
    coefficients: usize,
    filters: Vec<Vec<(usize, f32)>>,
}

impl MelBank {
    fn new(sample_rate: u32, fft_size: usize, mel_bands: usize, coefficients: usize) -> Self {
        let nyquist = sample_rate.max(1) as f32 * 0.5;
        let mel_max = hz_to_mel(nyquist);

        // Band edge frequencies, equally spaced on the mel scale
        let bins: Vec<usize> = (0..mel_bands + 2)
            .map(|i| {
                let mel = mel_max * i as f32 / (mel_bands + 1) as f32;
                let hz = mel_to_hz(mel).clamp(0.0, nyquist);
                (((hz * fft_size as f32) / sample_rate.max(1) as f32).floor() as usize)
                    .min(fft_size / 2)
            })
            .collect();

        let mut filters = Vec::with_capacity(mel_bands);
        for m in 0..mel_bands {
            let left = bins[m];
            let center = bins[m + 1];
            let right = bins[m + 2].max(center + 1);
            filters.push(triangular_filter(left, center, right));
        }

        Self {
            coefficients,
            filters,
        }
    }

    /// MFCC vector for one power spectrum
    fn mfcc_from_power(&self, power: &[f32]) -> Vec<f32> {
        let log_energies: Vec<f32> = self
            .filters
            .iter()
            .map(|filter| {
                let energy: f64 = filter
                    .iter()
                    .map(|&(bin, weight)| {
                        power.get(bin).copied().unwrap_or(0.0).max(0.0) as f64 * weight as f64
                    })
                    .sum();
                (energy.max(1e-12) as f32).ln()
            })
            .collect();

        dct_ii(&log_energies, self.coefficients)
    }
}

fn triangular_filter(left: usize, center: usize, right: usize) -> Vec<(usize, f32)> {
    let mut weights = Vec::new();
    if right <= left {
        return weights;
    }
    for bin in left..=right {
        let w = if bin < center {
            if center == left {
                0.0
            } else {
                (bin - left) as f32 / (center - left) as f32
            }
        } else if right == center {
            0.0
        } else {
            (right - bin) as f32 / (right - center) as f32
        };
        if w > 0.0 {
            weights.push((bin, w));
        }
    }
    weights
}

fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

fn dct_ii(values: &[f32], count: usize) -> Vec<f32> {
    let n = values.len().max(1) as f64;
    (0..count)
        .map(|k| {
            values
                .iter()
                .enumerate()
                .map(|(m, &v)| {
                    let angle = std::f64::consts::PI * k as f64 * (m as f64 + 0.5) / n;
                    v as f64 * angle.cos()
                })
                .sum::<f64>() as f32
        })
        .collect()
}
