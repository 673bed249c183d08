// Report assembly - event records, spectrum summary, and the result model
//
// Converts raw peak/feature values into rounded, unit-labeled event records,
// ranks and truncates them, and down-samples the full-signal magnitude into
// the frequency-spectrum summary. Field spellings follow the report's JSON
// exchange format (camelCase header keys, "type" on events).

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::analysis::classify::{classify_basic, classify_extended, SoundClass, SpectralSample};
use crate::config::ClassifierPolicy;
use crate::error::AnalysisError;
use crate::spectral::FeatureSet;

/// Round to a fixed number of decimal places for report output
pub(crate) fn round_to(value: f32, decimals: u32) -> f32 {
    let factor = 10f32.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Decibel level with an explicit silence sentinel
///
/// `Silent` stands in for the negative-infinity level of a zero amplitude, so
/// serialization never has to special-case float infinities. It serializes as
/// the JSON string "-inf"; levels serialize as plain numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decibels {
    /// No signal; the mathematical level would be negative infinity
    Silent,
    /// Finite level in dB
    Level(f32),
}

impl Decibels {
    /// Convert a linear amplitude to a decibel level rounded to 1 decimal
    ///
    /// Zero or negative amplitude maps to the `Silent` sentinel.
    pub fn from_amplitude(amplitude: f32) -> Self {
        if amplitude > 0.0 {
            Decibels::Level(round_to(20.0 * amplitude.log10(), 1))
        } else {
            Decibels::Silent
        }
    }

    /// True for the silence sentinel
    pub fn is_silent(&self) -> bool {
        matches!(self, Decibels::Silent)
    }
}

impl Serialize for Decibels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Decibels::Silent => serializer.serialize_str("-inf"),
            Decibels::Level(db) => serializer.serialize_f32(*db),
        }
    }
}

impl<'de> Deserialize<'de> for Decibels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Level(f32),
            Sentinel(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Level(db) => Ok(Decibels::Level(db)),
            Repr::Sentinel(s) if s == "-inf" => Ok(Decibels::Silent),
            Repr::Sentinel(s) => Err(D::Error::custom(format!(
                "invalid decibel sentinel '{}'",
                s
            ))),
        }
    }
}

/// One detected sound event
///
/// The confidence, rolloff, and zero-crossing fields are populated by the
/// extended policy only and omitted from JSON otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundEvent {
    /// Time position in seconds
    pub time: f32,
    /// Dominant frequency (spectral centroid) at the peak in Hz
    pub frequency: f32,
    /// Normalized energy at the peak (0.0 to 1.0)
    pub amplitude: f32,
    /// Classified sound type
    #[serde(rename = "type")]
    pub sound_type: SoundClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Level derived from the normalized amplitude
    pub decibels: Decibels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectral_rolloff: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_crossing_rate: Option<f32>,
}

/// One point of the down-sampled frequency-spectrum summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPoint {
    /// Bin frequency in Hz
    pub frequency: f32,
    /// Magnitude normalized by the global maximum (0.0 to 1.0)
    pub magnitude: f32,
}

/// Time-frequency heatmap payload for downstream rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPayload {
    /// Bin-major dB matrix: z[k][t] is frequency bin k at frame t
    pub z: Vec<Vec<f32>>,
    /// Frame times in seconds
    pub x: Vec<f32>,
    /// Bin frequencies in Hz
    pub y: Vec<f32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub colorscale: String,
    pub title: String,
}

/// Frequency-magnitude curve payload (positive half of the full transform)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePayload {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    pub title: String,
}

/// Energy-envelope payload with the selected peaks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPayload {
    /// Normalized energy envelope
    pub energy: Vec<f32>,
    /// Selected peak frame indices
    pub peaks: Vec<usize>,
    /// Envelope values at the selected peaks
    pub peak_values: Vec<f32>,
    /// Frame index axis (0..envelope length)
    pub frames: Vec<usize>,
}

/// Visualization payloads attached to the live report variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualizations {
    pub stft: HeatmapPayload,
    pub spectrogram: HeatmapPayload,
    pub fft: CurvePayload,
    pub energy: EnergyPayload,
}

/// Mean spectral-feature summary attached to the live report variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectralSummary {
    pub mean_spectral_centroid: f32,
    pub mean_spectral_rolloff: f32,
    pub mean_zero_crossing_rate: f32,
    pub mfcc_mean: Vec<f32>,
}

/// Complete forensic analysis result
///
/// Produced once per call and never mutated afterwards; this is the sole
/// externally visible artifact of the pipeline. The `visualizations`,
/// `spectral_features`, and `analysis_type` fields belong to the live variant
/// and are omitted from the standard report's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Signal duration in seconds
    pub duration: f32,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Mean windowed RMS energy
    #[serde(rename = "averageRMS")]
    pub average_rms: f32,
    /// Number of detected peaks (before top-N truncation)
    pub detected_sounds: usize,
    /// Mean spectral centroid in Hz
    pub dominant_frequency: f32,
    /// Level of the loudest sample
    pub max_decibels: Decibels,
    /// Detected events, loudest first, truncated to the configured top-N
    pub sound_events: Vec<SoundEvent>,
    /// Down-sampled frequency-spectrum summary
    pub frequency_spectrum: Vec<SpectrumPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualizations: Option<Visualizations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectral_features: Option<SpectralSummary>,
    pub analysis_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
}

/// Feature value for a peak, clamped to the last valid frame
///
/// Feature arrays may be shorter than the energy envelope; a peak index past
/// the end resolves to the final value instead of being dropped. An empty
/// array while a peak exists is the one unexpected condition surfaced as an
/// error.
pub(crate) fn aligned_value(
    values: &[f32],
    peak: usize,
    feature: &str,
) -> Result<f32, AnalysisError> {
    values
        .get(peak.min(values.len().saturating_sub(1)))
        .copied()
        .ok_or_else(|| AnalysisError::FeatureArrayEmpty {
            feature: feature.to_string(),
        })
}

/// Build the ranked, truncated sound-event list for a set of peaks
///
/// Events are created in peak (time) order, stably sorted by amplitude
/// descending so exact ties preserve that order, then truncated to `top_n`.
pub(crate) fn build_events(
    peaks: &[usize],
    envelope: &[f32],
    features: &FeatureSet,
    hop_length: usize,
    sample_rate: u32,
    policy: ClassifierPolicy,
    top_n: usize,
) -> Result<Vec<SoundEvent>, AnalysisError> {
    let mut events = Vec::with_capacity(peaks.len());

    for &peak in peaks {
        let time = peak as f32 * hop_length as f32 / sample_rate as f32;
        let amplitude = envelope[peak];
        let centroid = aligned_value(&features.centroid, peak, "centroid")?;

        let event = match policy {
            ClassifierPolicy::Basic => SoundEvent {
                time: round_to(time, 2),
                frequency: round_to(centroid, 1),
                amplitude: round_to(amplitude, 3),
                sound_type: classify_basic(centroid),
                confidence: None,
                decibels: Decibels::from_amplitude(amplitude),
                spectral_rolloff: None,
                zero_crossing_rate: None,
            },
            ClassifierPolicy::Extended => {
                let rolloff = aligned_value(&features.rolloff, peak, "rolloff")?;
                let zcr = aligned_value(&features.zcr, peak, "zero_crossing_rate")?;
                let sample = SpectralSample {
                    centroid,
                    rolloff,
                    zcr,
                };
                let (sound_type, confidence) = classify_extended(&sample);
                SoundEvent {
                    time: round_to(time, 2),
                    frequency: round_to(centroid, 1),
                    amplitude: round_to(amplitude, 3),
                    sound_type,
                    confidence: Some(round_to(confidence, 3)),
                    decibels: Decibels::from_amplitude(amplitude),
                    spectral_rolloff: Some(round_to(rolloff, 1)),
                    zero_crossing_rate: Some(round_to(zcr, 3)),
                }
            }
        };
        events.push(event);
    }

    // Stable sort: equal amplitudes keep ascending time order
    events.sort_by(|a, b| {
        b.amplitude
            .partial_cmp(&a.amplitude)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    events.truncate(top_n);

    Ok(events)
}

/// Down-sample the positive half of the transform magnitude
///
/// Samples bins at a stride of `len / points` (at least 1, so short signals
/// still produce a summary), normalizing each magnitude by the global maximum
/// (0.0 when the signal is silent).
pub(crate) fn spectrum_summary(
    magnitude: &[f32],
    sample_rate: u32,
    points: usize,
) -> Vec<SpectrumPoint> {
    if magnitude.is_empty() || points == 0 {
        return Vec::new();
    }

    let len = magnitude.len();
    let max = magnitude.iter().copied().fold(0.0f32, f32::max);
    let stride = (len / points).max(1);

    let mut summary = Vec::new();
    let mut bin = 0;
    while bin < len / 2 {
        let frequency = bin as f32 * sample_rate as f32 / len as f32;
        let normalized = if max > 0.0 { magnitude[bin] / max } else { 0.0 };
        summary.push(SpectrumPoint {
            frequency: round_to(frequency, 1),
            magnitude: round_to(normalized, 3),
        });
        bin += stride;
    }

    summary
}
