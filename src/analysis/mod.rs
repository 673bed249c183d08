// Analysis module - event detection and classification pipeline
//
// Orchestrates the complete forensic pipeline over one waveform:
//
//   waveform -> energy envelope -> peak picking -> feature alignment
//            -> classification -> report assembly
//
// The frequency-spectrum summary is computed independently from the
// full-signal transform and merged into the same report. One call is
// single-threaded and synchronous; it either returns a complete report or an
// AnalysisError, never a partial result.

pub mod classify;
pub mod energy;
pub mod peaks;
pub mod report;

pub use classify::{classify_basic, classify_extended, SoundClass, SpectralSample};
pub use energy::EnergyExtractor;
pub use peaks::PeakPicker;
pub use report::{
    AnalysisReport, CurvePayload, Decibels, EnergyPayload, HeatmapPayload, SoundEvent,
    SpectralSummary, SpectrumPoint, Visualizations,
};

use crate::config::{AnalysisConfig, ClassifierPolicy};
use crate::error::AnalysisError;
use crate::spectral::{FftProcessor, SpectrumAnalyzer, StftMatrix, FFT_SIZE};
use crate::waveform::Waveform;
use report::{build_events, round_to, spectrum_summary};

/// Analysis type tag attached to the live report variant
const LIVE_ANALYSIS_TYPE: &str = "live_comprehensive";

/// Runs the forensic analysis pipeline with a fixed configuration
///
/// An Analyzer holds no state between calls; every invocation owns its
/// working buffers exclusively, so independent calls may run in parallel.
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer with an explicit configuration
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyzer preset for the one-shot forensic report
    pub fn standard() -> Self {
        Self::new(AnalysisConfig::standard())
    }

    /// Analyzer preset for the live comprehensive report
    pub fn live() -> Self {
        Self::new(AnalysisConfig::live())
    }

    /// Active configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one waveform and produce the forensic report
    ///
    /// Degenerate signals (empty or silent) flow through the same path and
    /// produce a report with safe defaults: no events, zero spectrum, and the
    /// silence decibel sentinel. Only unexpected conditions (an empty feature
    /// array while peaks exist) return an error.
    pub fn analyze(&self, waveform: &Waveform) -> Result<AnalysisReport, AnalysisError> {
        let config = &self.config;
        let samples = &waveform.samples;

        log::info!(
            "[Analysis] Analyzing {} samples at {} Hz ({:.2}s, {:?} policy)",
            samples.len(),
            waveform.sample_rate,
            waveform.duration(),
            config.policy
        );

        let envelope =
            EnergyExtractor::new(config.frame_length, config.hop_length).envelope(samples);
        let peaks =
            PeakPicker::new(config.min_peak_height, config.min_peak_distance).pick(&envelope);
        log::debug!(
            "[Analysis] Energy envelope: {} frames, {} peaks",
            envelope.len(),
            peaks.len()
        );

        let features = SpectrumAnalyzer::new(waveform.sample_rate, FFT_SIZE, config.hop_length)
            .extract(samples);

        let sound_events = build_events(
            &peaks,
            &envelope,
            &features,
            config.hop_length,
            waveform.sample_rate,
            config.policy,
            config.top_events,
        )?;

        let fft = FftProcessor::new(FFT_SIZE);
        let magnitude = fft.full_magnitude(samples);
        let frequency_spectrum =
            spectrum_summary(&magnitude, waveform.sample_rate, config.spectrum_points);

        let (visualizations, spectral_features, analysis_type) = match config.policy {
            ClassifierPolicy::Basic => (None, None, None),
            ClassifierPolicy::Extended => {
                let stft =
                    StftMatrix::compute(&fft, samples, config.hop_length, waveform.sample_rate);
                let visualizations = build_visualizations(
                    &stft,
                    &magnitude,
                    waveform.sample_rate,
                    &envelope,
                    &peaks,
                );
                let summary = SpectralSummary {
                    mean_spectral_centroid: round_to(features.mean_centroid(), 1),
                    mean_spectral_rolloff: round_to(features.mean_rolloff(), 1),
                    mean_zero_crossing_rate: round_to(features.mean_zcr(), 3),
                    mfcc_mean: features
                        .mean_mfcc()
                        .iter()
                        .map(|&m| round_to(m, 3))
                        .collect(),
                };
                (
                    Some(visualizations),
                    Some(summary),
                    Some(LIVE_ANALYSIS_TYPE.to_string()),
                )
            }
        };

        let report = AnalysisReport {
            duration: round_to(waveform.duration(), 2),
            sample_rate: waveform.sample_rate,
            average_rms: round_to(waveform.mean_rms(), 6),
            detected_sounds: peaks.len(),
            dominant_frequency: round_to(features.mean_centroid(), 1),
            max_decibels: Decibels::from_amplitude(waveform.peak_amplitude()),
            sound_events,
            frequency_spectrum,
            visualizations,
            spectral_features,
            analysis_complete: true,
            analysis_type,
        };

        log::info!(
            "[Analysis] Complete: {} events, dominant frequency {:.1} Hz",
            report.detected_sounds,
            report.dominant_frequency
        );

        Ok(report)
    }
}

/// Assemble the visualization payloads for the live report variant
fn build_visualizations(
    stft: &StftMatrix,
    magnitude: &[f32],
    sample_rate: u32,
    envelope: &[f32],
    peaks: &[usize],
) -> Visualizations {
    let z = stft.to_db_bin_major();
    let x = stft.time_axis();
    let y = stft.frequency_axis();

    let stft_payload = HeatmapPayload {
        z: z.clone(),
        x: x.clone(),
        y: y.clone(),
        kind: "heatmap".to_string(),
        colorscale: "Viridis".to_string(),
        title: "STFT - Short-Time Fourier Transform".to_string(),
    };
    let spectrogram = HeatmapPayload {
        z,
        x,
        y,
        kind: "heatmap".to_string(),
        colorscale: "Magma".to_string(),
        title: "Live Spectrogram".to_string(),
    };

    let half = magnitude.len() / 2;
    let fft_curve = CurvePayload {
        x: (0..half)
            .map(|bin| bin as f32 * sample_rate as f32 / magnitude.len() as f32)
            .collect(),
        y: magnitude[..half].to_vec(),
        kind: "scatter".to_string(),
        mode: "lines".to_string(),
        title: "FFT - Frequency Spectrum".to_string(),
    };

    let energy = EnergyPayload {
        energy: envelope.to_vec(),
        peaks: peaks.to_vec(),
        peak_values: peaks.iter().map(|&p| envelope[p]).collect(),
        frames: (0..envelope.len()).collect(),
    };

    Visualizations {
        stft: stft_payload,
        spectrogram,
        fft: fft_curve,
        energy,
    }
}

#[cfg(test)]
mod tests;
