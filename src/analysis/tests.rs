// Pipeline tests for the Analyzer
//
// Signals are built from Hann-shaped sine bursts so the energy envelope is
// unimodal around each burst and the peak picker's output is predictable.

use super::*;
use crate::waveform::Waveform;

const SAMPLE_RATE: u32 = 44100;

/// Add a Hann-shaped sine burst to a signal in place
fn add_burst(signal: &mut [f32], start: usize, length: usize, frequency: f32, gain: f32) {
    for i in 0..length {
        let t = (start + i) as f32 / SAMPLE_RATE as f32;
        let window = 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / length as f32).cos());
        signal[start + i] = gain * window * (2.0 * std::f32::consts::PI * frequency * t).sin();
    }
}

fn single_burst_waveform() -> Waveform {
    let mut signal = vec![0.0f32; SAMPLE_RATE as usize];
    add_burst(&mut signal, 16384, 8192, 440.0, 1.0);
    Waveform::new(signal, SAMPLE_RATE)
}

#[test]
fn test_empty_waveform_reports_defaults() {
    let report = Analyzer::standard()
        .analyze(&Waveform::new(Vec::new(), SAMPLE_RATE))
        .unwrap();

    assert_eq!(report.duration, 0.0);
    assert_eq!(report.sample_rate, SAMPLE_RATE);
    assert_eq!(report.average_rms, 0.0);
    assert_eq!(report.detected_sounds, 0);
    assert_eq!(report.dominant_frequency, 0.0);
    assert!(report.max_decibels.is_silent());
    assert!(report.sound_events.is_empty());
    assert!(report.frequency_spectrum.is_empty());
    assert!(report.visualizations.is_none());
    assert!(report.analysis_complete);
}

#[test]
fn test_silent_waveform_has_no_events() {
    let report = Analyzer::standard()
        .analyze(&Waveform::new(vec![0.0; SAMPLE_RATE as usize], SAMPLE_RATE))
        .unwrap();

    assert_eq!(report.duration, 1.0);
    assert_eq!(report.detected_sounds, 0);
    assert!(report.sound_events.is_empty());
    assert!(report.max_decibels.is_silent());
    assert!(!report.frequency_spectrum.is_empty());
    assert!(report.frequency_spectrum.iter().all(|p| p.magnitude == 0.0));
    assert!(report.analysis_complete);
}

#[test]
fn test_single_burst_produces_one_event() {
    let report = Analyzer::standard().analyze(&single_burst_waveform()).unwrap();

    assert_eq!(report.detected_sounds, 1);
    assert_eq!(report.sound_events.len(), 1);

    let event = &report.sound_events[0];
    // The burst center dominates the envelope
    assert_eq!(event.amplitude, 1.0);
    assert_eq!(event.decibels, Decibels::Level(0.0));
    assert!(
        event.frequency > 380.0 && event.frequency < 520.0,
        "Centroid at peak was {} Hz, expected near 440 Hz",
        event.frequency
    );
    assert_eq!(event.sound_type, SoundClass::VoiceMidRange);
    assert_eq!(event.confidence, None);
    assert!(event.time > 0.3 && event.time < 0.6);
    assert!(!report.max_decibels.is_silent());
}

#[test]
fn test_two_separated_bursts_produce_two_events() {
    let mut signal = vec![0.0f32; 2 * SAMPLE_RATE as usize];
    add_burst(&mut signal, 8192, 8192, 440.0, 1.0);
    add_burst(&mut signal, 60000, 8192, 2500.0, 0.8);
    let report = Analyzer::standard()
        .analyze(&Waveform::new(signal, SAMPLE_RATE))
        .unwrap();

    assert_eq!(report.detected_sounds, 2);
    assert_eq!(report.sound_events.len(), 2);
    // Loudest first
    assert!(report.sound_events[0].amplitude >= report.sound_events[1].amplitude);
    assert!(report.sound_events[0].time < report.sound_events[1].time);
}

#[test]
fn test_event_list_caps_at_configured_top_n() {
    let mut signal = vec![0.0f32; 3 * SAMPLE_RATE as usize];
    for i in 0..12 {
        let gain = 0.7 + 0.025 * i as f32;
        add_burst(&mut signal, 8192 + i * 8192, 4096, 800.0, gain);
    }
    let report = Analyzer::standard()
        .analyze(&Waveform::new(signal, SAMPLE_RATE))
        .unwrap();

    assert_eq!(report.detected_sounds, 12);
    assert_eq!(report.sound_events.len(), 10);
    for pair in report.sound_events.windows(2) {
        assert!(pair[0].amplitude >= pair[1].amplitude);
    }
}

#[test]
fn test_live_report_carries_extended_payloads() {
    let report = Analyzer::live().analyze(&single_burst_waveform()).unwrap();

    assert_eq!(report.analysis_type.as_deref(), Some("live_comprehensive"));

    let event = &report.sound_events[0];
    assert!(event.confidence.is_some());
    assert!(event.spectral_rolloff.is_some());
    assert!(event.zero_crossing_rate.is_some());

    let summary = report.spectral_features.as_ref().unwrap();
    assert_eq!(summary.mfcc_mean.len(), 13);
    assert!(summary.mean_spectral_centroid >= 0.0);
    assert!(summary.mean_zero_crossing_rate >= 0.0);

    let vis = report.visualizations.as_ref().unwrap();
    assert_eq!(vis.stft.z.len(), crate::spectral::FFT_SIZE / 2 + 1);
    assert_eq!(vis.stft.x.len(), vis.stft.z[0].len());
    assert_eq!(vis.stft.y.len(), vis.stft.z.len());
    assert_eq!(vis.spectrogram.z.len(), vis.stft.z.len());
    assert_eq!(vis.stft.colorscale, "Viridis");
    assert_eq!(vis.spectrogram.colorscale, "Magma");
    assert_eq!(vis.fft.x.len(), vis.fft.y.len());
    assert_eq!(vis.energy.energy.len(), vis.energy.frames.len());
    assert_eq!(vis.energy.peaks.len(), vis.energy.peak_values.len());
    assert_eq!(vis.energy.peaks.len(), report.detected_sounds);
}

#[test]
fn test_standard_report_json_shape() {
    let report = Analyzer::standard().analyze(&single_burst_waveform()).unwrap();
    let value = serde_json::to_value(&report).unwrap();
    let object = value.as_object().unwrap();

    for key in [
        "duration",
        "sampleRate",
        "averageRMS",
        "detectedSounds",
        "dominantFrequency",
        "maxDecibels",
        "soundEvents",
        "frequencySpectrum",
        "analysisComplete",
    ] {
        assert!(object.contains_key(key), "Missing key {}", key);
    }
    assert!(!object.contains_key("visualizations"));
    assert!(!object.contains_key("spectralFeatures"));
    assert!(!object.contains_key("analysisType"));
    assert_eq!(object["analysisComplete"], serde_json::json!(true));
    assert!(object["soundEvents"][0]["type"].is_string());
}

#[test]
fn test_silent_report_serializes_decibel_sentinel() {
    let report = Analyzer::standard()
        .analyze(&Waveform::new(vec![0.0; 4096], SAMPLE_RATE))
        .unwrap();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["maxDecibels"], serde_json::json!("-inf"));
}

#[test]
fn test_report_round_trips_through_json() {
    let report = Analyzer::live().analyze(&single_burst_waveform()).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}
