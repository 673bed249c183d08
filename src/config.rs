//! Configuration for the analysis pipeline
//!
//! This module provides the tunable parameters of one analysis call and
//! optional loading from a JSON file, enabling parameter experiments without
//! recompilation. The two report variants are expressed as presets:
//! `standard()` for the one-shot report and `live()` for the comprehensive
//! report with visualization payloads.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Classification policy applied to detected peaks
///
/// The two policies use different feature sets and thresholds and are kept as
/// independently versioned rule tables; see `analysis::classify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierPolicy {
    /// Single-feature policy over the dominant frequency at the peak
    Basic,
    /// Multi-feature ordered-rule policy with confidence scores
    Extended,
}

/// Parameters of one analysis call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Energy frame length in samples
    pub frame_length: usize,
    /// Hop between consecutive frame offsets in samples
    pub hop_length: usize,
    /// Minimum normalized energy for a frame to qualify as a peak
    pub min_peak_height: f32,
    /// Minimum spacing between selected peaks in frames
    pub min_peak_distance: usize,
    /// Maximum number of sound events kept in the report
    pub top_events: usize,
    /// Down-sampling divisor for the frequency-spectrum summary
    pub spectrum_points: usize,
    /// Classification policy
    pub policy: ClassifierPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl AnalysisConfig {
    /// Preset for the one-shot forensic report (basic classifier, top 10)
    pub fn standard() -> Self {
        Self {
            frame_length: 1024,
            hop_length: 512,
            min_peak_height: 0.2,
            min_peak_distance: 5,
            top_events: 10,
            spectrum_points: 100,
            policy: ClassifierPolicy::Basic,
        }
    }

    /// Preset for the live comprehensive report (extended classifier, top 15)
    pub fn live() -> Self {
        Self {
            frame_length: 1024,
            hop_length: 512,
            min_peak_height: 0.2,
            min_peak_distance: 5,
            top_events: 15,
            spectrum_points: 200,
            policy: ClassifierPolicy::Extended,
        }
    }

    /// Load configuration from a JSON file
    ///
    /// Falls back to the standard preset when the file is missing or invalid;
    /// a warning is logged either way so misconfiguration is visible.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
