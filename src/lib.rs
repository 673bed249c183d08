// Audio forensics library - offline forensic analysis of audio recordings
//
// The pipeline detects sound events from a frame-energy envelope, classifies
// each event from spectral features at its peak, and assembles a JSON-ready
// report. Two presets exist: the standard one-shot report and the live
// comprehensive report with visualization payloads.
//
// Core modules:
// - waveform: decoded audio container with signal-level statistics
// - analysis: energy envelope, peak picking, classification, report assembly
// - spectral: FFT, STFT, and spectral feature extraction
// - config: analysis parameters and the two presets
// - error: analysis error types with stable numeric codes

pub mod analysis;
pub mod config;
pub mod error;
pub mod spectral;
pub mod waveform;

pub use analysis::{Analyzer, AnalysisReport, Decibels, SoundClass, SoundEvent};
pub use config::{AnalysisConfig, ClassifierPolicy};
pub use error::{AnalysisError, ErrorCode};
pub use waveform::Waveform;
