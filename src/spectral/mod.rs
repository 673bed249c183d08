// Spectral module - numerical/DSP collaborator for the analysis core
//
// The event pipeline consumes three transform products from this module:
// hop-aligned per-frame feature arrays (centroid, rolloff, ZCR, MFCC), the
// full-signal transform magnitude, and a short-time transform matrix for
// heatmap payloads.

mod fft;
mod features;

pub use fft::{FftProcessor, StftMatrix, FFT_SIZE};
pub use features::{zero_crossing_rate, FeatureSet, SpectrumAnalyzer, MFCC_COEFFICIENTS};
