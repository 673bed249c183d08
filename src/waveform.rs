// Waveform - decoded time-domain audio owned by the caller
//
// The analysis pipeline consumes a Waveform (samples + sample rate) and never
// mutates it. Scalar signal statistics that feed the report header live here:
// duration, peak amplitude, and windowed mean RMS.

/// RMS window length in samples (matches the feature-extraction frame size)
const RMS_FRAME_LENGTH: usize = 2048;

/// RMS hop length in samples
const RMS_HOP_LENGTH: usize = 512;

/// Decoded audio signal: mono samples at a known sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Time-domain samples, nominally in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from mono samples and a sample rate
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// True when the waveform carries no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Signal duration in seconds
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Maximum absolute sample value (0.0 for an empty waveform)
    pub fn peak_amplitude(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }

    /// Mean of per-frame RMS values over overlapping windows
    ///
    /// Frames of `RMS_FRAME_LENGTH` samples advance by `RMS_HOP_LENGTH`, with
    /// the last window clipped at the signal end. Returns 0.0 for silence and
    /// for an empty waveform.
    pub fn mean_rms(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }

        let mut frame_count = 0usize;
        let mut rms_sum = 0.0f64;
        let mut offset = 0;
        while offset < self.samples.len() {
            let end = (offset + RMS_FRAME_LENGTH).min(self.samples.len());
            let frame = &self.samples[offset..end];
            let energy: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
            rms_sum += (energy / frame.len() as f64).sqrt();
            frame_count += 1;
            offset += RMS_HOP_LENGTH;
        }

        (rms_sum / frame_count as f64) as f32
    }
}
