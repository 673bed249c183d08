// FFT module - Fourier transform computation
//
// This module handles the three transform products the analysis core
// consumes: windowed per-frame magnitude spectra, the full-signal transform
// magnitude with its frequency axis, and a short-time transform matrix
// converted to decibels for heatmap payloads.

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::Mutex;

/// FFT window size for feature extraction and STFT heatmaps
pub const FFT_SIZE: usize = 2048;

/// Floor applied to magnitudes before taking logarithms
const DB_AMPLITUDE_FLOOR: f32 = 1e-5;

/// Dynamic range of the decibel heatmap below its maximum
const DB_TOP_RANGE: f32 = 80.0;

/// FFT processor that computes magnitude spectra from audio windows
pub struct FftProcessor {
    fft_planner: Mutex<FftPlanner<f32>>,
    fft_size: usize,
    /// Hann window for framed transforms (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - Window size for framed transforms (typically 2048)
    pub fn new(fft_size: usize) -> Self {
        // Pre-compute Hann window to reduce spectral leakage
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (fft_size as f32 - 1.0)).cos())
            })
            .collect();

        Self {
            fft_planner: Mutex::new(FftPlanner::new()),
            fft_size,
            window,
        }
    }

    /// Window size used for framed transforms
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Compute the magnitude spectrum of one frame
    ///
    /// Applies Hann windowing, zero-pads frames shorter than the window, and
    /// returns magnitudes for positive frequencies only (size = fft_size/2 + 1).
    pub fn magnitude_spectrum(&self, audio: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = Vec::with_capacity(self.fft_size);

        for (i, &sample) in audio.iter().enumerate() {
            if i < self.fft_size {
                buffer.push(Complex::new(sample * self.window[i], 0.0));
            }
        }
        while buffer.len() < self.fft_size {
            buffer.push(Complex::new(0.0, 0.0));
        }

        let mut planner = self.fft_planner.lock().unwrap();
        let fft = planner.plan_fft_forward(self.fft_size);
        fft.process(&mut buffer);

        buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    /// Compute the full-signal transform magnitude
    ///
    /// Transforms the entire signal in one pass (no windowing, like the
    /// report's frequency-spectrum source). Returns one magnitude per bin for
    /// the complete transform length; bin `i` maps to `i * sample_rate / len`.
    pub fn full_magnitude(&self, samples: &[f32]) -> Vec<f32> {
        if samples.is_empty() {
            return Vec::new();
        }

        let mut buffer: Vec<Complex<f32>> =
            samples.iter().map(|&s| Complex::new(s, 0.0)).collect();

        let mut planner = self.fft_planner.lock().unwrap();
        let fft = planner.plan_fft_forward(buffer.len());
        fft.process(&mut buffer);

        buffer.iter().map(|c| c.norm()).collect()
    }
}

/// Short-time transform magnitude matrix with its axes
///
/// Frames are stored frame-major (`frames[t][k]` is bin `k` of frame `t`),
/// each frame holding `fft_size/2 + 1` positive-frequency magnitudes.
pub struct StftMatrix {
    pub frames: Vec<Vec<f32>>,
    pub fft_size: usize,
    pub hop_length: usize,
    pub sample_rate: u32,
}

impl StftMatrix {
    /// Compute the short-time transform of a signal
    ///
    /// Frame offsets advance by `hop_length` starting at 0 while they fall
    /// inside the signal; the last frames are end-clipped and zero-padded.
    pub fn compute(
        fft: &FftProcessor,
        samples: &[f32],
        hop_length: usize,
        sample_rate: u32,
    ) -> Self {
        let mut frames = Vec::new();
        let mut offset = 0;
        while offset < samples.len() {
            let end = (offset + fft.fft_size()).min(samples.len());
            frames.push(fft.magnitude_spectrum(&samples[offset..end]));
            offset += hop_length;
        }

        Self {
            frames,
            fft_size: fft.fft_size(),
            hop_length,
            sample_rate,
        }
    }

    /// Number of frames in the matrix
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frames were produced
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame start times in seconds, one per frame
    pub fn time_axis(&self) -> Vec<f32> {
        (0..self.frames.len())
            .map(|t| (t * self.hop_length) as f32 / self.sample_rate as f32)
            .collect()
    }

    /// Bin center frequencies in Hz, one per positive-frequency bin
    pub fn frequency_axis(&self) -> Vec<f32> {
        let bin_width = self.sample_rate as f32 / self.fft_size as f32;
        (0..=self.fft_size / 2).map(|k| k as f32 * bin_width).collect()
    }

    /// Convert magnitudes to decibels relative to the matrix maximum
    ///
    /// db = 20*log10(max(floor, m)) - 20*log10(max(floor, ref)) with ref the
    /// global maximum, then clipped to `DB_TOP_RANGE` below the loudest bin.
    /// Output is bin-major (`z[k][t]`), matching heatmap payload orientation.
    pub fn to_db_bin_major(&self) -> Vec<Vec<f32>> {
        if self.frames.is_empty() {
            return Vec::new();
        }

        let reference = self
            .frames
            .iter()
            .flat_map(|frame| frame.iter().copied())
            .fold(0.0f32, f32::max)
            .max(DB_AMPLITUDE_FLOOR);
        let ref_db = 20.0 * reference.log10();

        let bins = self.frames[0].len();
        let mut z = vec![vec![0.0f32; self.frames.len()]; bins];
        let mut max_db = f32::NEG_INFINITY;
        for (t, frame) in self.frames.iter().enumerate() {
            for (k, &mag) in frame.iter().enumerate() {
                let db = 20.0 * mag.max(DB_AMPLITUDE_FLOOR).log10() - ref_db;
                z[k][t] = db;
                max_db = max_db.max(db);
            }
        }

        // Clip the dynamic range below the loudest bin
        let floor_db = max_db - DB_TOP_RANGE;
        for row in &mut z {
            for value in row.iter_mut() {
                *value = value.max(floor_db);
            }
        }

        z
    }
}
