// Frame energy extraction
//
// Slices the waveform into overlapping frames and computes per-frame energy
// (sum of squared samples), normalized so the loudest frame is 1.0. The
// resulting envelope is the signal the peak picker operates on.

/// Computes a normalized energy envelope over overlapping frames
pub struct EnergyExtractor {
    frame_length: usize,
    hop_length: usize,
}

impl EnergyExtractor {
    /// Create an extractor with explicit frame and hop lengths
    pub fn new(frame_length: usize, hop_length: usize) -> Self {
        Self {
            frame_length: frame_length.max(1),
            hop_length: hop_length.max(1),
        }
    }

    /// Compute the normalized energy envelope of a signal
    ///
    /// One energy value per start offset `0, hop, 2*hop, ...` up to the signal
    /// length, each summing squared samples over `[offset, offset+frame_len)`
    /// with the window clipped at the signal end. Values are divided by the
    /// global maximum; a silent signal keeps its all-zero values rather than
    /// dividing by zero.
    ///
    /// Envelope index `i` corresponds to sample offset `i * hop_length`.
    pub fn envelope(&self, samples: &[f32]) -> Vec<f32> {
        let mut energy = Vec::with_capacity(samples.len().div_ceil(self.hop_length));

        let mut offset = 0;
        while offset < samples.len() {
            let end = (offset + self.frame_length).min(samples.len());
            let frame_energy: f32 = samples[offset..end].iter().map(|&s| s * s).sum();
            energy.push(frame_energy);
            offset += self.hop_length;
        }

        let max = energy.iter().copied().fold(0.0f32, f32::max);
        if max > 0.0 {
            for value in &mut energy {
                *value /= max;
            }
        }

        energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count() {
        let extractor = EnergyExtractor::new(1024, 512);
        let samples = vec![0.1f32; 44100];
        let envelope = extractor.envelope(&samples);
        assert_eq!(envelope.len(), 44100usize.div_ceil(512));
    }

    #[test]
    fn test_empty_signal() {
        let extractor = EnergyExtractor::new(1024, 512);
        assert!(extractor.envelope(&[]).is_empty());
    }

    #[test]
    fn test_silence_stays_zero() {
        let extractor = EnergyExtractor::new(1024, 512);
        let envelope = extractor.envelope(&vec![0.0f32; 8192]);
        assert!(!envelope.is_empty());
        assert!(envelope.iter().all(|&e| e == 0.0));
    }

    #[test]
    fn test_normalized_maximum_is_one() {
        let extractor = EnergyExtractor::new(4, 2);
        // Louder section in the middle
        let samples = [0.1, 0.1, 0.1, 0.1, 1.0, 1.0, 1.0, 1.0, 0.1, 0.1, 0.1, 0.1];
        let envelope = extractor.envelope(&samples);
        let max = envelope.iter().copied().fold(0.0f32, f32::max);
        assert!((max - 1.0).abs() < 1e-6);
        assert!(envelope.iter().all(|&e| (0.0..=1.0).contains(&e)));
    }

    #[test]
    fn test_window_clipped_at_signal_end() {
        let extractor = EnergyExtractor::new(4, 2);
        // 5 samples: offsets 0, 2, 4; last frame covers a single sample
        let samples = [1.0, 1.0, 1.0, 1.0, 1.0];
        let envelope = extractor.envelope(&samples);
        assert_eq!(envelope.len(), 3);
        // Unnormalized energies are 4, 3, 1; normalized by 4
        assert!((envelope[0] - 1.0).abs() < 1e-6);
        assert!((envelope[1] - 0.75).abs() < 1e-6);
        assert!((envelope[2] - 0.25).abs() < 1e-6);
    }
}
