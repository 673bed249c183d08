// Peak picking over the energy envelope
//
// Finds strict local maxima subject to a minimum height, then enforces a
// minimum inter-peak spacing by non-maximum suppression: when two candidates
// are too close, the one with higher energy survives; on an exact energy tie
// the earlier (lower-index) candidate survives.

/// Selects sound-event peaks from a normalized energy envelope
pub struct PeakPicker {
    min_height: f32,
    min_distance: usize,
}

impl PeakPicker {
    /// Create a picker with explicit height and spacing constraints
    pub fn new(min_height: f32, min_distance: usize) -> Self {
        Self {
            min_height,
            min_distance: min_distance.max(1),
        }
    }

    /// Pick peaks from an energy envelope
    ///
    /// Returns frame indices in ascending order. Every returned index is a
    /// strict local maximum with value >= min_height, and no two returned
    /// indices are closer than min_distance frames.
    pub fn pick(&self, envelope: &[f32]) -> Vec<usize> {
        let candidates = self.local_maxima(envelope);
        self.suppress(envelope, candidates)
    }

    /// Strict local maxima meeting the height constraint
    ///
    /// Boundary frames cannot qualify; they have no neighbor on one side.
    fn local_maxima(&self, envelope: &[f32]) -> Vec<usize> {
        if envelope.len() < 3 {
            return Vec::new();
        }

        let mut maxima = Vec::new();
        for i in 1..envelope.len() - 1 {
            let value = envelope[i];
            if value > envelope[i - 1] && value > envelope[i + 1] && value >= self.min_height {
                maxima.push(i);
            }
        }
        maxima
    }

    /// Non-maximum suppression over the spacing window
    ///
    /// Candidates are visited strongest-first (ties broken toward the earlier
    /// index) and kept only when no already-kept peak lies within min_distance.
    fn suppress(&self, envelope: &[f32], mut candidates: Vec<usize>) -> Vec<usize> {
        candidates.sort_by(|&a, &b| {
            envelope[b]
                .partial_cmp(&envelope[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut kept: Vec<usize> = Vec::new();
        for candidate in candidates {
            let conflicts = kept
                .iter()
                .any(|&peak| candidate.abs_diff(peak) < self.min_distance);
            if !conflicts {
                kept.push(candidate);
            }
        }

        kept.sort_unstable();
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_picker() -> PeakPicker {
        PeakPicker::new(0.2, 5)
    }

    #[test]
    fn test_empty_and_flat_envelopes() {
        let picker = default_picker();
        assert!(picker.pick(&[]).is_empty());
        assert!(picker.pick(&[0.0; 20]).is_empty());
        assert!(picker.pick(&[1.0; 20]).is_empty(), "Plateau has no strict maxima");
    }

    #[test]
    fn test_single_peak() {
        let picker = default_picker();
        let mut envelope = vec![0.0; 20];
        envelope[10] = 1.0;
        assert_eq!(picker.pick(&envelope), vec![10]);
    }

    #[test]
    fn test_height_constraint() {
        let picker = default_picker();
        let mut envelope = vec![0.0; 20];
        envelope[5] = 0.15; // below min_height
        envelope[14] = 0.9;
        assert_eq!(picker.pick(&envelope), vec![14]);
    }

    #[test]
    fn test_spacing_keeps_higher_peak() {
        let picker = default_picker();
        let mut envelope = vec![0.0; 20];
        envelope[8] = 0.5;
        envelope[10] = 0.9; // 2 frames away, stronger
        assert_eq!(picker.pick(&envelope), vec![10]);
    }

    #[test]
    fn test_spacing_tie_prefers_earlier_peak() {
        let picker = default_picker();
        let mut envelope = vec![0.0; 20];
        envelope[8] = 0.9;
        envelope[11] = 0.9; // exact tie, 3 frames away
        assert_eq!(picker.pick(&envelope), vec![8]);
    }

    #[test]
    fn test_peaks_beyond_spacing_both_survive() {
        let picker = default_picker();
        let mut envelope = vec![0.0; 30];
        envelope[5] = 0.8;
        envelope[15] = 0.8;
        assert_eq!(picker.pick(&envelope), vec![5, 15]);
    }

    #[test]
    fn test_exact_spacing_boundary() {
        let picker = default_picker();
        let mut envelope = vec![0.0; 30];
        envelope[10] = 0.8;
        envelope[15] = 0.7; // exactly min_distance apart: allowed
        assert_eq!(picker.pick(&envelope), vec![10, 15]);

        let mut closer = vec![0.0; 30];
        closer[10] = 0.8;
        closer[14] = 0.7; // one frame closer: suppressed
        assert_eq!(picker.pick(&closer), vec![10]);
    }

    #[test]
    fn test_spacing_and_height_invariants_on_noisy_envelope() {
        let picker = default_picker();
        // Deterministic jagged envelope
        let envelope: Vec<f32> = (0..200)
            .map(|i| ((i * 37 % 101) as f32 / 101.0))
            .collect();
        let peaks = picker.pick(&envelope);

        for window in peaks.windows(2) {
            assert!(
                window[1] - window[0] >= 5,
                "Peaks {} and {} violate spacing",
                window[0],
                window[1]
            );
        }
        for &peak in &peaks {
            assert!(envelope[peak] >= 0.2, "Peak {} below min height", peak);
        }
    }

    #[test]
    fn test_boundary_frames_never_selected() {
        let picker = PeakPicker::new(0.2, 1);
        let envelope = [1.0, 0.5, 0.4, 0.5, 1.0];
        assert_eq!(picker.pick(&envelope), Vec::<usize>::new());
    }
}
