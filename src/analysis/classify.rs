// Rule-based sound classification
//
// Two independently versioned policies, each expressed as an ordered rule
// table evaluated first-match-wins. The rules are not mutually exclusive, so
// table order is load-bearing and must not be rearranged.
//
// Basic: one feature (dominant frequency at the peak), no confidence score.
// Extended: centroid + rolloff + zero-crossing rate, with a confidence score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic label assigned to a detected sound event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundClass {
    #[serde(rename = "Low Frequency/Bass")]
    LowFrequencyBass,
    #[serde(rename = "Voice/Mid Range")]
    VoiceMidRange,
    #[serde(rename = "High Voice/Instruments")]
    HighVoiceInstruments,
    #[serde(rename = "High Frequency/Noise")]
    HighFrequencyNoise,
    #[serde(rename = "Voice/Speech")]
    VoiceSpeech,
    #[serde(rename = "Percussive/Transient")]
    PercussiveTransient,
    #[serde(rename = "Mixed/Complex")]
    MixedComplex,
}

impl SoundClass {
    /// Human-readable label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            SoundClass::LowFrequencyBass => "Low Frequency/Bass",
            SoundClass::VoiceMidRange => "Voice/Mid Range",
            SoundClass::HighVoiceInstruments => "High Voice/Instruments",
            SoundClass::HighFrequencyNoise => "High Frequency/Noise",
            SoundClass::VoiceSpeech => "Voice/Speech",
            SoundClass::PercussiveTransient => "Percussive/Transient",
            SoundClass::MixedComplex => "Mixed/Complex",
        }
    }
}

impl fmt::Display for SoundClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Spectral features of one peak, input to the extended policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralSample {
    /// Spectral centroid in Hz
    pub centroid: f32,
    /// Spectral rolloff in Hz
    pub rolloff: f32,
    /// Zero-crossing rate (0.0 to 1.0)
    pub zcr: f32,
}

struct BasicRule {
    applies: fn(f32) -> bool,
    label: SoundClass,
}

/// Basic policy rule table; the final rule is a catch-all
static BASIC_RULES: [BasicRule; 4] = [
    BasicRule {
        applies: |f| f < 300.0,
        label: SoundClass::LowFrequencyBass,
    },
    BasicRule {
        applies: |f| f < 1000.0,
        label: SoundClass::VoiceMidRange,
    },
    BasicRule {
        applies: |f| f < 4000.0,
        label: SoundClass::HighVoiceInstruments,
    },
    BasicRule {
        applies: |_| true,
        label: SoundClass::HighFrequencyNoise,
    },
];

struct ExtendedRule {
    applies: fn(&SpectralSample) -> bool,
    label: SoundClass,
    confidence: f32,
}

/// Extended policy rule table; the final rule is a catch-all
static EXTENDED_RULES: [ExtendedRule; 5] = [
    ExtendedRule {
        applies: |s| s.centroid < 1000.0 && s.rolloff < 2000.0,
        label: SoundClass::LowFrequencyBass,
        confidence: 0.8,
    },
    ExtendedRule {
        applies: |s| s.centroid < 3000.0 && s.zcr < 0.1,
        label: SoundClass::VoiceSpeech,
        confidence: 0.9,
    },
    ExtendedRule {
        applies: |s| s.centroid > 4000.0 && s.rolloff > 8000.0,
        label: SoundClass::HighFrequencyNoise,
        confidence: 0.7,
    },
    ExtendedRule {
        applies: |s| s.zcr > 0.15,
        label: SoundClass::PercussiveTransient,
        confidence: 0.85,
    },
    ExtendedRule {
        applies: |_| true,
        label: SoundClass::MixedComplex,
        confidence: 0.6,
    },
];

/// Classify a peak by its dominant frequency (basic policy)
///
/// Pure function of its input; the basic policy carries no confidence score.
pub fn classify_basic(frequency: f32) -> SoundClass {
    for rule in &BASIC_RULES {
        if (rule.applies)(frequency) {
            return rule.label;
        }
    }
    SoundClass::HighFrequencyNoise
}

/// Classify a peak by its spectral features (extended policy)
///
/// Evaluates the rule table in order, first match wins. Pure function of its
/// input; returns the label and its confidence score.
pub fn classify_extended(sample: &SpectralSample) -> (SoundClass, f32) {
    for rule in &EXTENDED_RULES {
        if (rule.applies)(sample) {
            return (rule.label, rule.confidence);
        }
    }
    (SoundClass::MixedComplex, 0.6)
}
