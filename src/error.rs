// Error types for the audio forensics pipeline
//
// Only genuinely unexpected conditions surface as errors. Degenerate signals
// (empty or all-zero waveforms) are handled locally with safe fallback values
// and never reach this module.

use log::error;
use std::fmt;

/// Error codes for structured error reporting
///
/// Provides a standard way to get error codes and messages from custom error
/// types, so callers can handle failures programmatically.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Analysis error code constants
///
/// Error code range: 2001-2003
pub struct AnalysisErrorCodes {}

impl AnalysisErrorCodes {
    /// Input audio could not be decoded into a waveform
    pub const DECODE_FAILED: i32 = 2001;

    /// A per-frame feature array was empty while peaks were detected
    pub const FEATURE_ARRAY_EMPTY: i32 = 2002;

    /// Unexpected numerical failure inside the pipeline
    pub const COMPUTATION_FAILED: i32 = 2003;
}

/// Errors produced by one analysis call
///
/// Callers must treat any of these as "no result produced"; a successful call
/// always returns a complete report instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Input audio could not be decoded into a waveform
    DecodeFailed { reason: String },

    /// A per-frame feature array was empty while peaks were detected
    FeatureArrayEmpty { feature: String },

    /// Unexpected numerical failure inside the pipeline
    ComputationFailed { details: String },
}

impl ErrorCode for AnalysisError {
    fn code(&self) -> i32 {
        match self {
            AnalysisError::DecodeFailed { .. } => AnalysisErrorCodes::DECODE_FAILED,
            AnalysisError::FeatureArrayEmpty { .. } => AnalysisErrorCodes::FEATURE_ARRAY_EMPTY,
            AnalysisError::ComputationFailed { .. } => AnalysisErrorCodes::COMPUTATION_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            AnalysisError::DecodeFailed { reason } => {
                format!("Failed to decode input audio: {}", reason)
            }
            AnalysisError::FeatureArrayEmpty { feature } => {
                format!(
                    "Feature array '{}' is empty but sound events were detected",
                    feature
                )
            }
            AnalysisError::ComputationFailed { details } => {
                format!("Analysis computation failed: {}", details)
            }
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::DecodeFailed {
            reason: err.to_string(),
        }
    }
}

/// Log an analysis error with structured context
pub fn log_analysis_error(err: &AnalysisError, context: &str) {
    error!(
        "Analysis error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AnalysisError::DecodeFailed {
                reason: "test".to_string()
            }
            .code(),
            AnalysisErrorCodes::DECODE_FAILED
        );
        assert_eq!(
            AnalysisError::FeatureArrayEmpty {
                feature: "centroid".to_string()
            }
            .code(),
            AnalysisErrorCodes::FEATURE_ARRAY_EMPTY
        );
        assert_eq!(
            AnalysisError::ComputationFailed {
                details: "test".to_string()
            }
            .code(),
            AnalysisErrorCodes::COMPUTATION_FAILED
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::DecodeFailed {
            reason: "bad header".to_string(),
        };
        assert_eq!(err.message(), "Failed to decode input audio: bad header");

        let err = AnalysisError::FeatureArrayEmpty {
            feature: "centroid".to_string(),
        };
        assert!(err.message().contains("centroid"));

        let err = AnalysisError::ComputationFailed {
            details: "nan".to_string(),
        };
        assert!(err.message().contains("nan"));
    }

    #[test]
    fn test_error_display() {
        let err = AnalysisError::DecodeFailed {
            reason: "truncated".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("AnalysisError"));
        assert!(display.contains(&err.code().to_string()));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::other("test io error");
        let err: AnalysisError = io_err.into();
        match err {
            AnalysisError::DecodeFailed { reason } => {
                assert!(reason.contains("test io error"));
            }
            other => panic!("Expected DecodeFailed, got {:?}", other),
        }
    }
}
