//! Error types for the shot analysis engine
//!
//! Expected domain failures (too-short video, poor pose coverage, a motion
//! that is not a shot) are not errors: they are returned as an invalid
//! [`AnalysisResult`](crate::AnalysisResult). The types here cover faults
//! outside that taxonomy.

use std::fmt;

/// Errors that can occur during shot analysis
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Invalid input parameters
    InvalidInput(String),

    /// The video resource could not be read or positioned
    VideoError(String),

    /// Processing error during analysis
    ProcessingError(String),

    /// The run was cancelled by the caller
    Cancelled,

    /// JSON encoding or decoding failed
    SerializationError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::VideoError(msg) => write!(f, "Video error: {}", msg),
            AnalysisError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            AnalysisError::Cancelled => write!(f, "Analysis cancelled"),
            AnalysisError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        AnalysisError::SerializationError(err.to_string())
    }
}

/// Errors reported by a pose-estimation backend
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionError {
    /// The model could not be constructed in the requested execution mode
    ModelUnavailable(String),

    /// A detection call failed
    InferenceFailed(String),
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionError::ModelUnavailable(msg) => write!(f, "Pose model unavailable: {}", msg),
            DetectionError::InferenceFailed(msg) => write!(f, "Pose inference failed: {}", msg),
        }
    }
}

impl std::error::Error for DetectionError {}
