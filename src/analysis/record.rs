//! Persistence hand-off record
//!
//! The engine does not store anything. Callers wrap a result with their own
//! shot-type tag and opaque video metadata and hand the record to whatever
//! storage they use.

use serde::{Deserialize, Serialize};

use super::result::AnalysisResult;
use crate::error::AnalysisError;

/// A result packaged for storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    /// Caller-supplied shot-type tag (free text, e.g. "free throw")
    pub shot_type: String,

    /// Opaque caller metadata about the video (name, size, device, ...)
    #[serde(default)]
    pub video_metadata: serde_json::Value,

    /// The analysis result
    pub result: AnalysisResult,
}

impl ShotRecord {
    /// Package a result for storage
    pub fn new(shot_type: impl Into<String>, video_metadata: serde_json::Value, result: AnalysisResult) -> Self {
        Self {
            shot_type: shot_type.into(),
            video_metadata,
            result,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        Ok(serde_json::from_str(json)?)
    }
}
