//! Analysis metadata structures

use serde::{Deserialize, Serialize};

use crate::config::ShotType;
use crate::features::gate::GateReport;
use crate::features::pose::Side;
use crate::io::landmark_source::ExecutionMode;

/// Diagnostics describing how a result was produced
///
/// Holds no wall-clock values, so identical inputs give identical metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Algorithm version
    pub algorithm_version: String,

    /// Shot type the gate thresholds were chosen for
    pub shot_type: ShotType,

    /// Frames that passed the validity filter
    pub valid_frames: usize,

    /// Resolved shooting side
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Side>,

    /// Index of the release frame within the valid frames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_index: Option<usize>,

    /// Timestamp of the release frame in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_timestamp_ms: Option<u64>,

    /// Shot gate votes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateReport>,

    /// Execution mode of the pose model that served the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_mode: Option<ExecutionMode>,
}

impl AnalysisMetadata {
    /// Fresh metadata for a run of the given shot type
    pub fn for_shot_type(shot_type: ShotType) -> Self {
        Self {
            shot_type,
            ..Self::default()
        }
    }
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            shot_type: ShotType::default(),
            valid_frames: 0,
            handedness: None,
            release_index: None,
            release_timestamp_ms: None,
            gate: None,
            execution_mode: None,
        }
    }
}
