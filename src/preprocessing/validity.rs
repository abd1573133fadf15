//! Frame validity filtering
//!
//! A probed frame is kept only if the estimate is complete enough (more than
//! 24 landmarks) and the 8 upper-body/hip landmarks are, on average, clearly
//! visible. After sampling, the run needs both a minimum share and a minimum
//! count of valid frames; this rejects clips where the shooter is rarely in
//! full view.

use crate::config::ValidityConfig;
use crate::features::pose::{FrameSample, KEY_LANDMARKS};

/// Visibility and coverage checks for sampled frames
#[derive(Debug, Clone, Copy)]
pub struct ValidityFilter<'a> {
    config: &'a ValidityConfig,
}

impl<'a> ValidityFilter<'a> {
    /// Create a filter with the given thresholds
    pub fn new(config: &'a ValidityConfig) -> Self {
        Self { config }
    }

    /// Whether a single frame is usable
    pub fn accept(&self, sample: &FrameSample) -> bool {
        if sample.landmarks.len() < self.config.min_landmark_count {
            return false;
        }
        sample.mean_visibility(&KEY_LANDMARKS) >= self.config.min_mean_visibility
    }

    /// Whether enough frames were valid for the run to continue
    pub fn has_sufficient_coverage(&self, valid_frames: usize, processed_frames: usize) -> bool {
        if valid_frames < self.config.min_valid_frames || processed_frames == 0 {
            return false;
        }
        let ratio = valid_frames as f32 / processed_frames as f32;
        ratio >= self.config.min_valid_ratio
    }
}
