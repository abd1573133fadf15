//! Configuration parameters for shot analysis
//!
//! Every threshold the pipeline uses lives here, grouped by stage, so the
//! geometry code stays free of literals and each value can be tuned (or
//! loaded from JSON) independently.
//!
//! The visibility cutoff, the 2-of-3 gate vote and the finding cutoff are
//! empirical calibration values. They should be re-fitted against a labeled
//! shot dataset rather than treated as fixed.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Kind of shot the caller says the clip contains
///
/// Only affects the shot gate thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    /// Jump shot or any other field-goal attempt (default)
    #[default]
    JumpShot,
    /// Free throw: smaller wrist lift, shorter follow-through
    FreeThrow,
}

impl ShotType {
    /// Parse a free-text shot-type hint
    ///
    /// Anything that is not recognizably a free throw is treated as a jump shot.
    ///
    /// # Example
    ///
    /// ```
    /// use shotform::ShotType;
    ///
    /// assert_eq!(ShotType::from_hint("Free Throw"), ShotType::FreeThrow);
    /// assert_eq!(ShotType::from_hint("ft"), ShotType::FreeThrow);
    /// assert_eq!(ShotType::from_hint("three pointer"), ShotType::JumpShot);
    /// ```
    pub fn from_hint(hint: &str) -> Self {
        let normalized: String = hint
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "freethrow" | "ft" | "freethrows" => ShotType::FreeThrow,
            _ => ShotType::JumpShot,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ShotType::JumpShot => "jump shot",
            ShotType::FreeThrow => "free throw",
        }
    }
}

/// Frame sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Time between probes in seconds (default: 0.1)
    pub step_seconds: f32,

    /// Only the first `max_duration_seconds` of the clip are sampled (default: 30.0)
    pub max_duration_seconds: f32,

    /// Clips shorter than this are rejected without sampling (default: 1.0)
    pub min_duration_seconds: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            step_seconds: 0.1,
            max_duration_seconds: 30.0,
            min_duration_seconds: 1.0,
        }
    }
}

/// Frame validity and pose coverage parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityConfig {
    /// Minimum mean visibility over the 8 upper-body/hip landmarks (default: 0.55)
    pub min_mean_visibility: f32,

    /// Minimum number of landmarks an estimate must carry (default: 25)
    pub min_landmark_count: usize,

    /// Minimum fraction of probed frames that must be valid (default: 0.30)
    pub min_valid_ratio: f32,

    /// Minimum absolute number of valid frames (default: 10)
    pub min_valid_frames: usize,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            min_mean_visibility: 0.55,
            min_landmark_count: 25,
            min_valid_ratio: 0.30,
            min_valid_frames: 10,
        }
    }
}

/// Shot validity gate parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum shoulder-elbow-wrist angle at release in degrees (default: 140)
    pub min_elbow_angle_deg: f32,

    /// Frames before release used for the wrist-height baseline (default: 20)
    pub baseline_window: usize,

    /// Minimum wrist lift for jump shots (default: 0.18)
    pub min_lift_jump_shot: f32,

    /// Minimum wrist lift for free throws (default: 0.10)
    pub min_lift_free_throw: f32,

    /// Frames after release inspected for follow-through (default: 7)
    pub follow_window: usize,

    /// Maximum wrist drop from release height that still counts as held (default: 0.22)
    pub follow_tolerance: f32,

    /// Held frames required for jump shots (default: 3)
    pub min_follow_frames_jump_shot: usize,

    /// Held frames required for free throws (default: 2)
    pub min_follow_frames_free_throw: usize,

    /// Gates that must pass out of three (default: 2)
    pub required_votes: usize,
}

impl GateConfig {
    /// Wrist lift threshold for the given shot type
    pub fn min_lift(&self, shot_type: ShotType) -> f32 {
        match shot_type {
            ShotType::JumpShot => self.min_lift_jump_shot,
            ShotType::FreeThrow => self.min_lift_free_throw,
        }
    }

    /// Follow-through frame count threshold for the given shot type
    pub fn min_follow_frames(&self, shot_type: ShotType) -> usize {
        match shot_type {
            ShotType::JumpShot => self.min_follow_frames_jump_shot,
            ShotType::FreeThrow => self.min_follow_frames_free_throw,
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_elbow_angle_deg: 140.0,
            baseline_window: 20,
            min_lift_jump_shot: 0.18,
            min_lift_free_throw: 0.10,
            follow_window: 7,
            follow_tolerance: 0.22,
            min_follow_frames_jump_shot: 3,
            min_follow_frames_free_throw: 2,
            required_votes: 2,
        }
    }
}

/// Linear closeness-to-ideal scoring: 1.0 at `ideal`, 0.0 at `ideal ± falloff`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealFalloff {
    /// Value scored as 1.0
    pub ideal: f32,
    /// Distance from ideal at which the score reaches 0.0
    pub falloff: f32,
}

impl IdealFalloff {
    /// Score `value` by closeness to the ideal, clamped to [0, 1]
    pub fn score(&self, value: f32) -> f32 {
        if !value.is_finite() || self.falloff <= 0.0 {
            return 0.0;
        }
        (1.0 - (value - self.ideal).abs() / self.falloff).clamp(0.0, 1.0)
    }
}

/// Step function over ascending bucket edges
///
/// `values` has one more entry than `edges`: `values[i]` applies below
/// `edges[i]`, the last value applies at or above the last edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buckets {
    /// Ascending upper edges (exclusive)
    pub edges: Vec<f32>,
    /// Score per bucket
    pub values: Vec<f32>,
}

impl Buckets {
    /// Look up the bucket score for `value`
    pub fn score(&self, value: f32) -> f32 {
        if value.is_nan() {
            return 0.0;
        }
        let idx = self
            .edges
            .iter()
            .position(|&edge| value < edge)
            .unwrap_or(self.edges.len());
        self.values
            .get(idx)
            .or_else(|| self.values.last())
            .copied()
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    }
}

/// Per-metric thresholds for the metric extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricThresholds {
    /// Ankle/shoulder width ratio (ideal 1.0, falloff 0.5)
    pub stance_ratio: IdealFalloff,

    /// Mean centroid displacement per frame → score
    pub sway_buckets: Buckets,

    /// Frames before release averaged for the loading knee angle (default: 10)
    pub knee_window: usize,

    /// Knee angle change scored as 1.0, in degrees (default: 40)
    pub knee_dip_full_deg: f32,

    /// Frames before release used as the drive baseline (default: 10)
    pub drive_window: usize,

    /// Elbow angle (ideal 180°, falloff 90°)
    pub elbow_angle: IdealFalloff,

    /// Horizontal elbow/wrist offset scored as 0.0 (default: 0.15)
    pub elbow_under_ball_max_offset: f32,

    /// Wrist lift scored as 1.0 (default: 0.30)
    pub release_height_full_lift: f32,

    /// Frames after release inspected for the wrist flick (default: 3)
    pub flick_window: usize,

    /// Forearm rotation in degrees → score
    pub flick_buckets: Buckets,

    /// Frames after release used for landing balance (default: 7)
    pub landing_window: usize,

    /// Fraction of shoulder width at which ankle drift scores 0.0 (default: 0.5)
    pub landing_shoulder_fraction: f32,

    /// Landing balance when no frames follow the release (default: 0.5)
    pub landing_without_frames: f32,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            stance_ratio: IdealFalloff {
                ideal: 1.0,
                falloff: 0.5,
            },
            sway_buckets: Buckets {
                edges: vec![0.05, 0.10, 0.15],
                values: vec![1.0, 0.8, 0.5, 0.3],
            },
            knee_window: 10,
            knee_dip_full_deg: 40.0,
            drive_window: 10,
            elbow_angle: IdealFalloff {
                ideal: 180.0,
                falloff: 90.0,
            },
            elbow_under_ball_max_offset: 0.15,
            release_height_full_lift: 0.30,
            flick_window: 3,
            flick_buckets: Buckets {
                edges: vec![10.0, 20.0, 30.0, 40.0],
                values: vec![0.3, 0.5, 0.7, 0.85, 1.0],
            },
            landing_window: 7,
            landing_shoulder_fraction: 0.5,
            landing_without_frames: 0.5,
        }
    }
}

/// Score weights (sum to 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Stance width weight (default: 0.08)
    pub stance_width: f32,
    /// Lateral sway weight (default: 0.12)
    pub lateral_sway: f32,
    /// Knee dip weight (default: 0.10)
    pub knee_dip: f32,
    /// Vertical drive weight (default: 0.10)
    pub vertical_drive: f32,
    /// Elbow alignment weight (default: 0.18)
    pub elbow_alignment: f32,
    /// Elbow under ball weight (default: 0.10)
    pub elbow_under_ball: f32,
    /// Release height weight (default: 0.12)
    pub release_height: f32,
    /// Wrist flick weight (default: 0.08)
    pub wrist_flick: f32,
    /// Follow-through hold weight (default: 0.07)
    pub follow_through_hold: f32,
    /// Landing balance weight (default: 0.05)
    pub landing_balance: f32,
}

impl ScoreWeights {
    /// Sum of all weights
    pub fn total(&self) -> f32 {
        self.stance_width
            + self.lateral_sway
            + self.knee_dip
            + self.vertical_drive
            + self.elbow_alignment
            + self.elbow_under_ball
            + self.release_height
            + self.wrist_flick
            + self.follow_through_hold
            + self.landing_balance
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            stance_width: 0.08,
            lateral_sway: 0.12,
            knee_dip: 0.10,
            vertical_drive: 0.10,
            elbow_alignment: 0.18,
            elbow_under_ball: 0.10,
            release_height: 0.12,
            wrist_flick: 0.08,
            follow_through_hold: 0.07,
            landing_balance: 0.05,
        }
    }
}

/// Coaching feedback parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindingsConfig {
    /// Metrics below this produce a finding (default: 0.65)
    pub finding_cutoff: f32,

    /// Below this a finding is severity 3 (default: 0.40)
    pub severe_below: f32,

    /// Below this a finding is severity 2 (default: 0.55)
    pub moderate_below: f32,

    /// Metrics at or above this count as strengths (default: 0.75)
    pub strength_cutoff: f32,

    /// Maximum number of improvement entries (default: 5)
    pub max_improvements: usize,

    /// Exact number of strength entries (default: 3)
    pub strength_count: usize,
}

impl Default for FindingsConfig {
    fn default() -> Self {
        Self {
            finding_cutoff: 0.65,
            severe_below: 0.40,
            moderate_below: 0.55,
            strength_cutoff: 0.75,
            max_improvements: 5,
            strength_count: 3,
        }
    }
}

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Shot type hint (default: jump shot)
    pub shot_type: ShotType,

    /// Frame sampling
    pub sampling: SamplingConfig,

    /// Frame validity and coverage
    pub validity: ValidityConfig,

    /// Shot validity gate
    pub gate: GateConfig,

    /// Metric extraction thresholds
    pub metrics: MetricThresholds,

    /// Score weights
    pub weights: ScoreWeights,

    /// Coaching feedback
    pub findings: FindingsConfig,
}

impl AnalysisConfig {
    /// Default configuration for the given shot type
    pub fn for_shot_type(shot_type: ShotType) -> Self {
        Self {
            shot_type,
            ..Self::default()
        }
    }

    /// Load a configuration from JSON
    ///
    /// Missing fields fall back to their defaults, so a partial document
    /// such as `{"shot_type": "free_throw"}` is accepted.
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let s = &self.sampling;
        if !(s.step_seconds.is_finite() && s.step_seconds > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Sampling step must be > 0, got {}",
                s.step_seconds
            )));
        }
        if !(s.max_duration_seconds.is_finite() && s.max_duration_seconds > 0.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Max sampling duration must be > 0, got {}",
                s.max_duration_seconds
            )));
        }
        if self.gate.required_votes > 3 {
            return Err(AnalysisError::InvalidInput(format!(
                "Gate cannot require {} of 3 votes",
                self.gate.required_votes
            )));
        }
        let total = self.weights.total();
        if (total - 1.0).abs() > 1e-3 {
            log::warn!("Score weights sum to {:.4}, expected 1.0", total);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = ScoreWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shot_type_from_hint() {
        assert_eq!(ShotType::from_hint("free throw"), ShotType::FreeThrow);
        assert_eq!(ShotType::from_hint("  FREE-THROW "), ShotType::FreeThrow);
        assert_eq!(ShotType::from_hint("free_throw"), ShotType::FreeThrow);
        assert_eq!(ShotType::from_hint("jump shot"), ShotType::JumpShot);
        assert_eq!(ShotType::from_hint(""), ShotType::JumpShot);
    }

    #[test]
    fn test_gate_thresholds_by_shot_type() {
        let gate = GateConfig::default();
        assert_eq!(gate.min_lift(ShotType::JumpShot), 0.18);
        assert_eq!(gate.min_lift(ShotType::FreeThrow), 0.10);
        assert_eq!(gate.min_follow_frames(ShotType::JumpShot), 3);
        assert_eq!(gate.min_follow_frames(ShotType::FreeThrow), 2);
    }

    #[test]
    fn test_ideal_falloff() {
        let stance = MetricThresholds::default().stance_ratio;
        assert_eq!(stance.score(1.0), 1.0);
        assert!((stance.score(1.25) - 0.5).abs() < 1e-6);
        assert!((stance.score(0.75) - 0.5).abs() < 1e-6);
        assert_eq!(stance.score(2.0), 0.0);
        assert_eq!(stance.score(f32::NAN), 0.0);
    }

    #[test]
    fn test_bucket_edges() {
        let sway = MetricThresholds::default().sway_buckets;
        assert_eq!(sway.score(0.0), 1.0);
        assert_eq!(sway.score(0.049), 1.0);
        assert_eq!(sway.score(0.05), 0.8);
        assert_eq!(sway.score(0.12), 0.5);
        assert_eq!(sway.score(0.5), 0.3);

        let flick = MetricThresholds::default().flick_buckets;
        assert_eq!(flick.score(5.0), 0.3);
        assert_eq!(flick.score(15.0), 0.5);
        assert_eq!(flick.score(25.0), 0.7);
        assert_eq!(flick.score(35.0), 0.85);
        assert_eq!(flick.score(40.0), 1.0);
    }

    #[test]
    fn test_partial_json_config() {
        let config = AnalysisConfig::from_json_str(
            r#"{"shot_type": "free_throw", "gate": {"follow_tolerance": 0.3}}"#,
        )
        .expect("partial config should parse");
        assert_eq!(config.shot_type, ShotType::FreeThrow);
        assert_eq!(config.gate.follow_tolerance, 0.3);
        assert_eq!(config.gate.follow_window, 7);
        assert_eq!(config.sampling, SamplingConfig::default());
    }

    #[test]
    fn test_invalid_step_rejected() {
        let result = AnalysisConfig::from_json_str(r#"{"sampling": {"step_seconds": 0.0}}"#);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }
}
