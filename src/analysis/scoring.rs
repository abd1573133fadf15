//! Weighted shot score
//!
//! `score = round(100 × Σ weight_i × metric_i)`, clamped to [0, 100]. The
//! weights are fixed (not learned); elbow alignment carries the largest
//! share because it is the most diagnostic of shooting-form faults.

use super::result::{MetricKey, ShotMetrics};
use crate::config::ScoreWeights;

impl ScoreWeights {
    /// Weight of a single metric
    pub fn get(&self, key: MetricKey) -> f32 {
        match key {
            MetricKey::StanceWidth => self.stance_width,
            MetricKey::LateralSway => self.lateral_sway,
            MetricKey::KneeDip => self.knee_dip,
            MetricKey::VerticalDrive => self.vertical_drive,
            MetricKey::ElbowAlignment => self.elbow_alignment,
            MetricKey::ElbowUnderBall => self.elbow_under_ball,
            MetricKey::ReleaseHeight => self.release_height,
            MetricKey::WristFlick => self.wrist_flick,
            MetricKey::FollowThroughHold => self.follow_through_hold,
            MetricKey::LandingBalance => self.landing_balance,
        }
    }
}

/// Weighted sum of the metrics, before scaling to 0-100
pub fn weighted_sum(metrics: &ShotMetrics, weights: &ScoreWeights) -> f32 {
    metrics
        .iter()
        .map(|(key, value)| value * weights.get(key))
        .sum()
}

/// Overall 0-100 score
pub fn compute_score(metrics: &ShotMetrics, weights: &ScoreWeights) -> u32 {
    let raw = 100.0 * weighted_sum(metrics, weights);
    let score = if raw.is_finite() {
        raw.round().clamp(0.0, 100.0) as u32
    } else {
        0
    };
    log::debug!("Score: {} (raw {:.2})", score, raw);
    score
}
