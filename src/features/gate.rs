//! Shot validity gate
//!
//! Three independent heuristics, each evaluated relative to the release
//! frame, vote on whether the clip shows a shooting motion:
//!
//! 1. **Elbow extension**: shoulder-elbow-wrist angle at release ≥ 140°
//! 2. **Wrist lift**: median wrist height over the frames before release,
//!    minus the release height, clears a shot-type dependent threshold
//! 3. **Follow-through**: the wrist stays near release height for enough
//!    of the frames right after release
//!
//! At least two of three must pass. A single noisy signal cannot reject a
//! real shot, while static poses, passes and dribbles fail on two or more.

use serde::{Deserialize, Serialize};

use super::geometry::{joint_angle, median};
use super::pose::{FrameSample, Side};
use crate::config::{GateConfig, ShotType};

/// Outcome of the three gate heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateReport {
    /// Elbow angle at release in degrees (None if the arm is degenerate)
    pub elbow_angle_deg: Option<f32>,
    /// Gate 1 result
    pub elbow_extended: bool,

    /// Wrist lift above the pre-release baseline (normalized units)
    pub wrist_lift: f32,
    /// Threshold the lift was compared against
    pub lift_threshold: f32,
    /// Gate 2 result
    pub wrist_lifted: bool,

    /// Post-release frames with the wrist still near release height
    pub follow_through_frames: usize,
    /// Gate 3 result
    pub followed_through: bool,

    /// Number of gates that passed (0-3)
    pub votes: usize,
    /// Whether enough gates passed
    pub passed: bool,
}

/// Shoulder-elbow-wrist angle at a frame
pub fn elbow_angle(frame: &FrameSample, side: Side) -> Option<f32> {
    joint_angle(
        frame.point(side.shoulder()),
        frame.point(side.elbow()),
        frame.point(side.wrist()),
    )
}

/// Wrist lift at release: median wrist `y` over up to `window` frames before
/// release, minus the release wrist `y`
///
/// With no preceding frames the baseline is the release height itself and
/// the lift is 0.
pub fn wrist_lift(frames: &[FrameSample], side: Side, release: usize, window: usize) -> f32 {
    let wrist = side.wrist();
    let release_y = frames[release].landmark(wrist).y;
    let start = release.saturating_sub(window);
    let preceding: Vec<f32> = frames[start..release]
        .iter()
        .map(|f| f.landmark(wrist).y)
        .collect();

    let baseline = median(&preceding).unwrap_or(release_y);
    baseline - release_y
}

/// Count frames in the `window` after release whose wrist stays within
/// `tolerance` of the release height
pub fn follow_through_count(
    frames: &[FrameSample],
    side: Side,
    release: usize,
    window: usize,
    tolerance: f32,
) -> usize {
    let wrist = side.wrist();
    let release_y = frames[release].landmark(wrist).y;
    frames
        .iter()
        .skip(release + 1)
        .take(window)
        .filter(|f| (f.landmark(wrist).y - release_y).abs() <= tolerance)
        .count()
}

/// Evaluate the three gates around the release frame
///
/// `release` must index into `frames`.
pub fn evaluate_gate(
    frames: &[FrameSample],
    side: Side,
    release: usize,
    shot_type: ShotType,
    config: &GateConfig,
) -> GateReport {
    let elbow_angle_deg = elbow_angle(&frames[release], side);
    let elbow_extended = elbow_angle_deg.map_or(false, |a| a >= config.min_elbow_angle_deg);

    let lift = wrist_lift(frames, side, release, config.baseline_window);
    let lift_threshold = config.min_lift(shot_type);
    let wrist_lifted = lift >= lift_threshold;

    let follow_through_frames = follow_through_count(
        frames,
        side,
        release,
        config.follow_window,
        config.follow_tolerance,
    );
    let followed_through = follow_through_frames >= config.min_follow_frames(shot_type);

    let votes = [elbow_extended, wrist_lifted, followed_through]
        .iter()
        .filter(|&&v| v)
        .count();
    let passed = votes >= config.required_votes;

    log::debug!(
        "Shot gate ({}): elbow={:?}° [{}], lift={:.3}/{:.2} [{}], follow={}/{} [{}] -> {} votes, {}",
        shot_type.label(),
        elbow_angle_deg,
        elbow_extended,
        lift,
        lift_threshold,
        wrist_lifted,
        follow_through_frames,
        config.follow_window,
        followed_through,
        votes,
        if passed { "pass" } else { "fail" }
    );

    GateReport {
        elbow_angle_deg,
        elbow_extended,
        wrist_lift: lift,
        lift_threshold,
        wrist_lifted,
        follow_through_frames,
        followed_through,
        votes,
        passed,
    }
}
