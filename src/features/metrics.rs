//! Biomechanical metric extraction
//!
//! Computes the ten shot-form metrics from the release frame and a small
//! window of frames around it. Every metric is independently normalized to
//! [0, 1], where 1.0 is textbook form. Thresholds come from
//! [`MetricThresholds`]; this module only does the geometry.
//!
//! | Metric | Measured as |
//! |---|---|
//! | stance width | ankle width ÷ shoulder width, closeness to 1.0 |
//! | lateral sway | mean torso-centroid displacement per frame, bucketed |
//! | knee dip | change of the knee angle between loading and release |
//! | vertical drive | vertical share of torso-centroid travel into release |
//! | elbow alignment | shoulder-elbow-wrist angle, closeness to 180° |
//! | elbow under ball | horizontal elbow/wrist offset at release |
//! | release height | wrist lift over the pre-release baseline |
//! | wrist flick | forearm rotation over the frames after release, bucketed |
//! | follow-through hold | share of post-release frames with the wrist held high |
//! | landing balance | ankle-width drift after release relative to shoulder width |

use super::gate::{elbow_angle, GateReport};
use super::geometry::{joint_angle, mean, torso_centroid, vector_angle_between};
use super::pose::{FrameSample, Side};
use crate::analysis::result::ShotMetrics;
use crate::config::{GateConfig, MetricThresholds};

/// Numerical stability epsilon
const EPSILON: f32 = 1e-6;

/// Clamp to [0, 1], mapping non-finite values to 0
fn unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Extract all ten metrics around the release frame
///
/// `release` must index into `frames`. The release height and follow-through
/// hold reuse the values measured by the shot gate.
pub fn extract_metrics(
    frames: &[FrameSample],
    side: Side,
    release: usize,
    gate: &GateReport,
    gate_config: &GateConfig,
    thresholds: &MetricThresholds,
) -> ShotMetrics {
    let release_frame = &frames[release];

    let follow_through_hold = if gate_config.follow_window == 0 {
        0.0
    } else {
        unit(gate.follow_through_frames as f32 / gate_config.follow_window as f32)
    };

    let metrics = ShotMetrics {
        stance_width: stance_width(release_frame, thresholds),
        lateral_sway: lateral_sway(frames, thresholds),
        knee_dip: knee_dip(frames, side, release, thresholds),
        vertical_drive: vertical_drive(frames, release, thresholds),
        elbow_alignment: elbow_alignment(release_frame, side, thresholds),
        elbow_under_ball: elbow_under_ball(release_frame, side, thresholds),
        release_height: release_height(gate.wrist_lift, thresholds),
        wrist_flick: wrist_flick(frames, side, release, thresholds),
        follow_through_hold,
        landing_balance: landing_balance(frames, release, thresholds),
    };

    log::debug!("Extracted metrics: {:?}", metrics);
    metrics
}

/// Ankle separation relative to shoulder separation, scored by closeness to
/// the ideal ratio
pub fn stance_width(frame: &FrameSample, thresholds: &MetricThresholds) -> f32 {
    let shoulders = frame.shoulder_width();
    if shoulders < EPSILON {
        return 0.0;
    }
    unit(thresholds.stance_ratio.score(frame.ankle_width() / shoulders))
}

/// Inverse of the mean frame-to-frame displacement of the torso centroid
/// across the whole sequence
pub fn lateral_sway(frames: &[FrameSample], thresholds: &MetricThresholds) -> f32 {
    let centroids: Vec<(f32, f32)> = frames.iter().map(torso_centroid).collect();
    let steps: Vec<f32> = centroids
        .windows(2)
        .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
        .collect();
    let mean_step = mean(&steps).unwrap_or(0.0);
    log::debug!("Lateral sway: mean centroid step {:.4}", mean_step);
    unit(thresholds.sway_buckets.score(mean_step))
}

fn knee_angle(frame: &FrameSample, side: Side) -> Option<f32> {
    joint_angle(
        frame.point(side.hip()),
        frame.point(side.knee()),
        frame.point(side.ankle()),
    )
}

/// Knee bend between the loading frames and release
///
/// Magnitude of (mean hip-knee-ankle angle over the frames before release)
/// minus (angle at release), scaled so `knee_dip_full_deg` scores 1.0.
pub fn knee_dip(
    frames: &[FrameSample],
    side: Side,
    release: usize,
    thresholds: &MetricThresholds,
) -> f32 {
    let Some(at_release) = knee_angle(&frames[release], side) else {
        return 0.0;
    };
    let start = release.saturating_sub(thresholds.knee_window);
    let loading: Vec<f32> = frames[start..release]
        .iter()
        .filter_map(|f| knee_angle(f, side))
        .collect();
    let Some(loading_mean) = mean(&loading) else {
        return 0.0;
    };
    if thresholds.knee_dip_full_deg <= 0.0 {
        return 0.0;
    }
    unit((loading_mean - at_release).abs() / thresholds.knee_dip_full_deg)
}

/// Vertical share of torso-centroid displacement from the drive baseline to
/// release
pub fn vertical_drive(frames: &[FrameSample], release: usize, thresholds: &MetricThresholds) -> f32 {
    let baseline = release.saturating_sub(thresholds.drive_window);
    let (bx, by) = torso_centroid(&frames[baseline]);
    let (rx, ry) = torso_centroid(&frames[release]);
    let dx = (rx - bx).abs();
    let dy = (ry - by).abs();
    if dx + dy < EPSILON {
        return 0.0;
    }
    unit(dy / (dx + dy))
}

/// Deviation of the elbow angle from a straight arm
pub fn elbow_alignment(frame: &FrameSample, side: Side, thresholds: &MetricThresholds) -> f32 {
    elbow_angle(frame, side)
        .map(|angle| unit(thresholds.elbow_angle.score(angle)))
        .unwrap_or(0.0)
}

/// Horizontal offset between elbow and wrist; a vertical forearm scores 1.0
pub fn elbow_under_ball(frame: &FrameSample, side: Side, thresholds: &MetricThresholds) -> f32 {
    if thresholds.elbow_under_ball_max_offset <= 0.0 {
        return 0.0;
    }
    let offset = (frame.landmark(side.elbow()).x - frame.landmark(side.wrist()).x).abs();
    unit(1.0 - offset / thresholds.elbow_under_ball_max_offset)
}

/// Wrist lift normalized by the lift that scores full marks
pub fn release_height(wrist_lift: f32, thresholds: &MetricThresholds) -> f32 {
    if thresholds.release_height_full_lift <= 0.0 {
        return 0.0;
    }
    unit(wrist_lift / thresholds.release_height_full_lift)
}

/// Largest forearm rotation relative to release over the following frames
pub fn wrist_flick(
    frames: &[FrameSample],
    side: Side,
    release: usize,
    thresholds: &MetricThresholds,
) -> f32 {
    let forearm = |f: &FrameSample| {
        let (ex, ey) = f.point(side.elbow());
        let (wx, wy) = f.point(side.wrist());
        (wx - ex, wy - ey)
    };
    let at_release = forearm(&frames[release]);

    let max_rotation = frames
        .iter()
        .skip(release + 1)
        .take(thresholds.flick_window)
        .filter_map(|f| vector_angle_between(at_release, forearm(f)))
        .fold(0.0f32, f32::max);

    log::debug!("Wrist flick: max forearm rotation {:.1}°", max_rotation);
    unit(thresholds.flick_buckets.score(max_rotation))
}

/// Stability of the base after release
///
/// 1 − |mean post-release ankle width − ankle width at release| ÷
/// (fraction × shoulder width at release).
pub fn landing_balance(frames: &[FrameSample], release: usize, thresholds: &MetricThresholds) -> f32 {
    let post: Vec<f32> = frames
        .iter()
        .skip(release + 1)
        .take(thresholds.landing_window)
        .map(FrameSample::ankle_width)
        .collect();
    let Some(post_width) = mean(&post) else {
        return unit(thresholds.landing_without_frames);
    };

    let release_frame = &frames[release];
    let tolerance = thresholds.landing_shoulder_fraction * release_frame.shoulder_width();
    if tolerance < EPSILON {
        return 0.0;
    }
    unit(1.0 - (post_width - release_frame.ankle_width()).abs() / tolerance)
}
