//! Image-plane geometry helpers
//!
//! All inputs are normalized (x, y) points; angles are in degrees.

use super::pose::{FrameSample, TORSO_LANDMARKS};

/// Guard for degenerate vectors
const EPSILON: f32 = 1e-4;

/// Angle at joint `b` formed by the segments b→a and b→c, in degrees
///
/// Uses cos(θ) = (v1 · v2) / (|v1| × |v2|):
/// - 180° = fully straight
/// - 90° = right angle
///
/// Returns `None` when either segment is too short to define a direction.
pub fn joint_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Option<f32> {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if !(mag1 >= EPSILON && mag2 >= EPSILON) {
        return None;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// Angle between two direction vectors in degrees, in [0, 180]
pub fn vector_angle_between(u: (f32, f32), v: (f32, f32)) -> Option<f32> {
    joint_angle(u, (0.0, 0.0), v)
}

/// Torso centroid: mean of both shoulders and both hips
pub fn torso_centroid(frame: &FrameSample) -> (f32, f32) {
    let (sx, sy) = TORSO_LANDMARKS
        .iter()
        .map(|&i| frame.point(i))
        .fold((0.0, 0.0), |acc, p| (acc.0 + p.0, acc.1 + p.1));
    let n = TORSO_LANDMARKS.len() as f32;
    (sx / n, sy / n)
}

/// Median of a list of values (mean of the middle pair for even lengths)
///
/// Non-finite values are ignored; returns `None` if nothing remains.
pub fn median(values: &[f32]) -> Option<f32> {
    let mut sorted: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f32>() / values.len() as f32)
}
