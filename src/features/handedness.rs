//! Shooting-hand inference
//!
//! The shooting wrist is the one that rises above the other at some point
//! in the clip. A single frame with the right wrist higher than the left
//! is enough to call the shooter right-handed; otherwise left.

use super::pose::{FrameSample, Side, LEFT_WRIST, RIGHT_WRIST};

/// Resolve the dominant (shooting) side from the valid frames
///
/// Smaller `y` is higher on screen. The check is an order-independent
/// existence test: no voting, no smoothing.
pub fn resolve_handedness(frames: &[FrameSample]) -> Side {
    let right_raised = frames
        .iter()
        .any(|f| f.landmark(RIGHT_WRIST).y < f.landmark(LEFT_WRIST).y);

    let side = if right_raised { Side::Right } else { Side::Left };
    log::debug!("Resolved handedness: {:?} ({} frames)", side, frames.len());
    side
}
