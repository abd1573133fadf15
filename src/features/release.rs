//! Release-point detection
//!
//! The release is taken to be the frame where the shooting wrist is highest
//! on screen (minimum normalized `y`).

use super::pose::{FrameSample, Side};

/// Index of the release frame
///
/// Returns `None` if no frame has a finite wrist height. Ties resolve to the
/// earliest frame.
pub fn find_release_index(frames: &[FrameSample], side: Side) -> Option<usize> {
    let wrist = side.wrist();
    let mut best: Option<(usize, f32)> = None;

    for (i, frame) in frames.iter().enumerate() {
        let y = frame.landmark(wrist).y;
        if !y.is_finite() {
            continue;
        }
        match best {
            Some((_, best_y)) if y >= best_y => {}
            _ => best = Some((i, y)),
        }
    }

    match best {
        Some((idx, y)) => {
            log::debug!(
                "Release at frame {} of {} (t={} ms, wrist y={:.3})",
                idx,
                frames.len(),
                frames[idx].timestamp_ms,
                y
            );
            Some(idx)
        }
        None => {
            log::debug!("No finite wrist position in {} frames", frames.len());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pose::fixtures::wrist_track;

    #[test]
    fn test_highest_wrist_is_release() {
        let frames = wrist_track(&[0.45, 0.40, 0.30, 0.20, 0.25, 0.35]);
        assert_eq!(find_release_index(&frames, Side::Right), Some(3));
    }

    #[test]
    fn test_ties_take_first_frame() {
        let frames = wrist_track(&[0.45, 0.20, 0.20, 0.30]);
        assert_eq!(find_release_index(&frames, Side::Right), Some(1));
    }

    #[test]
    fn test_non_finite_frames_skipped() {
        let frames = wrist_track(&[f32::NAN, 0.40, f32::NAN]);
        assert_eq!(find_release_index(&frames, Side::Right), Some(1));
    }

    #[test]
    fn test_no_release_without_finite_wrist() {
        assert_eq!(find_release_index(&[], Side::Right), None);
        let frames = wrist_track(&[f32::NAN, f32::NAN]);
        assert_eq!(find_release_index(&frames, Side::Right), None);
    }
}
