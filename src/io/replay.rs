//! Replay of recorded pose tracks
//!
//! A [`PoseTrack`] is a JSON document of timestamped landmark sets, as
//! exported from a pose estimator run:
//!
//! ```json
//! {
//!   "frame_interval_ms": 100,
//!   "frames": [
//!     { "timestamp_ms": 0,   "landmarks": [ { "x": 0.5, "y": 0.4, "z": 0.0, "visibility": 0.9 } ] },
//!     { "timestamp_ms": 100, "landmarks": null }
//!   ]
//! }
//! ```
//!
//! [`ReplayBackend`] serves the recorded landmarks as a pose model and
//! [`TrackVideo`] stands in for the video, so a recording can be re-scored
//! offline without a decoder or a model.

use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::landmark_source::{ExecutionMode, PoseBackend, PoseModel};
use super::video::{VideoFrame, VideoSource};
use crate::error::{AnalysisError, DetectionError};
use crate::features::pose::Landmark;

fn default_frame_interval_ms() -> u64 {
    100
}

/// Landmarks recorded for one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFrame {
    /// Recording time in milliseconds
    pub timestamp_ms: u64,
    /// Landmarks, or `None` if no person was detected
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

/// A recorded sequence of pose estimates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseTrack {
    /// Nominal spacing between recorded frames (default: 100 ms)
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Explicit clip duration; derived from the last frame if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f32>,

    /// Recorded frames, sorted by timestamp
    pub frames: Vec<TrackFrame>,
}

impl PoseTrack {
    /// Build a track from evenly spaced estimates starting at 0 ms
    pub fn from_estimates(estimates: Vec<Option<Vec<Landmark>>>, frame_interval_ms: u64) -> Self {
        let frames = estimates
            .into_iter()
            .enumerate()
            .map(|(i, landmarks)| TrackFrame {
                timestamp_ms: i as u64 * frame_interval_ms,
                landmarks,
            })
            .collect();
        Self {
            frame_interval_ms,
            duration_seconds: None,
            frames,
        }
    }

    /// Parse a track from JSON
    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let track: Self = serde_json::from_str(json)?;
        track.validated()
    }

    /// Parse a track from a JSON reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AnalysisError> {
        let track: Self = serde_json::from_reader(reader)?;
        track.validated()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string(self)?)
    }

    fn validated(mut self) -> Result<Self, AnalysisError> {
        if self.frame_interval_ms == 0 {
            return Err(AnalysisError::InvalidInput(
                "Pose track frame interval must be > 0".to_string(),
            ));
        }
        if let Some(d) = self.duration_seconds {
            if !(d.is_finite() && d >= 0.0) {
                return Err(AnalysisError::InvalidInput(format!(
                    "Pose track duration must be finite and >= 0, got {}",
                    d
                )));
            }
        }
        self.frames.sort_by_key(|f| f.timestamp_ms);
        Ok(self)
    }

    /// Clip duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        if let Some(d) = self.duration_seconds {
            return d;
        }
        match self.frames.last() {
            Some(last) => (last.timestamp_ms + self.frame_interval_ms) as f32 / 1000.0,
            None => 0.0,
        }
    }

    /// Landmarks of the frame nearest to `time_ms`, if one lies within half
    /// a frame interval
    pub fn landmarks_at(&self, time_ms: u64) -> Option<&[Landmark]> {
        let idx = self.frames.partition_point(|f| f.timestamp_ms < time_ms);
        let candidates = [idx.checked_sub(1), Some(idx)];
        let nearest = candidates
            .iter()
            .flatten()
            .filter_map(|&i| self.frames.get(i))
            .min_by_key(|f| f.timestamp_ms.abs_diff(time_ms))?;

        if nearest.timestamp_ms.abs_diff(time_ms) * 2 > self.frame_interval_ms {
            return None;
        }
        nearest.landmarks.as_deref()
    }
}

/// Pose model that replays a recorded track
///
/// Frames are matched by their presentation time, so timestamp bumps made
/// by the adapter do not shift the lookup.
#[derive(Debug, Clone)]
pub struct ReplayModel {
    track: Arc<PoseTrack>,
}

impl PoseModel for ReplayModel {
    fn detect_for_video(
        &mut self,
        frame: &VideoFrame,
        _timestamp_ms: u64,
    ) -> Result<Option<Vec<Landmark>>, DetectionError> {
        if !(frame.time_seconds.is_finite() && frame.time_seconds >= 0.0) {
            return Err(DetectionError::InferenceFailed(format!(
                "invalid frame time {}",
                frame.time_seconds
            )));
        }
        let time_ms = (frame.time_seconds * 1000.0).round() as u64;
        Ok(self.track.landmarks_at(time_ms).map(<[Landmark]>::to_vec))
    }
}

/// Backend serving a recorded track in any execution mode
#[derive(Debug, Clone)]
pub struct ReplayBackend {
    track: Arc<PoseTrack>,
}

impl ReplayBackend {
    /// Serve the given track
    pub fn new(track: Arc<PoseTrack>) -> Self {
        Self { track }
    }
}

impl PoseBackend for ReplayBackend {
    type Model = ReplayModel;

    fn create_model(&mut self, _mode: ExecutionMode) -> Result<ReplayModel, DetectionError> {
        Ok(ReplayModel {
            track: Arc::clone(&self.track),
        })
    }
}

/// Pixel-less video matching a recorded track's duration
#[derive(Debug, Clone)]
pub struct TrackVideo {
    track: Arc<PoseTrack>,
}

impl TrackVideo {
    /// Video for the given track
    pub fn new(track: Arc<PoseTrack>) -> Self {
        Self { track }
    }
}

impl VideoSource for TrackVideo {
    fn duration_seconds(&self) -> Result<f32, AnalysisError> {
        Ok(self.track.duration_seconds())
    }

    fn seek(&mut self, time_seconds: f32) -> Result<VideoFrame, AnalysisError> {
        let duration = self.track.duration_seconds();
        if !(time_seconds.is_finite() && time_seconds >= 0.0 && time_seconds <= duration) {
            return Err(AnalysisError::VideoError(format!(
                "Seek to {:.3}s outside clip of {:.3}s",
                time_seconds, duration
            )));
        }
        Ok(VideoFrame::empty(time_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(x: f32) -> Option<Vec<Landmark>> {
        Some(vec![Landmark::new(x, 0.5, 0.0, 1.0)])
    }

    #[test]
    fn test_duration_from_last_frame() {
        let track = PoseTrack::from_estimates(vec![marker(0.1), marker(0.2), None], 100);
        assert!((track.duration_seconds() - 0.3).abs() < 1e-6);
        assert_eq!(PoseTrack::from_estimates(vec![], 100).duration_seconds(), 0.0);
    }

    #[test]
    fn test_nearest_frame_lookup() {
        let track = PoseTrack::from_estimates(vec![marker(0.1), marker(0.2), None], 100);
        assert_eq!(track.landmarks_at(0).unwrap()[0].x, 0.1);
        assert_eq!(track.landmarks_at(140).unwrap()[0].x, 0.2);
        assert_eq!(track.landmarks_at(150).unwrap()[0].x, 0.2);
        assert!(track.landmarks_at(160).is_none());
        assert!(track.landmarks_at(200).is_none());
        assert!(track.landmarks_at(900).is_none());
    }

    #[test]
    fn test_json_roundtrip_sorts_frames() {
        let json = r#"{
            "frames": [
                {"timestamp_ms": 100, "landmarks": [{"x": 0.2, "y": 0.5, "visibility": 0.8}]},
                {"timestamp_ms": 0, "landmarks": [{"x": 0.1, "y": 0.5}]},
                {"timestamp_ms": 200}
            ]
        }"#;
        let track = PoseTrack::from_json_str(json).unwrap();
        assert_eq!(track.frame_interval_ms, 100);
        assert_eq!(track.frames[0].timestamp_ms, 0);
        assert_eq!(track.frames[0].landmarks.as_ref().unwrap()[0].visibility, None);
        assert_eq!(track.frames[2].landmarks, None);

        let again = PoseTrack::from_json_str(&track.to_json().unwrap()).unwrap();
        assert_eq!(again, track);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = PoseTrack::from_json_str(r#"{"frame_interval_ms": 0, "frames": []}"#);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_replay_model_uses_frame_time() {
        let track = Arc::new(PoseTrack::from_estimates(vec![marker(0.1), marker(0.2)], 100));
        let mut backend = ReplayBackend::new(Arc::clone(&track));
        let mut model = backend.create_model(ExecutionMode::Accelerated).unwrap();
        // Bumped timestamp must not matter
        let landmarks = model
            .detect_for_video(&VideoFrame::empty(0.1), 101)
            .unwrap()
            .unwrap();
        assert_eq!(landmarks[0].x, 0.2);
    }

    #[test]
    fn test_track_video_seek_bounds() {
        let track = Arc::new(PoseTrack::from_estimates(vec![marker(0.1); 10], 100));
        let mut video = TrackVideo::new(track);
        assert!((video.duration_seconds().unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(video.seek(0.5).unwrap().time_seconds, 0.5);
        assert!(matches!(video.seek(1.5), Err(AnalysisError::VideoError(_))));
    }
}
