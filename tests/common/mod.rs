//! Shared fixtures for integration tests: stub video, scripted pose
//! backends and synthetic shot recordings

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use shotform::{
    AnalysisError, DetectionError, ExecutionMode, Landmark, PoseBackend, PoseModel, PoseTrack,
    VideoFrame, VideoSource,
};

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Video that only knows its duration and records every seek
pub struct StubVideo {
    pub duration: f32,
    pub seeks: Vec<f32>,
}

impl StubVideo {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            seeks: Vec::new(),
        }
    }
}

impl VideoSource for StubVideo {
    fn duration_seconds(&self) -> Result<f32, AnalysisError> {
        Ok(self.duration)
    }

    fn seek(&mut self, time_seconds: f32) -> Result<VideoFrame, AnalysisError> {
        self.seeks.push(time_seconds);
        Ok(VideoFrame::empty(time_seconds))
    }
}

/// What a scripted backend saw
#[derive(Debug, Default)]
pub struct CallLog {
    /// Timestamps handed to any model, in call order
    pub timestamps: Vec<u64>,
    /// Execution modes of the models built
    pub modes: Vec<ExecutionMode>,
}

/// Backend replaying a track, with scripted failures per frame time
pub struct ScriptedBackend {
    track: Arc<PoseTrack>,
    pub log: Rc<RefCell<CallLog>>,
    failures: Rc<RefCell<HashMap<u64, usize>>>,
    pub accelerated: bool,
    pub standard: bool,
}

impl ScriptedBackend {
    pub fn new(track: PoseTrack) -> Self {
        Self {
            track: Arc::new(track),
            log: Rc::new(RefCell::new(CallLog::default())),
            failures: Rc::new(RefCell::new(HashMap::new())),
            accelerated: true,
            standard: true,
        }
    }

    /// Fail the next `count` detections of the frame shown at `time_ms`
    pub fn fail_at(self, time_ms: u64, count: usize) -> Self {
        self.failures.borrow_mut().insert(time_ms, count);
        self
    }

    /// Backend that cannot build a model in any mode
    pub fn unavailable(track: PoseTrack) -> Self {
        Self {
            accelerated: false,
            standard: false,
            ..Self::new(track)
        }
    }
}

pub struct ScriptedModel {
    track: Arc<PoseTrack>,
    log: Rc<RefCell<CallLog>>,
    failures: Rc<RefCell<HashMap<u64, usize>>>,
}

impl PoseModel for ScriptedModel {
    fn detect_for_video(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: u64,
    ) -> Result<Option<Vec<Landmark>>, DetectionError> {
        self.log.borrow_mut().timestamps.push(timestamp_ms);

        let time_ms = (frame.time_seconds * 1000.0).round() as u64;
        if let Some(remaining) = self.failures.borrow_mut().get_mut(&time_ms) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DetectionError::InferenceFailed(format!("scripted failure at {} ms", time_ms)));
            }
        }
        Ok(self.track.landmarks_at(time_ms).map(<[Landmark]>::to_vec))
    }
}

impl PoseBackend for ScriptedBackend {
    type Model = ScriptedModel;

    fn create_model(&mut self, mode: ExecutionMode) -> Result<ScriptedModel, DetectionError> {
        let available = match mode {
            ExecutionMode::Accelerated => self.accelerated,
            ExecutionMode::Standard => self.standard,
        };
        if !available {
            return Err(DetectionError::ModelUnavailable(format!("{:?} disabled", mode)));
        }
        self.log.borrow_mut().modes.push(mode);
        Ok(ScriptedModel {
            track: Arc::clone(&self.track),
            log: Rc::clone(&self.log),
            failures: Rc::clone(&self.failures),
        })
    }
}

/// Upright, fully visible body: shoulders 0.10 apart, feet under the
/// shoulders, left arm hanging, right hand at chest height
pub fn base_pose() -> Vec<Landmark> {
    let mut pose = vec![Landmark::new(0.5, 0.5, 0.0, 0.9); 33];
    let mut set = |idx: usize, x: f32, y: f32| pose[idx] = Landmark::new(x, y, 0.0, 0.9);
    set(0, 0.50, 0.25);
    set(LEFT_SHOULDER, 0.45, 0.35);
    set(RIGHT_SHOULDER, 0.55, 0.35);
    set(13, 0.44, 0.48);
    set(RIGHT_ELBOW, 0.58, 0.45);
    set(LEFT_WRIST, 0.44, 0.60);
    set(RIGHT_WRIST, 0.56, 0.45);
    set(LEFT_HIP, 0.46, 0.55);
    set(RIGHT_HIP, 0.54, 0.55);
    set(LEFT_KNEE, 0.46, 0.70);
    set(RIGHT_KNEE, 0.54, 0.70);
    set(LEFT_ANKLE, 0.45, 0.85);
    set(RIGHT_ANKLE, 0.55, 0.85);
    pose
}

fn set_xy(pose: &mut [Landmark], idx: usize, x: f32, y: f32) {
    pose[idx].x = x;
    pose[idx].y = y;
}

fn raise_torso(pose: &mut [Landmark], dy: f32) {
    for idx in [LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP] {
        pose[idx].y -= dy;
    }
}

/// Index of the release frame in [`good_shot_track`]
pub const GOOD_SHOT_RELEASE: usize = 12;

/// A clean right-handed jump shot over 2 s (20 frames)
///
/// Loaded knees before release, torso rising 0.04 into release, a 175° arm
/// at release with the wrist 0.33 above its set point, a fast wrist snap
/// and the hand held high for the whole follow-through window.
pub fn good_shot_poses() -> Vec<Vec<Landmark>> {
    let release = GOOD_SHOT_RELEASE;
    let elbow = (0.55, 0.19);
    let forearm = 0.075f32;
    let tilt = 5.0f32.to_radians();
    let release_wrist = (elbow.0 + forearm * tilt.sin(), elbow.1 - forearm * tilt.cos());
    let post_wrist = [
        (0.60, 0.13),
        (0.62, 0.15),
        (0.62, 0.17),
        (0.62, 0.20),
        (0.62, 0.24),
        (0.62, 0.30),
        (0.62, 0.33),
    ];

    (0..20)
        .map(|i| {
            let mut pose = base_pose();
            if i < release {
                // Loaded knee
                set_xy(&mut pose, RIGHT_KNEE, 0.60, 0.70);
                return pose;
            }
            if i <= release + 3 {
                raise_torso(&mut pose, 0.04);
            }
            set_xy(&mut pose, RIGHT_ELBOW, elbow.0, elbow.1);
            if i == release {
                set_xy(&mut pose, RIGHT_WRIST, release_wrist.0, release_wrist.1);
            } else {
                let (x, y) = post_wrist[i - release - 1];
                set_xy(&mut pose, RIGHT_WRIST, x, y);
            }
            pose
        })
        .collect()
}

/// Index of the release frame in [`not_a_shot_track`]
pub const NOT_A_SHOT_RELEASE: usize = 10;

/// Arm bent at 90° with the hand near the hip, then dropped: no elbow
/// extension, almost no lift, no follow-through
pub fn not_a_shot_poses() -> Vec<Vec<Landmark>> {
    (0..20)
        .map(|i| {
            let mut pose = base_pose();
            match i {
                i if i < NOT_A_SHOT_RELEASE => set_xy(&mut pose, RIGHT_WRIST, 0.56, 0.58),
                NOT_A_SHOT_RELEASE => {
                    set_xy(&mut pose, RIGHT_ELBOW, 0.55, 0.52);
                    set_xy(&mut pose, RIGHT_WRIST, 0.45, 0.52);
                }
                _ => set_xy(&mut pose, RIGHT_WRIST, 0.56, 0.85),
            }
            pose
        })
        .collect()
}

/// Index of the release frame in [`set_shot_track`]
pub const SET_SHOT_RELEASE: usize = 12;

/// Short push from a bent arm: 0.12 of lift and two held frames
///
/// Enough for a free throw, not for a jump shot.
pub fn set_shot_poses() -> Vec<Vec<Landmark>> {
    let post_wrist_y = [0.30, 0.40, 0.55, 0.60, 0.60, 0.60, 0.60];
    (0..20)
        .map(|i| {
            let mut pose = base_pose();
            if i < SET_SHOT_RELEASE {
                set_xy(&mut pose, RIGHT_WRIST, 0.60, 0.37);
                return pose;
            }
            set_xy(&mut pose, RIGHT_ELBOW, 0.65, 0.35);
            if i == SET_SHOT_RELEASE {
                set_xy(&mut pose, RIGHT_WRIST, 0.65, 0.25);
            } else {
                set_xy(&mut pose, RIGHT_WRIST, 0.65, post_wrist_y[i - SET_SHOT_RELEASE - 1]);
            }
            pose
        })
        .collect()
}

/// Index of the release frame in [`clean_shot_track`]
pub const CLEAN_SHOT_RELEASE: usize = 12;

/// Wrist lift of [`clean_shot_track`] over its set point
pub const CLEAN_SHOT_LIFT: f32 = 0.25;

/// A clean jump shot with unloaded knees over 2 s (20 frames)
///
/// 175° arm at release, wrist 0.25 above its set point, torso rising 0.04
/// into release, a forward wrist snap, and 5 of the 7 follow-through frames
/// within 0.22 of release height.
pub fn clean_shot_poses() -> Vec<Vec<Landmark>> {
    let release = CLEAN_SHOT_RELEASE;
    let elbow = (0.55, 0.27);
    let forearm = 0.075f32;
    let tilt = 5.0f32.to_radians();
    let release_wrist = (elbow.0 + forearm * tilt.sin(), elbow.1 - forearm * tilt.cos());
    let post_drop = [0.02, 0.05, 0.08, 0.12, 0.18, 0.30, 0.35];

    (0..20)
        .map(|i| {
            let mut pose = base_pose();
            if i < release {
                set_xy(&mut pose, RIGHT_WRIST, release_wrist.0, release_wrist.1 + CLEAN_SHOT_LIFT);
                return pose;
            }
            if i <= release + 3 {
                raise_torso(&mut pose, 0.04);
            }
            set_xy(&mut pose, RIGHT_ELBOW, elbow.0, elbow.1);
            if i == release {
                set_xy(&mut pose, RIGHT_WRIST, release_wrist.0, release_wrist.1);
            } else {
                set_xy(&mut pose, RIGHT_WRIST, 0.60, release_wrist.1 + post_drop[i - release - 1]);
            }
            pose
        })
        .collect()
}

/// Track from poses at 100 ms spacing
pub fn track(poses: Vec<Vec<Landmark>>) -> PoseTrack {
    PoseTrack::from_estimates(poses.into_iter().map(Some).collect(), 100)
}

pub fn good_shot_track() -> PoseTrack {
    track(good_shot_poses())
}

pub fn not_a_shot_track() -> PoseTrack {
    track(not_a_shot_poses())
}

pub fn set_shot_track() -> PoseTrack {
    track(set_shot_poses())
}

pub fn clean_shot_track() -> PoseTrack {
    track(clean_shot_poses())
}

/// `total` frames, of which only the first `valid` show a person
pub fn sparse_track(valid: usize, total: usize) -> PoseTrack {
    let estimates = (0..total)
        .map(|i| if i < valid { Some(base_pose()) } else { None })
        .collect();
    PoseTrack::from_estimates(estimates, 100)
}

/// 100 × weighted sum of metrics with the default weights, recomputed by hand
pub fn expected_score(metrics: &shotform::ShotMetrics) -> f64 {
    let m = |v: f32| v as f64;
    let sum = 0.08 * m(metrics.stance_width)
        + 0.12 * m(metrics.lateral_sway)
        + 0.10 * m(metrics.knee_dip)
        + 0.10 * m(metrics.vertical_drive)
        + 0.18 * m(metrics.elbow_alignment)
        + 0.10 * m(metrics.elbow_under_ball)
        + 0.12 * m(metrics.release_height)
        + 0.08 * m(metrics.wrist_flick)
        + 0.07 * m(metrics.follow_through_hold)
        + 0.05 * m(metrics.landing_balance);
    100.0 * sum
}
