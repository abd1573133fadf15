//! Pose landmark types
//!
//! Landmarks follow the 33-point BlazePose topology used by MediaPipe:
//! coordinates are normalized to the frame (`x`, `y` in [0, 1], `y` grows
//! downwards) and each point carries an optional visibility confidence.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a full pose estimate
pub const LANDMARK_COUNT: usize = 33;

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

/// Nose
pub const NOSE: usize = 0;
/// Left shoulder
pub const LEFT_SHOULDER: usize = 11;
/// Right shoulder
pub const RIGHT_SHOULDER: usize = 12;
/// Left elbow
pub const LEFT_ELBOW: usize = 13;
/// Right elbow
pub const RIGHT_ELBOW: usize = 14;
/// Left wrist
pub const LEFT_WRIST: usize = 15;
/// Right wrist
pub const RIGHT_WRIST: usize = 16;
/// Left hip
pub const LEFT_HIP: usize = 23;
/// Right hip
pub const RIGHT_HIP: usize = 24;
/// Left knee
pub const LEFT_KNEE: usize = 25;
/// Right knee
pub const RIGHT_KNEE: usize = 26;
/// Left ankle
pub const LEFT_ANKLE: usize = 27;
/// Right ankle
pub const RIGHT_ANKLE: usize = 28;

/// Upper-body and hip landmarks whose visibility decides frame validity
pub const KEY_LANDMARKS: [usize; 8] = [
    LEFT_SHOULDER,
    RIGHT_SHOULDER,
    LEFT_ELBOW,
    RIGHT_ELBOW,
    LEFT_WRIST,
    RIGHT_WRIST,
    LEFT_HIP,
    RIGHT_HIP,
];

/// Landmarks averaged into the torso centroid
pub const TORSO_LANDMARKS: [usize; 4] = [LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP];

/// A single landmark point (normalized coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0-1 normalized
    pub x: f32,
    /// Vertical position, 0-1 normalized (0 = top of frame)
    pub y: f32,
    /// Relative depth
    #[serde(default)]
    pub z: f32,
    /// Detection confidence in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    /// Create a landmark with a visibility score
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: Some(visibility),
        }
    }

    /// Visibility, with a missing value treated as 0
    pub fn visibility_or_zero(&self) -> f32 {
        self.visibility.unwrap_or(0.0)
    }

    /// (x, y) image-plane position
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Subject's right
    Right,
    /// Subject's left
    Left,
}

impl Side {
    /// Landmark index of this side's shoulder
    pub fn shoulder(self) -> usize {
        match self {
            Side::Right => RIGHT_SHOULDER,
            Side::Left => LEFT_SHOULDER,
        }
    }

    /// Landmark index of this side's elbow
    pub fn elbow(self) -> usize {
        match self {
            Side::Right => RIGHT_ELBOW,
            Side::Left => LEFT_ELBOW,
        }
    }

    /// Landmark index of this side's wrist
    pub fn wrist(self) -> usize {
        match self {
            Side::Right => RIGHT_WRIST,
            Side::Left => LEFT_WRIST,
        }
    }

    /// Landmark index of this side's hip
    pub fn hip(self) -> usize {
        match self {
            Side::Right => RIGHT_HIP,
            Side::Left => LEFT_HIP,
        }
    }

    /// Landmark index of this side's knee
    pub fn knee(self) -> usize {
        match self {
            Side::Right => RIGHT_KNEE,
            Side::Left => LEFT_KNEE,
        }
    }

    /// Landmark index of this side's ankle
    pub fn ankle(self) -> usize {
        match self {
            Side::Right => RIGHT_ANKLE,
            Side::Left => LEFT_ANKLE,
        }
    }
}

/// Landmarks estimated for one probed video instant
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample {
    /// Estimated landmarks, normally [`LANDMARK_COUNT`] entries
    pub landmarks: Vec<Landmark>,
    /// Probe time in milliseconds
    pub timestamp_ms: u64,
}

impl FrameSample {
    /// Frame from estimated landmarks and the probe time
    pub fn new(landmarks: Vec<Landmark>, timestamp_ms: u64) -> Self {
        Self {
            landmarks,
            timestamp_ms,
        }
    }

    /// Landmark by index; a missing index reads as an invisible origin point
    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks.get(index).copied().unwrap_or_default()
    }

    /// (x, y) position of a landmark
    pub fn point(&self, index: usize) -> (f32, f32) {
        self.landmark(index).xy()
    }

    /// Mean visibility over the given landmarks
    pub fn mean_visibility(&self, indices: &[usize]) -> f32 {
        if indices.is_empty() {
            return 0.0;
        }
        let sum: f32 = indices
            .iter()
            .map(|&i| self.landmark(i).visibility_or_zero())
            .sum();
        sum / indices.len() as f32
    }

    /// Shoulder width (horizontal separation)
    pub fn shoulder_width(&self) -> f32 {
        (self.landmark(LEFT_SHOULDER).x - self.landmark(RIGHT_SHOULDER).x).abs()
    }

    /// Ankle width (horizontal separation)
    pub fn ankle_width(&self) -> f32 {
        (self.landmark(LEFT_ANKLE).x - self.landmark(RIGHT_ANKLE).x).abs()
    }
}
