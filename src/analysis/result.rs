//! Analysis result types

use serde::{Deserialize, Serialize};

use super::metadata::AnalysisMetadata;

/// Identifier for one of the ten shot metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Ankle width relative to shoulder width
    StanceWidth,
    /// Side-to-side torso movement
    LateralSway,
    /// Knee bend while loading
    KneeDip,
    /// Upward (rather than forward/sideways) drive into release
    VerticalDrive,
    /// Arm extension at release
    ElbowAlignment,
    /// Forearm verticality at release
    ElbowUnderBall,
    /// Wrist lift above the set point
    ReleaseHeight,
    /// Forearm snap after release
    WristFlick,
    /// Wrist held high after release
    FollowThroughHold,
    /// Stable base after landing
    LandingBalance,
}

impl MetricKey {
    /// All metrics, in canonical order
    pub const ALL: [MetricKey; 10] = [
        MetricKey::StanceWidth,
        MetricKey::LateralSway,
        MetricKey::KneeDip,
        MetricKey::VerticalDrive,
        MetricKey::ElbowAlignment,
        MetricKey::ElbowUnderBall,
        MetricKey::ReleaseHeight,
        MetricKey::WristFlick,
        MetricKey::FollowThroughHold,
        MetricKey::LandingBalance,
    ];

    /// Stable snake_case identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::StanceWidth => "stance_width",
            MetricKey::LateralSway => "lateral_sway",
            MetricKey::KneeDip => "knee_dip",
            MetricKey::VerticalDrive => "vertical_drive",
            MetricKey::ElbowAlignment => "elbow_alignment",
            MetricKey::ElbowUnderBall => "elbow_under_ball",
            MetricKey::ReleaseHeight => "release_height",
            MetricKey::WristFlick => "wrist_flick",
            MetricKey::FollowThroughHold => "follow_through_hold",
            MetricKey::LandingBalance => "landing_balance",
        }
    }

    /// Lower-case display name used in feedback text
    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKey::StanceWidth => "stance width",
            MetricKey::LateralSway => "balance through the shot",
            MetricKey::KneeDip => "knee bend",
            MetricKey::VerticalDrive => "vertical drive",
            MetricKey::ElbowAlignment => "elbow extension",
            MetricKey::ElbowUnderBall => "elbow under the ball",
            MetricKey::ReleaseHeight => "release height",
            MetricKey::WristFlick => "wrist snap",
            MetricKey::FollowThroughHold => "follow-through",
            MetricKey::LandingBalance => "landing balance",
        }
    }
}

/// The ten normalized shot-form metrics, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotMetrics {
    /// Ankle width relative to shoulder width (ideal ratio 1.0)
    pub stance_width: f32,
    /// Inverse of torso side-to-side movement
    pub lateral_sway: f32,
    /// Knee bend while loading
    pub knee_dip: f32,
    /// Vertical share of torso travel into release
    pub vertical_drive: f32,
    /// Arm extension at release (180° = 1.0)
    pub elbow_alignment: f32,
    /// Elbow stacked under the wrist at release
    pub elbow_under_ball: f32,
    /// Wrist lift above the set point
    pub release_height: f32,
    /// Forearm snap after release
    pub wrist_flick: f32,
    /// Share of post-release frames with the wrist held high
    pub follow_through_hold: f32,
    /// Stability of the base after landing
    pub landing_balance: f32,
}

impl ShotMetrics {
    /// All-zero metrics, used for invalid results
    pub fn zero() -> Self {
        Self::default()
    }

    /// Value of a single metric
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

    /// Iterate `(key, value)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, f32)> + '_ {
        MetricKey::ALL.iter().map(move |&k| (k, self.get(k)))
    }

    /// True if every metric lies in [0, 1]
    pub fn is_normalized(&self) -> bool {
        self.iter().all(|(_, v)| (0.0..=1.0).contains(&v))
    }
}

/// Finding severity (3 = most severe)
///
/// Serialized as its numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Severity {
    /// Slightly below target
    Minor = 1,
    /// Clearly below target
    Moderate = 2,
    /// Far below target
    Major = 3,
}

impl Severity {
    /// Numeric level 1-3
    pub fn level(&self) -> u8 {
        *self as u8
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.level()
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Severity::Minor),
            2 => Ok(Severity::Moderate),
            3 => Ok(Severity::Major),
            other => Err(format!("Invalid severity level {}, expected 1-3", other)),
        }
    }
}

/// A severity-ranked coaching observation for one sub-threshold metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachFinding {
    /// Metric the finding is about
    pub key: MetricKey,
    /// Severity
    pub severity: Severity,
    /// Measured metric value in [0, 1]
    pub metric_value: f32,
    /// Short title
    pub title: String,
    /// What is going wrong
    pub diagnosis: String,
    /// What was measured
    pub evidence: String,
    /// How to fix it
    pub correction: String,
    /// Practice drill
    pub drill: String,
    /// How to know it is fixed
    pub success_criteria: String,
}

impl CoachFinding {
    /// Full coaching text as a single paragraph
    pub fn coaching_text(&self) -> String {
        format!(
            "{}: {} {} Fix: {} Drill: {} Goal: {}",
            self.title,
            self.diagnosis,
            self.evidence,
            self.correction,
            self.drill,
            self.success_criteria
        )
    }
}

/// Why a run could not be scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Clip shorter than the minimum duration
    VideoTooShort,
    /// Pose detection failed twice on the same frame
    DetectionFailure,
    /// Too few frames with a clearly visible body
    InsufficientPoseCoverage,
    /// No frame with a usable wrist position
    NoReleasePoint,
    /// Fewer than two of the three shot heuristics passed
    NotAShot,
}

impl InvalidReason {
    /// Human-readable message shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            InvalidReason::VideoTooShort => {
                "Video is too short to analyze. Please record at least 1 second of your shot."
            }
            InvalidReason::DetectionFailure => {
                "Pose detection failed while analyzing this video. Please try again."
            }
            InvalidReason::InsufficientPoseCoverage => {
                "We could not detect your body clearly. Make sure your whole body is in frame and well lit."
            }
            InvalidReason::NoReleasePoint => {
                "We could not identify a clear release point in this video."
            }
            InvalidReason::NotAShot => {
                "This doesn't look like a basketball shot. Record one full shooting motion from the side or front."
            }
        }
    }
}

/// Complete shot analysis result
///
/// This is the only value handed across the core/UI boundary. Expected
/// failures are encoded here (`is_invalid`) rather than returned as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Overall form score (0-100)
    pub score: u32,

    /// The ten normalized metrics (all zero for invalid runs)
    pub metrics: ShotMetrics,

    /// Exactly three strengths for valid runs
    ///
    /// Invalid runs stop before feedback is built and carry none.
    pub strengths: Vec<String>,

    /// Up to five improvement paragraphs, most important first
    pub improvements: Vec<String>,

    /// Ranked findings behind `improvements`
    pub findings: Vec<CoachFinding>,

    /// Single main coaching tip (None for invalid runs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_tip: Option<String>,

    /// Next milestone score (multiple of 5, capped at 100)
    pub target_score: u32,

    /// Whether the run could not be scored
    pub is_invalid: bool,

    /// Why the run could not be scored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<InvalidReason>,

    /// User-facing message for invalid runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_if_invalid: Option<String>,

    /// Probes completed
    pub processed_frames: usize,

    /// Probes planned
    pub total_frames: usize,

    /// Run diagnostics
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Invalid result: zero score, zero metrics, no feedback
    pub fn invalid(
        reason: InvalidReason,
        processed_frames: usize,
        total_frames: usize,
        metadata: AnalysisMetadata,
    ) -> Self {
        Self {
            score: 0,
            metrics: ShotMetrics::zero(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            findings: Vec::new(),
            coach_tip: None,
            target_score: super::findings::target_score(0),
            is_invalid: true,
            invalid_reason: Some(reason),
            message_if_invalid: Some(reason.message().to_string()),
            processed_frames,
            total_frames,
            metadata,
        }
    }
}
