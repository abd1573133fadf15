//! # Shotform
//!
//! A shot-form analysis engine for basketball training apps: samples a short
//! video of a shot, consumes body-landmark estimates from a pose estimator,
//! checks that a real shooting motion happened, and produces a 0-100 form
//! score with prioritized coaching feedback.
//!
//! ## Features
//!
//! - **Frame sampling**: sequential 0.1 s probing with strictly increasing
//!   estimator timestamps, one-shot reset-and-retry on detection failure
//! - **Shot gating**: release-point detection plus a 2-of-3 vote over elbow
//!   extension, wrist lift and follow-through
//! - **Metrics**: ten normalized biomechanical metrics around the release
//! - **Feedback**: weighted score, ranked findings, strengths and a main tip
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use shotform::{analyze_shot, AnalysisConfig, LandmarkSource, PoseTrack, ReplayBackend, TrackVideo};
//!
//! // A recorded pose track (JSON) replayed through the pipeline
//! let track = Arc::new(PoseTrack::from_json_str(r#"{"frames": []}"#)?);
//! let mut video = TrackVideo::new(Arc::clone(&track));
//! let mut source = LandmarkSource::new(ReplayBackend::new(track));
//!
//! let result = analyze_shot(&mut video, &mut source, &AnalysisConfig::default())?;
//!
//! if result.is_invalid {
//!     println!("{}", result.message_if_invalid.unwrap_or_default());
//! } else {
//!     println!("Score: {} (next target {})", result.score, result.target_score);
//! }
//! # Ok::<(), shotform::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Video → Sampler → Validity Filter → Handedness → Release → Shot Gate → Metrics → Score → Findings
//! ```
//!
//! Any stage may end the run with an invalid result; nothing after it runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::presentation::{apply_feedback_rewrite, FeedbackRewriter, FeedbackText};
pub use analysis::record::ShotRecord;
pub use analysis::result::{AnalysisResult, CoachFinding, InvalidReason, MetricKey, Severity, ShotMetrics};
pub use config::{AnalysisConfig, ShotType};
pub use error::{AnalysisError, DetectionError};
pub use features::pose::{FrameSample, Landmark, Side};
pub use io::landmark_source::{ExecutionMode, LandmarkSource, PoseBackend, PoseModel};
pub use io::replay::{PoseTrack, ReplayBackend, TrackVideo};
pub use io::video::{VideoFrame, VideoSource};
pub use preprocessing::sampler::CancellationToken;

use analysis::findings::build_feedback;
use analysis::scoring::compute_score;
use features::gate::evaluate_gate;
use features::handedness::resolve_handedness;
use features::metrics::extract_metrics;
use features::release::find_release_index;
use preprocessing::sampler::{FrameSampler, SamplingOutcome};
use preprocessing::validity::ValidityFilter;

/// Main analysis function
///
/// Samples `video`, runs the pose estimator behind `source` on every probe
/// and scores the shot.
///
/// # Arguments
///
/// * `video` - Seekable decoded video of one shot
/// * `source` - Pose-estimator handle; its model is reset at the start of the run
/// * `config` - Analysis configuration (shot type, thresholds, weights)
///
/// # Returns
///
/// `AnalysisResult` with score, metrics and feedback. Clips that cannot be
/// scored (too short, body not visible, no shooting motion, repeated
/// detection failure) come back as `Ok` with `is_invalid = true`.
///
/// # Errors
///
/// Returns `AnalysisError` for faults outside the expected failures: an
/// invalid configuration, or a video that cannot be read or positioned.
pub fn analyze_shot<V, B>(
    video: &mut V,
    source: &mut LandmarkSource<B>,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError>
where
    V: VideoSource + ?Sized,
    B: PoseBackend,
{
    analyze_shot_with_progress(video, source, config, &CancellationToken::new(), |_| {})
}

/// [`analyze_shot`] with progress reporting and cancellation
///
/// `progress` receives the sampling percentage (0-100) after every probe.
/// `cancel` is checked before every probe.
///
/// # Errors
///
/// As [`analyze_shot`], plus `AnalysisError::Cancelled` if `cancel` fires
/// during sampling.
pub fn analyze_shot_with_progress<V, B, F>(
    video: &mut V,
    source: &mut LandmarkSource<B>,
    config: &AnalysisConfig,
    cancel: &CancellationToken,
    mut progress: F,
) -> Result<AnalysisResult, AnalysisError>
where
    V: VideoSource + ?Sized,
    B: PoseBackend,
    F: FnMut(u8),
{
    use std::time::Instant;
    let start_time = Instant::now();

    config.validate()?;
    log::debug!("Starting shot analysis ({})", config.shot_type.label());

    // A model left over from a previous run may hold later timestamps
    source.start_run();

    let mut metadata = AnalysisMetadata::for_shot_type(config.shot_type);

    // Stage 1: sampling + validity filter
    let filter = ValidityFilter::new(&config.validity);
    let outcome = FrameSampler::new(&config.sampling).run(video, source, &filter, cancel, &mut progress)?;
    metadata.execution_mode = source.execution_mode();

    let (frames, processed_frames, total_frames) = match outcome {
        SamplingOutcome::TooShort { .. } => {
            return Ok(AnalysisResult::invalid(InvalidReason::VideoTooShort, 0, 0, metadata));
        }
        SamplingOutcome::DetectionFailed {
            processed_frames,
            total_frames,
            ..
        } => {
            return Ok(AnalysisResult::invalid(
                InvalidReason::DetectionFailure,
                processed_frames,
                total_frames,
                metadata,
            ));
        }
        SamplingOutcome::Completed {
            valid_frames,
            processed_frames,
            total_frames,
        } => (valid_frames, processed_frames, total_frames),
    };

    metadata.valid_frames = frames.len();
    if !filter.has_sufficient_coverage(frames.len(), processed_frames) {
        log::debug!(
            "Insufficient pose coverage: {}/{} valid frames",
            frames.len(),
            processed_frames
        );
        return Ok(AnalysisResult::invalid(
            InvalidReason::InsufficientPoseCoverage,
            processed_frames,
            total_frames,
            metadata,
        ));
    }

    // Stage 2: handedness + release point
    let side = resolve_handedness(&frames);
    metadata.handedness = Some(side);

    let Some(release) = find_release_index(&frames, side) else {
        log::debug!("No release point found");
        return Ok(AnalysisResult::invalid(
            InvalidReason::NoReleasePoint,
            processed_frames,
            total_frames,
            metadata,
        ));
    };
    metadata.release_index = Some(release);
    metadata.release_timestamp_ms = Some(frames[release].timestamp_ms);
    log::debug!(
        "Release at frame {} ({} ms), {:?} hand",
        release,
        frames[release].timestamp_ms,
        side
    );

    // Stage 3: shot gate
    let gate = evaluate_gate(&frames, side, release, config.shot_type, &config.gate);
    let passed = gate.passed;
    metadata.gate = Some(gate.clone());
    if !passed {
        return Ok(AnalysisResult::invalid(
            InvalidReason::NotAShot,
            processed_frames,
            total_frames,
            metadata,
        ));
    }

    // Stage 4: metrics, score, feedback
    let metrics = extract_metrics(&frames, side, release, &gate, &config.gate, &config.metrics);
    let score = compute_score(&metrics, &config.weights);
    let feedback = build_feedback(&metrics, score, &config.findings);

    log::debug!(
        "Shot analysis complete: score {} in {:.1} ms",
        score,
        start_time.elapsed().as_secs_f32() * 1000.0
    );

    Ok(AnalysisResult {
        score,
        metrics,
        strengths: feedback.strengths,
        improvements: feedback.improvements,
        findings: feedback.findings,
        coach_tip: Some(feedback.coach_tip),
        target_score: feedback.target_score,
        is_invalid: false,
        invalid_reason: None,
        message_if_invalid: None,
        processed_frames,
        total_frames,
        metadata,
    })
}
