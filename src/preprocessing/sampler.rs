//! Frame sampling
//!
//! Walks the clip at a fixed time step, seeks the video, asks the pose
//! adapter for landmarks and keeps the frames that pass the validity filter.
//!
//! Probing is strictly sequential: each seek must complete and each
//! detection must return before the next probe starts, and the estimator
//! needs increasing timestamps. The progress callback fires after every
//! completed probe; the cancellation token is checked before every probe.
//!
//! Failure policy: a failed detection resets the pose adapter once and
//! retries the same instant. A second failure ends the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::validity::ValidityFilter;
use crate::config::SamplingConfig;
use crate::error::{AnalysisError, DetectionError};
use crate::features::pose::FrameSample;
use crate::io::landmark_source::{DetectOutcome, LandmarkSource, PoseBackend};
use crate::io::video::VideoSource;

/// Cooperative cancellation flag shared between the caller and a run
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// New, not-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the run stops before its next probe
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// How sampling ended
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingOutcome {
    /// Every planned probe ran
    Completed {
        /// Frames that passed the validity filter, in time order
        valid_frames: Vec<FrameSample>,
        /// Probes completed
        processed_frames: usize,
        /// Probes planned
        total_frames: usize,
    },
    /// The clip is shorter than the minimum duration; nothing was probed
    TooShort {
        /// Clip duration in seconds
        duration_seconds: f32,
    },
    /// Detection failed again after a reset, or no model could be built
    DetectionFailed {
        /// Probes completed before the failure
        processed_frames: usize,
        /// Probes planned
        total_frames: usize,
        /// The final detection error
        error: DetectionError,
    },
}

/// Number of probes for a clip: `floor(min(duration, max) / step)`
pub fn planned_probes(duration_seconds: f32, config: &SamplingConfig) -> usize {
    if !(duration_seconds.is_finite() && duration_seconds > 0.0) || config.step_seconds <= 0.0 {
        return 0;
    }
    let sampled = duration_seconds.min(config.max_duration_seconds) as f64;
    let steps = sampled / config.step_seconds as f64;
    // Absorb float error so 2.0 / 0.1 counts as 20, not 19.999...
    (steps + 1e-4).floor() as usize
}

/// Probe time of step `index`, in seconds and in milliseconds
fn probe_time(index: usize, config: &SamplingConfig) -> (f32, u64) {
    let seconds = index as f64 * config.step_seconds as f64;
    (seconds as f32, (seconds * 1000.0).round() as u64)
}

/// Sequential frame sampler
#[derive(Debug, Clone, Copy)]
pub struct FrameSampler<'a> {
    config: &'a SamplingConfig,
}

impl<'a> FrameSampler<'a> {
    /// Create a sampler with the given parameters
    pub fn new(config: &'a SamplingConfig) -> Self {
        Self { config }
    }

    /// Sample the clip
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError` if the video cannot be read or positioned, or
    /// `AnalysisError::Cancelled` if `cancel` fires. Detection failures and
    /// short clips are reported through [`SamplingOutcome`].
    pub fn run<V, B>(
        &self,
        video: &mut V,
        source: &mut LandmarkSource<B>,
        filter: &ValidityFilter<'_>,
        cancel: &CancellationToken,
        progress: &mut dyn FnMut(u8),
    ) -> Result<SamplingOutcome, AnalysisError>
    where
        V: VideoSource + ?Sized,
        B: PoseBackend,
    {
        let duration = video.duration_seconds()?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(AnalysisError::VideoError(format!(
                "Video reports an invalid duration: {}",
                duration
            )));
        }

        if duration < self.config.min_duration_seconds {
            log::debug!(
                "Clip too short: {:.2}s < {:.2}s",
                duration,
                self.config.min_duration_seconds
            );
            return Ok(SamplingOutcome::TooShort {
                duration_seconds: duration,
            });
        }

        let total_frames = planned_probes(duration, self.config);
        log::debug!(
            "Sampling {:.2}s clip: {} probes every {:.2}s",
            duration,
            total_frames,
            self.config.step_seconds
        );

        let mut valid_frames = Vec::with_capacity(total_frames);
        let mut processed_frames = 0;

        for index in 0..total_frames {
            if cancel.is_cancelled() {
                log::debug!("Sampling cancelled after {} probes", processed_frames);
                return Err(AnalysisError::Cancelled);
            }

            let (seconds, timestamp_ms) = probe_time(index, self.config);
            let frame = video.seek(seconds)?;

            let landmarks = match source.detect(&frame, timestamp_ms) {
                DetectOutcome::Landmarks(landmarks) => landmarks,
                DetectOutcome::Retryable(e) => {
                    log::warn!(
                        "Pose detection failed at {} ms ({}), resetting model and retrying",
                        timestamp_ms,
                        e
                    );
                    source.reset();
                    match source.detect(&frame, timestamp_ms) {
                        DetectOutcome::Landmarks(landmarks) => landmarks,
                        DetectOutcome::Retryable(error) | DetectOutcome::Fatal(error) => {
                            log::warn!("Pose detection failed again at {} ms: {}", timestamp_ms, error);
                            return Ok(SamplingOutcome::DetectionFailed {
                                processed_frames,
                                total_frames,
                                error,
                            });
                        }
                    }
                }
                DetectOutcome::Fatal(error) => {
                    log::warn!("Pose model unavailable: {}", error);
                    return Ok(SamplingOutcome::DetectionFailed {
                        processed_frames,
                        total_frames,
                        error,
                    });
                }
            };

            processed_frames += 1;
            if let Some(landmarks) = landmarks {
                let sample = FrameSample::new(landmarks, timestamp_ms);
                if filter.accept(&sample) {
                    valid_frames.push(sample);
                }
            }

            progress((processed_frames * 100 / total_frames) as u8);
        }

        log::debug!(
            "Sampling done: {}/{} valid frames",
            valid_frames.len(),
            processed_frames
        );

        Ok(SamplingOutcome::Completed {
            valid_frames,
            processed_frames,
            total_frames,
        })
    }
}
