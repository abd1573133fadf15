//! Pose-estimator adapter
//!
//! Wraps an external pose-estimation model behind a caller-owned handle:
//!
//! - the model is built lazily on first use, preferring an accelerated
//!   execution mode and falling back to the standard one
//! - timestamps handed to the model are strictly increasing (a timestamp at
//!   or below the last one used is bumped to `last + 1`)
//! - [`LandmarkSource::reset`] drops the model so the next call rebuilds it
//!
//! Detection results are reported as a [`DetectOutcome`] so callers can
//! decide between retrying and giving up without unwinding.

use serde::{Deserialize, Serialize};

use super::video::VideoFrame;
use crate::error::DetectionError;
use crate::features::pose::Landmark;

/// Model execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Hardware-accelerated inference (GPU / NPU delegate)
    Accelerated,
    /// Portable fallback inference
    Standard,
}

/// A constructed pose-estimation model
pub trait PoseModel {
    /// Estimate landmarks for a video frame
    ///
    /// `Ok(None)` means no person was found. Implementations may assume
    /// `timestamp_ms` is strictly increasing for the lifetime of the model.
    fn detect_for_video(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: u64,
    ) -> Result<Option<Vec<Landmark>>, DetectionError>;
}

/// Factory for pose models
pub trait PoseBackend {
    /// Model type produced by this backend
    type Model: PoseModel;

    /// Build a model for the given execution mode
    fn create_model(&mut self, mode: ExecutionMode) -> Result<Self::Model, DetectionError>;
}

/// Result of one detection attempt
#[derive(Debug, Clone, PartialEq)]
pub enum DetectOutcome {
    /// Detection ran; `None` means no person in frame
    Landmarks(Option<Vec<Landmark>>),
    /// Detection failed; a reset and retry may succeed
    Retryable(DetectionError),
    /// No model could be built; retrying will not help
    Fatal(DetectionError),
}

/// Caller-owned handle around a lazily constructed pose model
pub struct LandmarkSource<B: PoseBackend> {
    backend: B,
    model: Option<(B::Model, ExecutionMode)>,
    last_timestamp_ms: Option<u64>,
    models_created: usize,
}

impl<B: PoseBackend> LandmarkSource<B> {
    /// Wrap a backend; no model is built until the first detection
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            model: None,
            last_timestamp_ms: None,
            models_created: 0,
        }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the wrapped backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Execution mode of the current model, if one is built
    pub fn execution_mode(&self) -> Option<ExecutionMode> {
        self.model.as_ref().map(|(_, mode)| *mode)
    }

    /// Last timestamp handed to the model
    pub fn last_timestamp_ms(&self) -> Option<u64> {
        self.last_timestamp_ms
    }

    /// Number of models built over the lifetime of this handle
    pub fn models_created(&self) -> usize {
        self.models_created
    }

    fn build_model(backend: &mut B) -> Result<(B::Model, ExecutionMode), DetectionError> {
        match backend.create_model(ExecutionMode::Accelerated) {
            Ok(model) => Ok((model, ExecutionMode::Accelerated)),
            Err(e) => {
                log::warn!("Accelerated pose model unavailable ({}), falling back to standard mode", e);
                backend
                    .create_model(ExecutionMode::Standard)
                    .map(|model| (model, ExecutionMode::Standard))
            }
        }
    }

    fn ensure_model(&mut self) -> Result<(), DetectionError> {
        if self.model.is_none() {
            let (model, mode) = Self::build_model(&mut self.backend)?;
            log::debug!("Built pose model ({:?})", mode);
            self.model = Some((model, mode));
            self.models_created += 1;
        }
        Ok(())
    }

    /// Detect landmarks for `frame`
    ///
    /// A `timestamp_ms` at or below the last one used is bumped to
    /// `last + 1` before it reaches the model.
    pub fn detect(&mut self, frame: &VideoFrame, timestamp_ms: u64) -> DetectOutcome {
        if let Err(e) = self.ensure_model() {
            return DetectOutcome::Fatal(e);
        }

        let timestamp = match self.last_timestamp_ms {
            Some(last) if timestamp_ms <= last => {
                log::debug!("Timestamp {} ms not after {} ms, using {} ms", timestamp_ms, last, last + 1);
                last + 1
            }
            _ => timestamp_ms,
        };
        self.last_timestamp_ms = Some(timestamp);

        let Some((model, _)) = self.model.as_mut() else {
            return DetectOutcome::Fatal(DetectionError::ModelUnavailable(
                "pose model missing after construction".to_string(),
            ));
        };

        match model.detect_for_video(frame, timestamp) {
            Ok(landmarks) => DetectOutcome::Landmarks(landmarks),
            Err(e) => DetectOutcome::Retryable(e),
        }
    }

    /// Drop the model; the next detection rebuilds it
    ///
    /// The timestamp watermark is kept, so timestamps stay strictly
    /// increasing across a failure-recovery reset within one run.
    pub fn reset(&mut self) {
        if self.model.take().is_some() {
            log::debug!("Pose model reset");
        }
    }

    /// Prepare for a new analysis run: drop the model and forget the last
    /// timestamp so nothing leaks in from a previous run
    pub fn start_run(&mut self) {
        self.reset();
        self.last_timestamp_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        timestamps: Vec<u64>,
        modes: Vec<ExecutionMode>,
    }

    struct StubModel {
        log: Rc<RefCell<Log>>,
        fail: bool,
    }

    impl PoseModel for StubModel {
        fn detect_for_video(
            &mut self,
            _frame: &VideoFrame,
            timestamp_ms: u64,
        ) -> Result<Option<Vec<Landmark>>, DetectionError> {
            self.log.borrow_mut().timestamps.push(timestamp_ms);
            if self.fail {
                Err(DetectionError::InferenceFailed("stub".to_string()))
            } else {
                Ok(Some(vec![Landmark::default(); 33]))
            }
        }
    }

    struct StubBackend {
        log: Rc<RefCell<Log>>,
        accelerated: bool,
        standard: bool,
        fail_detection: bool,
    }

    impl StubBackend {
        fn new(accelerated: bool, standard: bool) -> Self {
            Self {
                log: Rc::new(RefCell::new(Log::default())),
                accelerated,
                standard,
                fail_detection: false,
            }
        }
    }

    impl PoseBackend for StubBackend {
        type Model = StubModel;

        fn create_model(&mut self, mode: ExecutionMode) -> Result<StubModel, DetectionError> {
            let available = match mode {
                ExecutionMode::Accelerated => self.accelerated,
                ExecutionMode::Standard => self.standard,
            };
            if !available {
                return Err(DetectionError::ModelUnavailable(format!("{:?}", mode)));
            }
            self.log.borrow_mut().modes.push(mode);
            Ok(StubModel {
                log: Rc::clone(&self.log),
                fail: self.fail_detection,
            })
        }
    }

    #[test]
    fn test_lazy_construction_prefers_accelerated() {
        let mut source = LandmarkSource::new(StubBackend::new(true, true));
        assert_eq!(source.execution_mode(), None);
        assert_eq!(source.models_created(), 0);

        let outcome = source.detect(&VideoFrame::empty(0.0), 0);
        assert!(matches!(outcome, DetectOutcome::Landmarks(Some(_))));
        assert_eq!(source.execution_mode(), Some(ExecutionMode::Accelerated));
        assert_eq!(source.models_created(), 1);
    }

    #[test]
    fn test_falls_back_to_standard_mode() {
        let mut source = LandmarkSource::new(StubBackend::new(false, true));
        source.detect(&VideoFrame::empty(0.0), 0);
        assert_eq!(source.execution_mode(), Some(ExecutionMode::Standard));
    }

    #[test]
    fn test_no_model_is_fatal() {
        let mut source = LandmarkSource::new(StubBackend::new(false, false));
        let outcome = source.detect(&VideoFrame::empty(0.0), 0);
        assert!(matches!(outcome, DetectOutcome::Fatal(DetectionError::ModelUnavailable(_))));
    }

    #[test]
    fn test_detection_error_is_retryable() {
        let mut backend = StubBackend::new(true, true);
        backend.fail_detection = true;
        let mut source = LandmarkSource::new(backend);
        let outcome = source.detect(&VideoFrame::empty(0.0), 0);
        assert!(matches!(outcome, DetectOutcome::Retryable(DetectionError::InferenceFailed(_))));
    }

    #[test]
    fn test_timestamps_bumped_to_stay_increasing() {
        let backend = StubBackend::new(true, true);
        let log = Rc::clone(&backend.log);
        let mut source = LandmarkSource::new(backend);
        let frame = VideoFrame::empty(0.0);

        source.detect(&frame, 100);
        source.detect(&frame, 100);
        source.detect(&frame, 50);
        source.detect(&frame, 500);
        assert_eq!(log.borrow().timestamps, vec![100, 101, 102, 500]);
    }

    #[test]
    fn test_reset_rebuilds_but_keeps_watermark() {
        let backend = StubBackend::new(true, true);
        let log = Rc::clone(&backend.log);
        let mut source = LandmarkSource::new(backend);
        let frame = VideoFrame::empty(0.0);

        source.detect(&frame, 200);
        source.reset();
        assert_eq!(source.execution_mode(), None);
        source.detect(&frame, 200);
        assert_eq!(source.models_created(), 2);
        assert_eq!(log.borrow().timestamps, vec![200, 201]);
    }

    #[test]
    fn test_start_run_clears_watermark() {
        let backend = StubBackend::new(true, true);
        let log = Rc::clone(&backend.log);
        let mut source = LandmarkSource::new(backend);
        let frame = VideoFrame::empty(0.0);

        source.detect(&frame, 900);
        source.start_run();
        assert_eq!(source.last_timestamp_ms(), None);
        source.detect(&frame, 0);
        assert_eq!(log.borrow().timestamps, vec![900, 0]);
        assert_eq!(log.borrow().modes.len(), 2);
    }
}
