//! Video and pose-estimator collaborators
//!
//! - Video source abstraction (seek + duration)
//! - Pose-estimator adapter with lazy model construction
//! - Replay of recorded pose tracks

pub mod landmark_source;
pub mod replay;
pub mod video;
