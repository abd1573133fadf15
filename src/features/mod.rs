//! Pose feature extraction
//!
//! Everything computed from the valid-frame sequence:
//! - Landmark types and pose indices
//! - Planar geometry helpers
//! - Shooting-hand resolution
//! - Release-point detection
//! - Shot validity gate (2 of 3 votes)
//! - The ten biomechanical metrics

pub mod gate;
pub mod geometry;
pub mod handedness;
pub mod metrics;
pub mod pose;
pub mod release;
