//! Frame acquisition
//!
//! Sequential probing of the video and per-frame validity filtering.

pub mod sampler;
pub mod validity;
