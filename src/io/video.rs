//! Video input abstraction
//!
//! Decoding is the caller's concern: a [`VideoSource`] only has to report its
//! duration and hand back a decoded frame for a requested instant.

use crate::error::AnalysisError;

/// One decoded video frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoFrame {
    /// Presentation time in seconds
    pub time_seconds: f32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Packed RGBA pixels, row-major (may be empty for sources that do not
    /// carry pixel data, such as replayed pose tracks)
    pub pixels: Vec<u8>,
}

impl VideoFrame {
    /// Frame without pixel data
    pub fn empty(time_seconds: f32) -> Self {
        Self {
            time_seconds,
            ..Self::default()
        }
    }
}

/// A seekable, decoded video
pub trait VideoSource {
    /// Duration in seconds
    ///
    /// An error here means the video could not be opened at all.
    fn duration_seconds(&self) -> Result<f32, AnalysisError>;

    /// Seek to `time_seconds` and return the frame shown at that instant
    ///
    /// Must not return before the seek has completed.
    fn seek(&mut self, time_seconds: f32) -> Result<VideoFrame, AnalysisError>;
}

impl<V: VideoSource + ?Sized> VideoSource for &mut V {
    fn duration_seconds(&self) -> Result<f32, AnalysisError> {
        (**self).duration_seconds()
    }

    fn seek(&mut self, time_seconds: f32) -> Result<VideoFrame, AnalysisError> {
        (**self).seek(time_seconds)
    }
}
