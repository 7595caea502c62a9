use crate::types::ChannelMode;
use thiserror::Error;

/// Failure to turn a pixel dataset into normalized 8-bit data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The dataset carries no pixel payload
    #[error("DICOM dataset does not have pixel data")]
    MissingPixelData,

    /// No normalization is defined for this bit depth and channel count
    #[error("Don't know how to normalize {bits} bits allocated with {samples} samples per pixel")]
    UnsupportedPixelFormat { bits: u16, samples: u16 },

    /// Sample count does not match the declared shape
    #[error("Pixel array shape mismatch: expected {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Normalized buffer does not exactly cover the declared image dimensions
    #[error("Pixel buffer of {len} bytes does not match a {width}x{height} {mode} image")]
    BufferSize {
        width: u32,
        height: u32,
        mode: ChannelMode,
        len: usize,
    },

    /// Array dimension does not fit an image dimension
    #[error("Image dimension {0} is out of range")]
    DimensionOverflow(usize),
}
