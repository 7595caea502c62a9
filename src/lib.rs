pub mod cli;
pub mod dicom;
pub mod image;
pub mod rename;
pub mod types;

// Re-export commonly used functions
pub use crate::image::{normalize_array, to_display_image};
