//! Pixel payload and the metadata the normalizer needs from it

use crate::image::{NormalizeError, PixelArray};
use crate::types::{Dimensions, RescaleParams, WindowLevel, WindowValue};

/// Window Width and Window Center, always present together
#[derive(Debug, Clone, PartialEq)]
pub struct Windowing {
    pub width: WindowValue,
    pub center: WindowValue,
}

impl Windowing {
    #[must_use]
    pub fn new(width: impl Into<WindowValue>, center: impl Into<WindowValue>) -> Self {
        Self {
            width: width.into(),
            center: center.into(),
        }
    }
}

/// A single decoded slice as seen by the normalizer
#[derive(Debug, Clone, PartialEq)]
pub struct PixelDataset {
    pub pixels: Option<PixelArray>,
    pub bits_allocated: u16,
    pub samples_per_pixel: u16, // 1 for grayscale, 3 for RGB
    pub window: Option<Windowing>,
    pub rescale: Option<RescaleParams>, // only when slope and intercept are both present
    pub dimensions: Dimensions,         // declared Rows/Columns
    pub series_description: Option<String>,
}

impl PixelDataset {
    #[must_use]
    pub fn new(bits_allocated: u16, samples_per_pixel: u16, dimensions: Dimensions) -> Self {
        Self {
            pixels: None,
            bits_allocated,
            samples_per_pixel,
            window: None,
            rescale: None,
            dimensions,
            series_description: None,
        }
    }

    #[must_use]
    pub fn with_pixels(mut self, pixels: PixelArray) -> Self {
        self.pixels = Some(pixels);
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: Windowing) -> Self {
        self.window = Some(window);
        self
    }

    #[must_use]
    pub fn with_rescale(mut self, rescale: RescaleParams) -> Self {
        self.rescale = Some(rescale);
        self
    }

    #[inline]
    #[must_use]
    pub fn has_rescale(&self) -> bool {
        self.rescale.is_some()
    }

    /// Window resolved to scalar width and center, if the dataset has one
    #[must_use]
    pub fn window_level(&self) -> Option<WindowLevel> {
        self.window
            .as_ref()
            .and_then(|w| WindowLevel::from_values(&w.width, &w.center))
    }

    /// # Errors
    ///
    /// Returns `MissingPixelData` when the dataset has no pixel payload
    pub fn pixel_array(&self) -> Result<&PixelArray, NormalizeError> {
        self.pixels.as_ref().ok_or(NormalizeError::MissingPixelData)
    }
}
