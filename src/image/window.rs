//! Rescale and VOI window transform into 8-bit display values

use super::array::{NormalizedArray, PixelArray};
use crate::types::{RescaleParams, WindowLevel};

const Y_MAX: f64 = 255.0;

/// Map stored samples through the optional modality rescale, then through
/// the linear window, truncating the result to `u8`.
///
/// The output has the shape of `pixels`. Multi-valued window attributes are
/// reduced to their first values by [`WindowLevel::from_values`] before
/// reaching this point.
#[must_use]
pub fn apply_windowing(
    pixels: &PixelArray,
    window: WindowLevel,
    rescale: Option<RescaleParams>,
) -> NormalizedArray {
    let transform = LinearWindow::new(window);

    let data: Vec<u8> = match rescale {
        Some(rescale) => pixels
            .samples()
            .iter()
            .map(|&sample| transform.apply(rescale.apply(sample)) as u8)
            .collect(),
        None => pixels
            .samples()
            .iter()
            .map(|&sample| transform.apply(f64::from(sample)) as u8)
            .collect(),
    };

    NormalizedArray::with_shape_of(pixels, data)
}

/// DICOM PS3.3 C.11.2.1.2.1 linear window with precomputed thresholds
#[derive(Debug, Clone, Copy)]
struct LinearWindow {
    low: f64,
    high: f64,
    center: f64,
    width: f64,
}

impl LinearWindow {
    fn new(window: WindowLevel) -> Self {
        // LINEAR requires width >= 1
        let width = window.width.max(1.0);
        let center = window.center;
        let half = (width - 1.0) / 2.0;

        Self {
            low: center - 0.5 - half,
            high: center - 0.5 + half,
            center,
            width,
        }
    }

    #[inline(always)]
    fn apply(&self, value: f64) -> f64 {
        if value <= self.low {
            0.0
        } else if value > self.high {
            Y_MAX
        } else {
            // low < value <= high implies width > 1
            ((value - (self.center - 0.5)) / (self.width - 1.0) + 0.5) * Y_MAX
        }
    }
}
