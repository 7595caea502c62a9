//! Row-major pixel sample containers
//!
//! Both containers store channels interleaved (`RGBRGB...`) with no row
//! padding, so a buffer can be handed to an image type as-is.

use super::error::NormalizeError;

/// Decoded integer samples of a single frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelArray {
    rows: usize,
    cols: usize,
    samples_per_pixel: usize,
    samples: Vec<i32>,
}

impl PixelArray {
    /// Wrap samples of a `rows x cols` frame with `samples_per_pixel` channels
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the sample count does not match the shape
    pub fn new(
        rows: usize,
        cols: usize,
        samples_per_pixel: usize,
        samples: Vec<i32>,
    ) -> Result<Self, NormalizeError> {
        let expected = rows * cols * samples_per_pixel;
        if samples_per_pixel == 0 || samples.len() != expected {
            return Err(NormalizeError::ShapeMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            rows,
            cols,
            samples_per_pixel,
            samples,
        })
    }

    /// Build a single-channel array from nested rows
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the rows are ragged
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, NormalizeError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some(ragged) = rows.iter().find(|r| r.as_ref().len() != cols) {
            return Err(NormalizeError::ShapeMismatch {
                expected: cols,
                actual: ragged.as_ref().len(),
            });
        }
        let samples: Vec<i32> = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::new(rows.len(), cols, 1, samples)
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    #[must_use]
    pub fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    #[inline]
    #[must_use]
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// `[rows, cols]` for single-channel data, `[rows, cols, samples]` otherwise
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        shape_of(self.rows, self.cols, self.samples_per_pixel)
    }
}

/// 8-bit output of the normalizer, same spatial shape as its input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedArray {
    rows: usize,
    cols: usize,
    samples_per_pixel: usize,
    data: Vec<u8>,
}

impl NormalizedArray {
    /// Pair `data` with the shape of `source`; lengths agree by construction
    pub(crate) fn with_shape_of(source: &PixelArray, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), source.samples.len());
        Self {
            rows: source.rows,
            cols: source.cols,
            samples_per_pixel: source.samples_per_pixel,
            data,
        }
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    #[must_use]
    pub fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        shape_of(self.rows, self.cols, self.samples_per_pixel)
    }

    /// Invert polarity in place: every value `v` becomes `max - v`
    pub fn invert(&mut self, max: u8) {
        for value in &mut self.data {
            *value = max.saturating_sub(*value);
        }
    }
}

fn shape_of(rows: usize, cols: usize, samples_per_pixel: usize) -> Vec<usize> {
    if samples_per_pixel == 1 {
        vec![rows, cols]
    } else {
        vec![rows, cols, samples_per_pixel]
    }
}
