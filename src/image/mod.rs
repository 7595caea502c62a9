//! Normalization of decoded pixel data into 8-bit arrays and display images
//!
//! Datasets carrying Window Width/Center go through the VOI window. Others
//! are classified once by bit depth and channel count into a [`PixelFormat`]
//! shared by [`normalize_array`] and [`to_display_image`].

mod array;
mod error;
mod format;
mod normalization;
mod window;

pub use array::{NormalizedArray, PixelArray};
pub use error::NormalizeError;
pub use format::PixelFormat;
pub use normalization::min_max_normalize;
pub use window::apply_windowing;

use crate::dicom::PixelDataset;
use crate::types::{ChannelMode, RescaleParams, WindowLevel};
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use std::path::Path;
use tracing::debug;

/// An 8-bit image tagged with the channel mode it was built for
#[derive(Debug, Clone)]
pub struct DisplayImage {
    mode: ChannelMode,
    image: DynamicImage,
}

impl DisplayImage {
    #[inline]
    #[must_use]
    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    #[must_use]
    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode to a file; the format follows the path extension
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails
    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        self.image.save(path)
    }
}

/// Normalize the pixel payload of `dataset` into 8-bit values of the same shape
///
/// With `flip`, polarity is inverted: `255 - v`, or `1 - v` for bilevel data.
///
/// # Errors
///
/// Returns `MissingPixelData` if there is no pixel payload and
/// `UnsupportedPixelFormat` for unknown bit depth/channel combinations
pub fn normalize_array(dataset: &PixelDataset, flip: bool) -> Result<NormalizedArray, NormalizeError> {
    let pixels = dataset.pixel_array()?;

    if let Some(window) = dataset.window_level() {
        debug!(%window, rescale = dataset.has_rescale(), "normalizing with VOI window");
        return Ok(windowed(pixels, window, dataset.rescale, flip));
    }

    let format = PixelFormat::classify(dataset.bits_allocated, dataset.samples_per_pixel)?;
    debug!(?format, "normalizing without window");
    Ok(normalize_by_format(pixels, format, flip))
}

/// Normalize `dataset` and wrap the result in an image
///
/// Windowed data and 16-bit data are materialized from the array's own shape;
/// 16-bit data is always reduced to greyscale. The remaining layouts take
/// ownership of the normalized buffer as-is, laid out row-major with no
/// padding, using the declared Columns x Rows.
///
/// # Errors
///
/// Same as [`normalize_array`], plus `BufferSize` when the buffer does not
/// exactly cover the declared dimensions
pub fn to_display_image(dataset: &PixelDataset, flip: bool) -> Result<DisplayImage, NormalizeError> {
    let pixels = dataset.pixel_array()?;

    if let Some(window) = dataset.window_level() {
        debug!(%window, rescale = dataset.has_rescale(), "building windowed display image");
        let normalized = windowed(pixels, window, dataset.rescale, flip);
        let mode = match normalized.samples_per_pixel() {
            1 => ChannelMode::Luma,
            3 => ChannelMode::Rgb,
            samples => {
                return Err(NormalizeError::UnsupportedPixelFormat {
                    bits: dataset.bits_allocated,
                    samples: u16::try_from(samples).unwrap_or(u16::MAX),
                });
            }
        };
        let width = to_dimension(normalized.cols())?;
        let height = to_dimension(normalized.rows())?;
        let image = image_from_buffer(mode, width, height, normalized.into_vec())?;
        return Ok(DisplayImage { mode, image });
    }

    let format = PixelFormat::classify(dataset.bits_allocated, dataset.samples_per_pixel)?;
    let mode = format.channel_mode();
    debug!(?format, %mode, "building display image");
    let normalized = normalize_by_format(pixels, format, flip);

    let image = match format {
        PixelFormat::Wide16 { .. } => materialize_greyscale(normalized)?,
        PixelFormat::Bilevel => {
            // No 1-bit image type; spread 0/1 to black/white
            let mut buffer = normalized.into_vec();
            for value in &mut buffer {
                *value = value.saturating_mul(255);
            }
            declared_view(dataset, mode, buffer)?
        }
        PixelFormat::Greyscale8 | PixelFormat::Rgb8 => {
            declared_view(dataset, mode, normalized.into_vec())?
        }
    };

    Ok(DisplayImage { mode, image })
}

fn windowed(
    pixels: &PixelArray,
    window: WindowLevel,
    rescale: Option<RescaleParams>,
    flip: bool,
) -> NormalizedArray {
    let mut normalized = apply_windowing(pixels, window, rescale);
    if flip {
        normalized.invert(255);
    }
    normalized
}

fn normalize_by_format(pixels: &PixelArray, format: PixelFormat, flip: bool) -> NormalizedArray {
    let data = match format {
        PixelFormat::Wide16 { .. } => min_max_normalize(pixels.samples(), flip),
        PixelFormat::Bilevel | PixelFormat::Greyscale8 | PixelFormat::Rgb8 => {
            let max = format.max_value();
            pixels
                .samples()
                .iter()
                .map(|&sample| {
                    let value = sample.clamp(0, i32::from(max)) as u8;
                    if flip { max - value } else { value }
                })
                .collect()
        }
    };

    NormalizedArray::with_shape_of(pixels, data)
}

fn declared_view(
    dataset: &PixelDataset,
    mode: ChannelMode,
    buffer: Vec<u8>,
) -> Result<DynamicImage, NormalizeError> {
    image_from_buffer(
        mode,
        u32::from(dataset.dimensions.cols),
        u32::from(dataset.dimensions.rows),
        buffer,
    )
}

fn image_from_buffer(
    mode: ChannelMode,
    width: u32,
    height: u32,
    buffer: Vec<u8>,
) -> Result<DynamicImage, NormalizeError> {
    let channels = match mode {
        ChannelMode::Bilevel | ChannelMode::Luma => 1,
        ChannelMode::Rgb => 3,
    };
    let len = buffer.len();
    let size_error = NormalizeError::BufferSize {
        width,
        height,
        mode,
        len,
    };

    // from_raw accepts oversized buffers; require an exact fit
    if len != width as usize * height as usize * channels {
        return Err(size_error);
    }

    let image = match mode {
        ChannelMode::Bilevel | ChannelMode::Luma => {
            GrayImage::from_raw(width, height, buffer).map(DynamicImage::ImageLuma8)
        }
        ChannelMode::Rgb => RgbImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgb8),
    };

    image.ok_or(size_error)
}

fn materialize_greyscale(normalized: NormalizedArray) -> Result<DynamicImage, NormalizeError> {
    let width = to_dimension(normalized.cols())?;
    let height = to_dimension(normalized.rows())?;
    let samples = normalized.samples_per_pixel();
    let len = normalized.as_slice().len();
    let data = normalized.into_vec();

    let image = match samples {
        1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(width, height, data).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
        samples => {
            return Err(NormalizeError::UnsupportedPixelFormat {
                bits: 16,
                samples: u16::try_from(samples).unwrap_or(u16::MAX),
            });
        }
    }
    .ok_or(NormalizeError::BufferSize {
        width,
        height,
        mode: ChannelMode::Luma,
        len,
    })?;

    Ok(DynamicImage::ImageLuma8(image.into_luma8()))
}

fn to_dimension(value: usize) -> Result<u32, NormalizeError> {
    u32::try_from(value).map_err(|_| NormalizeError::DimensionOverflow(value))
}
