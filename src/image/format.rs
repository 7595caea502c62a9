//! Classification of pixel layouts that can be normalized without windowing

use super::error::NormalizeError;
use crate::types::ChannelMode;

/// Pixel layout resolved once from Bits Allocated and Samples per Pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 1 bit, 1 sample
    Bilevel,
    /// 8 bits, 1 sample
    Greyscale8,
    /// 8 bits, 3 samples
    Rgb8,
    /// 16 bits, any sample count; min-max normalized
    Wide16 { samples_per_pixel: u16 },
}

impl PixelFormat {
    /// # Errors
    ///
    /// Returns `UnsupportedPixelFormat` naming the pair when no layout matches
    pub fn classify(bits_allocated: u16, samples_per_pixel: u16) -> Result<Self, NormalizeError> {
        match (bits_allocated, samples_per_pixel) {
            (1, 1) => Ok(Self::Bilevel),
            (8, 1) => Ok(Self::Greyscale8),
            (8, 3) => Ok(Self::Rgb8),
            (16, samples_per_pixel) => Ok(Self::Wide16 { samples_per_pixel }),
            (bits, samples) => Err(NormalizeError::UnsupportedPixelFormat { bits, samples }),
        }
    }

    /// Channel mode of the display image built for this layout
    #[must_use]
    pub fn channel_mode(&self) -> ChannelMode {
        match self {
            Self::Bilevel => ChannelMode::Bilevel,
            Self::Greyscale8 | Self::Wide16 { .. } => ChannelMode::Luma,
            Self::Rgb8 => ChannelMode::Rgb,
        }
    }

    /// Largest value of the normalized output, used for polarity inversion
    #[inline]
    #[must_use]
    pub fn max_value(&self) -> u8 {
        match self {
            Self::Bilevel => 1,
            _ => 255,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_known_layouts() {
        assert_eq!(PixelFormat::classify(1, 1), Ok(PixelFormat::Bilevel));
        assert_eq!(PixelFormat::classify(8, 1), Ok(PixelFormat::Greyscale8));
        assert_eq!(PixelFormat::classify(8, 3), Ok(PixelFormat::Rgb8));
        assert_eq!(
            PixelFormat::classify(16, 3),
            Ok(PixelFormat::Wide16 { samples_per_pixel: 3 })
        );
    }

    #[test]
    fn test_unsupported_layout_names_the_pair() {
        let err = PixelFormat::classify(12, 1).unwrap_err();
        assert_matches!(err, NormalizeError::UnsupportedPixelFormat { bits: 12, samples: 1 });
        assert!(err.to_string().contains("12 bits allocated with 1 samples"));

        assert_matches!(
            PixelFormat::classify(8, 4),
            Err(NormalizeError::UnsupportedPixelFormat { bits: 8, samples: 4 })
        );
    }

    #[test]
    fn test_mode_selection_is_stable() {
        for (bits, samples) in [(1, 1), (8, 1), (8, 3), (16, 1), (16, 3)] {
            let first = PixelFormat::classify(bits, samples).unwrap().channel_mode();
            let second = PixelFormat::classify(bits, samples).unwrap().channel_mode();
            assert_eq!(first, second);
        }
        assert_eq!(
            PixelFormat::Wide16 { samples_per_pixel: 3 }.channel_mode(),
            ChannelMode::Luma
        );
    }
}
