//! Domain-specific value types shared by the decoder adapter and the normalizer

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: u16,
    pub cols: u16,
}

impl Dimensions {
    #[must_use]
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }

    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{cols}x{rows}", cols = self.cols, rows = self.rows)
    }
}

/// Rescale parameters for converting stored pixel values to physical units
/// (Hounsfield units for CT)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescaleParams {
    pub slope: f64,
    pub intercept: f64,
}

impl RescaleParams {
    #[must_use]
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
        }
    }

    #[inline(always)]
    #[must_use]
    // Hot path: called for every sample during windowing
    pub fn apply(&self, sample: i32) -> f64 {
        f64::from(sample).mul_add(self.slope, self.intercept)
    }
}

impl fmt::Display for RescaleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slope={slope}, intercept={intercept}",
            slope = self.slope,
            intercept = self.intercept
        )
    }
}

/// A window attribute as stored in the dataset: either a single value or
/// a multi-valued element, of which only the first value is meaningful here.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowValue {
    Scalar(f64),
    Sequence(Vec<f64>),
}

impl WindowValue {
    /// Build from the decoded values of a multi-valued element.
    /// Returns `None` when the element carries no values.
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => Some(Self::Scalar(values[0])),
            _ => Some(Self::Sequence(values)),
        }
    }

    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Sequence(values) => values.first().copied(),
        }
    }
}

impl From<f64> for WindowValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl fmt::Display for WindowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Sequence(values) => {
                let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "{}", joined.join("\\"))
            }
        }
    }
}

/// Resolved window width and center, ready for the VOI transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLevel {
    pub width: f64,
    pub center: f64,
}

impl WindowLevel {
    #[must_use]
    pub fn new(width: f64, center: f64) -> Self {
        Self { width, center }
    }

    /// Reduce possibly multi-valued window attributes to their first values
    #[must_use]
    pub fn from_values(width: &WindowValue, center: &WindowValue) -> Option<Self> {
        Some(Self::new(width.first()?, center.first()?))
    }
}

impl fmt::Display for WindowLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W={width} C={center}", width = self.width, center = self.center)
    }
}

/// Channel layout tag of a display image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelMode {
    /// One bit per pixel
    Bilevel,
    /// 8-bit greyscale
    Luma,
    /// 8-bit interleaved RGB
    Rgb,
}

impl ChannelMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bilevel => "1",
            Self::Luma => "L",
            Self::Rgb => "RGB",
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
