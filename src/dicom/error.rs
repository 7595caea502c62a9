use crate::image::NormalizeError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of one stage while processing a single file
#[derive(Debug, Error)]
pub enum ProcessError {
    /// File could not be opened as DICOM
    #[error("{0:#}")]
    NotADicomFile(anyhow::Error),

    /// Valid DICOM file but pixel data or attributes could not be extracted
    #[error("{0:#}")]
    ExtractionFailed(anyhow::Error),

    /// Dataset extracted, but normalization failed
    #[error("{error}")]
    ConversionFailed {
        series_description: Option<String>,
        #[source]
        error: NormalizeError,
    },

    /// Image ready but could not be written
    #[error("Failed to save {}: {error}", path.display())]
    SaveFailed {
        path: PathBuf,
        #[source]
        error: image::ImageError,
    },
}

impl ProcessError {
    /// Sort an extraction failure into its stage
    ///
    /// Pixel formats the normalizer cannot handle surface during decoding;
    /// they are reported as conversion failures carrying the typed error.
    pub fn from_extraction(error: anyhow::Error, series_description: Option<String>) -> Self {
        match error.downcast::<NormalizeError>() {
            Ok(error) => ProcessError::ConversionFailed {
                series_description,
                error,
            },
            Err(error) => ProcessError::ExtractionFailed(error),
        }
    }

    /// Returns the series description if extraction got that far
    pub fn series_description(&self) -> Option<&str> {
        match self {
            ProcessError::ConversionFailed {
                series_description, ..
            } => series_description.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_unsupported_format_is_a_conversion_failure() {
        let error = anyhow::Error::from(NormalizeError::UnsupportedPixelFormat { bits: 12, samples: 1 });
        let error = ProcessError::from_extraction(error, Some("AX T2".to_string()));

        assert_matches!(
            error,
            ProcessError::ConversionFailed {
                error: NormalizeError::UnsupportedPixelFormat { bits: 12, samples: 1 },
                ..
            }
        );
        assert_eq!(error.series_description(), Some("AX T2"));
    }

    #[test]
    fn test_other_extraction_errors_keep_their_stage() {
        let error = ProcessError::from_extraction(anyhow::anyhow!("Missing or invalid Rows tag"), None);
        assert_matches!(error, ProcessError::ExtractionFailed(_));
        assert_eq!(error.series_description(), None);
    }
}
