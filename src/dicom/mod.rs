//! DICOM file access
//!
//! Opens DICOM files and turns them into [`PixelDataset`]s: the decoded
//! first frame plus the attributes the normalizer consults.

mod dataset;
mod error;
mod parser;
mod pixel_data;

// Re-export public API
pub use dataset::{PixelDataset, Windowing};
pub use error::ProcessError;
pub use parser::extract_series_description;

use anyhow::{Context, Result};
use dicom::object::{open_file, FileDicomObject, InMemDicomObject, StandardDataDictionary};
use std::path::Path;
use tracing::debug;

pub type DicomFile = FileDicomObject<InMemDicomObject<StandardDataDictionary>>;

/// Open and parse a DICOM file
pub fn open_dicom_file(file_path: &Path) -> Result<DicomFile> {
    open_file(file_path)
        .with_context(|| format!("Failed to open DICOM file: {}", file_path.display()))
}

/// Extract the pixel payload and normalization attributes from a DICOM object
///
/// A missing Pixel Data element is not an error here; the dataset is
/// returned without pixels and the normalizer reports it.
pub fn extract_pixel_dataset(obj: &DicomFile) -> Result<PixelDataset> {
    let dimensions = parser::extract_dimensions(obj)?;
    let layout = parser::extract_sample_layout(obj)?;
    let rescale = parser::extract_rescale_params(obj);
    let window = parser::extract_windowing(obj);
    let series_description = parser::extract_series_description(obj);
    let number_of_frames = parser::extract_number_of_frames(obj);

    debug!(
        %dimensions,
        bits_allocated = layout.bits_allocated,
        samples_per_pixel = layout.samples_per_pixel,
        frames = number_of_frames,
        windowed = window.is_some(),
        rescaled = rescale.is_some(),
        "extracted DICOM attributes"
    );

    let pixels = pixel_data::extract_pixel_array(obj, dimensions, layout)?;

    Ok(PixelDataset {
        pixels,
        bits_allocated: layout.bits_allocated,
        samples_per_pixel: layout.samples_per_pixel,
        window,
        rescale,
        dimensions,
        series_description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{normalize_array, NormalizeError};
    use assert_matches::assert_matches;
    use crate::types::{RescaleParams, WindowValue};
    use dicom::core::{DataElement, PrimitiveValue, VR};
    use dicom::dictionary_std::{tags, uids};
    use dicom::object::FileMetaTableBuilder;

    fn ct_object(with_pixels: bool) -> DicomFile {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(tags::SOP_CLASS_UID, VR::UI, uids::CT_IMAGE_STORAGE));
        obj.put(DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, "2.25.1234"));
        obj.put(DataElement::new(tags::SERIES_DESCRIPTION, VR::LO, "Chest/Abdomen "));
        obj.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(1_u16)));
        obj.put(DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(5_u16)));
        obj.put(DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)));
        obj.put(DataElement::new(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2"));
        obj.put(DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(16_u16)));
        obj.put(DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(16_u16)));
        obj.put(DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(15_u16)));
        obj.put(DataElement::new(tags::PIXEL_REPRESENTATION, VR::US, PrimitiveValue::from(1_u16)));
        obj.put(DataElement::new(tags::WINDOW_CENTER, VR::DS, PrimitiveValue::from([40.0_f64, 300.0])));
        obj.put(DataElement::new(tags::WINDOW_WIDTH, VR::DS, PrimitiveValue::from([400.0_f64, 1500.0])));
        obj.put(DataElement::new(tags::RESCALE_SLOPE, VR::DS, PrimitiveValue::from(1.0_f64)));
        obj.put(DataElement::new(tags::RESCALE_INTERCEPT, VR::DS, PrimitiveValue::from(-1024.0_f64)));

        if with_pixels {
            let bytes: Vec<u8> = [24_i16, 1024, 1064, 1104, 4024]
                .iter()
                .flat_map(|v| v.to_le_bytes())
                .collect();
            obj.put(DataElement::new(tags::PIXEL_DATA, VR::OW, PrimitiveValue::from(bytes)));
        }

        obj.with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::CT_IMAGE_STORAGE)
                .media_storage_sop_instance_uid("2.25.1234"),
        )
        .expect("Failed to build file meta group")
    }

    /// Single-row monochrome slice with the given sample width
    fn mono_object(
        bits: u16,
        signed: bool,
        cols: u16,
        window: Option<(f64, f64)>,
        pixels: Vec<u8>,
    ) -> DicomFile {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(tags::SOP_CLASS_UID, VR::UI, uids::SECONDARY_CAPTURE_IMAGE_STORAGE));
        obj.put(DataElement::new(tags::SOP_INSTANCE_UID, VR::UI, "2.25.5678"));
        obj.put(DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(1_u16)));
        obj.put(DataElement::new(tags::COLUMNS, VR::US, PrimitiveValue::from(cols)));
        obj.put(DataElement::new(tags::SAMPLES_PER_PIXEL, VR::US, PrimitiveValue::from(1_u16)));
        obj.put(DataElement::new(tags::PHOTOMETRIC_INTERPRETATION, VR::CS, "MONOCHROME2"));
        obj.put(DataElement::new(tags::BITS_ALLOCATED, VR::US, PrimitiveValue::from(bits)));
        obj.put(DataElement::new(tags::BITS_STORED, VR::US, PrimitiveValue::from(bits)));
        obj.put(DataElement::new(tags::HIGH_BIT, VR::US, PrimitiveValue::from(bits - 1)));
        obj.put(DataElement::new(
            tags::PIXEL_REPRESENTATION,
            VR::US,
            PrimitiveValue::from(u16::from(signed)),
        ));
        if let Some((width, center)) = window {
            obj.put(DataElement::new(tags::WINDOW_CENTER, VR::DS, PrimitiveValue::from(center)));
            obj.put(DataElement::new(tags::WINDOW_WIDTH, VR::DS, PrimitiveValue::from(width)));
        }
        obj.put(DataElement::new(tags::PIXEL_DATA, VR::OB, PrimitiveValue::from(pixels)));

        obj.with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
                .media_storage_sop_instance_uid("2.25.5678"),
        )
        .expect("Failed to build file meta group")
    }

    #[test]
    fn test_extract_ct_dataset() {
        let dataset = extract_pixel_dataset(&ct_object(true)).expect("Failed to extract dataset");

        assert_eq!(dataset.bits_allocated, 16);
        assert_eq!(dataset.samples_per_pixel, 1);
        assert_eq!(dataset.dimensions.to_string(), "5x1");
        assert_eq!(dataset.rescale, Some(RescaleParams::new(1.0, -1024.0)));
        assert_eq!(dataset.series_description.as_deref(), Some("Chest/Abdomen"));

        let window = dataset.window.as_ref().expect("window should be present");
        assert_eq!(window.width, WindowValue::Sequence(vec![400.0, 1500.0]));
        assert_eq!(window.center.first(), Some(40.0));

        let pixels = dataset.pixels.as_ref().expect("pixels should be present");
        assert_eq!(pixels.samples(), &[24, 1024, 1064, 1104, 4024]);
    }

    #[test]
    fn test_extracted_ct_dataset_normalizes_in_hounsfield_units() {
        let dataset = extract_pixel_dataset(&ct_object(true)).unwrap();
        let out = normalize_array(&dataset, false).unwrap();
        // -1000, 0, 40, 80, 3000 HU under W=400 C=40
        assert_eq!(out.as_slice(), &[0, 102, 127, 153, 255]);
    }

    #[test]
    fn test_missing_pixel_data_is_left_to_normalizer() {
        let dataset = extract_pixel_dataset(&ct_object(false)).unwrap();
        assert!(dataset.pixels.is_none());
        assert_matches!(
            normalize_array(&dataset, false),
            Err(NormalizeError::MissingPixelData)
        );
    }

    #[test]
    fn test_bilevel_pixels_are_unpacked_once() {
        let obj = mono_object(1, false, 8, None, vec![0b1010_0101, 0]);
        let dataset = extract_pixel_dataset(&obj).unwrap();

        let pixels = dataset.pixels.as_ref().expect("pixels should be present");
        assert_eq!(pixels.samples(), &[1, 0, 1, 0, 0, 1, 0, 1]);

        let out = normalize_array(&dataset, true).unwrap();
        assert_eq!(out.as_slice(), &[0, 1, 0, 1, 1, 0, 1, 0]);
    }

    #[test]
    fn test_undecodable_bit_depth_is_unsupported_pixel_format() {
        let obj = mono_object(12, false, 2, None, vec![0; 4]);
        let err = extract_pixel_dataset(&obj).unwrap_err();

        assert_eq!(
            err.downcast_ref::<NormalizeError>(),
            Some(&NormalizeError::UnsupportedPixelFormat { bits: 12, samples: 1 })
        );
        assert_matches!(
            ProcessError::from_extraction(err, None),
            ProcessError::ConversionFailed { .. }
        );
    }

    #[test]
    fn test_32bit_dataset_is_windowed() {
        let bytes: Vec<u8> = [-1000_i32, 0, 40, 80, 3000]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let obj = mono_object(32, true, 5, Some((400.0, 40.0)), bytes);
        let dataset = extract_pixel_dataset(&obj).unwrap();

        assert_eq!(dataset.bits_allocated, 32);
        let out = normalize_array(&dataset, false).unwrap();
        assert_eq!(out.as_slice(), &[0, 102, 127, 153, 255]);
    }

    #[test]
    fn test_32bit_dataset_without_window_is_unsupported() {
        let bytes: Vec<u8> = [1_i32, 2].iter().flat_map(|v| v.to_le_bytes()).collect();
        let dataset = extract_pixel_dataset(&mono_object(32, true, 2, None, bytes)).unwrap();

        assert_matches!(
            normalize_array(&dataset, false),
            Err(NormalizeError::UnsupportedPixelFormat { bits: 32, samples: 1 })
        );
    }
}
