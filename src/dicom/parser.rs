use super::dataset::Windowing;
use crate::types::{Dimensions, RescaleParams, WindowValue};
use anyhow::{Context, Result};
use dicom::dictionary_std::tags;
use dicom::object::{FileDicomObject, InMemDicomObject, StandardDataDictionary};

/// Sample layout of the pixel payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLayout {
    pub bits_allocated: u16,
    pub bits_stored: u16,
    pub samples_per_pixel: u16,
    pub signed: bool,
    pub planar: bool,
}

pub fn extract_dimensions(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
) -> Result<Dimensions> {
    let rows = obj
        .get(tags::ROWS)
        .and_then(|e| e.to_int::<u16>().ok())
        .context("Missing or invalid Rows tag")?;

    let cols = obj
        .get(tags::COLUMNS)
        .and_then(|e| e.to_int::<u16>().ok())
        .context("Missing or invalid Columns tag")?;

    Ok(Dimensions::new(rows, cols))
}

pub fn extract_sample_layout(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
) -> Result<SampleLayout> {
    let bits_allocated = obj
        .get(tags::BITS_ALLOCATED)
        .and_then(|e| e.to_int::<u16>().ok())
        .context("Missing or invalid Bits Allocated tag")?;

    let bits_stored = obj
        .get(tags::BITS_STORED)
        .and_then(|e| e.to_int::<u16>().ok())
        .unwrap_or(bits_allocated);

    let samples_per_pixel = obj
        .get(tags::SAMPLES_PER_PIXEL)
        .and_then(|e| e.to_int::<u16>().ok())
        .unwrap_or(1);

    // 0 = unsigned, 1 = two's complement
    let signed = obj
        .get(tags::PIXEL_REPRESENTATION)
        .and_then(|e| e.to_int::<u16>().ok())
        == Some(1);

    // 0 = interleaved, 1 = planar (color only)
    let planar = obj
        .get(tags::PLANAR_CONFIGURATION)
        .and_then(|e| e.to_int::<u16>().ok())
        == Some(1);

    Ok(SampleLayout {
        bits_allocated,
        bits_stored,
        samples_per_pixel,
        signed,
        planar,
    })
}

/// Rescale slope and intercept, only when both are present
pub fn extract_rescale_params(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
) -> Option<RescaleParams> {
    let slope = obj
        .get(tags::RESCALE_SLOPE)
        .and_then(|e| e.to_float64().ok())?;

    let intercept = obj
        .get(tags::RESCALE_INTERCEPT)
        .and_then(|e| e.to_float64().ok())?;

    Some(RescaleParams::new(slope, intercept))
}

/// Window Width and Window Center, only when both carry at least one value
pub fn extract_windowing(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
) -> Option<Windowing> {
    let width = extract_window_value(obj, tags::WINDOW_WIDTH)?;
    let center = extract_window_value(obj, tags::WINDOW_CENTER)?;
    Some(Windowing { width, center })
}

fn extract_window_value(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
    tag: dicom::object::Tag,
) -> Option<WindowValue> {
    obj.get(tag)
        .and_then(|e| e.to_multi_float64().ok())
        .and_then(WindowValue::from_values)
}

#[inline]
pub fn extract_number_of_frames(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
) -> u32 {
    obj.get(tags::NUMBER_OF_FRAMES)
        .and_then(|e| e.to_int::<u32>().ok())
        .unwrap_or(1)
}

pub fn extract_series_description(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
) -> Option<String> {
    obj.get(tags::SERIES_DESCRIPTION)
        .and_then(|e| e.value().to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[inline]
pub fn is_big_endian(obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>) -> bool {
    #[allow(deprecated)] // Explicit VR Big Endian is retired but still in use
    use dicom::dictionary_std::uids::EXPLICIT_VR_BIG_ENDIAN;

    obj.meta().transfer_syntax().trim_end_matches('\0') == EXPLICIT_VR_BIG_ENDIAN
}
