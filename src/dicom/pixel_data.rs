//! DICOM pixel data extraction
//!
//! Decodes the first frame of the pixel payload into integer samples,
//! handling compression, endianness, bit packing, signedness and planar
//! configuration.

use super::parser::{self, SampleLayout};
use crate::image::{NormalizeError, PixelArray};
use crate::types::Dimensions;
use anyhow::{bail, Context, Result};
use dicom::dictionary_std::tags;
use dicom::object::{FileDicomObject, InMemDicomObject, StandardDataDictionary};
use dicom::pixeldata::PixelDecoder;

/// Extract the first frame as a [`PixelArray`], or `None` if the object has
/// no Pixel Data element
///
/// Bit depths other than 1, 8, 16 and 32 fail with
/// [`NormalizeError::UnsupportedPixelFormat`], which callers can recover with
/// `downcast_ref`.
pub fn extract_pixel_array(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
    dimensions: Dimensions,
    layout: SampleLayout,
) -> Result<Option<PixelArray>> {
    if obj.get(tags::PIXEL_DATA).is_none() {
        return Ok(None);
    }

    let pixel_count = dimensions.pixel_count();
    let samples_per_pixel = usize::from(layout.samples_per_pixel);
    let sample_count = pixel_count * samples_per_pixel;

    let samples = match layout.bits_allocated {
        // The decoder already expands packed bits to one byte (0 or 255) per sample
        1 => decode_bilevel(&extract_decoded_bytes(obj)?, sample_count)?,
        16 | 32 if parser::is_big_endian(obj) => {
            let bytes = extract_big_endian(obj, usize::from(layout.bits_allocated / 8))?;
            decode_samples(&bytes, sample_count, layout)?
        }
        8 | 16 => decode_samples(&extract_decoded_bytes(obj)?, sample_count, layout)?,
        32 => decode_samples(&extract_raw_bytes(obj)?, sample_count, layout)?,
        bits => {
            return Err(NormalizeError::UnsupportedPixelFormat {
                bits,
                samples: layout.samples_per_pixel,
            }
            .into());
        }
    };

    let samples = if layout.planar && samples_per_pixel > 1 {
        interleave_planes(&samples, pixel_count, samples_per_pixel)
    } else {
        samples
    };

    let array = PixelArray::new(
        usize::from(dimensions.rows),
        usize::from(dimensions.cols),
        samples_per_pixel,
        samples,
    )
    .context("Decoded pixel data does not match the declared dimensions")?;

    Ok(Some(array))
}

/// Extract decoded pixel data (handles compression), little-endian
fn extract_decoded_bytes(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
) -> Result<Vec<u8>> {
    let decoded_pixel_data = obj
        .decode_pixel_data()
        .context("Failed to decode pixel data")?;

    // Raw samples; no modality or VOI LUT applied
    Ok(decoded_pixel_data.data().to_vec())
}

/// Extract native pixel data as stored (for 32-bit)
fn extract_raw_bytes(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
) -> Result<Vec<u8>> {
    let pixel_data_obj = obj.get(tags::PIXEL_DATA).context("Missing pixel data")?;

    Ok(pixel_data_obj
        .to_bytes()
        .context("Failed to get raw pixel data bytes")?
        .into_owned())
}

/// Extract big-endian pixel data and convert to little-endian
fn extract_big_endian(
    obj: &FileDicomObject<InMemDicomObject<StandardDataDictionary>>,
    bytes_per_sample: usize,
) -> Result<Vec<u8>> {
    let raw_bytes = extract_raw_bytes(obj)?;

    if !raw_bytes.len().is_multiple_of(bytes_per_sample) {
        bail!("Invalid {}-bit pixel data length", bytes_per_sample * 8);
    }

    Ok(raw_bytes
        .chunks_exact(bytes_per_sample)
        .flat_map(|chunk| chunk.iter().rev().copied())
        .collect())
}

/// One decoded byte per sample; any non-zero byte is foreground
fn decode_bilevel(bytes: &[u8], sample_count: usize) -> Result<Vec<i32>> {
    if bytes.len() < sample_count {
        bail!(
            "Invalid 1-bit pixel data size: expected {sample_count} samples, got {}",
            bytes.len()
        );
    }

    Ok(bytes[..sample_count]
        .iter()
        .map(|&b| i32::from(b != 0))
        .collect())
}

fn decode_samples(bytes: &[u8], sample_count: usize, layout: SampleLayout) -> Result<Vec<i32>> {
    let bytes_per_sample = usize::from(layout.bits_allocated / 8);
    let expected = sample_count * bytes_per_sample;

    // For multi-frame images, only the first frame is used
    if bytes.len() < expected {
        bail!(
            "Invalid pixel data size: expected {expected} bytes for first frame, got {}",
            bytes.len()
        );
    }
    let frame = &bytes[..expected];

    let samples = match bytes_per_sample {
        1 => frame
            .iter()
            .map(|&b| to_sample(u32::from(b), layout.bits_stored, layout.signed))
            .collect(),
        2 => frame
            .chunks_exact(2)
            .map(|chunk| {
                let raw = u16::from_le_bytes([chunk[0], chunk[1]]);
                to_sample(u32::from(raw), layout.bits_stored, layout.signed)
            })
            .collect(),
        _ => frame
            .chunks_exact(4)
            .map(|chunk| {
                let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                to_sample(raw, layout.bits_stored, layout.signed)
            })
            .collect(),
    };

    Ok(samples)
}

/// Sign-extend from Bits Stored for two's complement data
#[inline(always)]
fn to_sample(raw: u32, bits_stored: u16, signed: bool) -> i32 {
    match (signed, bits_stored) {
        (true, 1..=31) => {
            let shift = 32 - u32::from(bits_stored);
            ((raw << shift) as i32) >> shift
        }
        (true, _) => raw as i32,
        // Unsigned 32-bit values past i32::MAX saturate
        (false, _) => i32::try_from(raw).unwrap_or(i32::MAX),
    }
}

/// Planar configuration 1: RRR...GGG...BBB... into RGBRGB...
fn interleave_planes(samples: &[i32], pixel_count: usize, planes: usize) -> Vec<i32> {
    let mut interleaved = vec![0; pixel_count * planes];

    for (i, pixel) in interleaved.chunks_exact_mut(planes).enumerate() {
        for (plane, value) in pixel.iter_mut().enumerate() {
            *value = samples[plane * pixel_count + i];
        }
    }

    interleaved
}
