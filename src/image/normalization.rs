#[inline]
#[must_use]
pub fn find_min_max(values: &[i32]) -> Option<(i32, i32)> {
    values.iter().fold(None, |acc, &val| match acc {
        None => Some((val, val)),
        Some((min, max)) => Some((min.min(val), max.max(val))),
    })
}

/// Stretch `[min, max]` of the samples onto `[0, 255]`, optionally inverted,
/// truncating to `u8`.
///
/// A flat image has no range to stretch and maps to all zeros before
/// inversion.
#[must_use]
pub fn min_max_normalize(samples: &[i32], flip: bool) -> Vec<u8> {
    let Some((min, max)) = find_min_max(samples) else {
        return Vec::new();
    };

    if min == max {
        let fill = if flip { 255 } else { 0 };
        return vec![fill; samples.len()];
    }

    let min = f64::from(min);
    let range = f64::from(max) - min;

    samples
        .iter()
        .map(|&sample| {
            let normalized = (f64::from(sample) - min) * 255.0 / range;
            let normalized = if flip { 255.0 - normalized } else { normalized };
            // Saturating cast; the value is already within [0, 255]
            normalized as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_16bit_range() {
        assert_eq!(min_max_normalize(&[0, 32767, 65535], false), vec![0, 127, 255]);
    }

    #[test]
    fn test_flip_applies_before_truncation() {
        // 255 - 127.498 = 127.502
        assert_eq!(min_max_normalize(&[0, 32767, 65535], true), vec![255, 127, 0]);
    }

    #[test]
    fn test_signed_samples() {
        assert_eq!(min_max_normalize(&[-1024, 0, 1024], false), vec![0, 127, 255]);
    }

    #[test]
    fn test_flat_image_is_black() {
        assert_eq!(min_max_normalize(&[512; 4], false), vec![0; 4]);
        assert_eq!(min_max_normalize(&[512; 4], true), vec![255; 4]);
    }

    #[test]
    fn test_empty_input() {
        assert!(min_max_normalize(&[], false).is_empty());
        assert_eq!(find_min_max(&[]), None);
    }

    #[test]
    fn test_find_min_max() {
        assert_eq!(find_min_max(&[3, -2, 9, 0]), Some((-2, 9)));
    }
}
