//! Rescaling of filter outputs to a fixed range.
//!
//! Filter responses such as the sobel magnitude are unbounded. Rescaling them
//! with [`normalize_min_max`] is the usual step before quantizing to 8 bits.

use edetect_image::Image;

use crate::backend::Backend;
use crate::error::FilterError;
use crate::filter::check_same_size;

/// Find the minimum and maximum values of an image.
///
/// # Returns
///
/// `(min, max)` over all the pixels. NaN pixels are ignored.
pub fn find_min_max(src: &Image) -> (f32, f32) {
    src.rows_iter()
        .flatten()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Linearly rescale an image so its values span `[min, max]`.
///
/// A constant image is set to `min`.
///
/// # Arguments
///
/// * `backend` - The execution backend.
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `min` - The value the smallest pixel maps to.
/// * `max` - The value the largest pixel maps to.
pub fn normalize_min_max<B: Backend>(
    backend: &B,
    src: &Image,
    dst: &mut Image,
    min: f32,
    max: f32,
) -> Result<(), FilterError> {
    check_same_size(dst, src)?;

    let (min_val, max_val) = find_min_max(src);
    let range = max_val - min_val;

    backend.map_pixels(dst, |row, col, _| {
        if range > 0.0 {
            (src.row(row)[col] - min_val) * (max - min) / range + min
        } else {
            min
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Cpu, Parallel};

    #[test]
    fn test_normalize_min_max() -> Result<(), FilterError> {
        let image = Image::new([3, 2].into(), vec![0.0, 1.0, 0.0, 1.0, 2.0, 3.0])?;
        let mut normalized = Image::from_size_val(image.size(), 0.0)?;

        normalize_min_max(&Cpu, &image, &mut normalized, 0.0, 1.0)?;

        let expected = [0.0f32, 0.33333334, 0.0, 0.33333334, 0.6666667, 1.0];
        for (&a, &b) in normalized.to_vec().iter().zip(expected.iter()) {
            approx::assert_relative_eq!(a, b, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_normalize_constant_image() -> Result<(), FilterError> {
        let image = Image::from_size_val([4, 4].into(), 2.5)?;
        let mut normalized = Image::from_size_val(image.size(), 7.0)?;

        normalize_min_max(&Parallel::new(), &image, &mut normalized, 0.0, 255.0)?;
        assert_eq!(normalized.to_vec(), vec![0.0; 16]);
        Ok(())
    }

    #[test]
    fn test_find_min_max() -> Result<(), FilterError> {
        let image = Image::new([2, 2].into(), vec![-1.5, 4.0, f32::NAN, 0.0])?;
        assert_eq!(find_min_max(&image), (-1.5, 4.0));
        Ok(())
    }
}
