use crate::{Image, ImageError, ImageSize};

/// Cast tightly packed pixel data to `f32` and scale it into a new image.
///
/// # Arguments
///
/// * `data` - The source pixel data, row by row.
/// * `size` - The size of the image in pixels.
/// * `scale` - The scale to multiply the pixel data with.
///
/// Example:
///
/// ```
/// use edetect_image::ops::cast_and_scale;
///
/// let image = cast_and_scale(&[0u8, 255], [2, 1].into(), 1. / 255.0).unwrap();
///
/// assert_eq!(image.get(0, 0), Some(0.0));
/// assert_eq!(image.get(0, 1), Some(1.0));
/// ```
pub fn cast_and_scale<T>(data: &[T], size: ImageSize, scale: f32) -> Result<Image, ImageError>
where
    T: Copy + num_traits::NumCast,
{
    let expected = size.width * size.height;
    if data.len() != expected {
        return Err(ImageError::InvalidChannelShape(data.len(), expected));
    }

    let casted_data = data
        .iter()
        .map(|&x| {
            let xf: f32 = num_traits::cast(x).ok_or(ImageError::CastError)?;
            Ok(xf * scale)
        })
        .collect::<Result<Vec<f32>, ImageError>>()?;

    Image::new(size, casted_data)
}

/// Scale the pixels of an image and saturate them into tightly packed `u8` data.
///
/// NaN samples map to 0.
pub fn to_u8_scaled(src: &Image, scale: f32) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.numel());
    for row in src.rows_iter() {
        out.extend(
            row.iter()
                .map(|&x| (x * scale).round().clamp(0.0, 255.0) as u8),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_and_scale() -> Result<(), ImageError> {
        let image = cast_and_scale(&[0u16, 512, 1024, 2048], [2, 2].into(), 1. / 1024.0)?;
        assert_eq!(image.to_vec(), vec![0.0, 0.5, 1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_cast_and_scale_invalid_len() {
        let res = cast_and_scale(&[0u8; 3], [2, 2].into(), 1.0);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(3, 4)));
    }

    #[test]
    fn test_to_u8_scaled() -> Result<(), ImageError> {
        let image = Image::with_stride([2, 2].into(), 12, vec![0.0, 0.5, 9.0, 1.2, -1.0, 9.0])?;
        assert_eq!(to_u8_scaled(&image, 255.0), vec![0, 128, 255, 0]);
        Ok(())
    }
}
