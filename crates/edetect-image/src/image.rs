use crate::error::ImageError;

/// Size in bytes of a single sample.
pub const SAMPLE_SIZE: usize = std::mem::size_of::<f32>();

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use edetect_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// A single-channel `f32` image with a row stride.
///
/// Rows start every `stride` bytes; the stride may exceed the tight row size
/// `cols * 4` for alignment or padding. Padding samples are never exposed:
/// every accessor works in `(row, col)` coordinates within
/// `[0, rows) x [0, cols)`.
#[derive(Clone, Debug)]
pub struct Image {
    size: ImageSize,
    // row stride in samples
    pitch: usize,
    data: Vec<f32>,
}

impl Image {
    /// Create a new image from tightly packed pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image, row by row.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use edetect_image::{Image, ImageSize};
    ///
    /// let image = Image::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0f32; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(image.cols(), 10);
    /// assert_eq!(image.rows(), 20);
    /// assert_eq!(image.stride(), 40);
    /// ```
    pub fn new(size: ImageSize, data: Vec<f32>) -> Result<Self, ImageError> {
        Self::with_stride(size, Self::packed_stride(size)?, data)
    }

    /// Create a new image from pixel data laid out with the given row stride.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `stride` - The distance in bytes between the start of two consecutive rows.
    /// * `data` - The pixel data, `height * stride / 4` samples including padding.
    ///
    /// # Errors
    ///
    /// Returns an error if the size is empty, the stride is invalid or the data
    /// length does not match.
    ///
    /// # Examples
    ///
    /// ```
    /// use edetect_image::{Image, ImageSize};
    ///
    /// // 2x2 image with one padding sample per row
    /// let image = Image::with_stride([2, 2].into(), 12, vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.0]).unwrap();
    ///
    /// assert_eq!(image.get(1, 0), Some(3.0));
    /// assert_eq!(image.row(1), &[3.0, 4.0]);
    /// ```
    pub fn with_stride(size: ImageSize, stride: usize, data: Vec<f32>) -> Result<Self, ImageError> {
        let pitch = Self::check_layout(size, stride)?;

        let expected = pitch
            .checked_mul(size.height)
            .ok_or(ImageError::AllocationFailed(usize::MAX))?;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, pitch, data })
    }

    /// Create a new image with the given size and pixel value.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `val` - The value of every pixel.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::AllocationFailed`] if the storage cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use edetect_image::{Image, ImageSize};
    ///
    /// let image = Image::from_size_val([3, 2].into(), 0.5).unwrap();
    ///
    /// assert_eq!(image.size(), ImageSize { width: 3, height: 2 });
    /// assert_eq!(image.get(1, 2), Some(0.5));
    /// ```
    pub fn from_size_val(size: ImageSize, val: f32) -> Result<Self, ImageError> {
        Self::from_size_val_with_stride(size, Self::packed_stride(size)?, val)
    }

    /// Create a new image with the given size, row stride and pixel value.
    pub fn from_size_val_with_stride(
        size: ImageSize,
        stride: usize,
        val: f32,
    ) -> Result<Self, ImageError> {
        let pitch = Self::check_layout(size, stride)?;

        let len = pitch
            .checked_mul(size.height)
            .ok_or(ImageError::AllocationFailed(usize::MAX))?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| ImageError::AllocationFailed(len.saturating_mul(SAMPLE_SIZE)))?;
        data.resize(len, val);

        Ok(Self { size, pitch, data })
    }

    /// Create a zero-filled image with the same size and stride as `self`.
    pub fn zeros_like(&self) -> Result<Self, ImageError> {
        Self::from_size_val_with_stride(self.size, self.stride(), 0.0)
    }

    // byte length of a tightly packed row
    fn packed_stride(size: ImageSize) -> Result<usize, ImageError> {
        size.width
            .checked_mul(SAMPLE_SIZE)
            .ok_or(ImageError::AllocationFailed(usize::MAX))
    }

    fn check_layout(size: ImageSize, stride: usize) -> Result<usize, ImageError> {
        if size.width == 0 || size.height == 0 {
            return Err(ImageError::EmptyImage);
        }

        let min = Self::packed_stride(size)?;
        if stride < min || stride % SAMPLE_SIZE != 0 {
            return Err(ImageError::InvalidStride { stride, min });
        }

        Ok(stride / SAMPLE_SIZE)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the distance in bytes between the start of two consecutive rows.
    pub fn stride(&self) -> usize {
        self.pitch * SAMPLE_SIZE
    }

    /// Get the number of pixels in the image, padding excluded.
    pub fn numel(&self) -> usize {
        self.size.width * self.size.height
    }

    /// Get the pixel value at the given coordinates.
    ///
    /// # Returns
    ///
    /// The value, or `None` if the coordinates are outside the image.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.data.get(row * self.pitch + col).copied()
    }

    /// Set the pixel value at the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::PixelIndexOutOfBounds`] if the coordinates are outside the image.
    pub fn set(&mut self, row: usize, col: usize, val: f32) -> Result<(), ImageError> {
        if row >= self.rows() || col >= self.cols() {
            return Err(ImageError::PixelIndexOutOfBounds(
                row,
                col,
                self.rows(),
                self.cols(),
            ));
        }
        self.data[row * self.pitch + col] = val;
        Ok(())
    }

    /// Get the samples of a row, padding excluded.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.pitch;
        &self.data[start..start + self.size.width]
    }

    /// Get the mutable samples of a row, padding excluded.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    pub fn row_mut(&mut self, row: usize) -> &mut [f32] {
        let start = row * self.pitch;
        &mut self.data[start..start + self.size.width]
    }

    /// Iterate over the rows of the image, padding excluded.
    pub fn rows_iter(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        let cols = self.size.width;
        self.data
            .chunks_exact(self.pitch)
            .map(move |row| &row[..cols])
    }

    /// Iterate mutably over the rows of the image, padding excluded.
    pub fn rows_iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut [f32]> + '_ {
        let cols = self.size.width;
        self.data
            .chunks_exact_mut(self.pitch)
            .map(move |row| &mut row[..cols])
    }

    /// Iterate mutably and in parallel over the rows of the image, padding excluded.
    #[cfg(feature = "rayon")]
    pub fn par_rows_mut(
        &mut self,
    ) -> impl rayon::iter::IndexedParallelIterator<Item = &mut [f32]> + '_ {
        use rayon::prelude::*;

        let cols = self.size.width;
        self.data
            .par_chunks_exact_mut(self.pitch)
            .map(move |row| &mut row[..cols])
    }

    /// Set every pixel to `val`. Padding is left untouched.
    pub fn fill(&mut self, val: f32) {
        self.rows_iter_mut().for_each(|row| row.fill(val));
    }

    /// Copy the pixels into a tightly packed vector.
    pub fn to_vec(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.numel());
        self.rows_iter().for_each(|row| out.extend_from_slice(row));
        out
    }
}

/// Two images are equal when they have the same size and the same pixels.
///
/// The row stride and the padding samples are not compared.
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.rows_iter().eq(other.rows_iter())
    }
}

#[cfg(test)]
mod tests {
    use crate::image::{Image, ImageError, ImageSize};

    #[test]
    fn image_size() {
        let image_size = ImageSize {
            width: 10,
            height: 20,
        };
        assert_eq!(image_size.width, 10);
        assert_eq!(image_size.height, 20);
        assert_eq!(
            image_size.to_string(),
            "ImageSize { width: 10, height: 20 }"
        );
    }

    #[test]
    fn image_smoke() -> Result<(), ImageError> {
        let image = Image::new(
            ImageSize {
                width: 10,
                height: 20,
            },
            vec![0f32; 10 * 20],
        )?;
        assert_eq!(image.size().width, 10);
        assert_eq!(image.size().height, 20);
        assert_eq!(image.stride(), 40);
        assert_eq!(image.numel(), 200);

        Ok(())
    }

    #[test]
    fn image_invalid_data_length() {
        let res = Image::new([3, 3].into(), vec![0f32; 8]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(8, 9)));
    }

    #[test]
    fn image_empty() {
        assert_eq!(
            Image::from_size_val([0, 3].into(), 0.0),
            Err(ImageError::EmptyImage)
        );
    }

    #[test]
    fn image_invalid_stride() {
        assert_eq!(
            Image::from_size_val_with_stride([4, 2].into(), 12, 0.0),
            Err(ImageError::InvalidStride { stride: 12, min: 16 })
        );
        assert_eq!(
            Image::from_size_val_with_stride([4, 2].into(), 18, 0.0),
            Err(ImageError::InvalidStride { stride: 18, min: 16 })
        );
    }

    #[test]
    fn image_padded_rows() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let image = Image::with_stride(
            [3, 2].into(),
            20,
            vec![
                1.0, 2.0, 3.0, -1.0, -1.0,
                4.0, 5.0, 6.0, -1.0, -1.0,
            ],
        )?;

        assert_eq!(image.stride(), 20);
        assert_eq!(image.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(image.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(image.get(1, 2), Some(6.0));
        assert_eq!(image.get(1, 3), None);
        assert_eq!(image.get(2, 0), None);
        assert_eq!(image.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        Ok(())
    }

    #[test]
    fn image_set_and_fill() -> Result<(), ImageError> {
        let mut image = Image::from_size_val_with_stride([2, 2].into(), 16, 0.0)?;
        image.set(0, 1, 3.0)?;
        assert_eq!(image.get(0, 1), Some(3.0));
        assert_eq!(
            image.set(2, 0, 1.0),
            Err(ImageError::PixelIndexOutOfBounds(2, 0, 2, 2))
        );

        image.fill(7.0);
        assert_eq!(image.to_vec(), vec![7.0; 4]);

        let zeros = image.zeros_like()?;
        assert_eq!(zeros.stride(), 16);
        assert_eq!(zeros.to_vec(), vec![0.0; 4]);

        Ok(())
    }

    #[test]
    fn image_eq_ignores_padding() -> Result<(), ImageError> {
        let a = Image::with_stride([2, 1].into(), 12, vec![1.0, 2.0, 0.0])?;
        let b = Image::with_stride([2, 1].into(), 12, vec![1.0, 2.0, 9.0])?;
        let packed = Image::new([2, 1].into(), vec![1.0, 2.0])?;
        let wide = Image::with_stride([2, 1].into(), 32, vec![1.0, 2.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0])?;

        assert_eq!(a, b);
        assert_eq!(a, packed);
        assert_eq!(packed, wide);

        let other = Image::new([2, 1].into(), vec![1.0, 3.0])?;
        assert_ne!(packed, other);
        let transposed = Image::new([1, 2].into(), vec![1.0, 2.0])?;
        assert_ne!(packed, transposed);

        Ok(())
    }

    #[test]
    fn image_width_overflow() {
        let size = ImageSize {
            width: usize::MAX / 2,
            height: 1,
        };
        assert_eq!(
            Image::from_size_val(size, 0.0),
            Err(ImageError::AllocationFailed(usize::MAX))
        );
        assert_eq!(
            Image::new(size, vec![]),
            Err(ImageError::AllocationFailed(usize::MAX))
        );
    }

    #[test]
    fn image_rows_iter_mut() -> Result<(), ImageError> {
        let mut image = Image::from_size_val_with_stride([2, 3].into(), 12, 0.0)?;
        image
            .rows_iter_mut()
            .enumerate()
            .for_each(|(r, row)| row.fill(r as f32));

        assert_eq!(image.rows_iter().len(), 3);
        assert_eq!(image.to_vec(), vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0]);

        Ok(())
    }
}
