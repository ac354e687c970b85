use edetect_image::Image;

use super::convolution::{check_same_size, convolve_columns, convolve_rows, Convolve};
use super::kernels::Kernel1d;
use crate::backend::{Backend, Cpu};
use crate::error::FilterError;

/// Apply a separable filter to an image.
///
/// Runs the horizontal pass into a scratch image and the vertical pass into
/// `dst`, which equals a full 2D convolution with the outer product
/// `kernel_y ⊗ kernel_x` up to floating point rounding.
///
/// # Arguments
///
/// * `backend` - The execution backend.
/// * `dst` - The destination image, same size as `src`.
/// * `src` - The source image.
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
///
/// # Errors
///
/// Returns [`FilterError::BackendFailure`] if the scratch image cannot be allocated.
pub fn convolve_separable<B: Backend>(
    backend: &B,
    dst: &mut Image,
    src: &Image,
    kernel_x: &Kernel1d,
    kernel_y: &Kernel1d,
) -> Result<(), FilterError> {
    check_same_size(dst, src)?;

    let mut temp = src
        .zeros_like()
        .map_err(|e| FilterError::BackendFailure(e.to_string()))?;

    convolve_rows(backend, &mut temp, src, kernel_x)?;
    convolve_columns(backend, dst, &temp, kernel_y)
}

/// A separable 2D filter that applies horizontal and vertical 1D convolutions sequentially.
#[derive(Debug, Clone)]
pub struct SeparableFilter<B = Cpu> {
    kernel_x: Kernel1d,
    kernel_y: Kernel1d,
    backend: B,
}

impl<B: Backend> SeparableFilter<B> {
    /// Create a new separable filter with the given kernels.
    ///
    /// # Arguments
    ///
    /// * `kernel_x` - The horizontal convolution kernel
    /// * `kernel_y` - The vertical convolution kernel
    pub fn new(kernel_x: Kernel1d, kernel_y: Kernel1d) -> Self {
        Self {
            kernel_x,
            kernel_y,
            backend: B::default(),
        }
    }

    /// Run the filter on the given backend instance.
    pub fn with_backend(mut self, backend: B) -> Self {
        self.backend = backend;
        self
    }

    /// Get the horizontal kernel.
    pub fn kernel_x(&self) -> &Kernel1d {
        &self.kernel_x
    }

    /// Get the vertical kernel.
    pub fn kernel_y(&self) -> &Kernel1d {
        &self.kernel_y
    }
}

impl<B: Backend> Convolve for SeparableFilter<B> {
    fn convolve(&self, dst: &mut Image, src: &Image) -> Result<(), FilterError> {
        convolve_separable(&self.backend, dst, src, &self.kernel_x, &self.kernel_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Parallel;
    use crate::filter::convolution::convolve_2d;
    use crate::filter::kernels::{self, Kernel2d};
    use edetect_image::ImageSize;

    #[test]
    fn test_separable_filter_f32() -> Result<(), FilterError> {
        let size = ImageSize {
            width: 5,
            height: 5,
        };

        #[rustfmt::skip]
        let img = Image::new(
            size,
            vec![
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ],
        )?;

        let mut dst = Image::from_size_val(img.size(), 0f32)?;
        let ones = Kernel1d::new(vec![1.0, 1.0, 1.0])?;
        SeparableFilter::<Cpu>::new(ones.clone(), ones).convolve(&mut dst, &img)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.to_vec(),
            &[
                0.0, 0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 1.0, 1.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 0.0, 0.0,
            ]
        );

        let xsum = dst.to_vec().iter().sum::<f32>();
        assert_eq!(xsum, 9.0);

        Ok(())
    }

    #[test]
    fn test_separable_border_is_zero_padded() -> Result<(), FilterError> {
        let img = Image::from_size_val([4, 4].into(), 1.0)?;
        let mut dst = Image::from_size_val(img.size(), 0.0)?;

        let ones = Kernel1d::new(vec![1.0, 1.0, 1.0])?;
        convolve_separable(&Cpu, &mut dst, &img, &ones, &ones)?;

        #[rustfmt::skip]
        assert_eq!(
            dst.to_vec(),
            &[
                4.0, 6.0, 6.0, 4.0,
                6.0, 9.0, 9.0, 6.0,
                6.0, 9.0, 9.0, 6.0,
                4.0, 6.0, 6.0, 4.0,
            ]
        );

        Ok(())
    }

    #[test]
    fn test_separable_matches_full_2d() -> Result<(), FilterError> {
        let size = [11, 7].into();
        let img = Image::new(size, (0..77).map(|x| ((x * 13) % 17) as f32 * 0.5).collect())?;

        let kernel_x = kernels::gaussian_kernel_1d(2)?;
        let kernel_y = Kernel1d::new(vec![0.5, -1.0, 2.0, 0.25, 1.0])?;

        let mut separable = Image::from_size_val(size, 0.0)?;
        SeparableFilter::new(kernel_x.clone(), kernel_y.clone())
            .with_backend(Parallel::new())
            .convolve(&mut separable, &img)?;

        let mut full = Image::from_size_val(size, 0.0)?;
        convolve_2d(&Cpu, &mut full, &img, &Kernel2d::from_outer(&kernel_x, &kernel_y)?)?;

        for (&a, &b) in separable.to_vec().iter().zip(full.to_vec().iter()) {
            approx::assert_relative_eq!(a, b, epsilon = 1e-4, max_relative = 1e-5);
        }

        Ok(())
    }

    #[test]
    fn test_separable_size_mismatch() -> Result<(), FilterError> {
        let img = Image::from_size_val([3, 3].into(), 1.0)?;
        let mut dst = Image::from_size_val([3, 2].into(), 0.0)?;
        let k = Kernel1d::identity();

        assert_eq!(
            convolve_separable(&Cpu, &mut dst, &img, &k, &k),
            Err(FilterError::InvalidImageSize(3, 3, 3, 2))
        );
        Ok(())
    }
}
