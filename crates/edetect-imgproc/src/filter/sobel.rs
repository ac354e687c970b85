use edetect_image::Image;

use super::convolution::check_same_size;
use super::kernels::{sobel_derivative_kernel, sobel_smoothing_kernel, Kernel1d};
use super::separable_filter::convolve_separable;
use super::Filter;
use crate::backend::{Backend, Cpu};
use crate::error::FilterError;

/// Sobel gradient magnitude.
///
/// The horizontal gradient is the derivative kernel `[-1, 0, 1]` along rows and
/// the smoothing kernel `[1, 2, 1]` along columns, the vertical gradient swaps
/// the two. The output is `sqrt(vertical^2 + horizontal^2)`.
#[derive(Debug, Clone)]
pub struct SobelOperatorFilter<B = Cpu> {
    derivative: Kernel1d,
    smoothing: Kernel1d,
    backend: B,
}

impl<B: Backend> Default for SobelOperatorFilter<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> SobelOperatorFilter<B> {
    /// Create a sobel operator.
    pub fn new() -> Self {
        Self {
            derivative: sobel_derivative_kernel(),
            smoothing: sobel_smoothing_kernel(),
            backend: B::default(),
        }
    }

    /// Run the filter on the given backend instance.
    pub fn with_backend(mut self, backend: B) -> Self {
        self.backend = backend;
        self
    }

    /// Combine the two gradient images into the gradient magnitude.
    ///
    /// # Arguments
    ///
    /// * `vert` - The vertical gradient, overwritten with the magnitude.
    /// * `horz` - The horizontal gradient.
    pub fn compute_gradient(&self, vert: &mut Image, horz: &Image) -> Result<(), FilterError> {
        // errors report the size of `vert` first
        check_same_size(horz, vert)?;
        self.backend.map_pixels(vert, |row, col, v| {
            let h = horz.row(row)[col];
            (v * v + h * h).sqrt()
        })
    }
}

impl<B: Backend> Filter for SobelOperatorFilter<B> {
    fn apply(&mut self, dst: &mut Image, src: &Image) -> Result<(), FilterError> {
        check_same_size(dst, src)?;
        log::debug!("sobel: {} on {}", src.size(), self.backend.name());

        let mut horz = src
            .zeros_like()
            .map_err(|e| FilterError::BackendFailure(e.to_string()))?;

        convolve_separable(&self.backend, &mut horz, src, &self.derivative, &self.smoothing)?;
        convolve_separable(&self.backend, dst, src, &self.smoothing, &self.derivative)?;

        self.compute_gradient(dst, &horz)
    }
}
