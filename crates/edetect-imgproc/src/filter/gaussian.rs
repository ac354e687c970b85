use edetect_image::Image;

use super::generated::{GaussianKernel, GeneratedKernel};
use super::kernels::{validate_radius, Kernel1d};
use super::separable_filter::convolve_separable;
use super::Filter;
use crate::backend::{Backend, Cpu};
use crate::error::FilterError;

/// Gaussian blur with `sigma = radius / 3`, run as two separable passes.
///
/// The kernel is generated lazily and cached until the radius changes.
/// A radius of 0 copies the source into the destination.
#[derive(Debug, Clone)]
pub struct GaussianBlurFilter<B = Cpu> {
    radius: usize,
    kernel: GeneratedKernel<GaussianKernel>,
    backend: B,
}

impl<B: Backend> GaussianBlurFilter<B> {
    /// Create a gaussian blur of the given radius.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRadius`] if the radius is too large.
    pub fn new(radius: usize) -> Result<Self, FilterError> {
        validate_radius(radius)?;
        Ok(Self {
            radius,
            kernel: GeneratedKernel::new(GaussianKernel),
            backend: B::default(),
        })
    }

    /// Run the filter on the given backend instance.
    pub fn with_backend(mut self, backend: B) -> Self {
        self.backend = backend;
        self
    }

    /// Get the blur radius.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Change the blur radius; the kernel is rebuilt on the next use.
    pub fn set_radius(&mut self, radius: usize) -> Result<(), FilterError> {
        validate_radius(radius)?;
        self.radius = radius;
        Ok(())
    }

    /// Get the kernel for the current radius.
    pub fn kernel(&mut self) -> Result<&Kernel1d, FilterError> {
        self.kernel.get(self.radius)
    }
}

impl<B: Backend> Filter for GaussianBlurFilter<B> {
    fn apply(&mut self, dst: &mut Image, src: &Image) -> Result<(), FilterError> {
        let kernel = self.kernel.get(self.radius)?;
        log::debug!(
            "gaussian blur: radius {} on {}",
            self.radius,
            self.backend.name()
        );
        convolve_separable(&self.backend, dst, src, kernel, kernel)
    }
}
