use super::kernels::{self, Kernel1d, Kernel2d};
use crate::error::FilterError;

/// Builds a convolution kernel from a radius.
pub trait KernelGenerator {
    /// The kernel type produced by the generator.
    type Kernel: Clone + std::fmt::Debug + Send + Sync;

    /// Generate the kernel for the given radius.
    fn generate(&self, radius: usize) -> Result<Self::Kernel, FilterError>;
}

/// Generates normalized gaussian blur kernels, see [`kernels::gaussian_kernel_1d`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianKernel;

impl KernelGenerator for GaussianKernel {
    type Kernel = Kernel1d;

    fn generate(&self, radius: usize) -> Result<Kernel1d, FilterError> {
        kernels::gaussian_kernel_1d(radius)
    }
}

/// Generates Laplacian of Gaussian kernels, see [`kernels::laplacian_of_gaussian_kernel`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LaplacianOfGaussianKernel;

impl KernelGenerator for LaplacianOfGaussianKernel {
    type Kernel = Kernel2d;

    fn generate(&self, radius: usize) -> Result<Kernel2d, FilterError> {
        kernels::laplacian_of_gaussian_kernel(radius)
    }
}

/// A kernel cached by the radius it was generated for.
///
/// The kernel is regenerated only when a different radius is requested.
/// A failed generation leaves the previous cache entry untouched.
#[derive(Debug, Clone, Default)]
pub struct GeneratedKernel<G: KernelGenerator> {
    generator: G,
    cache: Option<(usize, G::Kernel)>,
    generations: usize,
}

impl<G: KernelGenerator> GeneratedKernel<G> {
    /// Create an empty cache around a generator.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            cache: None,
            generations: 0,
        }
    }

    /// The radius of the cached kernel, if any.
    pub fn cached_radius(&self) -> Option<usize> {
        self.cache.as_ref().map(|(radius, _)| *radius)
    }

    /// Number of kernels generated so far.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Get the kernel for `radius`, generating it on a cache miss.
    ///
    /// # Arguments
    ///
    /// * `radius` - The requested kernel radius.
    ///
    /// # Returns
    ///
    /// A reference to the cached kernel.
    pub fn get(&mut self, radius: usize) -> Result<&G::Kernel, FilterError> {
        if self.cached_radius() != Some(radius) {
            log::debug!("generating kernel of radius {radius}");
            let kernel = self.generator.generate(radius)?;
            self.cache = Some((radius, kernel));
            self.generations += 1;
        }

        self.cache
            .as_ref()
            .map(|(_, kernel)| kernel)
            .ok_or(FilterError::InvalidRadius(radius))
    }
}
