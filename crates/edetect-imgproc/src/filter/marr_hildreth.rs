use edetect_image::Image;

use super::convolution::{check_same_size, convolve_2d};
use super::generated::{GeneratedKernel, LaplacianOfGaussianKernel};
use super::kernels::{validate_radius, Kernel2d};
use super::zero_cross::{self, validate_threshold, DEFAULT_THRESHOLD};
use super::Filter;
use crate::backend::{Backend, Cpu};
use crate::error::FilterError;

/// Parameters of the Marr-Hildreth edge detector.
///
/// The detector runs once per radius in `radius_min..=radius_max`, stepping
/// by `radius_step`, and keeps the union of the edges found at every scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarrHildrethConfig {
    /// Smallest Laplacian of Gaussian radius.
    pub radius_min: usize,
    /// Largest Laplacian of Gaussian radius.
    pub radius_max: usize,
    /// Step between two radii.
    pub radius_step: usize,
    /// Magnitude below which a response counts as zero.
    pub threshold: f32,
}

impl MarrHildrethConfig {
    /// A single scale configuration.
    pub fn new(radius: usize) -> Self {
        Self {
            radius_min: radius,
            radius_max: radius,
            radius_step: 1,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Run the detector over a range of radii.
    pub fn with_radius_range(mut self, radius_min: usize, radius_max: usize, radius_step: usize) -> Self {
        self.radius_min = radius_min;
        self.radius_max = radius_max;
        self.radius_step = radius_step;
        self
    }

    /// Set the zero-crossing threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRadius`] for a zero or too large radius and
    /// [`FilterError::InvalidParameter`] for an empty range, a zero step or a
    /// bad threshold.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.radius_min == 0 {
            return Err(FilterError::InvalidRadius(0));
        }
        validate_radius(self.radius_max)?;
        if self.radius_min > self.radius_max {
            return Err(FilterError::InvalidParameter(format!(
                "radius range {}..={} is empty",
                self.radius_min, self.radius_max
            )));
        }
        if self.radius_step == 0 {
            return Err(FilterError::InvalidParameter(
                "radius step must be > 0".to_string(),
            ));
        }
        validate_threshold(self.threshold)
    }

    /// The radii the detector runs at, in increasing order.
    pub fn radii(&self) -> impl Iterator<Item = usize> {
        (self.radius_min..=self.radius_max).step_by(self.radius_step.max(1))
    }
}

/// Marr-Hildreth edge detector.
///
/// Convolves the source with a Laplacian of Gaussian kernel and marks the
/// zero crossings of the response. The destination holds 1.0 on edges and 0.0
/// elsewhere; the one pixel border ring is never an edge.
///
/// Each scale of the configuration owns its kernel cache, so a kernel is
/// generated once per filter and reused by every later call.
#[derive(Debug, Clone)]
pub struct MarrHildrethOperatorFilter<B = Cpu> {
    config: MarrHildrethConfig,
    // one cache per radius of `config.radii()`, in the same order
    kernels: Vec<GeneratedKernel<LaplacianOfGaussianKernel>>,
    backend: B,
}

fn scale_kernels(config: &MarrHildrethConfig) -> Vec<GeneratedKernel<LaplacianOfGaussianKernel>> {
    config
        .radii()
        .map(|_| GeneratedKernel::new(LaplacianOfGaussianKernel))
        .collect()
}

impl<B: Backend> MarrHildrethOperatorFilter<B> {
    /// Create a single scale detector.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidRadius`] if `radius` is 0 or too large.
    pub fn new(radius: usize) -> Result<Self, FilterError> {
        Self::with_config(MarrHildrethConfig::new(radius))
    }

    /// Create a detector from a validated configuration.
    pub fn with_config(config: MarrHildrethConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self {
            kernels: scale_kernels(&config),
            config,
            backend: B::default(),
        })
    }

    /// Run the filter on the given backend instance.
    pub fn with_backend(mut self, backend: B) -> Self {
        self.backend = backend;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &MarrHildrethConfig {
        &self.config
    }

    /// Switch to a single scale of the given radius, keeping the threshold.
    pub fn set_radius(&mut self, radius: usize) -> Result<(), FilterError> {
        let config = MarrHildrethConfig::new(radius).with_threshold(self.config.threshold);
        config.validate()?;
        self.kernels = scale_kernels(&config);
        self.config = config;
        Ok(())
    }

    /// Get the kernel of the smallest radius.
    pub fn kernel(&mut self) -> Result<&Kernel2d, FilterError> {
        let radius = self.config.radius_min;
        match self.kernels.first_mut() {
            Some(kernel) => kernel.get(radius),
            None => Err(FilterError::InvalidRadius(radius)),
        }
    }

    /// Overlay the zero crossings of `response` onto the edge map `dst`.
    ///
    /// See [`zero_cross::merge_edges`].
    pub fn merge_edges(&self, dst: &mut Image, response: &Image) -> Result<(), FilterError> {
        zero_cross::merge_edges(&self.backend, dst, response, self.config.threshold)
    }
}

impl<B: Backend> Filter for MarrHildrethOperatorFilter<B> {
    fn apply(&mut self, dst: &mut Image, src: &Image) -> Result<(), FilterError> {
        check_same_size(dst, src)?;

        let mut response = src
            .zeros_like()
            .map_err(|e| FilterError::BackendFailure(e.to_string()))?;

        dst.fill(0.0);
        for (radius, kernel) in self.config.radii().zip(self.kernels.iter_mut()) {
            log::debug!("marr-hildreth: radius {radius} on {}", self.backend.name());
            convolve_2d(&self.backend, &mut response, src, kernel.get(radius)?)?;
            zero_cross::merge_edges(&self.backend, dst, &response, self.config.threshold)?;
        }

        Ok(())
    }
}
