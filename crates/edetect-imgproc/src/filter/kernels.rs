use crate::error::FilterError;

/// Largest kernel radius accepted by the kernel constructors.
pub const MAX_RADIUS: usize = 1024;

/// Ratio between the gaussian sigma and the kernel radius.
///
/// The kernel spans three standard deviations on each side of its center.
pub const SIGMA_PER_RADIUS: f32 = 1.0 / 3.0;

/// A one dimensional convolution kernel of `2 * radius + 1` weights.
///
/// The weight at index `radius` is aligned with the target pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel1d {
    radius: usize,
    weights: Vec<f32>,
}

impl Kernel1d {
    /// Create a kernel from its weights.
    ///
    /// # Errors
    ///
    /// The number of weights must be odd.
    pub fn new(weights: Vec<f32>) -> Result<Self, FilterError> {
        let radius = weights.len() / 2;
        if weights.len() % 2 == 0 {
            return Err(FilterError::InvalidKernelLength(weights.len(), radius));
        }
        validate_radius(radius)?;

        Ok(Self { radius, weights })
    }

    /// The kernel of radius 0 with a single unit weight.
    pub fn identity() -> Self {
        Self {
            radius: 0,
            weights: vec![1.0],
        }
    }

    /// Get the radius of the kernel.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Get the number of weights, `2 * radius + 1`.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false, a kernel holds at least one weight.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Get the weights of the kernel.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// A square two dimensional convolution kernel of `(2 * radius + 1)^2` weights.
///
/// Weights are stored row by row; the weight at `(radius, radius)` is aligned
/// with the target pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel2d {
    radius: usize,
    weights: Vec<f32>,
}

impl Kernel2d {
    /// Create a kernel from its radius and row-major weights.
    ///
    /// # Errors
    ///
    /// The number of weights must be `(2 * radius + 1)^2`.
    pub fn new(radius: usize, weights: Vec<f32>) -> Result<Self, FilterError> {
        validate_radius(radius)?;

        let side = 2 * radius + 1;
        if weights.len() != side * side {
            return Err(FilterError::InvalidKernelLength(weights.len(), radius));
        }

        Ok(Self { radius, weights })
    }

    /// Create the separable kernel `K[i][j] = kernel_y[i] * kernel_x[j]`.
    ///
    /// # Arguments
    ///
    /// * `kernel_x` - The horizontal (row) kernel.
    /// * `kernel_y` - The vertical (column) kernel.
    ///
    /// # Errors
    ///
    /// Both kernels must have the same radius.
    pub fn from_outer(kernel_x: &Kernel1d, kernel_y: &Kernel1d) -> Result<Self, FilterError> {
        if kernel_x.radius() != kernel_y.radius() {
            return Err(FilterError::InvalidKernelLength(
                kernel_y.len(),
                kernel_x.radius(),
            ));
        }

        let weights = kernel_y
            .weights()
            .iter()
            .flat_map(|&wy| kernel_x.weights().iter().map(move |&wx| wy * wx))
            .collect();

        Ok(Self {
            radius: kernel_x.radius(),
            weights,
        })
    }

    /// Get the radius of the kernel.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Get the side length of the kernel, `2 * radius + 1`.
    pub fn side(&self) -> usize {
        2 * self.radius + 1
    }

    /// Get the weights of a kernel row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.side()`.
    pub fn row(&self, row: usize) -> &[f32] {
        let side = self.side();
        &self.weights[row * side..(row + 1) * side]
    }

    /// Get all the weights, row by row.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// Check that a radius is supported by the kernel constructors.
///
/// # Errors
///
/// Returns [`FilterError::InvalidRadius`] if `radius > MAX_RADIUS`.
pub fn validate_radius(radius: usize) -> Result<(), FilterError> {
    if radius > MAX_RADIUS {
        return Err(FilterError::InvalidRadius(radius));
    }
    Ok(())
}

/// Get the gaussian sigma used for a kernel radius.
pub fn sigma_for_radius(radius: usize) -> f32 {
    radius as f32 * SIGMA_PER_RADIUS
}

/// Create a gaussian blur kernel.
///
/// The weights are `exp(-(i - radius)^2 / (2 * sigma^2))` normalized to sum
/// to one, with `sigma = radius / 3`.
///
/// # Arguments
///
/// * `radius` - The radius of the kernel. A radius of 0 gives the identity kernel.
///
/// # Returns
///
/// A kernel of `2 * radius + 1` weights.
pub fn gaussian_kernel_1d(radius: usize) -> Result<Kernel1d, FilterError> {
    validate_radius(radius)?;
    if radius == 0 {
        return Ok(Kernel1d::identity());
    }

    let sigma = sigma_for_radius(radius);
    let two_sigma_sq = 2.0 * sigma * sigma;

    // compute the kernel
    let mut weights = (0..2 * radius + 1)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-(x * x) / two_sigma_sq).exp()
        })
        .collect::<Vec<_>>();

    // normalize the kernel
    let norm = weights.iter().sum::<f32>();
    weights.iter_mut().for_each(|w| *w /= norm);

    Kernel1d::new(weights)
}

/// Create a square gaussian blur kernel, the outer product of [`gaussian_kernel_1d`].
pub fn gaussian_kernel_2d(radius: usize) -> Result<Kernel2d, FilterError> {
    let kernel = gaussian_kernel_1d(radius)?;
    Kernel2d::from_outer(&kernel, &kernel)
}

/// Create a Laplacian of Gaussian kernel.
///
/// The weights sample `((x^2 + y^2 - 2 sigma^2) / sigma^4) * exp(-(x^2 + y^2) / (2 sigma^2))`
/// with `sigma = radius / 3` and are shifted so that they sum to zero, hence a
/// constant image has no response. The center weight is negative.
///
/// # Errors
///
/// A radius of 0 has no Laplacian and is rejected.
pub fn laplacian_of_gaussian_kernel(radius: usize) -> Result<Kernel2d, FilterError> {
    validate_radius(radius)?;
    if radius == 0 {
        return Err(FilterError::InvalidRadius(radius));
    }

    let sigma = sigma_for_radius(radius);
    let sigma_sq = sigma * sigma;
    let r = radius as isize;

    let mut weights = Vec::with_capacity((2 * radius + 1) * (2 * radius + 1));
    for y in -r..=r {
        for x in -r..=r {
            let rr = (x * x + y * y) as f32;
            weights.push((rr - 2.0 * sigma_sq) / (sigma_sq * sigma_sq) * (-rr / (2.0 * sigma_sq)).exp());
        }
    }

    let mean = weights.iter().sum::<f32>() / weights.len() as f32;
    weights.iter_mut().for_each(|w| *w -= mean);

    Kernel2d::new(radius, weights)
}

/// Create a box blur kernel with weights summing to one.
pub fn box_kernel_1d(radius: usize) -> Result<Kernel1d, FilterError> {
    validate_radius(radius)?;
    let len = 2 * radius + 1;
    Kernel1d::new(vec![1.0 / len as f32; len])
}

/// The sobel derivative kernel, `[-1, 0, 1]`.
pub fn sobel_derivative_kernel() -> Kernel1d {
    Kernel1d {
        radius: 1,
        weights: vec![-1.0, 0.0, 1.0],
    }
}

/// The sobel smoothing kernel, `[1, 2, 1]`.
pub fn sobel_smoothing_kernel() -> Kernel1d {
    Kernel1d {
        radius: 1,
        weights: vec![1.0, 2.0, 1.0],
    }
}
