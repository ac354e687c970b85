use std::ops::Range;

use edetect_image::Image;

use super::kernels::{Kernel1d, Kernel2d};
use crate::backend::{Backend, Cpu};
use crate::error::FilterError;

/// A convolution of a source image into a destination image of the same size.
///
/// Kernel taps reading outside the source image are left out of the weighted
/// sum, as if the image were surrounded by zeros. The destination must be a
/// distinct image; nothing is written if its size differs from the source.
pub trait Convolve {
    /// Convolve `src` into `dst`.
    fn convolve(&self, dst: &mut Image, src: &Image) -> Result<(), FilterError>;
}

/// Range of kernel taps whose samples fall inside `[0, len)` for the output at `pos`.
///
/// Tap `k` reads the sample at `pos + k - radius`.
pub(crate) fn valid_taps(pos: usize, radius: usize, len: usize) -> Range<usize> {
    let start = radius.saturating_sub(pos);
    let end = (2 * radius + 1).min(len + radius - pos);
    start..end
}

/// Check that the destination has the size of the source.
pub(crate) fn check_same_size(dst: &Image, src: &Image) -> Result<(), FilterError> {
    if src.size() != dst.size() {
        return Err(FilterError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Apply a full 2D convolution to an image.
///
/// Computes `dst[r][c] = sum(src[r + i - radius][c + j - radius] * kernel[i][j])`
/// over the taps that fall inside the image.
///
/// # Arguments
///
/// * `backend` - The execution backend.
/// * `dst` - The destination image, same size as `src`.
/// * `src` - The source image.
/// * `kernel` - The square kernel.
pub fn convolve_2d<B: Backend>(
    backend: &B,
    dst: &mut Image,
    src: &Image,
    kernel: &Kernel2d,
) -> Result<(), FilterError> {
    check_same_size(dst, src)?;

    let radius = kernel.radius();
    log::trace!(
        "convolve_2d: radius {radius} over {} on {}",
        src.size(),
        backend.name()
    );

    backend.map_pixels(dst, |row, col, _| {
        let taps_y = valid_taps(row, radius, src.rows());
        let Range { start, end } = valid_taps(col, radius, src.cols());

        let mut acc = 0.0f32;
        for i in taps_y {
            let src_row = &src.row(row + i - radius)[col + start - radius..col + end - radius];
            for (&s, &k) in src_row.iter().zip(&kernel.row(i)[start..end]) {
                acc += s * k;
            }
        }
        acc
    })
}

/// Convolve each row of an image with a 1D kernel (horizontal pass).
///
/// Taps are clipped on the column axis only.
pub fn convolve_rows<B: Backend>(
    backend: &B,
    dst: &mut Image,
    src: &Image,
    kernel: &Kernel1d,
) -> Result<(), FilterError> {
    check_same_size(dst, src)?;

    let radius = kernel.radius();
    let weights = kernel.weights();
    log::trace!(
        "convolve_rows: radius {radius} over {} on {}",
        src.size(),
        backend.name()
    );

    backend.map_pixels(dst, |row, col, _| {
        let Range { start, end } = valid_taps(col, radius, src.cols());
        src.row(row)[col + start - radius..col + end - radius]
            .iter()
            .zip(&weights[start..end])
            .fold(0.0f32, |acc, (&s, &k)| acc + s * k)
    })
}

/// Convolve each column of an image with a 1D kernel (vertical pass).
///
/// Taps are clipped on the row axis only.
pub fn convolve_columns<B: Backend>(
    backend: &B,
    dst: &mut Image,
    src: &Image,
    kernel: &Kernel1d,
) -> Result<(), FilterError> {
    check_same_size(dst, src)?;

    let radius = kernel.radius();
    let weights = kernel.weights();
    log::trace!(
        "convolve_columns: radius {radius} over {} on {}",
        src.size(),
        backend.name()
    );

    backend.map_pixels(dst, |row, col, _| {
        valid_taps(row, radius, src.rows()).fold(0.0f32, |acc, i| {
            acc + src.row(row + i - radius)[col] * weights[i]
        })
    })
}

/// A full 2D convolution with a fixed square kernel.
#[derive(Debug, Clone)]
pub struct ConvolutionFilter<B = Cpu> {
    kernel: Kernel2d,
    backend: B,
}

impl<B: Backend> ConvolutionFilter<B> {
    /// Create a filter running on the default instance of the backend.
    pub fn new(kernel: Kernel2d) -> Self {
        Self {
            kernel,
            backend: B::default(),
        }
    }

    /// Run the filter on the given backend instance.
    pub fn with_backend(mut self, backend: B) -> Self {
        self.backend = backend;
        self
    }

    /// Get the kernel of the filter.
    pub fn kernel(&self) -> &Kernel2d {
        &self.kernel
    }
}

impl<B: Backend> Convolve for ConvolutionFilter<B> {
    fn convolve(&self, dst: &mut Image, src: &Image) -> Result<(), FilterError> {
        convolve_2d(&self.backend, dst, src, &self.kernel)
    }
}

/// A horizontal 1D convolution with a fixed kernel.
#[derive(Debug, Clone)]
pub struct RowConvolutionFilter<B = Cpu> {
    kernel: Kernel1d,
    backend: B,
}

impl<B: Backend> RowConvolutionFilter<B> {
    /// Create a filter running on the default instance of the backend.
    pub fn new(kernel: Kernel1d) -> Self {
        Self {
            kernel,
            backend: B::default(),
        }
    }

    /// Run the filter on the given backend instance.
    pub fn with_backend(mut self, backend: B) -> Self {
        self.backend = backend;
        self
    }

    /// Get the kernel of the filter.
    pub fn kernel(&self) -> &Kernel1d {
        &self.kernel
    }
}

impl<B: Backend> Convolve for RowConvolutionFilter<B> {
    fn convolve(&self, dst: &mut Image, src: &Image) -> Result<(), FilterError> {
        convolve_rows(&self.backend, dst, src, &self.kernel)
    }
}

/// A vertical 1D convolution with a fixed kernel.
#[derive(Debug, Clone)]
pub struct ColumnConvolutionFilter<B = Cpu> {
    kernel: Kernel1d,
    backend: B,
}

impl<B: Backend> ColumnConvolutionFilter<B> {
    /// Create a filter running on the default instance of the backend.
    pub fn new(kernel: Kernel1d) -> Self {
        Self {
            kernel,
            backend: B::default(),
        }
    }

    /// Run the filter on the given backend instance.
    pub fn with_backend(mut self, backend: B) -> Self {
        self.backend = backend;
        self
    }

    /// Get the kernel of the filter.
    pub fn kernel(&self) -> &Kernel1d {
        &self.kernel
    }
}

impl<B: Backend> Convolve for ColumnConvolutionFilter<B> {
    fn convolve(&self, dst: &mut Image, src: &Image) -> Result<(), FilterError> {
        convolve_columns(&self.backend, dst, src, &self.kernel)
    }
}
