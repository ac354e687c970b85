//! Filter operations
//!
//! Convolutions with zero padded borders, gaussian blur, the sobel operator
//! and the Marr-Hildreth edge detector. Every operation writes a destination
//! image of the size of its source and is generic over the execution
//! [`Backend`](crate::backend::Backend).

use edetect_image::Image;

use crate::error::FilterError;

/// Filter kernels
pub mod kernels;

/// Kernel generators and the per radius kernel cache
pub mod generated;

/// Convolution operations
mod convolution;
pub use convolution::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;

mod gaussian;
pub use gaussian::GaussianBlurFilter;

mod sobel;
pub use sobel::SobelOperatorFilter;

/// Zero-crossing detection
pub mod zero_cross;

mod marr_hildreth;
pub use marr_hildreth::{MarrHildrethConfig, MarrHildrethOperatorFilter};

/// An image filter that may keep state between calls, such as cached kernels.
pub trait Filter {
    /// Filter `src` into `dst`.
    ///
    /// # Errors
    ///
    /// Fails if `dst` and `src` differ in size or the filter parameters are invalid.
    fn apply(&mut self, dst: &mut Image, src: &Image) -> Result<(), FilterError>;
}
