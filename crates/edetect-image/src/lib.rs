#![deny(missing_docs)]
//! Strided single-channel image buffers for edge detection

/// image representation for filtering purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// image conversion operations.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize, SAMPLE_SIZE};
