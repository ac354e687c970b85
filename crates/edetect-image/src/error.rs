/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when one of the image dimensions is zero.
    #[error("Image dimensions must be non-zero")]
    EmptyImage,

    /// Error when the row stride cannot hold a row or is not a whole number of samples.
    #[error("Invalid stride {stride} bytes, expected a multiple of 4 and at least {min} bytes")]
    InvalidStride {
        /// The requested stride in bytes.
        stride: usize,
        /// The minimum stride in bytes for the image width.
        min: usize,
    },

    /// Error when two images do not have the same size.
    #[error("Image size mismatch: source is {0}x{1}, destination is {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a pixel index is out of bounds.
    #[error("Pixel ({0}, {1}) is out of bounds for an image of {2} rows and {3} columns")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the sample storage cannot be allocated.
    #[error("Failed to allocate {0} bytes of image storage")]
    AllocationFailed(usize),

    /// Error when a pixel value cannot be cast to the requested type.
    #[error("Failed to cast image data")]
    CastError,
}
