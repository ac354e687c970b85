use edetect_image::ImageError;
use thiserror::Error;

/// An error type for the filtering operations.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    /// The kernel radius is not supported.
    #[error("Invalid kernel radius {0}")]
    InvalidRadius(usize),

    /// The kernel weights do not match the kernel radius.
    #[error("Kernel of {0} weights does not match radius {1}")]
    InvalidKernelLength(usize, usize),

    /// A filter or backend parameter is invalid.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The destination image does not have the size of the source image.
    #[error("Image size mismatch: source is {0}x{1}, destination is {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// The execution backend could not acquire the resources for a pass.
    #[error("Backend failure: {0}")]
    BackendFailure(String),

    /// Error from the image buffer layer.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl FilterError {
    /// Returns true if the error comes from the filter configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRadius(_) | Self::InvalidKernelLength(..) | Self::InvalidParameter(_)
        )
    }
}
