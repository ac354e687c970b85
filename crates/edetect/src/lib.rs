#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use edetect_image as image;

#[doc(inline)]
pub use edetect_imgproc as imgproc;
