#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// execution backends module.
pub mod backend;

/// error types of the filtering operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// operations to normalize images.
pub mod normalize;

pub use backend::{Backend, Cpu, Parallel};
pub use error::FilterError;
pub use filter::Filter;
