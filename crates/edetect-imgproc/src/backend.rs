use std::sync::Arc;

use edetect_image::Image;
use rayon::prelude::*;

use crate::error::FilterError;

/// An execution backend for per-pixel image passes.
///
/// A backend decides how the pixels of one pass are scheduled. Every pixel
/// of the destination is written exactly once, the order is unobservable and
/// the call returns only after the whole pass is complete.
///
/// Filters are generic over the backend, so the choice is made when the
/// filter type is assembled and costs no dynamic dispatch.
pub trait Backend: Clone + std::fmt::Debug + Default + Send + Sync {
    /// Short name of the backend, used in logs.
    fn name(&self) -> &'static str;

    /// Write every pixel of `dst` with the value returned by `op`.
    ///
    /// # Arguments
    ///
    /// * `dst` - The image to write.
    /// * `op` - Computes a pixel from its `(row, col)` and its current value.
    ///
    /// `op` must be a pure function of its arguments and of data not aliased by `dst`.
    fn map_pixels<F>(&self, dst: &mut Image, op: F) -> Result<(), FilterError>
    where
        F: Fn(usize, usize, f32) -> f32 + Send + Sync;
}

/// Run passes sequentially on the current thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cpu;

impl Backend for Cpu {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn map_pixels<F>(&self, dst: &mut Image, op: F) -> Result<(), FilterError>
    where
        F: Fn(usize, usize, f32) -> f32 + Send + Sync,
    {
        dst.rows_iter_mut().enumerate().for_each(|(r, row)| {
            row.iter_mut()
                .enumerate()
                .for_each(|(c, px)| *px = op(r, c, *px));
        });
        Ok(())
    }
}

/// Run passes data-parallel with rayon, one work item per image row.
///
/// Uses the global rayon thread pool unless built with [`Parallel::with_threads`].
#[derive(Debug, Clone, Default)]
pub struct Parallel {
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Parallel {
    /// Create a backend running on the global rayon thread pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend running on a dedicated pool of `num_threads` threads.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameter`] if `num_threads` is zero and
    /// [`FilterError::BackendFailure`] if the thread pool cannot be built.
    pub fn with_threads(num_threads: usize) -> Result<Self, FilterError> {
        if num_threads == 0 {
            return Err(FilterError::InvalidParameter(format!(
                "thread count must be > 0, got {num_threads}"
            )));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| FilterError::BackendFailure(e.to_string()))?;

        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }

    /// Number of worker threads the passes run on.
    pub fn num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl Backend for Parallel {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn map_pixels<F>(&self, dst: &mut Image, op: F) -> Result<(), FilterError>
    where
        F: Fn(usize, usize, f32) -> f32 + Send + Sync,
    {
        let run = |dst: &mut Image| {
            dst.par_rows_mut().enumerate().for_each(|(r, row)| {
                row.iter_mut()
                    .enumerate()
                    .for_each(|(c, px)| *px = op(r, c, *px));
            });
        };

        match &self.pool {
            Some(pool) => pool.install(|| run(dst)),
            None => run(dst),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_image<B: Backend>(backend: &B) -> Result<Image, FilterError> {
        let mut dst = Image::from_size_val_with_stride([3, 2].into(), 16, 1.0)?;
        backend.map_pixels(&mut dst, |r, c, v| v + (r * 10 + c) as f32)?;
        Ok(dst)
    }

    #[test]
    fn test_map_pixels_cpu() -> Result<(), FilterError> {
        let dst = index_image(&Cpu)?;
        assert_eq!(dst.to_vec(), vec![1.0, 2.0, 3.0, 11.0, 12.0, 13.0]);
        Ok(())
    }

    #[test]
    fn test_map_pixels_parallel() -> Result<(), FilterError> {
        let dst = index_image(&Parallel::new())?;
        assert_eq!(dst.to_vec(), vec![1.0, 2.0, 3.0, 11.0, 12.0, 13.0]);
        Ok(())
    }

    #[test]
    fn test_map_pixels_fixed_threads() -> Result<(), FilterError> {
        let backend = Parallel::with_threads(2)?;
        assert_eq!(backend.num_threads(), 2);
        let dst = index_image(&backend)?;
        assert_eq!(dst.to_vec(), vec![1.0, 2.0, 3.0, 11.0, 12.0, 13.0]);
        Ok(())
    }

    #[test]
    fn test_fixed_threads_invalid() {
        let res = Parallel::with_threads(0);
        assert!(matches!(res, Err(FilterError::InvalidParameter(_))));
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(Cpu.name(), "cpu");
        assert_eq!(Parallel::new().name(), "parallel");
    }
}
