use edetect_image::Image;

use super::convolution::check_same_size;
use crate::backend::Backend;
use crate::error::FilterError;

/// Value written for an edge pixel.
pub const EDGE_VALUE: f32 = 1.0;

/// Default magnitude below which a response is treated as zero.
pub const DEFAULT_THRESHOLD: f32 = 1e-4;

const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// one offset per axis; the opposite neighbor is the negated offset
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    fn of(value: f32, threshold: f32) -> Self {
        if value > threshold {
            Sign::Positive
        } else if value < -threshold {
            Sign::Negative
        } else {
            Sign::Zero
        }
    }

    fn is_opposite(self, other: Sign) -> bool {
        matches!(
            (self, other),
            (Sign::Positive, Sign::Negative) | (Sign::Negative, Sign::Positive)
        )
    }
}

/// Check that a zero-crossing threshold is finite and not negative.
pub fn validate_threshold(threshold: f32) -> Result<(), FilterError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(FilterError::InvalidParameter(format!(
            "zero-crossing threshold must be finite and >= 0, got {threshold}"
        )));
    }
    Ok(())
}

/// Whether the response changes sign at `(row, col)`.
///
/// A pixel above the threshold (or below its negation) is a crossing when a
/// neighbor has the opposite sign and at least the same magnitude, so only the
/// pixel closer to zero is marked. A pixel inside the dead zone is a crossing
/// when the two neighbors along one axis have opposite signs. Pixels on the
/// image border are never crossings.
fn is_zero_crossing(response: &Image, row: usize, col: usize, threshold: f32) -> bool {
    if row == 0 || col == 0 || row + 1 >= response.rows() || col + 1 >= response.cols() {
        return false;
    }

    let at = |dr: isize, dc: isize| {
        let r = row.wrapping_add_signed(dr);
        let c = col.wrapping_add_signed(dc);
        response.row(r)[c]
    };

    let value = at(0, 0);
    let sign = Sign::of(value, threshold);

    match sign {
        Sign::Zero => AXES.iter().any(|&(dr, dc)| {
            Sign::of(at(-dr, -dc), threshold).is_opposite(Sign::of(at(dr, dc), threshold))
        }),
        _ => NEIGHBORS.iter().any(|&(dr, dc)| {
            let neighbor = at(dr, dc);
            sign.is_opposite(Sign::of(neighbor, threshold)) && neighbor.abs() >= value.abs()
        }),
    }
}

/// Mark the zero crossings of a filter response.
///
/// # Arguments
///
/// * `backend` - The execution backend.
/// * `dst` - Set to [`EDGE_VALUE`] on crossings and to 0 elsewhere.
/// * `response` - The filter response, same size as `dst`.
/// * `threshold` - Magnitude below which a response counts as zero.
pub fn zero_cross<B: Backend>(
    backend: &B,
    dst: &mut Image,
    response: &Image,
    threshold: f32,
) -> Result<(), FilterError> {
    check_same_size(dst, response)?;
    validate_threshold(threshold)?;

    backend.map_pixels(dst, |row, col, _| {
        if is_zero_crossing(response, row, col, threshold) {
            EDGE_VALUE
        } else {
            0.0
        }
    })
}

/// Overlay the zero crossings of a filter response onto an edge map.
///
/// Crossing pixels are raised to at least [`EDGE_VALUE`]; every other pixel
/// of `dst` keeps its value.
///
/// # Arguments
///
/// * `backend` - The execution backend.
/// * `dst` - The edge map to update.
/// * `response` - The filter response, same size as `dst`.
/// * `threshold` - Magnitude below which a response counts as zero.
pub fn merge_edges<B: Backend>(
    backend: &B,
    dst: &mut Image,
    response: &Image,
    threshold: f32,
) -> Result<(), FilterError> {
    check_same_size(dst, response)?;
    validate_threshold(threshold)?;

    backend.map_pixels(dst, |row, col, current| {
        if is_zero_crossing(response, row, col, threshold) {
            current.max(EDGE_VALUE)
        } else {
            current
        }
    })
}
