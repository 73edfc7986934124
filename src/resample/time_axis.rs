//! # Time axis normalization
//!
//! Second resampling stage: the depth-normalized image (one row per ping) is resampled
//! onto `2·R` uniformly spaced times over `[min(t), max(t)]`. Each depth column is
//! interpolated independently with nearest-neighbor interpolation and extrapolation;
//! since the nearest source ping of a target time does not depend on the column, the
//! source row index is computed once per target time and whole rows are gathered.
use itertools::Itertools;
use nalgebra::DMatrix;

use super::{linspace, nearest_index, BackscatterGrid};
use crate::constants::{Meter, MJD, OVERSAMPLING};
use crate::echogrid_errors::EchogridError;
use crate::pings::Backscatter;

/// Uniform time axis of `2·times.len()` points over the span of `times`.
pub fn uniform_time_axis(times: &[MJD]) -> Vec<MJD> {
    let (start, stop) = times
        .iter()
        .copied()
        .minmax_by(|a, b| a.total_cmp(b))
        .into_option()
        .unwrap_or((0.0, 0.0));
    linspace(start, stop, OVERSAMPLING * times.len())
}

/// For every target time, the row of the nearest source ping.
///
/// `times` does not need to be sorted: the pings are ordered by time before the search,
/// equal times keeping their acquisition order.
pub fn nearest_rows(times: &[MJD], target: &[MJD]) -> Vec<usize> {
    let order = (0..times.len())
        .sorted_by(|&a, &b| times[a].total_cmp(&times[b]))
        .collect::<Vec<usize>>();
    let sorted = order.iter().map(|&i| times[i]).collect::<Vec<MJD>>();

    target
        .iter()
        .map(|&t| order[nearest_index(&sorted, t)])
        .collect()
}

/// Resample a depth-normalized image onto a uniform, oversampled time axis.
///
/// Arguments
/// -----------------
/// * `times`: repaired ping times (MJD), one per row of `matrix`.
/// * `depth_axis`: depth axis of the columns of `matrix`.
/// * `matrix`: one row per ping, one column per depth.
///
/// Return
/// ----------
/// * A [`BackscatterGrid`] with `2·R` rows and the unchanged depth axis.
///
/// Errors
/// ----------
/// * [`EchogridError::NoPings`] if `times` is empty.
/// * [`EchogridError::ShapeMismatch`] if `matrix` does not have one row per time and one
///   column per depth.
pub fn normalize_time_axis(
    times: &[MJD],
    depth_axis: Vec<Meter>,
    matrix: &DMatrix<Backscatter>,
) -> Result<BackscatterGrid, EchogridError> {
    if times.is_empty() {
        return Err(EchogridError::NoPings);
    }
    if matrix.nrows() != times.len() || matrix.ncols() != depth_axis.len() {
        return Err(EchogridError::ShapeMismatch(format!(
            "image is {}x{} but there are {} ping times and {} depths",
            matrix.nrows(),
            matrix.ncols(),
            times.len(),
            depth_axis.len()
        )));
    }

    let time_axis = uniform_time_axis(times);
    let rows = nearest_rows(times, &time_axis);
    let resampled = DMatrix::from_fn(time_axis.len(), depth_axis.len(), |r, c| {
        matrix[(rows[r], c)]
    });

    Ok(BackscatterGrid {
        time_axis,
        depth_axis,
        matrix: resampled,
    })
}
