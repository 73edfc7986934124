//! # Echogram resampling
//!
//! Raw pings do not share a common sampling: the range covered by each ping, the number
//! of samples and the time between pings all vary along a file. This module turns a
//! sequence of pings into a [`BackscatterGrid`] whose two axes are uniform:
//!
//! 1. [`range_axis`] resamples every ping onto one depth axis of `2·S_max` points,
//! 2. [`time_axis`] resamples the resulting image onto one time axis of `2·R` points.
//!
//! Both stages use the same primitive: **nearest-neighbor interpolation with
//! extrapolation** ([`nearest_index`]). Target points outside the source domain take the
//! value of the nearest endpoint, so the output never contains holes introduced by the
//! resampling itself.
//!
//! ## See also
//! * [`crate::pipeline::EchogramPipeline`] – runs both stages after timestamp repair.
pub mod range_axis;
pub mod time_axis;

use nalgebra::DMatrix;

use crate::constants::{Meter, MJD};
use crate::pings::Backscatter;

/// Regularized echogram.
///
/// Fields
/// -----------------
/// * `time_axis` – uniform ping times (MJD, UTC days), one per matrix row.
/// * `depth_axis` – uniform depths (meters), one per matrix column.
/// * `matrix` – backscatter samples, rows = time, columns = depth.
///
/// The matrix dimensions always equal `(time_axis.len(), depth_axis.len())`.
#[derive(Debug, Clone, PartialEq)]
pub struct BackscatterGrid {
    pub time_axis: Vec<MJD>,
    pub depth_axis: Vec<Meter>,
    pub matrix: DMatrix<Backscatter>,
}

impl BackscatterGrid {
    pub fn n_times(&self) -> usize {
        self.time_axis.len()
    }

    pub fn n_depths(&self) -> usize {
        self.depth_axis.len()
    }

    /// Sample at grid row `time` and column `depth`.
    pub fn at(&self, time: usize, depth: usize) -> Backscatter {
        self.matrix[(time, depth)]
    }
}

/// `n` evenly spaced points from `start` to `stop`, both included.
///
/// With `n == 1` the single point is `stop`; with `n == 0` the result is empty.
/// The last point is set to `stop` exactly.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![stop],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut points = (0..n).map(|i| start + step * i as f64).collect::<Vec<f64>>();
            points[n - 1] = stop;
            points
        }
    }
}

/// Index of the point of `axis` nearest to `x`.
///
/// `axis` must be sorted in ascending order and non-empty. Values below the first point
/// map to index 0, values above the last point map to the last index; an exact tie
/// between two neighbors resolves to the upper one. When `axis` contains repeated
/// values, the first of them is returned.
///
/// Arguments
/// -----------------
/// * `axis`: ascending source axis.
/// * `x`: query position.
///
/// Return
/// ----------
/// * An index into `axis`.
pub fn nearest_index(axis: &[f64], x: f64) -> usize {
    let upper = axis.partition_point(|&v| v < x);
    if upper == 0 {
        return 0;
    }
    if upper == axis.len() {
        return axis.len() - 1;
    }

    let lower = upper - 1;
    if x - axis[lower] < axis[upper] - x {
        lower
    } else {
        upper
    }
}

/// Resample `values`, defined on `source`, onto `target` with nearest-neighbor
/// interpolation and extrapolation.
///
/// `source` must be ascending and have the same length as `values`; an empty source
/// yields an empty output.
pub fn nearest_resample<T: Copy>(source: &[f64], values: &[T], target: &[f64]) -> Vec<T> {
    if source.is_empty() || values.is_empty() {
        return Vec::new();
    }
    target
        .iter()
        .map(|&x| values[nearest_index(source, x)])
        .collect()
}
