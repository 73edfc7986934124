//! # Bathymetric fallback
//!
//! When a file carries no detected bottom line, the bottom is estimated from a gridded
//! bathymetry product indexed by latitude and longitude.
//!
//! ## Overview
//!
//! - [`BathymetryProvider`] – anything able to answer "how deep is it here".
//! - [`BathymetryGrid`] – an in-memory grid, rows = latitude, columns = longitude.
//! - [`grid_reader`] – loads a grid from a `latitude,longitude,depth` CSV file.
//!
//! ## Lookup rule
//!
//! The grid is a western-hemisphere product: the query longitude is forced negative
//! (`lon = −|lon|`) before the lookup. On each axis, the candidate cells are those whose
//! coordinate is greater than or equal to the query, taken in axis order; for a positive
//! query the last candidate is used, otherwise the first. The depth is returned as a
//! positive number of meters.
//!
//! A lookup yields `NaN` when:
//! * the position is the no-fix sentinel (`lat == 999`, or `lon == −999` once forced
//!   west) or `NaN`,
//! * the query lies outside the span of either axis,
//! * the selected cell is `0` or `NaN`.
pub mod grid_reader;

use nalgebra::DMatrix;

use crate::constants::{Degree, Meter};
use crate::echogrid_errors::EchogridError;
use crate::pings::{is_position_fix, PingRecord};

/// Source of estimated water depth at a position.
pub trait BathymetryProvider {
    /// Positive depth in meters at (`latitude`, `longitude`), `NaN` when unknown.
    fn estimate_depth(&self, latitude: Degree, longitude: Degree) -> Meter;

    /// Estimated depth under every ping.
    fn estimate_bottom(&self, pings: &[PingRecord]) -> Vec<Meter> {
        pings
            .iter()
            .map(|p| self.estimate_depth(p.latitude, p.longitude))
            .collect()
    }
}

/// Gridded bathymetry.
///
/// Fields
/// -----------------
/// * `lat_axis` – latitude of each row, decimal degrees.
/// * `lon_axis` – longitude of each column, decimal degrees.
/// * `depth` – elevation or depth values (the sign is dropped on lookup).
#[derive(Debug, Clone, PartialEq)]
pub struct BathymetryGrid {
    lat_axis: Vec<Degree>,
    lon_axis: Vec<Degree>,
    depth: DMatrix<f64>,
}

impl BathymetryGrid {
    /// Build a grid from its axes and values.
    ///
    /// Errors
    /// ----------
    /// * [`EchogridError::InvalidBathymetryGrid`] if an axis is empty or not finite, or if
    ///   `depth` is not `lat_axis.len() × lon_axis.len()`.
    pub fn new(
        lat_axis: Vec<Degree>,
        lon_axis: Vec<Degree>,
        depth: DMatrix<f64>,
    ) -> Result<Self, EchogridError> {
        if lat_axis.is_empty() || lon_axis.is_empty() {
            return Err(EchogridError::InvalidBathymetryGrid(
                "empty latitude or longitude axis".into(),
            ));
        }
        if lat_axis.iter().chain(&lon_axis).any(|v| !v.is_finite()) {
            return Err(EchogridError::InvalidBathymetryGrid(
                "axis coordinates must be finite".into(),
            ));
        }
        if depth.shape() != (lat_axis.len(), lon_axis.len()) {
            return Err(EchogridError::InvalidBathymetryGrid(format!(
                "depth matrix is {}x{} but the axes have {} latitudes and {} longitudes",
                depth.nrows(),
                depth.ncols(),
                lat_axis.len(),
                lon_axis.len()
            )));
        }

        Ok(BathymetryGrid {
            lat_axis,
            lon_axis,
            depth,
        })
    }

    pub fn lat_axis(&self) -> &[Degree] {
        &self.lat_axis
    }

    pub fn lon_axis(&self) -> &[Degree] {
        &self.lon_axis
    }

    pub fn shape(&self) -> (usize, usize) {
        self.depth.shape()
    }
}

/// Cell index selected on one axis, `None` when the query is outside the axis span.
fn axis_cell(axis: &[Degree], query: Degree) -> Option<usize> {
    let min = axis.iter().copied().fold(f64::INFINITY, f64::min);
    let max = axis.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if query < min || query > max {
        return None;
    }

    let mut candidates = axis
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v >= query)
        .map(|(i, _)| i);

    if query > 0.0 {
        candidates.last()
    } else {
        candidates.next()
    }
}

impl BathymetryProvider for BathymetryGrid {
    fn estimate_depth(&self, latitude: Degree, longitude: Degree) -> Meter {
        let longitude = -longitude.abs();
        if !is_position_fix(latitude, longitude) {
            return f64::NAN;
        }

        let (Some(row), Some(col)) = (
            axis_cell(&self.lat_axis, latitude),
            axis_cell(&self.lon_axis, longitude),
        ) else {
            return f64::NAN;
        };

        let depth = self.depth[(row, col)].abs();
        if depth == 0.0 {
            f64::NAN
        } else {
            depth
        }
    }
}
