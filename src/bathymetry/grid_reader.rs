//! Loading of a [`BathymetryGrid`] from a long-format CSV file.
//!
//! The file has a header line and one record per grid cell:
//!
//! ```text
//! latitude,longitude,depth
//! 43.0,-71.0,-10.5
//! 43.0,-70.0,-22.0
//! ...
//! ```
//!
//! Axis coordinates keep their first-seen order, so a grid written row by row from
//! north to south keeps its descending latitude axis. Every (latitude, longitude) pair
//! must be present.
use std::collections::HashMap;
use std::io::Read;

use camino::Utf8Path;
use nalgebra::DMatrix;
use serde::Deserialize;
use tracing::{debug, info};

use super::BathymetryGrid;
use crate::echogrid_errors::EchogridError;

#[derive(Debug, Deserialize)]
struct GridRecord {
    latitude: f64,
    longitude: f64,
    depth: f64,
}

/// Coordinates in first-seen order with an index lookup by bit pattern.
#[derive(Default)]
struct AxisBuilder {
    values: Vec<f64>,
    index: HashMap<u64, usize>,
}

impl AxisBuilder {
    fn index_of(&mut self, value: f64) -> usize {
        let values = &mut self.values;
        *self.index.entry(value.to_bits()).or_insert_with(|| {
            values.push(value);
            values.len() - 1
        })
    }
}

impl BathymetryGrid {
    /// Read a grid from CSV data.
    ///
    /// Arguments
    /// -----------------
    /// * `reader`: source of `latitude,longitude,depth` records with a header line.
    ///
    /// Return
    /// ----------
    /// * The grid, rows ordered by first appearance of each latitude, columns by first
    ///   appearance of each longitude.
    ///
    /// Errors
    /// ----------
    /// * [`EchogridError::CsvError`] on malformed records.
    /// * [`EchogridError::InvalidBathymetryGrid`] if the file is empty or a cell is missing.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, EchogridError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let mut lats = AxisBuilder::default();
        let mut lons = AxisBuilder::default();
        let mut cells: Vec<(usize, usize, f64)> = Vec::new();

        for record in csv_reader.deserialize::<GridRecord>() {
            let record = record?;
            let row = lats.index_of(record.latitude);
            let col = lons.index_of(record.longitude);
            cells.push((row, col, record.depth));
        }

        let (n_lat, n_lon) = (lats.values.len(), lons.values.len());
        let mut depth = DMatrix::from_element(n_lat, n_lon, f64::NAN);
        let mut filled = DMatrix::from_element(n_lat, n_lon, false);
        for &(row, col, value) in &cells {
            if filled[(row, col)] {
                debug!(row, col, "duplicated bathymetry cell, keeping the last value");
            }
            depth[(row, col)] = value;
            filled[(row, col)] = true;
        }

        if let Some(missing) = filled.iter().position(|&ok| !ok) {
            // column-major storage
            let (row, col) = (missing % n_lat, missing / n_lat);
            return Err(EchogridError::InvalidBathymetryGrid(format!(
                "no depth for latitude {} longitude {}",
                lats.values[row], lons.values[col]
            )));
        }

        BathymetryGrid::new(lats.values, lons.values, depth)
    }

    /// Read a grid from a CSV file.
    ///
    /// See also
    /// ------------
    /// * [`BathymetryGrid::from_csv_reader`] – record format and errors.
    pub fn from_csv_path(path: &Utf8Path) -> Result<Self, EchogridError> {
        let file = std::fs::File::open(path)?;
        let grid = Self::from_csv_reader(file)?;
        let (n_lat, n_lon) = grid.shape();
        info!(%path, n_lat, n_lon, "bathymetry grid loaded");
        Ok(grid)
    }
}

#[cfg(test)]
mod grid_reader_test {
    use super::*;
    use crate::bathymetry::BathymetryProvider;

    const GRID: &str = "latitude,longitude,depth
43.0,-71.0,-10.0
43.0,-70.0,-20.0
42.0,-71.0,-40.0
42.0, -70.0, -50.0
";

    #[test]
    fn test_read_grid() {
        let grid = BathymetryGrid::from_csv_reader(GRID.as_bytes()).unwrap();
        assert_eq!(grid.shape(), (2, 2));
        assert_eq!(grid.lat_axis(), &[43.0, 42.0]);
        assert_eq!(grid.lon_axis(), &[-71.0, -70.0]);
        assert_eq!(grid.estimate_depth(42.5, -70.5), 20.0);
    }

    #[test]
    fn test_missing_cell() {
        let data = "latitude,longitude,depth\n43.0,-71.0,-10.0\n42.0,-70.0,-50.0\n";
        let err = BathymetryGrid::from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, EchogridError::InvalidBathymetryGrid(_)));
    }

    #[test]
    fn test_malformed_record() {
        let data = "latitude,longitude,depth\n43.0,abc,-10.0\n";
        let err = BathymetryGrid::from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, EchogridError::CsvError(_)));
    }

    #[test]
    fn test_empty_file() {
        let err = BathymetryGrid::from_csv_reader("latitude,longitude,depth\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, EchogridError::InvalidBathymetryGrid(_)));
    }
}
