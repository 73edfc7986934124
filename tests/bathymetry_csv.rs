mod common;

use camino::Utf8Path;
use common::write_bathymetry_csv;
use echogrid::bathymetry::{BathymetryGrid, BathymetryProvider};
use echogrid::EchogridError;

#[test]
fn load_grid_from_disk() {
    let (_dir, path) = write_bathymetry_csv();
    let grid = BathymetryGrid::from_csv_path(&path).unwrap();

    assert_eq!(grid.shape(), (3, 3));
    assert_eq!(grid.lat_axis(), &[43.0, 42.0, 41.0]);
    assert_eq!(grid.lon_axis(), &[-71.0, -70.0, -69.0]);

    assert_eq!(grid.estimate_depth(42.5, -70.5), 20.0);
    assert_eq!(grid.estimate_depth(41.5, -71.0), 40.0);
    // eastern longitudes are folded onto the western grid
    assert_eq!(grid.estimate_depth(41.5, 71.0), 40.0);
}

#[test]
fn sentinel_positions_yield_nan() {
    let (_dir, path) = write_bathymetry_csv();
    let grid = BathymetryGrid::from_csv_path(&path).unwrap();

    assert!(grid.estimate_depth(999.0, -70.0).is_nan());
    assert!(grid.estimate_depth(42.0, -999.0).is_nan());
    assert!(grid.estimate_depth(f64::NAN, f64::NAN).is_nan());
    // outside the grid extent
    assert!(grid.estimate_depth(45.0, -70.0).is_nan());
    assert!(grid.estimate_depth(42.0, -60.0).is_nan());
    // zero elevation
    assert!(grid.estimate_depth(42.0, -69.0).is_nan());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = BathymetryGrid::from_csv_path(Utf8Path::new("does/not/exist.csv")).unwrap_err();
    assert!(matches!(err, EchogridError::IoError(_)));
}
