#![allow(dead_code)]

use std::io::Write;

use camino::Utf8PathBuf;
use echogrid::pings::{PingFile, PingRecord};
use echogrid::time::{epoch_to_mjd, mjd_to_epoch};
use tempfile::TempDir;

/// 2015-06-26T00:00:00 UTC
pub const BASE_MJD: f64 = 57199.0;
pub const SECOND: f64 = 1.0 / 86_400.0;

/// A file of `n` pings one second apart from `start`, all at (`lat`, `lon`), each with
/// `samples` samples over `[0, 50]` m decreasing from -40 dB.
pub fn synthetic_file(name: &str, n: usize, start: f64, lat: f64, lon: f64, samples: usize) -> PingFile {
    let raw = (0..samples).map(|k| -40.0 - k as f64).collect::<Vec<f64>>();
    let pings = (0..n)
        .map(|i| {
            PingRecord::from_raw(
                mjd_to_epoch(start + i as f64 * SECOND),
                lat,
                lon,
                0.0,
                50.0,
                &raw,
            )
        })
        .collect();
    PingFile::new(name, pings)
}

pub fn ping_times(file: &PingFile) -> Vec<f64> {
    file.pings.iter().map(|p| epoch_to_mjd(&p.timestamp)).collect()
}

/// Write a 3x3 western-hemisphere bathymetry grid (descending latitudes) to a temporary
/// CSV file. The directory is removed when the returned guard is dropped.
pub fn write_bathymetry_csv() -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("bathymetry.csv")).unwrap();

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "latitude,longitude,depth").unwrap();
    for (lat, row) in [(43.0, [-10.0, -20.0, -30.0]), (42.0, [-40.0, -45.0, 0.0]), (41.0, [-70.0, -80.0, -90.0])] {
        for (lon, depth) in [-71.0, -70.0, -69.0].iter().zip(row) {
            writeln!(file, "{lat},{lon},{depth}").unwrap();
        }
    }
    (dir, path)
}
