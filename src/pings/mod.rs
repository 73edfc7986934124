//! # Ping records and backscatter samples
//!
//! This module defines the input side of the pipeline:
//!
//! - [`Backscatter`] – the tagged sample type. Every raw exporter sentinel (`0`, NaN,
//!   `-9.9e37`, `-999`) is folded into a single [`Backscatter::Missing`] marker at
//!   ingestion, before any resampling takes place.
//! - [`PingRecord`] – one acoustic ping (timestamp, position, range definition and samples).
//! - [`PingFile`] – one file's worth of pings, as handed over by an importer.
//!
//! Position helpers live here as well: [`is_position_fix`] recognizes navigation
//! sentinels and [`fill_position_gaps`] replaces missing fixes by linear interpolation.
//!
//! ## See also
//! * [`timestamp_repair`] – enforces strictly increasing ping times.
//! * [`crate::resample`] – range and time axis normalization.
pub mod timestamp_repair;

use hifitime::Epoch;
use itertools::Itertools;

use crate::constants::{
    Degree, Meter, EXPORT_NO_DATA, LEGACY_NO_DATA, NO_FIX_LATITUDE, NO_FIX_LONGITUDE,
};

/// A single backscatter sample (Sv, in dB).
///
/// Variants
/// -----------------
/// * `Db` – a valid value in dB.
/// * `Missing` – no data was recorded for this cell.
/// * `Masked` – the cell lies near or below the seafloor, or in the surface exclusion
///   zone, and was removed by bottom masking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backscatter {
    Db(f64),
    Missing,
    Masked,
}

impl Backscatter {
    /// Build a sample from a raw exported value, normalizing every "no data" sentinel.
    ///
    /// The following raw values become [`Backscatter::Missing`]:
    /// * `0.0`
    /// * NaN and infinities
    /// * anything at or below `-9.9e37`
    /// * `-999`
    ///
    /// Every other value is kept as [`Backscatter::Db`].
    pub fn from_raw(value: f64) -> Self {
        if !value.is_finite()
            || value == 0.0
            || value <= EXPORT_NO_DATA
            || value == LEGACY_NO_DATA
        {
            Backscatter::Missing
        } else {
            Backscatter::Db(value)
        }
    }

    /// The dB value, if the sample holds one.
    pub fn db(&self) -> Option<f64> {
        match self {
            Backscatter::Db(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Backscatter::Db(_))
    }
}

/// One acoustic ping.
///
/// Fields
/// -----------------
/// * `timestamp` – transmit time (UTC).
/// * `latitude`, `longitude` – position in decimal degrees; `999` / `-999` when no fix is available.
/// * `range_start`, `range_stop` – range covered by the samples, in meters.
/// * `samples` – backscatter samples, in range order.
///
/// The declared sample count is the length of `samples`.
#[derive(Debug, Clone, PartialEq)]
pub struct PingRecord {
    pub timestamp: Epoch,
    pub latitude: Degree,
    pub longitude: Degree,
    pub range_start: Meter,
    pub range_stop: Meter,
    pub samples: Vec<Backscatter>,
}

impl PingRecord {
    /// Build a ping from raw exported values, normalizing sentinels with [`Backscatter::from_raw`].
    pub fn from_raw(
        timestamp: Epoch,
        latitude: Degree,
        longitude: Degree,
        range_start: Meter,
        range_stop: Meter,
        raw_samples: &[f64],
    ) -> Self {
        PingRecord {
            timestamp,
            latitude,
            longitude,
            range_start,
            range_stop,
            samples: raw_samples.iter().map(|&v| Backscatter::from_raw(v)).collect(),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// One file's worth of pings, as produced by an importer.
///
/// Fields
/// -----------------
/// * `name` – identifier used in logs (usually the source file stem).
/// * `pings` – the pings in acquisition order.
/// * `sample_count_max` – file-level maximum of the per-ping sample counts.
/// * `bottom` – optional detected bottom depth per ping (meters). When present, the
///   bathymetric estimator is bypassed.
#[derive(Debug, Clone, PartialEq)]
pub struct PingFile {
    pub name: String,
    pub pings: Vec<PingRecord>,
    pub sample_count_max: usize,
    pub bottom: Option<Vec<Meter>>,
}

impl PingFile {
    /// Build a file, deriving `sample_count_max` from the pings.
    pub fn new(name: impl Into<String>, pings: Vec<PingRecord>) -> Self {
        let sample_count_max = pings.iter().map(PingRecord::sample_count).max().unwrap_or(0);
        PingFile {
            name: name.into(),
            pings,
            sample_count_max,
            bottom: None,
        }
    }

    pub fn with_bottom(mut self, bottom: Vec<Meter>) -> Self {
        self.bottom = Some(bottom);
        self
    }
}

/// Return true when `(latitude, longitude)` is a usable navigation fix.
///
/// NaN coordinates and the `999` / `-999` exporter sentinels are not fixes.
pub fn is_position_fix(latitude: Degree, longitude: Degree) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && latitude != NO_FIX_LATITUDE
        && longitude != NO_FIX_LONGITUDE
}

/// Replace missing entries of a coordinate track by linear interpolation over the valid ones.
///
/// Entries flagged `false` in `valid` are replaced; before the first valid entry and after
/// the last one the nearest valid value is repeated. When no entry is valid the track is
/// returned unchanged.
///
/// Arguments
/// -----------------
/// * `values`: latitudes or longitudes, in ping order.
/// * `valid`: per-entry validity, same length as `values`.
///
/// Return
/// ----------
/// * A new track with every entry defined.
pub fn fill_position_gaps(values: &[f64], valid: &[bool]) -> Vec<f64> {
    let anchors = valid.iter().positions(|&ok| ok).collect::<Vec<usize>>();

    let (Some(&first), Some(&last)) = (anchors.first(), anchors.last()) else {
        return values.to_vec();
    };

    let mut filled = values.to_vec();
    for i in 0..first {
        filled[i] = values[first];
    }
    for i in last + 1..values.len() {
        filled[i] = values[last];
    }
    for (a, b) in anchors.iter().copied().tuple_windows() {
        let span = (b - a) as f64;
        for i in a + 1..b {
            let w = (i - a) as f64 / span;
            filled[i] = values[a] + w * (values[b] - values[a]);
        }
    }
    filled
}
