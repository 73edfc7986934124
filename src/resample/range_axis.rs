//! # Range axis normalization
//!
//! Each ping describes its samples by a range interval `[range_start, range_stop]`.
//! Pings of one file may cover different intervals and carry different sample counts,
//! so they are resampled onto a shared depth axis:
//!
//! * the **native range** of a ping is a linear sequence of `S_max` points from its start to
//!   its stop (`S_max` being the file-level maximum sample count);
//! * the **shared axis** has `2·S_max` points over `[min(range_start), max(range_stop)]`;
//! * samples are transferred with nearest-neighbor interpolation and extrapolation, so a
//!   ping covering only part of the shared axis repeats its edge samples beyond its range.
//!
//! A ping whose start equals its stop carries no range information; it borrows the stop of
//! the previous ping. The first ping cannot, and is rejected with
//! [`EchogridError::DegenerateFirstPing`].
use nalgebra::DMatrix;
use tracing::warn;

use super::{linspace, nearest_resample};
use crate::constants::{Meter, OVERSAMPLING};
use crate::echogrid_errors::EchogridError;
use crate::pings::{Backscatter, PingRecord};

/// Force `values` to length `n`: truncate, or pad by repeating the last value.
///
/// An empty input is padded with `fill`.
pub fn fit_len(mut values: Vec<f64>, n: usize, fill: f64) -> Vec<f64> {
    let pad = values.last().copied().unwrap_or(fill);
    values.resize(n, pad);
    values
}

/// Range stop of every ping after substituting degenerate ranges.
///
/// Return
/// ----------
/// * One stop per ping. A ping with `range_start == range_stop` takes the effective stop
///   of the previous ping.
///
/// Errors
/// ----------
/// * [`EchogridError::DegenerateFirstPing`] if the first ping is degenerate.
/// * [`EchogridError::InvalidRange`] if a bound is not finite or the (effective) stop lies
///   before the start.
pub fn effective_range_stops(pings: &[PingRecord]) -> Result<Vec<Meter>, EchogridError> {
    let mut stops: Vec<Meter> = Vec::with_capacity(pings.len());

    for (i, ping) in pings.iter().enumerate() {
        let start = ping.range_start;
        let mut stop = ping.range_stop;

        if !start.is_finite() || !stop.is_finite() {
            return Err(EchogridError::InvalidRange {
                ping: i,
                start,
                stop,
            });
        }

        if start == stop {
            stop = *stops.last().ok_or(EchogridError::DegenerateFirstPing)?;
        }

        if stop < start {
            return Err(EchogridError::InvalidRange {
                ping: i,
                start,
                stop,
            });
        }
        stops.push(stop);
    }

    Ok(stops)
}

/// Native range vector of a ping: `sample_count_max` points from `start` to `stop`.
pub fn native_range(start: Meter, stop: Meter, sample_count_max: usize) -> Vec<Meter> {
    fit_len(linspace(start, stop, sample_count_max), sample_count_max, stop)
}

/// Shared, oversampled depth axis: `2·sample_count_max` points from the smallest range
/// start to the largest effective range stop.
pub fn shared_depth_axis(
    pings: &[PingRecord],
    stops: &[Meter],
    sample_count_max: usize,
) -> Vec<Meter> {
    let min_start = pings
        .iter()
        .map(|p| p.range_start)
        .fold(f64::INFINITY, f64::min);
    let max_stop = stops.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    linspace(min_start, max_stop, OVERSAMPLING * sample_count_max)
}

/// Resample one ping onto the shared depth axis.
///
/// The ping samples are padded with [`Backscatter::Missing`] (or truncated) to
/// `sample_count_max` so that they pair one-to-one with the native range vector.
///
/// Arguments
/// -----------------
/// * `ping`: the ping to resample.
/// * `stop`: effective range stop of the ping (see [`effective_range_stops`]).
/// * `sample_count_max`: file-level maximum sample count.
/// * `depth_axis`: shared axis built by [`shared_depth_axis`].
///
/// Return
/// ----------
/// * `depth_axis.len()` samples.
pub fn resample_ping(
    ping: &PingRecord,
    stop: Meter,
    sample_count_max: usize,
    depth_axis: &[Meter],
) -> Vec<Backscatter> {
    let native = native_range(ping.range_start, stop, sample_count_max);

    let mut samples = ping.samples.clone();
    if samples.len() > sample_count_max {
        warn!(
            sample_count = samples.len(),
            sample_count_max, "ping has more samples than the file maximum, truncating"
        );
    }
    samples.resize(sample_count_max, Backscatter::Missing);

    nearest_resample(&native, &samples, depth_axis)
}

/// Resample every ping onto the shared depth axis.
///
/// Return
/// ----------
/// * The shared depth axis (`2·sample_count_max` points).
/// * A matrix with one row per ping and one column per depth.
///
/// Errors
/// ----------
/// * [`EchogridError::NoPings`], [`EchogridError::ZeroSampleCount`] on empty input.
/// * Any error of [`effective_range_stops`].
///
/// See also
/// ------------
/// * [`crate::resample::time_axis::normalize_time_axis`] – next stage.
pub fn normalize_range_axis(
    pings: &[PingRecord],
    sample_count_max: usize,
) -> Result<(Vec<Meter>, DMatrix<Backscatter>), EchogridError> {
    if pings.is_empty() {
        return Err(EchogridError::NoPings);
    }
    if sample_count_max == 0 {
        return Err(EchogridError::ZeroSampleCount);
    }

    let stops = effective_range_stops(pings)?;
    let depth_axis = shared_depth_axis(pings, &stops, sample_count_max);

    let rows = pings
        .iter()
        .zip(&stops)
        .flat_map(|(ping, &stop)| resample_ping(ping, stop, sample_count_max, &depth_axis));
    let matrix = DMatrix::from_row_iterator(pings.len(), depth_axis.len(), rows);

    Ok((depth_axis, matrix))
}

#[cfg(test)]
mod range_axis_test {
    use super::*;
    use hifitime::Epoch;

    fn ping(start: f64, stop: f64, raw: &[f64]) -> PingRecord {
        let t = Epoch::from_gregorian_utc_at_midnight(2015, 6, 26);
        PingRecord::from_raw(t, 42.0, -70.0, start, stop, raw)
    }

    #[test]
    fn test_fit_len() {
        assert_eq!(fit_len(vec![1.0, 2.0, 3.0], 2, 0.0), vec![1.0, 2.0]);
        assert_eq!(fit_len(vec![1.0, 2.0], 4, 0.0), vec![1.0, 2.0, 2.0, 2.0]);
        assert_eq!(fit_len(vec![], 2, 7.0), vec![7.0, 7.0]);
    }

    #[test]
    fn test_effective_stops_borrow_previous() {
        let pings = vec![
            ping(0.0, 100.0, &[-50.0]),
            ping(0.0, 0.0, &[-50.0]),
            ping(0.0, 0.0, &[-50.0]),
            ping(0.0, 120.0, &[-50.0]),
        ];
        assert_eq!(
            effective_range_stops(&pings).unwrap(),
            vec![100.0, 100.0, 100.0, 120.0]
        );
    }

    #[test]
    fn test_degenerate_first_ping() {
        let pings = vec![ping(5.0, 5.0, &[-50.0]), ping(0.0, 10.0, &[-50.0])];
        assert_eq!(
            effective_range_stops(&pings),
            Err(EchogridError::DegenerateFirstPing)
        );
    }

    #[test]
    fn test_inverted_range() {
        let pings = vec![ping(0.0, 10.0, &[-50.0]), ping(20.0, 10.0, &[-50.0])];
        assert_eq!(
            effective_range_stops(&pings),
            Err(EchogridError::InvalidRange {
                ping: 1,
                start: 20.0,
                stop: 10.0
            })
        );
    }

    #[test]
    fn test_shape_with_variable_sample_counts() {
        let pings = vec![
            ping(0.0, 10.0, &[-60.0, -61.0, -62.0, -63.0]),
            ping(0.0, 20.0, &[-70.0, -71.0]),
            ping(0.0, 0.0, &[-80.0]),
        ];
        let (axis, matrix) = normalize_range_axis(&pings, 4).unwrap();
        assert_eq!(axis.len(), 8);
        assert_eq!(matrix.shape(), (3, 8));
        assert_eq!(axis[0], 0.0);
        assert_eq!(axis[7], 20.0);
    }

    #[test]
    fn test_nearest_neighbor_with_extrapolation() {
        // native range 0, 10, 20, 30; shared axis 0..60 with 8 points
        let pings = vec![
            ping(0.0, 30.0, &[-60.0, -61.0, -62.0, -63.0]),
            ping(0.0, 60.0, &[-70.0, -71.0, -72.0, -73.0]),
        ];
        let (axis, matrix) = normalize_range_axis(&pings, 4).unwrap();
        assert_eq!(axis.len(), 8);

        let first = matrix.row(0).iter().copied().collect::<Vec<Backscatter>>();
        assert_eq!(first[0], Backscatter::Db(-60.0));
        // beyond 30 m the last sample is repeated rather than left empty
        assert_eq!(first[7], Backscatter::Db(-63.0));
        assert_eq!(first[5], Backscatter::Db(-63.0));
    }

    #[test]
    fn test_short_ping_padded_with_missing() {
        let pings = vec![ping(0.0, 30.0, &[-60.0, -61.0])];
        let (_, matrix) = normalize_range_axis(&pings, 4).unwrap();
        assert_eq!(matrix[(0, 0)], Backscatter::Db(-60.0));
        assert_eq!(matrix[(0, 7)], Backscatter::Missing);
    }

    #[test]
    fn test_long_ping_truncated_to_file_maximum() {
        // native range of 4 points 0, 10, 20, 30; the last two samples are dropped
        let pings = vec![
            ping(0.0, 30.0, &[-60.0, -61.0, -62.0, -63.0, -64.0, -65.0]),
            ping(0.0, 30.0, &[-70.0, -71.0]),
        ];
        let (axis, matrix) = normalize_range_axis(&pings, 4).unwrap();
        assert_eq!(axis.len(), 8);
        assert_eq!(matrix.shape(), (2, 8));

        let first = matrix.row(0).iter().copied().collect::<Vec<Backscatter>>();
        assert_eq!(first[0], Backscatter::Db(-60.0));
        assert_eq!(first[7], Backscatter::Db(-63.0));
        assert!(first
            .iter()
            .all(|&v| v != Backscatter::Db(-64.0) && v != Backscatter::Db(-65.0)));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_range_axis(&[], 4), Err(EchogridError::NoPings));
        let pings = vec![ping(0.0, 10.0, &[])];
        assert_eq!(
            normalize_range_axis(&pings, 0),
            Err(EchogridError::ZeroSampleCount)
        );
    }
}
