//! # Ping timestamp repair
//!
//! Echosounder clocks occasionally emit duplicated or backward-stepping ping times
//! (GPS resynchronization, buffered writes, file concatenation). The resampling stages
//! need a strictly increasing time axis, so defective timestamps are rewritten here while
//! leaving every other timestamp untouched.
//!
//! ## Algorithm
//!
//! 1. An index `i ≥ 1` is **defective** when `t[i] ≤ t[i-1]`.
//! 2. Defective indices are grouped into maximal contiguous runs.
//! 3. A run starting in the first `edge_window` indices is a **start run**; otherwise a run
//!    ending in the last `edge_window` indices is an **end run**; every other run is
//!    **interior**.
//! 4. Interior defects are repaired one at a time in index order: each becomes the midpoint
//!    of its (already repaired) left neighbor and the first non-defective index to its right.
//! 5. Edge runs are rebuilt with a fixed interval estimated from as many valid neighbors as
//!    the run is long: backward from the first valid index after a start run, forward from
//!    the last valid index before an end run.
//!
//! The repair is greedy. Isolated defects and edge clusters come out strictly increasing;
//! overlapping clusters or a bad spike in the middle of the file may not.
//!
//! ## Numerical bounds
//!
//! The interval estimated for an edge run is floored to `min_interval`, and so is any
//! non-finite estimate. An interior midpoint that does not land after its left neighbor is
//! clamped to `left + min_interval`. Clamps are reported with `tracing::warn!`.
use itertools::Itertools;
use tracing::{debug, warn};

use crate::constants::MJD;
use crate::pings::PingRecord;
use crate::time::{epoch_to_mjd, mjd_to_epoch};

/// Indices `i ≥ 1` whose timestamp is not later than its predecessor.
pub fn defective_indices(times: &[MJD]) -> Vec<usize> {
    times
        .iter()
        .tuple_windows()
        .positions(|(prev, next)| next - prev <= 0.0)
        .map(|i| i + 1)
        .collect()
}

/// Group sorted indices into maximal runs of consecutive values, as inclusive bounds.
fn contiguous_runs(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &i in indices {
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == i => *end = i,
            _ => runs.push((i, i)),
        }
    }
    runs
}

/// Mean interval between the first and last of `anchors`, floored to `min_interval`.
fn edge_interval(times: &[MJD], anchors: &[usize], min_interval: f64) -> f64 {
    let estimate = match (anchors.first(), anchors.last()) {
        (Some(&p), Some(&q)) if p != q => (times[p] - times[q]).abs() / p.abs_diff(q) as f64,
        _ => f64::NAN,
    };

    if estimate.is_finite() && estimate >= min_interval {
        estimate
    } else {
        warn!(
            estimate,
            min_interval, "edge run interval is degenerate, falling back to the minimum interval"
        );
        min_interval
    }
}

fn repair_start_run(
    times: &mut [MJD],
    is_defect: &[bool],
    (a, b): (usize, usize),
    min_interval: f64,
) {
    let run_len = b - a + 1;
    let anchors = (b + 1..times.len())
        .filter(|&k| !is_defect[k])
        .take(run_len + 1)
        .collect::<Vec<usize>>();
    let interval = edge_interval(times, &anchors, min_interval);

    for k in (a..=b).rev() {
        times[k] = times[k + 1] - interval;
    }

    // the defect may sit on the first sample itself, which is never flagged
    let mut k = a;
    while k > 0 && times[k - 1] >= times[k] {
        times[k - 1] = times[k] - interval;
        k -= 1;
    }
}

fn repair_end_run(
    times: &mut [MJD],
    is_defect: &[bool],
    (a, b): (usize, usize),
    min_interval: f64,
) {
    let run_len = b - a + 1;
    let anchors = (0..a)
        .rev()
        .filter(|&k| !is_defect[k])
        .take(run_len + 1)
        .collect::<Vec<usize>>();
    let interval = edge_interval(times, &anchors, min_interval);

    for k in a..=b {
        times[k] = times[k - 1] + interval;
    }

    let mut k = b;
    while k + 1 < times.len() && times[k + 1] <= times[k] {
        times[k + 1] = times[k] + interval;
        k += 1;
    }
}

fn repair_interior(times: &mut [MJD], is_defect: &[bool], i: usize, min_interval: f64) {
    let Some(right) = (i + 1..times.len()).find(|&k| !is_defect[k]) else {
        return;
    };

    let left = times[i - 1];
    let midpoint = 0.5 * (left + times[right]);
    times[i] = if midpoint > left {
        midpoint
    } else {
        warn!(
            index = i,
            left,
            right = times[right],
            "interior timestamp repair clamped to the minimum interval"
        );
        left + min_interval
    };
}

/// Rewrite defective timestamps so the sequence becomes strictly increasing.
///
/// Arguments
/// -----------------
/// * `times`: ping times (MJD, UTC days) in acquisition order.
/// * `edge_window`: number of leading / trailing indices in which a defective run is
///   repaired with the fixed-interval walk instead of midpoints.
/// * `min_interval`: smallest interval (days) used by the repair.
///
/// Return
/// ----------
/// * The repaired sequence, same length as `times`. Non-defective timestamps are kept
///   verbatim unless an edge walk has to shift them to stay monotonic.
///
/// See also
/// ------------
/// * [`defective_indices`] – detection step.
/// * [`repair_ping_timestamps`] – same repair applied in place to ping records.
pub fn repair_timestamps(times: &[MJD], edge_window: usize, min_interval: f64) -> Vec<MJD> {
    let n = times.len();
    let mut repaired = times.to_vec();
    let defects = defective_indices(times);
    if defects.is_empty() {
        return repaired;
    }

    let mut is_defect = vec![false; n];
    for &i in &defects {
        is_defect[i] = true;
    }

    for (a, b) in contiguous_runs(&defects) {
        if a < edge_window && b + 1 < n {
            debug!(start = a, end = b, "repairing start run");
            repair_start_run(&mut repaired, &is_defect, (a, b), min_interval);
        } else if b + edge_window >= n {
            debug!(start = a, end = b, "repairing end run");
            repair_end_run(&mut repaired, &is_defect, (a, b), min_interval);
        } else {
            for i in a..=b {
                repair_interior(&mut repaired, &is_defect, i, min_interval);
            }
        }
    }

    repaired
}

/// Repair the timestamps of a ping sequence in place.
///
/// Return
/// ----------
/// * The repaired ping times as MJD (UTC days), also written back to each
///   [`PingRecord::timestamp`].
pub fn repair_ping_timestamps(
    pings: &mut [PingRecord],
    edge_window: usize,
    min_interval: f64,
) -> Vec<MJD> {
    let raw = pings
        .iter()
        .map(|p| epoch_to_mjd(&p.timestamp))
        .collect::<Vec<MJD>>();
    let repaired = repair_timestamps(&raw, edge_window, min_interval);

    let mut changed = 0usize;
    for ((ping, &old), &new) in pings.iter_mut().zip(&raw).zip(&repaired) {
        if old != new {
            ping.timestamp = mjd_to_epoch(new);
            changed += 1;
        }
    }
    if changed > 0 {
        debug!(changed, total = pings.len(), "ping timestamps repaired");
    }

    repaired
}

#[cfg(test)]
mod timestamp_repair_test {
    use super::*;

    const MIN_INTERVAL: f64 = 1e-3 / 86_400.0;

    fn strictly_increasing(times: &[f64]) -> bool {
        times.iter().tuple_windows().all(|(a, b)| b > a)
    }

    #[test]
    fn test_defective_indices() {
        let t = [0.0, 1.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(defective_indices(&t), vec![2, 4]);
        assert!(defective_indices(&[]).is_empty());
        assert!(defective_indices(&[1.0]).is_empty());
    }

    #[test]
    fn test_contiguous_runs() {
        assert_eq!(
            contiguous_runs(&[2, 3, 4, 8, 10, 11]),
            vec![(2, 4), (8, 8), (10, 11)]
        );
    }

    #[test]
    fn test_untouched_when_monotonic() {
        let t = (0..20).map(|i| i as f64 * 0.5).collect::<Vec<f64>>();
        assert_eq!(repair_timestamps(&t, 5, MIN_INTERVAL), t);
    }

    #[test]
    fn test_interior_duplicate_uses_midpoint() {
        let mut t = (0..20).map(|i| i as f64).collect::<Vec<f64>>();
        t[10] = t[9];
        let repaired = repair_timestamps(&t, 5, MIN_INTERVAL);
        assert_eq!(repaired[10], 0.5 * (9.0 + 11.0));
        assert!(strictly_increasing(&repaired));
        // everything else untouched
        for i in (0..20).filter(|&i| i != 10) {
            assert_eq!(repaired[i], i as f64);
        }
    }

    #[test]
    fn test_interior_backward_step() {
        let mut t = (0..30).map(|i| 100.0 + i as f64).collect::<Vec<f64>>();
        t[12] = 50.0;
        t[20] = t[19] - 0.2;
        let repaired = repair_timestamps(&t, 5, MIN_INTERVAL);
        assert_eq!(repaired[12], 112.0);
        assert_eq!(repaired[20], 120.0);
        assert!(strictly_increasing(&repaired));
    }

    #[test]
    fn test_start_run_with_late_first_sample() {
        let mut t = (0..15).map(|i| i as f64).collect::<Vec<f64>>();
        t[0] = 40.0;
        let repaired = repair_timestamps(&t, 5, MIN_INTERVAL);
        assert_eq!(repaired[0], 0.0);
        assert_eq!(repaired[1], 1.0);
        assert!(strictly_increasing(&repaired));
    }

    #[test]
    fn test_start_run_cluster() {
        let mut t = (0..15).map(|i| 10.0 + 2.0 * i as f64).collect::<Vec<f64>>();
        t[2] = 10.0;
        t[3] = 10.0;
        let repaired = repair_timestamps(&t, 5, MIN_INTERVAL);
        assert_eq!(repaired[3], 16.0);
        assert_eq!(repaired[2], 14.0);
        assert_eq!(repaired[1], 12.0);
        assert!(strictly_increasing(&repaired));
    }

    #[test]
    fn test_end_run_cluster() {
        let mut t = (0..12).map(|i| i as f64).collect::<Vec<f64>>();
        t[10] = 9.0;
        t[11] = 9.0;
        let repaired = repair_timestamps(&t, 5, MIN_INTERVAL);
        assert_eq!(repaired[10], 10.0);
        assert_eq!(repaired[11], 11.0);
        assert!(strictly_increasing(&repaired));
    }

    #[test]
    fn test_end_run_followed_by_valid_sample() {
        let mut t = (0..12).map(|i| i as f64).collect::<Vec<f64>>();
        t[9] = 8.0;
        let repaired = repair_timestamps(&t, 5, MIN_INTERVAL);
        assert!(strictly_increasing(&repaired));
        assert_eq!(repaired[8], 8.0);
    }

    #[test]
    fn test_isolated_defects_become_monotonic() {
        let mut t = (0..200).map(|i| 57_199.0 + i as f64 / 86_400.0).collect::<Vec<f64>>();
        for i in [1, 3, 17, 42, 43, 99, 150, 196, 199] {
            t[i] = t[i - 1];
        }
        t[70] = t[69] - 5.0 / 86_400.0;
        let repaired = repair_timestamps(&t, 5, MIN_INTERVAL);
        assert_eq!(repaired.len(), t.len());
        assert!(strictly_increasing(&repaired));
    }

    #[test]
    fn test_nearly_all_defective_stays_finite() {
        let t = [10.0, 9.0, 8.0, 7.0, 6.0, 5.0];
        let repaired = repair_timestamps(&t, 5, MIN_INTERVAL);
        assert!(repaired.iter().all(|v| v.is_finite()));
        assert!(strictly_increasing(&repaired));
        assert_eq!(repaired[0], 10.0);
    }

    #[test]
    fn test_short_sequences() {
        assert!(repair_timestamps(&[], 5, MIN_INTERVAL).is_empty());
        assert_eq!(repair_timestamps(&[3.0], 5, MIN_INTERVAL), vec![3.0]);
        let two = repair_timestamps(&[3.0, 3.0], 5, MIN_INTERVAL);
        assert!(two[1] > two[0]);
    }
}
