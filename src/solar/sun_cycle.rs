//! # Sunrise, sunset and day/night flag
//!
//! Sunrise and sunset are found by sampling the top-of-atmosphere radiation over one local
//! day: `n` equally spaced instants starting at local midnight of the ping's calendar date
//! (`0h UT − lon/360`). A sample is *night* when its radiation does not exceed a small
//! threshold. Sunrise is the end of the leading night block, sunset the start of the
//! trailing one, each shifted by half a sampling interval towards the day.
//!
//! Times are expressed in decimal GMT hours, so sunset may be *earlier* in the day than
//! sunrise (west of Greenwich the local day runs over two UTC days). [`is_daytime`]
//! handles both orderings.
use hifitime::Epoch;

use super::solar_position;
use crate::constants::{Degree, Hours, HOURS_PER_DAY};
use crate::time::almanac_midnight;

/// Sampling of the sunrise/sunset search.
///
/// Fields
/// -----------------
/// * `steps` – number of samples over the day (default 2880, every 30 s).
/// * `night_radiation_eps` – radiation at or below which a sample counts as night.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunCycleConfig {
    pub steps: usize,
    pub night_radiation_eps: f64,
}

impl Default for SunCycleConfig {
    fn default() -> Self {
        SunCycleConfig {
            steps: 2880,
            night_radiation_eps: 1e-10,
        }
    }
}

/// Sunrise and sunset (decimal GMT hours) of the calendar day of `epoch`.
///
/// Arguments
/// -----------------
/// * `latitude`, `longitude`: observer position in decimal degrees.
/// * `epoch`: any instant of the day of interest.
/// * `config`: sampling of the search.
///
/// Return
/// ----------
/// * `(sunrise, sunset)`; `(0, 24)` when the sun never sets, `(24, 0)` when it never
///   rises.
///
/// Note
/// ----------
/// * The longitude is wrapped into `[-180, 180)` before computing the local day.
/// * `config.steps` is expected to be at least 2; smaller values are raised to 2.
/// * The position must be a fix: a `NaN` latitude makes every sample look like day.
///   [`SolarState::at`](super::SolarState::at) checks this.
pub fn sun_cycle(
    latitude: Degree,
    longitude: Degree,
    epoch: &Epoch,
    config: &SunCycleConfig,
) -> (Hours, Hours) {
    let n = config.steps.max(2);
    let dt = 1.0 / n as f64;
    let start = almanac_midnight(epoch) - super::normalize_longitude(longitude) / 360.0;

    let days = (0..n).map(|k| start + k as f64 * dt).collect::<Vec<f64>>();
    let night = days
        .iter()
        .map(|&day| solar_position(latitude, longitude, day).radiation <= config.night_radiation_eps)
        .collect::<Vec<bool>>();

    let night_count = night.iter().filter(|&&is_night| is_night).count();
    if night_count == n {
        return (HOURS_PER_DAY, 0.0);
    }
    if night_count == 0 {
        return (0.0, HOURS_PER_DAY);
    }

    let leading = night.iter().take_while(|&&is_night| is_night).count();
    let trailing = night.iter().rev().take_while(|&&is_night| is_night).count();

    // 1-based sample positions of the last leading night and first trailing night samples
    let rise_pos = leading.clamp(1, n);
    let set_pos = (n - trailing + 1).clamp(1, n);

    let half_step = HOURS_PER_DAY * dt / 2.0;
    let hour_of = |day: f64| (day - day.floor()) * HOURS_PER_DAY;

    (
        hour_of(days[rise_pos - 1]) + half_step,
        hour_of(days[set_pos - 1]) - half_step,
    )
}

/// Day/night flag of a ping at `hour` (decimal GMT hours).
///
/// With `sunrise < sunset` the day is the open interval between them; otherwise the day
/// wraps around midnight GMT and is the complement of `(sunset, sunrise)`.
pub fn is_daytime(hour: Hours, sunrise: Hours, sunset: Hours) -> bool {
    let (low, high) = if sunrise <= sunset {
        (sunrise, sunset)
    } else {
        (sunset, sunrise)
    };
    (low < hour && hour < high) ^ (sunrise > sunset)
}
