use hifitime::Epoch;

use crate::constants::{Hours, HOURS_PER_DAY, MJD, SECONDS_PER_DAY};

/// Transformation from an epoch to a modified julian date (MJD) in the UTC scale
///
/// Argument
/// --------
/// * `epoch`: the instant to convert
///
/// Return
/// ------
/// * the MJD (UTC days) of the epoch
pub fn epoch_to_mjd(epoch: &Epoch) -> MJD {
    epoch.to_mjd_utc_days()
}

/// Transformation from a modified julian date (MJD, UTC days) to an epoch
pub fn mjd_to_epoch(mjd: MJD) -> Epoch {
    Epoch::from_mjd_utc(mjd)
}

/// Decimal hour of the day (GMT) of a modified julian date.
///
/// MJD days start at midnight, so the fractional part of the date is the
/// fraction of the UTC day elapsed.
///
/// Argument
/// --------
/// * `mjd`: modified julian date in UTC days
///
/// Return
/// ------
/// * hour of the day in `[0, 24)`
pub fn hour_of_day(mjd: MJD) -> Hours {
    (mjd - mjd.floor()) * HOURS_PER_DAY
}

/// Day count used by the almanac solar series.
///
/// This is the integer part of the expression given in the *Almanac for Computers*
/// (Nautical Almanac Office, 1978):
///
/// ```text
/// 367·y − ⌊7·(y + ⌊(m + 9) / 12⌋) / 4⌋ + ⌊275·m / 9⌋ + d + 1721013
/// ```
///
/// It is valid from March 1900 to February 2100 and equals `JD − 0.5` at 0h UT,
/// i.e. `MJD + 2400000`, over that range.
///
/// Arguments
/// ---------
/// * `year`, `month`, `day`: gregorian calendar date
///
/// Return
/// ------
/// * the day count at 0h UT of the date
pub fn almanac_day_number(year: i32, month: u8, day: u8) -> f64 {
    let y = year as i64;
    let m = month as i64;
    let d = day as i64;
    (367 * y - (7 * (y + (m + 9) / 12)) / 4 + (275 * m) / 9 + d + 1_721_013) as f64
}

/// Almanac day count of an epoch, including the fraction of the day (`UT / 24`).
///
/// See also
/// --------
/// * [`almanac_day_number`] – day count at 0h UT
pub fn almanac_day(epoch: &Epoch) -> f64 {
    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
    let seconds_of_day = hour as f64 * 3600.0
        + minute as f64 * 60.0
        + second as f64
        + nanos as f64 * 1e-9;
    almanac_day_number(year, month, day) + seconds_of_day / SECONDS_PER_DAY
}

/// Almanac day count at 0h UT of the calendar day containing `epoch`.
pub fn almanac_midnight(epoch: &Epoch) -> f64 {
    let (year, month, day, ..) = epoch.to_gregorian_utc();
    almanac_day_number(year, month, day)
}
