//! # Solar ephemeris
//!
//! Reduced-accuracy solar ephemeris used to tell day pings from night pings.
//!
//! The series are those of Appendix E of the 1978 *Almanac for Computers* (Nautical
//! Almanac Office, U.S. Naval Observatory). They are valid for the years 1800-2100 and give
//! the solar declination to at least 1 arcminute, far below what a day/night flag needs.
//!
//! ## Overview
//!
//! - [`solar_position`] – declination, altitude, azimuth and top-of-atmosphere radiation
//!   at one instant and one place.
//! - [`SolarState`] – the above plus sunrise/sunset for the day of a ping.
//! - [`sun_cycle`] – sunrise/sunset extraction and day/night classification.
//!
//! ## Time argument
//!
//! Positions are requested on the almanac day count
//! ([`almanac_day`](crate::time::almanac_day)), i.e. `JD − 0.5`, whose fractional part is
//! the universal time of day. The series themselves run on the Julian date, so the
//! interval in Julian centuries from J1900 is
//!
//! ```text
//! T = (day + 0.5 − 2415020) / 36525
//! ```
//!
//! ## Radiation
//!
//! The radiation outside the atmosphere is `S / ρ · sin(alt)`, with `S` the solar constant
//! ([`SOLAR_CONSTANT`]) and `ρ` the Earth–Sun distance in AU, and is zero whenever the sun
//! is below the horizon.
pub mod sun_cycle;

use hifitime::Epoch;

use crate::constants::{
    Degree, Hours, DAYS_PER_CENTURY, HOURS_PER_DAY, J1900, RADEG, SOLAR_CONSTANT,
};
use crate::pings::is_position_fix;
use crate::time::almanac_day;

pub use sun_cycle::{is_daytime, sun_cycle, SunCycleConfig};

/// Sun position seen from one place at one instant.
///
/// Fields
/// -----------------
/// * `declination` – degrees north of the celestial equator.
/// * `altitude` – degrees above the horizon (negative below).
/// * `azimuth` – degrees clockwise from north, in `[0, 360)`.
/// * `radiation` – top-of-atmosphere irradiance on a horizontal surface, W/m².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub declination: Degree,
    pub altitude: Degree,
    pub azimuth: Degree,
    pub radiation: f64,
}

/// Solar state attached to a ping.
///
/// Fields
/// -----------------
/// * `sunrise`, `sunset` – decimal hours (GMT) of the day of the ping. `[0, 24]` means the
///   sun never sets that day, `[24, 0]` that it never rises.
/// * `declination`, `altitude`, `azimuth`, `radiation` – see [`SolarPosition`], evaluated
///   at the ping time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarState {
    pub sunrise: Hours,
    pub sunset: Hours,
    pub declination: Degree,
    pub altitude: Degree,
    pub azimuth: Degree,
    pub radiation: f64,
}

impl SolarState {
    /// Solar state at `epoch` for an observer at (`latitude`, `longitude`).
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`, `longitude`: observer position in decimal degrees.
    /// * `epoch`: instant of the ping (UTC).
    /// * `config`: sampling used for the sunrise/sunset search.
    ///
    /// Return
    /// ----------
    /// * The solar state, or [`SolarState::unknown`] when (`latitude`, `longitude`) is not a
    ///   position fix (`NaN` or exporter sentinel).
    ///
    /// See also
    /// ------------
    /// * [`sun_cycle`] – sunrise/sunset computation.
    /// * [`solar_position`] – instantaneous position.
    pub fn at(latitude: Degree, longitude: Degree, epoch: &Epoch, config: &SunCycleConfig) -> Self {
        if !is_position_fix(latitude, longitude) {
            return SolarState::unknown();
        }
        let (sunrise, sunset) = sun_cycle(latitude, longitude, epoch, config);
        let position = solar_position(latitude, longitude, almanac_day(epoch));

        SolarState {
            sunrise,
            sunset,
            declination: position.declination,
            altitude: position.altitude,
            azimuth: position.azimuth,
            radiation: position.radiation,
        }
    }

    /// State of a ping whose position is unknown: every field is `NaN`, which makes
    /// [`SolarState::is_daytime`] return `false`.
    pub fn unknown() -> Self {
        SolarState {
            sunrise: f64::NAN,
            sunset: f64::NAN,
            declination: f64::NAN,
            altitude: f64::NAN,
            azimuth: f64::NAN,
            radiation: f64::NAN,
        }
    }

    /// Day/night flag for a ping at `hour` (decimal GMT hours) on this day.
    pub fn is_daytime(&self, hour: Hours) -> bool {
        is_daytime(hour, self.sunrise, self.sunset)
    }
}

/// Wrap a longitude into `[-180, 180)`.
pub fn normalize_longitude(longitude: Degree) -> Degree {
    longitude - 360.0 * ((longitude + 180.0) / 360.0).floor()
}

/// Reduce an angle in degrees by whole turns (truncated, keeps the sign) and convert it to
/// radians.
fn reduce_deg(angle: Degree) -> f64 {
    (angle % 360.0) * RADEG
}

/// Earth–Sun geometry shared by the position series.
struct SunArguments {
    /// sine of the declination
    sin_dec: f64,
    /// Earth–Sun distance (AU)
    rho: f64,
    /// equation of time (seconds)
    eot: f64,
}

/// `day` is an almanac day count (`JD − 0.5`).
fn sun_arguments(day: f64) -> SunArguments {
    let t = (day + 0.5 - J1900) / DAYS_PER_CENTURY;
    let t2 = t * t;

    // mean anomaly of the sun
    let g = reduce_deg(358.475833 + 35999.04975 * t - 0.00015 * t2);
    // mean longitude of the sun
    let l = reduce_deg(279.696678 + 36000.76892 * t + 0.000303 * t2);
    // mean anomaly of Jupiter
    let jp = reduce_deg(225.444651 + 3034.906654 * t);
    // mean anomaly of Venus
    let vn = reduce_deg(212.603219 + 58517.803875 * t + 0.001286 * t2);
    // longitude of the ascending node of the moon's orbit
    let nm = (((259.183275 - 1934.142008 * t + 0.002078 * t2) % 360.0) + 360.0) * RADEG;

    let theta = 0.39793 * l.sin() - 0.00004 * l.cos()
        + 0.009999 * (g - l).sin()
        + 0.003334 * (g + l).sin()
        + 0.000042 * (2.0 * g + l).sin()
        - 0.000014 * (2.0 * g - l).sin()
        - 0.00003 * t * (g - l).sin()
        - 0.00001 * t * (g + l).sin()
        - 0.000208 * t * l.sin()
        - 0.000039 * (nm - l).sin()
        - 0.00001 * (g - l - jp).cos();

    let rho = 1.000421 - 0.033503 * g.cos() - 0.00014 * (2.0 * g).cos()
        + 0.000084 * t * g.cos()
        - 0.000033 * (g - jp).sin()
        + 0.000027 * (2.0 * g - 2.0 * vn).sin();

    let e = reduce_deg(276.697 + 0.98564734 * DAYS_PER_CENTURY * t);
    let eot = -97.8 * e.sin() - 431.3 * e.cos() + 596.6 * (2.0 * e).sin()
        - 1.9 * (2.0 * e).cos()
        + 4.0 * (3.0 * e).sin()
        + 19.3 * (3.0 * e).cos()
        - 12.7 * (4.0 * e).sin();

    SunArguments {
        sin_dec: theta / rho.sqrt(),
        rho,
        eot,
    }
}

/// Sun position at almanac day `day` seen from (`latitude`, `longitude`).
///
/// Arguments
/// -----------------
/// * `latitude`: observer latitude, decimal degrees.
/// * `longitude`: observer longitude, decimal degrees (any range, wrapped internally).
/// * `day`: almanac day count with the universal time as fractional part
///   (see [`almanac_day`](crate::time::almanac_day)).
///
/// Return
/// ----------
/// * The [`SolarPosition`].
///
/// Formula
/// -------
/// ```text
/// LHA      = 15·(EoT/3600 + UT − 12) + lon
/// sin(alt) = sin(lat)·sin(dec) + cos(lat)·cos(dec)·cos(LHA)
/// az       = atan( sin(LHA) / (sin(lat)·cos(LHA) − cos(lat)·tan(dec)) )
/// ```
/// the azimuth being quadrant-corrected from the half-day of the hour angle and the sign of
/// the arctangent.
pub fn solar_position(latitude: Degree, longitude: Degree, day: f64) -> SolarPosition {
    let longitude = normalize_longitude(longitude);
    let args = sun_arguments(day);
    let ut = (day - day.floor()) * HOURS_PER_DAY;

    let lha = (15.0 * (args.eot / 3600.0 + ut - 12.0) + longitude) * RADEG;
    let lat = latitude * RADEG;

    let sin_alt =
        lat.sin() * args.sin_dec + lat.cos() * (1.0 - args.sin_dec * args.sin_dec).sqrt() * lha.cos();
    let radiation = if sin_alt > 0.0 {
        SOLAR_CONSTANT / args.rho * sin_alt
    } else {
        0.0
    };

    let dec = args.sin_dec.asin();
    let half_day = (lha / std::f64::consts::PI).floor().rem_euclid(2.0);
    let az = (lha.sin() / (lat.sin() * lha.cos() - lat.cos() * dec.tan())).atan() / RADEG;
    let azimuth = az + 180.0 * (1.0 - half_day) + if az < 0.0 { 180.0 } else { 0.0 };

    SolarPosition {
        declination: dec / RADEG,
        altitude: sin_alt.asin() / RADEG,
        azimuth: azimuth.rem_euclid(360.0),
        radiation,
    }
}
