//! # Constants and type definitions for echogrid
//!
//! This module centralizes the **physical constants**, **conversion factors**, **sentinel
//! values** and **type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Angle and time unit conversions
//! - Solar constant used by the ephemeris engine
//! - Raw "no data" sentinels emitted by echosounder exporters
//! - Core type aliases (degrees, meters, MJD, decimal hours)

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of hours in a day
pub const HOURS_PER_DAY: f64 = 24.0;

/// Julian date of the J1900.0 epoch used by the almanac series
pub const J1900: f64 = 2_415_020.0;

/// Days per Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Solar constant in W/m², mean of satellite measurements over the 1979-1995 sunspot
/// cycle (Coffey et al., 1995, Earth System Monitor 6, 6-10).
pub const SOLAR_CONSTANT: f64 = 1368.0;

/// Factor applied to the ping count and the maximum sample count to obtain the
/// dimensions of the regularized grid.
pub const OVERSAMPLING: usize = 2;

// -------------------------------------------------------------------------------------------------
// Sentinels
// -------------------------------------------------------------------------------------------------

/// Large negative value written by exporters for samples without data.
pub const EXPORT_NO_DATA: f64 = -9.9e37;

/// Legacy "no data" marker used for samples and for depths.
pub const LEGACY_NO_DATA: f64 = -999.0;

/// Latitude written by navigation exporters when no fix is available.
pub const NO_FIX_LATITUDE: f64 = 999.0;

/// Longitude written by navigation exporters when no fix is available.
pub const NO_FIX_LONGITUDE: f64 = -999.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Distance in meters
pub type Meter = f64;
/// Modified Julian Date (days, UTC)
pub type MJD = f64;
/// Decimal hours of a day (GMT)
pub type Hours = f64;
