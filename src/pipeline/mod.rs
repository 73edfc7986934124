//! # Echogram pipeline
//!
//! Turns one [`PingFile`] into an [`Echogram`]: a regular backscatter grid together with
//! the per-ping solar classification and bottom line.
//!
//! ## Steps
//!
//! 1. Reject empty input ([`EchogridError::NoPings`], [`EchogridError::ZeroSampleCount`]).
//! 2. Repair the ping timestamps so that they strictly increase, and write them back.
//! 3. Normalize the range axis, then the time axis
//!    ([`crate::resample::range_axis`], [`crate::resample::time_axis`]).
//! 4. Select the bottom line: the detected one when the file carries it, otherwise the
//!    bathymetric estimate when a [`BathymetryProvider`] is configured.
//! 5. Fill position gaps and classify each ping as day or night
//!    ([`crate::solar::SolarState`]).
//! 6. Mask the cells within `bottom_offset` of the bottom line or deeper, and the cells
//!    shallower than `surface_exclusion`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use echogrid::pipeline::{EchogramPipeline, PipelineParams};
//! use echogrid::pings::PingFile;
//!
//! let pipeline = EchogramPipeline::new(PipelineParams::default()).unwrap();
//! # let mut file: PingFile = unimplemented!();
//! let echogram = pipeline.process(&mut file).unwrap();
//! println!("{} x {}", echogram.grid.n_times(), echogram.grid.n_depths());
//! ```
pub mod params;

use hifitime::Epoch;
use tracing::{debug, info, warn};

use crate::bathymetry::BathymetryProvider;
use crate::constants::{Degree, Hours, Meter, MJD};
use crate::echogrid_errors::EchogridError;
use crate::pings::timestamp_repair::repair_ping_timestamps;
use crate::pings::{fill_position_gaps, is_position_fix, Backscatter, PingFile, PingRecord};
use crate::resample::range_axis::normalize_range_axis;
use crate::resample::time_axis::{nearest_rows, normalize_time_axis};
use crate::resample::BackscatterGrid;
use crate::solar::{solar_position, sun_cycle, SolarState, SunCycleConfig};
use crate::time::{almanac_day, almanac_midnight, hour_of_day};

pub use params::{PipelineParams, PipelineParamsBuilder};

/// Where a bottom line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BottomOrigin {
    /// Detected by the echosounder processing chain.
    Detected,
    /// Looked up in a bathymetry product.
    Estimated,
}

/// Bottom depth under each ping, in meters. `NaN` where unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct BottomLine {
    pub depths: Vec<Meter>,
    pub origin: BottomOrigin,
}

impl BottomLine {
    /// Deepest known bottom depth, `None` when every depth is unknown.
    pub fn max_depth(&self) -> Option<Meter> {
        self.depths
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .reduce(f64::max)
    }
}

/// Result of the pipeline for one file.
///
/// Fields
/// -----------------
/// * `name` – name of the source file.
/// * `grid` – the regularized backscatter grid.
/// * `day_night` – `true` for day, one flag per original ping.
/// * `solar` – solar state per original ping.
/// * `bottom` – bottom line per original ping, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Echogram {
    pub name: String,
    pub grid: BackscatterGrid,
    pub day_night: Vec<bool>,
    pub solar: Vec<SolarState>,
    pub bottom: Option<BottomLine>,
}

/// Echogram builder over one parameter set and an optional bathymetry provider.
pub struct EchogramPipeline<'a> {
    params: PipelineParams,
    bathymetry: Option<&'a dyn BathymetryProvider>,
}

impl<'a> EchogramPipeline<'a> {
    /// Create a pipeline.
    ///
    /// Errors
    /// ----------
    /// * [`EchogridError::InvalidPipelineParams`] if `params` does not pass
    ///   [`PipelineParams::validate`] (e.g. deserialized from a bad config file).
    pub fn new(params: PipelineParams) -> Result<Self, EchogridError> {
        Ok(EchogramPipeline {
            params: params.validate()?,
            bathymetry: None,
        })
    }

    /// Use `provider` to estimate the bottom of files without a detected bottom line.
    pub fn with_bathymetry(mut self, provider: &'a dyn BathymetryProvider) -> Self {
        self.bathymetry = Some(provider);
        self
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Run the pipeline on one file.
    ///
    /// The ping timestamps of `file` are repaired in place; nothing else is modified.
    ///
    /// Arguments
    /// -----------------
    /// * `file`: the pings of one file.
    ///
    /// Return
    /// ----------
    /// * The [`Echogram`] of the file.
    ///
    /// Errors
    /// ----------
    /// * [`EchogridError::NoPings`], [`EchogridError::ZeroSampleCount`] on empty input.
    /// * Range errors from [`normalize_range_axis`].
    /// * [`EchogridError::BottomLengthMismatch`] if the detected bottom does not have one
    ///   depth per ping.
    /// * [`EchogridError::MissingBottom`] if `require_bottom` is set and no bottom line is
    ///   available.
    pub fn process(&self, file: &mut PingFile) -> Result<Echogram, EchogridError> {
        if file.pings.is_empty() {
            return Err(EchogridError::NoPings);
        }
        if file.sample_count_max == 0 {
            return Err(EchogridError::ZeroSampleCount);
        }

        let times = repair_ping_timestamps(
            &mut file.pings,
            self.params.edge_window,
            self.params.min_ping_interval,
        );

        let (depth_axis, image) = normalize_range_axis(&file.pings, file.sample_count_max)?;
        let mut grid = normalize_time_axis(&times, depth_axis, &image)?;

        let bottom = self.bottom_line(file)?;

        let solar = self.solar_states(&file.pings);
        let day_night = solar
            .iter()
            .zip(&times)
            .map(|(state, &t)| state.is_daytime(hour_of_day(t)))
            .collect::<Vec<bool>>();

        if self.params.mask_below_bottom {
            if let Some(line) = &bottom {
                let masked = mask_below_bottom(
                    &mut grid,
                    &times,
                    &line.depths,
                    self.params.bottom_offset,
                    self.params.surface_exclusion,
                );
                debug!(file = %file.name, masked, "cells masked below the bottom");
            }
        }

        info!(
            file = %file.name,
            pings = file.pings.len(),
            n_times = grid.n_times(),
            n_depths = grid.n_depths(),
            day_pings = day_night.iter().filter(|&&d| d).count(),
            "echogram built"
        );

        Ok(Echogram {
            name: file.name.clone(),
            grid,
            day_night,
            solar,
            bottom,
        })
    }

    /// Run the pipeline on several files.
    ///
    /// A failing file does not stop the batch: its error is logged and returned in its
    /// slot of the output.
    pub fn process_batch(&self, files: &mut [PingFile]) -> Vec<Result<Echogram, EchogridError>> {
        files
            .iter_mut()
            .map(|file| {
                let result = self.process(file);
                if let Err(err) = &result {
                    warn!(file = %file.name, error = %err, "skipping file");
                }
                result
            })
            .collect()
    }

    fn bottom_line(&self, file: &PingFile) -> Result<Option<BottomLine>, EchogridError> {
        if let Some(depths) = &file.bottom {
            if depths.len() != file.pings.len() {
                return Err(EchogridError::BottomLengthMismatch {
                    expected: file.pings.len(),
                    found: depths.len(),
                });
            }
            return Ok(Some(BottomLine {
                depths: repair_detected_bottom(depths),
                origin: BottomOrigin::Detected,
            }));
        }

        match self.bathymetry {
            Some(provider) => Ok(Some(BottomLine {
                depths: provider.estimate_bottom(&file.pings),
                origin: BottomOrigin::Estimated,
            })),
            None if self.params.require_bottom => Err(EchogridError::MissingBottom),
            None => Ok(None),
        }
    }

    /// Positions used for the solar classification, gap-filled when enabled.
    fn solar_positions(&self, pings: &[PingRecord]) -> (Vec<Degree>, Vec<Degree>) {
        let lat = pings.iter().map(|p| p.latitude).collect::<Vec<f64>>();
        let lon = pings.iter().map(|p| p.longitude).collect::<Vec<f64>>();
        if !self.params.fill_position_gaps {
            return (lat, lon);
        }

        let valid = pings
            .iter()
            .map(|p| is_position_fix(p.latitude, p.longitude))
            .collect::<Vec<bool>>();
        (fill_position_gaps(&lat, &valid), fill_position_gaps(&lon, &valid))
    }

    fn solar_states(&self, pings: &[PingRecord]) -> Vec<SolarState> {
        let (lat, lon) = self.solar_positions(pings);
        let config = self.params.sun_cycle();

        let mut cycle = SunCycleCache::default();
        let mut unknown = 0usize;
        let states = pings
            .iter()
            .zip(lat.iter().zip(&lon))
            .map(|(ping, (&la, &lo))| {
                if !is_position_fix(la, lo) {
                    unknown += 1;
                    return SolarState::unknown();
                }
                let (sunrise, sunset) = cycle.get(la, lo, &ping.timestamp, &config);
                let position = solar_position(la, lo, almanac_day(&ping.timestamp));
                SolarState {
                    sunrise,
                    sunset,
                    declination: position.declination,
                    altitude: position.altitude,
                    azimuth: position.azimuth,
                    radiation: position.radiation,
                }
            })
            .collect();

        if unknown > 0 {
            warn!(unknown, "pings without a usable position are classified as night");
        }
        states
    }
}

/// Detected bottom with its dropouts filled.
///
/// Echosounders report a lost bottom as `0` (or garbage); every non-positive or non-finite
/// depth is replaced by linear interpolation over the valid ones, the nearest valid depth
/// being repeated at both ends. With no valid depth at all the line is entirely `NaN`.
pub fn repair_detected_bottom(depths: &[Meter]) -> Vec<Meter> {
    let valid = depths
        .iter()
        .map(|&d| d.is_finite() && d > 0.0)
        .collect::<Vec<bool>>();
    if !valid.contains(&true) {
        return vec![f64::NAN; depths.len()];
    }
    let filled = fill_position_gaps(depths, &valid);
    let repaired = valid.iter().filter(|&&ok| !ok).count();
    if repaired > 0 {
        debug!(repaired, "detected bottom dropouts interpolated");
    }
    filled
}

/// Reuses the sunrise/sunset of the previous ping when it shares its day and position.
#[derive(Default)]
struct SunCycleCache {
    key: Option<(f64, Degree, Degree)>,
    value: (Hours, Hours),
}

impl SunCycleCache {
    fn get(
        &mut self,
        latitude: Degree,
        longitude: Degree,
        epoch: &Epoch,
        config: &SunCycleConfig,
    ) -> (Hours, Hours) {
        let key = (almanac_midnight(epoch), latitude, longitude);
        if self.key != Some(key) {
            self.value = sun_cycle(latitude, longitude, epoch, config);
            self.key = Some(key);
        }
        self.value
    }
}

/// Tag as [`Backscatter::Masked`] every cell at or below the line `bottom_offset` meters
/// above the bottom, and every cell shallower than `surface_exclusion`.
///
/// Each grid row takes the bottom of its nearest original ping; an unknown (`NaN`)
/// bottom leaves the deep part of the row untouched.
///
/// Arguments
/// -----------------
/// * `grid`: the grid to mask in place.
/// * `ping_times`: repaired times of the original pings (MJD).
/// * `bottom`: bottom depth per original ping (meters).
/// * `bottom_offset`: height of the bottom mask line above the bottom (meters).
/// * `surface_exclusion`: depth of the surface exclusion line (meters), `0` to disable.
///
/// Return
/// ----------
/// * The number of masked cells.
pub fn mask_below_bottom(
    grid: &mut BackscatterGrid,
    ping_times: &[MJD],
    bottom: &[Meter],
    bottom_offset: Meter,
    surface_exclusion: Meter,
) -> usize {
    let rows = nearest_rows(ping_times, &grid.time_axis);
    let mut masked = 0;

    for (r, &ping) in rows.iter().enumerate() {
        let line = bottom.get(ping).copied().unwrap_or(f64::NAN) - bottom_offset;
        for (c, &z) in grid.depth_axis.iter().enumerate() {
            if z < surface_exclusion || z >= line {
                grid.matrix[(r, c)] = Backscatter::Masked;
                masked += 1;
            }
        }
    }
    masked
}
