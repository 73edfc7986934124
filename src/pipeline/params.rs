//! # Pipeline parameters
//!
//! [`PipelineParams`] gathers the tunable knobs of the echogram pipeline. They are built
//! either with the fluent [`PipelineParamsBuilder`] (validated in
//! [`build`](PipelineParamsBuilder::build)) or deserialized from a configuration file and
//! checked with [`PipelineParams::validate`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use echogrid::pipeline::PipelineParams;
//!
//! let params = PipelineParams::builder()
//!     .edge_window(10)
//!     .sun_cycle_steps(1440)
//!     .mask_below_bottom(false)
//!     .build()
//!     .unwrap();
//! ```
use std::fmt;

use serde::Deserialize;

use crate::constants::{Meter, SECONDS_PER_DAY};
use crate::echogrid_errors::EchogridError;
use crate::solar::SunCycleConfig;

/// Configuration of [`EchogramPipeline`](crate::pipeline::EchogramPipeline).
///
/// Fields
/// -----------------
/// * `sun_cycle_steps` – samples per day of the sunrise/sunset search.
/// * `night_radiation_eps` – radiation (W/m²) at or below which a sample is night.
/// * `edge_window` – width, in pings, of the start/end zones of timestamp repair.
/// * `min_ping_interval` – smallest interval (days) timestamp repair may produce.
/// * `fill_position_gaps` – interpolate missing positions before solar classification.
/// * `mask_below_bottom` – tag cells near or below the bottom line, and cells near the
///   surface, as masked.
/// * `bottom_offset` – height (m) above the bottom of the bottom mask line.
/// * `surface_exclusion` – depth (m) of the surface exclusion line.
/// * `require_bottom` – fail a file for which no bottom line can be obtained.
///
/// Defaults
/// -----------------
/// * `sun_cycle_steps`: 2880 (30 s)
/// * `night_radiation_eps`: 1e-10
/// * `edge_window`: 5
/// * `min_ping_interval`: 1 ms
/// * `fill_position_gaps`: true
/// * `mask_below_bottom`: true
/// * `bottom_offset`: 3 m
/// * `surface_exclusion`: 3 m
/// * `require_bottom`: false
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    // --- Solar classification ---
    pub sun_cycle_steps: usize,
    pub night_radiation_eps: f64,
    pub fill_position_gaps: bool,

    // --- Timestamp repair ---
    pub edge_window: usize,
    pub min_ping_interval: f64,

    // --- Bottom line ---
    pub mask_below_bottom: bool,
    pub bottom_offset: Meter,
    pub surface_exclusion: Meter,
    pub require_bottom: bool,
}

impl PipelineParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`PipelineParamsBuilder`] initialized with the default values.
    pub fn builder() -> PipelineParamsBuilder {
        PipelineParamsBuilder::new()
    }

    /// Sampling of the sunrise/sunset search.
    pub fn sun_cycle(&self) -> SunCycleConfig {
        SunCycleConfig {
            steps: self.sun_cycle_steps,
            night_radiation_eps: self.night_radiation_eps,
        }
    }

    /// Check the parameter set.
    ///
    /// Validation rules
    /// -----------------
    /// * `sun_cycle_steps >= 2`
    /// * `night_radiation_eps >= 0`
    /// * `edge_window >= 1`
    /// * `min_ping_interval > 0` and finite
    /// * `bottom_offset >= 0` and finite
    /// * `surface_exclusion >= 0` and finite
    ///
    /// Errors
    /// ----------
    /// * [`EchogridError::InvalidPipelineParams`] naming the first rule that fails.
    pub fn validate(self) -> Result<Self, EchogridError> {
        if self.sun_cycle_steps < 2 {
            return Err(EchogridError::InvalidPipelineParams(
                "sun_cycle_steps must be >= 2".into(),
            ));
        }
        if !(self.night_radiation_eps >= 0.0) {
            return Err(EchogridError::InvalidPipelineParams(
                "night_radiation_eps must be >= 0".into(),
            ));
        }
        if self.edge_window == 0 {
            return Err(EchogridError::InvalidPipelineParams(
                "edge_window must be >= 1".into(),
            ));
        }
        if !(self.min_ping_interval.is_finite() && self.min_ping_interval > 0.0) {
            return Err(EchogridError::InvalidPipelineParams(
                "min_ping_interval must be finite and > 0".into(),
            ));
        }
        if !(self.bottom_offset.is_finite() && self.bottom_offset >= 0.0) {
            return Err(EchogridError::InvalidPipelineParams(
                "bottom_offset must be finite and >= 0".into(),
            ));
        }
        if !(self.surface_exclusion.is_finite() && self.surface_exclusion >= 0.0) {
            return Err(EchogridError::InvalidPipelineParams(
                "surface_exclusion must be finite and >= 0".into(),
            ));
        }
        Ok(self)
    }
}

impl Default for PipelineParams {
    fn default() -> Self {
        PipelineParams {
            sun_cycle_steps: 2880,
            night_radiation_eps: 1e-10,
            fill_position_gaps: true,

            edge_window: 5,
            min_ping_interval: 1e-3 / SECONDS_PER_DAY,

            mask_below_bottom: true,
            bottom_offset: 3.0,
            surface_exclusion: 3.0,
            require_bottom: false,
        }
    }
}

/// Builder for [`PipelineParams`], with validation.
#[derive(Debug, Clone)]
pub struct PipelineParamsBuilder {
    params: PipelineParams,
}

impl Default for PipelineParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: PipelineParams::default(),
        }
    }

    pub fn sun_cycle_steps(mut self, v: usize) -> Self {
        self.params.sun_cycle_steps = v;
        self
    }
    pub fn night_radiation_eps(mut self, v: f64) -> Self {
        self.params.night_radiation_eps = v;
        self
    }
    pub fn fill_position_gaps(mut self, v: bool) -> Self {
        self.params.fill_position_gaps = v;
        self
    }
    pub fn edge_window(mut self, v: usize) -> Self {
        self.params.edge_window = v;
        self
    }
    pub fn min_ping_interval(mut self, v: f64) -> Self {
        self.params.min_ping_interval = v;
        self
    }
    pub fn mask_below_bottom(mut self, v: bool) -> Self {
        self.params.mask_below_bottom = v;
        self
    }
    pub fn bottom_offset(mut self, v: Meter) -> Self {
        self.params.bottom_offset = v;
        self
    }
    pub fn surface_exclusion(mut self, v: Meter) -> Self {
        self.params.surface_exclusion = v;
        self
    }
    pub fn require_bottom(mut self, v: bool) -> Self {
        self.params.require_bottom = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(PipelineParams)` when every rule of [`PipelineParams::validate`] holds.
    /// * `Err(EchogridError::InvalidPipelineParams)` otherwise.
    pub fn build(self) -> Result<PipelineParams, EchogridError> {
        self.params.validate()
    }
}

impl fmt::Display for PipelineParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Echogram Pipeline Parameters")?;
        writeln!(f, "----------------------------")?;
        writeln!(f, "[Solar classification]")?;
        writeln!(f, "  sun_cycle_steps     = {}", self.sun_cycle_steps)?;
        writeln!(f, "  night_radiation_eps = {:e} W/m2", self.night_radiation_eps)?;
        writeln!(f, "  fill_position_gaps  = {}", self.fill_position_gaps)?;
        writeln!(f, "[Timestamp repair]")?;
        writeln!(f, "  edge_window         = {}", self.edge_window)?;
        writeln!(
            f,
            "  min_ping_interval   = {:.3} ms",
            self.min_ping_interval * SECONDS_PER_DAY * 1e3
        )?;
        writeln!(f, "[Bottom line]")?;
        writeln!(f, "  mask_below_bottom   = {}", self.mask_below_bottom)?;
        writeln!(f, "  bottom_offset       = {} m", self.bottom_offset)?;
        writeln!(f, "  surface_exclusion   = {} m", self.surface_exclusion)?;
        write!(f, "  require_bottom      = {}", self.require_bottom)
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let params = PipelineParams::builder().build().unwrap();
        assert_eq!(params, PipelineParams::default());
        assert_eq!(params.sun_cycle().steps, 2880);
    }

    #[test]
    fn test_builder_overrides() {
        let params = PipelineParams::builder()
            .edge_window(3)
            .sun_cycle_steps(720)
            .require_bottom(true)
            .build()
            .unwrap();
        assert_eq!(params.edge_window, 3);
        assert_eq!(params.sun_cycle_steps, 720);
        assert!(params.require_bottom);
        assert!(params.mask_below_bottom);
        assert_eq!(params.bottom_offset, 3.0);

        let exact = PipelineParams::builder()
            .bottom_offset(0.0)
            .surface_exclusion(0.0)
            .build()
            .unwrap();
        assert_eq!((exact.bottom_offset, exact.surface_exclusion), (0.0, 0.0));
    }

    #[test]
    fn test_validation_rules() {
        let cases = [
            PipelineParams::builder().sun_cycle_steps(1),
            PipelineParams::builder().night_radiation_eps(-1.0),
            PipelineParams::builder().night_radiation_eps(f64::NAN),
            PipelineParams::builder().edge_window(0),
            PipelineParams::builder().min_ping_interval(0.0),
            PipelineParams::builder().min_ping_interval(f64::INFINITY),
            PipelineParams::builder().bottom_offset(-1.0),
            PipelineParams::builder().bottom_offset(f64::NAN),
            PipelineParams::builder().surface_exclusion(-0.5),
            PipelineParams::builder().surface_exclusion(f64::INFINITY),
        ];
        for builder in cases {
            assert!(matches!(
                builder.build(),
                Err(EchogridError::InvalidPipelineParams(_))
            ));
        }
    }

    #[test]
    fn test_display() {
        let text = format!("{}", PipelineParams::default());
        assert!(text.contains("edge_window         = 5"));
        assert!(text.contains("min_ping_interval   = 1.000 ms"));
        assert!(text.contains("bottom_offset       = 3 m"));
        assert!(text.contains("surface_exclusion   = 3 m"));
    }
}
