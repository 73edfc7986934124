//! # Render options
//!
//! Display configuration handed to an echogram renderer together with an
//! [`Echogram`](crate::pipeline::Echogram). Nothing here feeds back into the numerical
//! core: the options only describe how a grid is turned into colour indices and how the
//! figure is labelled.
//!
//! ## Overview
//!
//! - [`RenderOptions`] – threshold, colour table, titles, output target.
//! - [`RenderOptions::quantize`] – grid to colour-table indices.
//! - [`display_depth_limit`] – rounded lower limit of the depth axis.
//! - [`time_axis_label`] – label of the time axis of a file.
use nalgebra::DMatrix;
use serde::Deserialize;

use crate::constants::{Meter, MJD};
use crate::echogrid_errors::EchogridError;
use crate::pings::Backscatter;
use crate::resample::BackscatterGrid;
use crate::time::mjd_to_epoch;

/// Simrad EK500 colour table, from weakest to strongest echo.
pub const EK500_COLORMAP: [[u8; 3]; 12] = [
    [159, 159, 159],
    [95, 95, 95],
    [0, 0, 255],
    [0, 0, 128],
    [0, 191, 0],
    [0, 128, 0],
    [255, 255, 0],
    [255, 128, 0],
    [255, 0, 191],
    [255, 0, 0],
    [166, 83, 60],
    [120, 60, 40],
];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Display configuration of an echogram.
///
/// Fields
/// -----------------
/// * `threshold` – `[low, high]` dB range mapped onto the colour table.
/// * `colormap` – RGB colour table, index 0 of the quantized grid being reserved for
///   missing and masked cells.
/// * `title`, `x_label`, `y_label` – figure texts.
/// * `figure_target` – where the renderer should write the figure, `None` for on-screen.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub threshold: [f64; 2],
    pub colormap: Vec<[u8; 3]>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub figure_target: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            threshold: [-72.0, -36.0],
            colormap: EK500_COLORMAP.to_vec(),
            title: "Echogram".into(),
            x_label: "Ping".into(),
            y_label: "Range (m)".into(),
            figure_target: None,
        }
    }
}

impl RenderOptions {
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::new()
    }

    /// Check the options.
    ///
    /// Errors
    /// ----------
    /// * [`EchogridError::InvalidRenderOptions`] if the threshold bounds are not finite or
    ///   not increasing, or if the colour table is empty or has 256 entries or more.
    pub fn validate(self) -> Result<Self, EchogridError> {
        let [low, high] = self.threshold;
        if !(low.is_finite() && high.is_finite()) {
            return Err(EchogridError::InvalidRenderOptions(
                "threshold bounds must be finite".into(),
            ));
        }
        if low >= high {
            return Err(EchogridError::InvalidRenderOptions(format!(
                "threshold low ({low}) must be below high ({high})"
            )));
        }
        if self.colormap.is_empty() || self.colormap.len() > u8::MAX as usize {
            return Err(EchogridError::InvalidRenderOptions(format!(
                "colormap must have between 1 and 255 entries, got {}",
                self.colormap.len()
            )));
        }
        Ok(self)
    }

    /// Colour index of one sample: `0` for missing or masked samples, otherwise
    /// `ceil((v − low) / (high − low) · (N − 1)) + 1` clamped to `[1, N]`.
    pub fn color_index(&self, sample: Backscatter) -> u8 {
        let Some(value) = sample.db() else {
            return 0;
        };
        let [low, high] = self.threshold;
        let n = self.colormap.len() as f64;
        let index = ((value - low) / (high - low) * (n - 1.0)).ceil() + 1.0;
        index.clamp(1.0, n) as u8
    }

    /// Colour indices of a whole grid, same shape as `grid.matrix`.
    pub fn quantize(&self, grid: &BackscatterGrid) -> DMatrix<u8> {
        grid.matrix.map(|sample| self.color_index(sample))
    }
}

/// Builder for [`RenderOptions`], with validation.
#[derive(Debug, Clone, Default)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threshold(mut self, low: f64, high: f64) -> Self {
        self.options.threshold = [low, high];
        self
    }
    pub fn colormap(mut self, colormap: Vec<[u8; 3]>) -> Self {
        self.options.colormap = colormap;
        self
    }
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.title = title.into();
        self
    }
    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.options.x_label = label.into();
        self
    }
    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.options.y_label = label.into();
        self
    }
    pub fn figure_target(mut self, target: impl Into<String>) -> Self {
        self.options.figure_target = Some(target.into());
        self
    }

    pub fn build(self) -> Result<RenderOptions, EchogridError> {
        self.options.validate()
    }
}

/// Lower limit of the depth axis for a file whose deepest bottom is `max_depth`.
///
/// The limit is rounded up to a fixed ladder (`104`, `520`, `1049`, `2600`, `5200` m);
/// beyond 5000 m it is `max_depth + 10`. Returns `None` for an unknown (`NaN`) depth.
pub fn display_depth_limit(max_depth: Meter) -> Option<Meter> {
    if max_depth.is_nan() {
        return None;
    }
    let limit = match max_depth {
        d if d < 100.0 => 104.0,
        d if d < 500.0 => 520.0,
        d if d < 1000.0 => 1049.0,
        d if d < 2500.0 => 2600.0,
        d if d < 5000.0 => 5200.0,
        d => d + 10.0,
    };
    Some(limit)
}

fn format_date(mjd: MJD) -> String {
    let (year, month, day, ..) = mjd_to_epoch(mjd).to_gregorian_utc();
    let month = MONTHS[(month as usize).clamp(1, 12) - 1];
    format!("{day:02}-{month}-{year}")
}

/// Label of the time axis of a file spanning `first` to `last` (MJD).
///
/// ```text
/// Time in UTC (hour:min)
/// 26-Jun-2015 to 27-Jun-2015
/// ```
/// The second date is omitted when both ends fall on the same day.
pub fn time_axis_label(first: MJD, last: MJD) -> String {
    let start = format_date(first);
    let end = format_date(last);
    if start == end {
        format!("Time in UTC (hour:min)\n{start}")
    } else {
        format!("Time in UTC (hour:min)\n{start} to {end}")
    }
}

#[cfg(test)]
mod render_options_test {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = RenderOptions::builder().build().unwrap();
        assert_eq!(options.threshold, [-72.0, -36.0]);
        assert_eq!(options.colormap.len(), 12);
        assert_eq!(options.y_label, "Range (m)");
        assert!(options.figure_target.is_none());
    }

    #[test]
    fn test_validation() {
        assert!(RenderOptions::builder().threshold(-36.0, -72.0).build().is_err());
        assert!(RenderOptions::builder().threshold(-72.0, -72.0).build().is_err());
        assert!(RenderOptions::builder()
            .threshold(f64::NAN, -36.0)
            .build()
            .is_err());
        assert!(matches!(
            RenderOptions::builder().colormap(vec![]).build(),
            Err(EchogridError::InvalidRenderOptions(_))
        ));
        assert!(RenderOptions::builder()
            .colormap(vec![[0, 0, 0]; 256])
            .build()
            .is_err());
    }

    #[test]
    fn test_color_index() {
        let options = RenderOptions::default();
        assert_eq!(options.color_index(Backscatter::Missing), 0);
        assert_eq!(options.color_index(Backscatter::Masked), 0);
        assert_eq!(options.color_index(Backscatter::Db(-100.0)), 1);
        assert_eq!(options.color_index(Backscatter::Db(-72.0)), 1);
        assert_eq!(options.color_index(Backscatter::Db(-36.0)), 12);
        assert_eq!(options.color_index(Backscatter::Db(0.0)), 12);
        // (−54 + 72) / 36 · 11 = 5.5 -> 6 -> 7
        assert_eq!(options.color_index(Backscatter::Db(-54.0)), 7);
    }

    #[test]
    fn test_quantize_grid() {
        let grid = BackscatterGrid {
            time_axis: vec![0.0, 1.0],
            depth_axis: vec![0.0],
            matrix: DMatrix::from_row_slice(2, 1, &[Backscatter::Db(-36.0), Backscatter::Missing]),
        };
        let indices = RenderOptions::default().quantize(&grid);
        assert_eq!(indices.shape(), (2, 1));
        assert_eq!(indices[(0, 0)], 12);
        assert_eq!(indices[(1, 0)], 0);
    }

    #[test]
    fn test_display_depth_limit() {
        assert_eq!(display_depth_limit(42.0), Some(104.0));
        assert_eq!(display_depth_limit(100.0), Some(520.0));
        assert_eq!(display_depth_limit(999.0), Some(1049.0));
        assert_eq!(display_depth_limit(2000.0), Some(2600.0));
        assert_eq!(display_depth_limit(4999.0), Some(5200.0));
        assert_eq!(display_depth_limit(6000.0), Some(6010.0));
        assert_eq!(display_depth_limit(f64::NAN), None);
    }

    #[test]
    fn test_time_axis_label() {
        // 2015-06-26T01:00 and 2015-06-26T23:00
        assert_eq!(
            time_axis_label(57199.0 + 1.0 / 24.0, 57199.0 + 23.0 / 24.0),
            "Time in UTC (hour:min)\n26-Jun-2015"
        );
        assert_eq!(
            time_axis_label(57199.5, 57200.25),
            "Time in UTC (hour:min)\n26-Jun-2015 to 27-Jun-2015"
        );
        assert_eq!(format_date(57174.5), "01-Jun-2015");
    }
}
