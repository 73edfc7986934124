pub mod bathymetry;
pub mod constants;
pub mod echogrid_errors;
pub mod pings;
pub mod pipeline;
pub mod render_options;
pub mod resample;
pub mod solar;
pub mod time;

pub use echogrid_errors::EchogridError;
pub use pipeline::{Echogram, EchogramPipeline, PipelineParams};
