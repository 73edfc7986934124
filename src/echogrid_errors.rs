use thiserror::Error;

#[derive(Error, Debug)]
pub enum EchogridError {
    #[error("The ping file contains no pings")]
    NoPings,

    #[error("The file-level maximum sample count is zero")]
    ZeroSampleCount,

    #[error("First ping has a degenerate range (start == stop) and no predecessor to borrow a stop from")]
    DegenerateFirstPing,

    #[error("Ping {ping} has an invalid range: start {start} m, stop {stop} m")]
    InvalidRange { ping: usize, start: f64, stop: f64 },

    #[error("Grid shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Bottom line has {found} depths but the file has {expected} pings")]
    BottomLengthMismatch { expected: usize, found: usize },

    #[error("A bottom line is required but neither a detected bottom nor a bathymetry provider is available")]
    MissingBottom,

    #[error("Invalid pipeline parameters: {0}")]
    InvalidPipelineParams(String),

    #[error("Invalid render options: {0}")]
    InvalidRenderOptions(String),

    #[error("Invalid bathymetry grid: {0}")]
    InvalidBathymetryGrid(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for EchogridError {
    fn eq(&self, other: &Self) -> bool {
        use EchogridError::*;
        match (self, other) {
            (NoPings, NoPings) => true,
            (ZeroSampleCount, ZeroSampleCount) => true,
            (DegenerateFirstPing, DegenerateFirstPing) => true,
            (MissingBottom, MissingBottom) => true,
            (
                InvalidRange {
                    ping: p1,
                    start: s1,
                    stop: e1,
                },
                InvalidRange {
                    ping: p2,
                    start: s2,
                    stop: e2,
                },
            ) => p1 == p2 && s1 == s2 && e1 == e2,
            (
                BottomLengthMismatch {
                    expected: e1,
                    found: f1,
                },
                BottomLengthMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (ShapeMismatch(a), ShapeMismatch(b)) => a == b,
            (InvalidPipelineParams(a), InvalidPipelineParams(b)) => a == b,
            (InvalidRenderOptions(a), InvalidRenderOptions(b)) => a == b,
            (InvalidBathymetryGrid(a), InvalidBathymetryGrid(b)) => a == b,

            // io and csv errors carry no comparable payload: same variant is enough
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
