//! Error types for morphology filters

use thiserror::Error;

/// Errors reported by the extreme filters and the morphology operations.
///
/// All parameter checks run before the array is touched, so an in-place
/// call that returns an error leaves its input unchanged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid region: axis {axis} is out of range for an array with {ndim} axes")]
    InvalidRegion { axis: usize, ndim: usize },

    #[error("Invalid radius: {dist} (radius must be at least 1)")]
    InvalidRadius { dist: usize },

    #[error("Axis {axis} too short: length {len} is below the window size {window}")]
    AxisTooShort {
        axis: usize,
        len: usize,
        window: usize,
    },

    #[error("Unsupported element type: {0}")]
    TypeUnsupported(String),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Result type alias for morphology operations
pub type Result<T> = std::result::Result<T, Error>;
