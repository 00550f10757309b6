//! Error types for distance field generation.

use thiserror::Error;

/// Structural problems that stop a generation before any work is scheduled.
///
/// Numeric degeneracies (zero-length edges, vanishing leading coefficients,
/// channels with no edges) are not errors; they degrade to well-defined
/// output instead.
#[derive(Error, Debug)]
pub enum MsdfError {
    /// Output bitmap with a zero dimension.
    #[error("invalid bitmap dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length does not match the bitmap dimensions.
    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Distance range must be finite and positive.
    #[error("invalid distance range {0}")]
    InvalidRange(f64),

    /// Projection scale must be finite and positive on both axes.
    #[error("invalid projection scale ({x}, {y})")]
    InvalidScale { x: f64, y: f64 },

    /// Configuration value outside its valid domain.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// An edge does not start where its predecessor ends.
    #[error("contour {contour} is not closed at edge {edge}")]
    OpenContour { contour: usize, edge: usize },

    /// The distance range leaves no room for the shape in the bitmap.
    #[error("shape cannot be framed in a {width}x{height} bitmap")]
    CannotFit { width: u32, height: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON serialize error: {0}")]
    RonSerialize(#[from] ron::Error),
}
