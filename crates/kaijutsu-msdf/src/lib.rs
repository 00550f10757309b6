//! Multi-channel signed distance field generation for Kaijutsu glyphs.
//!
//! Turns vector outlines into MSDF bitmaps that a shader samples with
//! `median(r, g, b)` to draw crisp text and icons at any scale.
//!
//! # Pipeline
//!
//! ```text
//! kurbo::BezPath ──► Shape ──► color_edges_simple ──► generate_msdf ──► correct_errors ──► MsdfBitmap
//!                     │         (mutates edges)        (row-parallel)    (mutates bitmap)
//!                     └── bounds ──► autoframe ──► Projection + range
//! ```
//!
//! [`MsdfGenerator`] runs the whole chain from an [`MsdfConfig`]; the stages
//! are also public for callers that frame or color shapes themselves.
//!
//! # Conventions
//!
//! - Shape space is y-up. Distances are positive to the right of an edge's
//!   direction of travel, so clockwise contours are filled.
//! - Channel values are `distance / range + 0.5`: 0.5 sits on the outline
//!   and `range` shape units span the full 0..1 band. A channel no edge
//!   reaches reads 0, the far outside end.
//! - Coloring is deterministic for a given seed.

pub mod bitmap;
pub mod coloring;
pub mod config;
pub mod contour;
pub mod correction;
pub mod distance;
pub mod edge;
pub mod equation;
mod error;
pub mod generator;
pub mod math;
pub mod projection;
pub mod shape;

pub use bitmap::{Bitmap, MsdfBitmap, SdfBitmap};
pub use coloring::color_edges_simple;
pub use config::MsdfConfig;
pub use contour::Contour;
pub use correction::{CorrectionStats, correct_errors};
pub use distance::SignedDistance;
pub use edge::{Edge, EdgeColor, EdgeSegment};
pub use error::MsdfError;
pub use generator::{GeneratedMsdf, MsdfGenerator, generate_msdf, generate_pseudo_sdf, generate_sdf};
pub use math::{Point2, Vector2, median};
pub use projection::{Framing, Projection, Range};
pub use shape::{Bounds, Shape};

/// Result type for distance field operations.
pub type Result<T> = std::result::Result<T, MsdfError>;
