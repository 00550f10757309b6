//! Distance field generation.
//!
//! Every output pixel is independent: rows are filled in parallel, each
//! worker owning its rows and reading the (already colored) shape. The
//! per-channel minimum trackers live on the worker's stack, so the result
//! does not depend on how rows are partitioned across threads.

use rayon::prelude::*;
use tracing::debug;

use crate::bitmap::{Bitmap, MsdfBitmap, SdfBitmap};
use crate::coloring::color_edges_simple;
use crate::config::MsdfConfig;
use crate::correction::{CorrectionStats, correct_errors};
use crate::distance::SignedDistance;
use crate::edge::EdgeSegment;
use crate::error::MsdfError;
use crate::math::{Point2, Vector2};
use crate::projection::{Framing, Projection};
use crate::shape::Shape;

/// Channel value written when no edge contributes to a channel: the
/// outside end of the normalized range, where interiors read above 0.5.
pub const EMPTY_CHANNEL_VALUE: f32 = 0.0;

/// Running minimum for one channel at one pixel.
struct ChannelMin<'a> {
    distance: SignedDistance,
    edge: Option<&'a EdgeSegment>,
    param: f64,
}

impl<'a> ChannelMin<'a> {
    fn new() -> Self {
        Self {
            distance: SignedDistance::INFINITE,
            edge: None,
            param: 0.0,
        }
    }

    fn offer(&mut self, distance: SignedDistance, edge: &'a EdgeSegment, param: f64) {
        if distance < self.distance {
            self.distance = distance;
            self.edge = Some(edge);
            self.param = param;
        }
    }

    /// Pseudo-distance correction on the winner, then normalization.
    fn resolve(mut self, p: Point2, range: f64) -> f32 {
        let Some(edge) = self.edge else {
            return EMPTY_CHANNEL_VALUE;
        };
        edge.distance_to_pseudo_distance(&mut self.distance, p, self.param);
        normalize_distance(self.distance.distance, range)
    }
}

/// Map a signed distance in shape units into `[0, 1]` around 0.5.
fn normalize_distance(distance: f64, range: f64) -> f32 {
    (distance / range + 0.5) as f32
}

fn msdf_pixel(shape: &Shape, p: Point2, range: f64) -> [f32; 3] {
    let mut r = ChannelMin::new();
    let mut g = ChannelMin::new();
    let mut b = ChannelMin::new();

    for edge in shape.edges() {
        let (distance, param) = edge.signed_distance(p);
        if edge.color.has_red() {
            r.offer(distance, &edge.segment, param);
        }
        if edge.color.has_green() {
            g.offer(distance, &edge.segment, param);
        }
        if edge.color.has_blue() {
            b.offer(distance, &edge.segment, param);
        }
    }

    [r.resolve(p, range), g.resolve(p, range), b.resolve(p, range)]
}

fn pseudo_sdf_pixel(shape: &Shape, p: Point2, range: f64) -> [f32; 1] {
    let mut nearest = ChannelMin::new();
    for edge in shape.edges() {
        let (distance, param) = edge.signed_distance(p);
        nearest.offer(distance, &edge.segment, param);
    }
    [nearest.resolve(p, range)]
}

fn sdf_pixel(shape: &Shape, p: Point2, range: f64) -> [f32; 1] {
    let mut nearest: Option<SignedDistance> = None;
    for edge in shape.edges() {
        let (distance, _) = edge.signed_distance(p);
        if nearest.is_none_or(|best| distance < best) {
            nearest = Some(distance);
        }
    }
    match nearest {
        Some(d) => [normalize_distance(d.distance, range)],
        None => [EMPTY_CHANNEL_VALUE],
    }
}

fn check_inputs(projection: &Projection, range: f64) -> Result<(), MsdfError> {
    projection.validate()?;
    if !range.is_finite() || range <= 0.0 {
        return Err(MsdfError::InvalidRange(range));
    }
    Ok(())
}

/// Fill `output` row-parallel with `pixel(shape, p, range)`.
///
/// Output row `row` samples shape-space row `h - 1 - row` when the shape's
/// y axis is inverted.
fn fill<const N: usize>(
    output: &mut Bitmap<N>,
    shape: &Shape,
    projection: &Projection,
    range: f64,
    pixel: impl Fn(&Shape, Point2, f64) -> [f32; N] + Sync,
) {
    let width = output.width() as usize;
    let height = output.height() as usize;
    let flip = shape.inverse_y_axis;

    output
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, pixels)| {
            let y = if flip { height - 1 - row } else { row };
            for (x, out) in pixels.iter_mut().enumerate() {
                let p = projection.unproject_pixel(x as u32, y as u32);
                *out = pixel(shape, p, range);
            }
        });
}

/// Generate a multi-channel signed distance field.
///
/// Each channel holds the pseudo-distance to the nearest edge whose color
/// includes it, mapped so that 0.5 lies on the outline and `range` (in
/// shape units) spans 0 to 1. Distances are positive on the right-hand
/// side of edges, so the interior of a clockwise contour reads above 0.5.
/// The shape should be colored first; black edges contribute nothing.
#[tracing::instrument(
    skip_all,
    name = "msdf.generate",
    fields(width = output.width(), height = output.height(), edges = shape.edge_count())
)]
pub fn generate_msdf(
    output: &mut MsdfBitmap,
    shape: &Shape,
    projection: &Projection,
    range: f64,
) -> Result<(), MsdfError> {
    check_inputs(projection, range)?;
    fill(output, shape, projection, range, msdf_pixel);
    Ok(())
}

/// Generate a single-channel field of pseudo-distances to the nearest edge,
/// regardless of edge color.
#[tracing::instrument(skip_all, name = "msdf.generate_pseudo_sdf")]
pub fn generate_pseudo_sdf(
    output: &mut SdfBitmap,
    shape: &Shape,
    projection: &Projection,
    range: f64,
) -> Result<(), MsdfError> {
    check_inputs(projection, range)?;
    fill(output, shape, projection, range, pseudo_sdf_pixel);
    Ok(())
}

/// Generate a single-channel field of true Euclidean signed distances.
#[tracing::instrument(skip_all, name = "msdf.generate_sdf")]
pub fn generate_sdf(
    output: &mut SdfBitmap,
    shape: &Shape,
    projection: &Projection,
    range: f64,
) -> Result<(), MsdfError> {
    check_inputs(projection, range)?;
    fill(output, shape, projection, range, sdf_pixel);
    Ok(())
}

/// Result of a full pipeline run.
#[derive(Clone, Debug)]
pub struct GeneratedMsdf {
    pub bitmap: MsdfBitmap,
    pub framing: Framing,
    pub clashes: CorrectionStats,
}

/// End-to-end generator: normalize, color, generate, correct.
#[derive(Clone, Debug, Default)]
pub struct MsdfGenerator {
    config: MsdfConfig,
}

impl MsdfGenerator {
    pub fn new(config: MsdfConfig) -> Result<Self, MsdfError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MsdfConfig {
        &self.config
    }

    /// Frame the shape automatically into a `width × height` bitmap and
    /// generate its corrected MSDF.
    ///
    /// Colors `shape` in place.
    #[tracing::instrument(skip(self, shape), name = "msdf.pipeline")]
    pub fn generate(
        &self,
        shape: &mut Shape,
        width: u32,
        height: u32,
    ) -> Result<GeneratedMsdf, MsdfError> {
        let bitmap = MsdfBitmap::new(width, height)?;
        shape.validate()?;
        let framing = shape
            .bounds()
            .autoframe(width, height, self.config.range)
            .ok_or(MsdfError::CannotFit { width, height })?;
        self.run(shape, bitmap, framing)
    }

    /// Generate with a caller-chosen projection. A pixel range resolves
    /// against the mean of the two axis scales.
    #[tracing::instrument(skip(self, shape), name = "msdf.pipeline")]
    pub fn generate_with_projection(
        &self,
        shape: &mut Shape,
        width: u32,
        height: u32,
        projection: Projection,
    ) -> Result<GeneratedMsdf, MsdfError> {
        let bitmap = MsdfBitmap::new(width, height)?;
        projection.validate()?;
        shape.validate()?;
        let mean_scale = 0.5 * (projection.scale.x + projection.scale.y);
        let framing = Framing {
            projection,
            range: self.config.range.to_units(mean_scale),
        };
        self.run(shape, bitmap, framing)
    }

    fn run(
        &self,
        shape: &mut Shape,
        mut bitmap: MsdfBitmap,
        framing: Framing,
    ) -> Result<GeneratedMsdf, MsdfError> {
        shape.normalize();
        if let Some(flip) = self.config.flip_y {
            shape.inverse_y_axis = flip;
        }
        color_edges_simple(shape, self.config.angle_threshold, self.config.seed);
        generate_msdf(&mut bitmap, shape, &framing.projection, framing.range)?;

        let clashes = if self.config.error_correction_enabled() {
            let scale = framing.projection.scale;
            let threshold = Vector2::new(
                self.config.edge_threshold / (scale.x * framing.range),
                self.config.edge_threshold / (scale.y * framing.range),
            );
            correct_errors(&mut bitmap, threshold)
        } else {
            CorrectionStats::default()
        };

        debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            range = framing.range,
            cardinal = clashes.cardinal,
            diagonal = clashes.diagonal,
            "msdf generated"
        );
        Ok(GeneratedMsdf {
            bitmap,
            framing,
            clashes,
        })
    }
}
