//! Shapes: ordered sets of contours, plus the `kurbo` bridge.

use kurbo::{BezPath, PathEl};
use serde::{Deserialize, Serialize};

use crate::contour::Contour;
use crate::edge::{Edge, EdgeSegment};
use crate::error::MsdfError;
use crate::math::Point2;

/// Axis-aligned bounding box in shape space (y-up naming).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    /// Inverted box that any included point replaces.
    pub const EMPTY: Bounds = Bounds {
        left: f64::MAX,
        bottom: f64::MAX,
        right: -f64::MAX,
        top: -f64::MAX,
    };

    pub fn include(&mut self, p: Point2) {
        self.left = self.left.min(p.x);
        self.bottom = self.bottom.min(p.y);
        self.right = self.right.max(p.x);
        self.top = self.top.max(p.y);
    }

    /// True until something with positive area has been included.
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.bottom >= self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A vector outline: contours plus an axis-flip flag.
///
/// Edge coloring mutates the shape in place and is not reversible. Re-build
/// the shape before coloring it again with different parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub contours: Vec<Contour>,
    /// Write output rows bottom-up, for y-up shapes going to y-down images.
    pub inverse_y_axis: bool,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contours(contours: impl IntoIterator<Item = Contour>) -> Self {
        Self {
            contours: contours.into_iter().collect(),
            inverse_y_axis: false,
        }
    }

    pub fn add_contour(&mut self, contour: Contour) -> &mut Contour {
        self.contours.push(contour);
        let last = self.contours.len() - 1;
        &mut self.contours[last]
    }

    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.contours.iter().flat_map(|c| c.edges.iter())
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut Edge> {
        self.contours.iter_mut().flat_map(|c| c.edges.iter_mut())
    }

    /// Check the closed-loop invariant of every contour.
    pub fn validate(&self) -> Result<(), MsdfError> {
        for (contour_index, contour) in self.contours.iter().enumerate() {
            if let Some(edge) = contour.first_gap() {
                return Err(MsdfError::OpenContour {
                    contour: contour_index,
                    edge,
                });
            }
        }
        Ok(())
    }

    /// Split single-edge contours into thirds so corner detection and
    /// coloring always see at least three edges on a lone curve.
    pub fn normalize(&mut self) {
        for contour in &mut self.contours {
            if let [edge] = contour.edges.as_slice() {
                contour.edges = edge.split_in_thirds().to_vec();
            }
        }
    }

    /// Tight bounds, including curve extrema.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::EMPTY;
        for contour in &self.contours {
            contour.bounds(&mut bounds);
        }
        bounds
    }

    /// Build a shape from path elements.
    ///
    /// Each `MoveTo` starts a contour. A sub-path whose last point differs
    /// from its start gets a closing line, whether or not it ends in
    /// `ClosePath`. Zero-length lines are skipped.
    pub fn from_path_elements(elements: impl IntoIterator<Item = PathEl>) -> Self {
        let mut shape = Shape::new();
        let mut builder = ContourBuilder::default();

        for el in elements {
            match el {
                PathEl::MoveTo(p) => {
                    builder.finish_into(&mut shape);
                    builder.start(p.into());
                }
                PathEl::LineTo(p) => {
                    let p: Point2 = p.into();
                    let from = builder.cursor;
                    if p != from {
                        builder.push(EdgeSegment::linear(from, p));
                    }
                }
                PathEl::QuadTo(c, p) => {
                    let from = builder.cursor;
                    builder.push(EdgeSegment::quadratic(from, c.into(), p.into()));
                }
                PathEl::CurveTo(c1, c2, p) => {
                    let from = builder.cursor;
                    builder.push(EdgeSegment::cubic(from, c1.into(), c2.into(), p.into()));
                }
                PathEl::ClosePath => builder.finish_into(&mut shape),
            }
        }
        builder.finish_into(&mut shape);
        shape
    }
}

impl From<&BezPath> for Shape {
    fn from(path: &BezPath) -> Self {
        Shape::from_path_elements(path.elements().iter().copied())
    }
}

/// Sub-path end gaps at or below this are welded shut.
const CLOSE_TOLERANCE: f64 = 1e-9;

/// Accumulates one sub-path at a time.
#[derive(Default)]
struct ContourBuilder {
    start: Point2,
    cursor: Point2,
    edges: Vec<Edge>,
}

impl ContourBuilder {
    fn start(&mut self, p: Point2) {
        self.start = p;
        self.cursor = p;
    }

    fn push(&mut self, segment: EdgeSegment) {
        self.cursor = segment.end();
        self.edges.push(Edge::new(segment));
    }

    fn finish_into(&mut self, shape: &mut Shape) {
        if self.edges.is_empty() {
            self.cursor = self.start;
            return;
        }
        let gap = (self.cursor - self.start).length();
        if gap > CLOSE_TOLERANCE {
            let closing = EdgeSegment::linear(self.cursor, self.start);
            self.push(closing);
        } else if gap > 0.0 {
            // Rounding noise from arc approximation; weld instead of adding
            // a sliver edge that would read as a corner.
            if let Some(last) = self.edges.last_mut() {
                last.segment.set_end(self.start);
            }
        }
        shape
            .contours
            .push(Contour::from_edges(std::mem::take(&mut self.edges)));
        self.cursor = self.start;
    }
}

/// Axis-aligned rectangle as a single clockwise contour.
#[cfg(test)]
pub(crate) fn rectangle(min: Point2, max: Point2) -> Shape {
    let corners = [
        Point2::new(min.x, min.y),
        Point2::new(min.x, max.y),
        Point2::new(max.x, max.y),
        Point2::new(max.x, min.y),
    ];
    Shape::from_contours([Contour::from_edges(
        (0..4).map(|i| Edge::new(EdgeSegment::linear(corners[i], corners[(i + 1) % 4]))),
    )])
}

/// Circle from four cubic arcs with exactly shared endpoints, clockwise.
#[cfg(test)]
pub(crate) fn circle(cx: f64, cy: f64, r: f64) -> Shape {
    const K: f64 = 0.552_284_749_831;
    let k = K * r;
    let v = Point2::new;
    let e = v(cx + r, cy);
    let n = v(cx, cy + r);
    let w = v(cx - r, cy);
    let s = v(cx, cy - r);
    Shape::from_contours([Contour::from_edges([
        Edge::new(EdgeSegment::cubic(e, v(cx + r, cy - k), v(cx + k, cy - r), s)),
        Edge::new(EdgeSegment::cubic(s, v(cx - k, cy - r), v(cx - r, cy - k), w)),
        Edge::new(EdgeSegment::cubic(w, v(cx - r, cy + k), v(cx - k, cy + r), n)),
        Edge::new(EdgeSegment::cubic(n, v(cx + k, cy + r), v(cx + r, cy + k), e)),
    ])])
}
