//! Closed loops of edges.

use crate::edge::{Edge, EdgeSegment};
use crate::math::Point2;
use crate::shape::Bounds;

/// A closed, cyclic sequence of edges.
///
/// Edge `i` ends where edge `(i + 1) % n` starts. The edge list may be
/// replaced wholesale during coloring when a contour is too short to carry
/// three colors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    pub edges: Vec<Edge>,
}

impl Contour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Self {
        Self {
            edges: edges.into_iter().collect(),
        }
    }

    pub fn push(&mut self, edge: impl Into<Edge>) {
        self.edges.push(edge.into());
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Index of the first edge whose start does not meet its predecessor's
    /// end, if any.
    pub fn first_gap(&self) -> Option<usize> {
        let mut corner = self.edges.last()?.segment.end();
        for (index, edge) in self.edges.iter().enumerate() {
            if edge.segment.start() != corner {
                return Some(index);
            }
            corner = edge.segment.end();
        }
        None
    }

    pub fn bounds(&self, bounds: &mut Bounds) {
        for edge in &self.edges {
            edge.segment.bounds(bounds);
        }
    }

    /// Orientation of the contour: `+1` clockwise and `-1` counter-clockwise
    /// in a y-up frame, `0` when degenerate.
    ///
    /// Clockwise contours have their interior on the right of every edge,
    /// where signed distances are positive.
    pub fn winding(&self) -> i32 {
        let total = match self.edges.as_slice() {
            [] => return 0,
            [only] => {
                let a = only.segment.point(0.0);
                let b = only.segment.point(1.0 / 3.0);
                let c = only.segment.point(2.0 / 3.0);
                shoelace(a, b) + shoelace(b, c) + shoelace(c, a)
            }
            [first, second] => {
                let a = first.segment.point(0.0);
                let b = first.segment.point(0.5);
                let c = second.segment.point(0.0);
                let d = second.segment.point(0.5);
                shoelace(a, b) + shoelace(b, c) + shoelace(c, d) + shoelace(d, a)
            }
            edges => {
                let mut total = 0.0;
                let mut prev = edges[edges.len() - 1].segment.point(0.0);
                for edge in edges {
                    let cur = edge.segment.point(0.0);
                    total += shoelace(prev, cur);
                    prev = cur;
                }
                total
            }
        };
        if total > 0.0 {
            1
        } else if total < 0.0 {
            -1
        } else {
            0
        }
    }

    /// Reverse the direction of travel, flipping the sign of every distance.
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for edge in &mut self.edges {
            edge.segment = match edge.segment {
                EdgeSegment::Linear([a, b]) => EdgeSegment::Linear([b, a]),
                EdgeSegment::Quadratic([a, b, c]) => EdgeSegment::Quadratic([c, b, a]),
                EdgeSegment::Cubic([a, b, c, d]) => EdgeSegment::Cubic([d, c, b, a]),
            };
        }
    }
}

fn shoelace(a: Point2, b: Point2) -> f64 {
    (b.x - a.x) * (a.y + b.y)
}
