//! Edge segments and their channel colors.
//!
//! [`EdgeSegment`] is a closed sum over the three curve kinds. The per-pixel,
//! per-edge distance query dispatches with a `match`, so the hot loop never
//! goes through a vtable.

use std::ops::{BitAnd, BitOr, BitXor};

use serde::{Deserialize, Serialize};

use crate::distance::SignedDistance;
use crate::equation::solve_cubic;
use crate::equation::solve_quadratic;
use crate::math::{Point2, Vector2, cross, dot, mix, non_zero_sign};
use crate::shape::Bounds;

/// Iterations of Newton refinement per starting point on a cubic.
const CUBIC_SEARCH_STEPS: usize = 4;

/// Evenly spaced starting parameters for the cubic search, minus one.
const CUBIC_SEARCH_STARTS: usize = 4;

/// Set of output channels an edge contributes to.
///
/// Encoded as a 3-bit mask: red = 1, green = 2, blue = 4.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EdgeColor {
    /// Not yet colored. Contributes to no channel.
    #[default]
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
}

impl EdgeColor {
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Build a color from the low three bits of `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 7 {
            0 => EdgeColor::Black,
            1 => EdgeColor::Red,
            2 => EdgeColor::Green,
            3 => EdgeColor::Yellow,
            4 => EdgeColor::Blue,
            5 => EdgeColor::Magenta,
            6 => EdgeColor::Cyan,
            _ => EdgeColor::White,
        }
    }

    pub const fn has_red(self) -> bool {
        self.bits() & 1 != 0
    }

    pub const fn has_green(self) -> bool {
        self.bits() & 2 != 0
    }

    pub const fn has_blue(self) -> bool {
        self.bits() & 4 != 0
    }

    /// Number of channels in the mask.
    pub const fn channel_count(self) -> u32 {
        self.bits().count_ones()
    }
}

impl BitAnd for EdgeColor {
    type Output = EdgeColor;
    fn bitand(self, rhs: EdgeColor) -> EdgeColor {
        EdgeColor::from_bits(self.bits() & rhs.bits())
    }
}

impl BitOr for EdgeColor {
    type Output = EdgeColor;
    fn bitor(self, rhs: EdgeColor) -> EdgeColor {
        EdgeColor::from_bits(self.bits() | rhs.bits())
    }
}

impl BitXor for EdgeColor {
    type Output = EdgeColor;
    fn bitxor(self, rhs: EdgeColor) -> EdgeColor {
        EdgeColor::from_bits(self.bits() ^ rhs.bits())
    }
}

/// Geometry of one outline piece.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeSegment {
    Linear([Point2; 2]),
    Quadratic([Point2; 3]),
    Cubic([Point2; 4]),
}

impl EdgeSegment {
    pub fn linear(p0: Point2, p1: Point2) -> Self {
        EdgeSegment::Linear([p0, p1])
    }

    /// A control point coincident with an endpoint is moved to the chord
    /// midpoint so the start and end tangents are defined.
    pub fn quadratic(p0: Point2, mut p1: Point2, p2: Point2) -> Self {
        if p1 == p0 || p1 == p2 {
            p1 = 0.5 * (p0 + p2);
        }
        EdgeSegment::Quadratic([p0, p1, p2])
    }

    /// Both control points collapsed onto endpoints degrade to a straight
    /// cubic with evenly spaced controls.
    pub fn cubic(p0: Point2, mut p1: Point2, mut p2: Point2, p3: Point2) -> Self {
        if (p1 == p0 || p1 == p3) && (p2 == p0 || p2 == p3) {
            p1 = mix(p0, p3, 1.0 / 3.0);
            p2 = mix(p0, p3, 2.0 / 3.0);
        }
        EdgeSegment::Cubic([p0, p1, p2, p3])
    }

    pub fn control_points(&self) -> &[Point2] {
        match self {
            EdgeSegment::Linear(p) => p,
            EdgeSegment::Quadratic(p) => p,
            EdgeSegment::Cubic(p) => p,
        }
    }

    pub fn start(&self) -> Point2 {
        self.control_points()[0]
    }

    pub fn end(&self) -> Point2 {
        match self {
            EdgeSegment::Linear(p) => p[1],
            EdgeSegment::Quadratic(p) => p[2],
            EdgeSegment::Cubic(p) => p[3],
        }
    }

    /// Move the final endpoint, leaving the other control points in place.
    pub fn set_end(&mut self, p: Point2) {
        match self {
            EdgeSegment::Linear(c) => c[1] = p,
            EdgeSegment::Quadratic(c) => c[2] = p,
            EdgeSegment::Cubic(c) => c[3] = p,
        }
    }

    /// Point on the curve at parameter `t`.
    pub fn point(&self, t: f64) -> Point2 {
        match self {
            EdgeSegment::Linear(p) => mix(p[0], p[1], t),
            EdgeSegment::Quadratic(p) => mix(mix(p[0], p[1], t), mix(p[1], p[2], t), t),
            EdgeSegment::Cubic(p) => {
                let p12 = mix(p[1], p[2], t);
                mix(
                    mix(mix(p[0], p[1], t), p12, t),
                    mix(p12, mix(p[2], p[3], t), t),
                    t,
                )
            }
        }
    }

    /// Tangent (unnormalized) at parameter `t`.
    ///
    /// Degenerate curves whose tangent vanishes at an end fall back to the
    /// chord through the neighbouring control point.
    pub fn direction(&self, t: f64) -> Vector2 {
        match self {
            EdgeSegment::Linear(p) => p[1] - p[0],
            EdgeSegment::Quadratic(p) => {
                let tangent = mix(p[1] - p[0], p[2] - p[1], t);
                if tangent.is_zero() {
                    return p[2] - p[0];
                }
                tangent
            }
            EdgeSegment::Cubic(p) => {
                let tangent = mix(
                    mix(p[1] - p[0], p[2] - p[1], t),
                    mix(p[2] - p[1], p[3] - p[2], t),
                    t,
                );
                if tangent.is_zero() {
                    if t == 0.0 {
                        return p[2] - p[0];
                    }
                    if t == 1.0 {
                        return p[3] - p[1];
                    }
                }
                tangent
            }
        }
    }

    /// Signed distance from `origin` to the curve and the parameter of the
    /// closest point.
    ///
    /// The parameter is extrapolated past `[0, 1]` when an endpoint is
    /// closest, which is what [`EdgeSegment::distance_to_pseudo_distance`]
    /// keys on. Points to the right of the direction of travel are positive.
    pub fn signed_distance(&self, origin: Point2) -> (SignedDistance, f64) {
        match self {
            EdgeSegment::Linear(p) => linear_signed_distance(p, origin),
            EdgeSegment::Quadratic(p) => quadratic_signed_distance(self, p, origin),
            EdgeSegment::Cubic(p) => cubic_signed_distance(self, p, origin),
        }
    }

    /// Replace an endpoint distance with the distance to the edge's tangent
    /// line extended past that endpoint.
    ///
    /// Only applies when `param` lies outside `[0, 1]` and the query sits
    /// beyond the endpoint along the tangent. The result never increases the
    /// magnitude and resets `dot` to zero.
    pub fn distance_to_pseudo_distance(
        &self,
        distance: &mut SignedDistance,
        origin: Point2,
        param: f64,
    ) {
        if param < 0.0 {
            let dir = self.direction(0.0).normalize();
            let aq = origin - self.start();
            let ts = dot(aq, dir);
            if ts < 0.0 {
                let pseudo = cross(aq, dir);
                if pseudo.abs() <= distance.distance.abs() {
                    *distance = SignedDistance::new(pseudo, 0.0);
                }
            }
        } else if param > 1.0 {
            let dir = self.direction(1.0).normalize();
            let bq = origin - self.end();
            let ts = dot(bq, dir);
            if ts > 0.0 {
                let pseudo = cross(bq, dir);
                if pseudo.abs() <= distance.distance.abs() {
                    *distance = SignedDistance::new(pseudo, 0.0);
                }
            }
        }
    }

    /// Split at `t = 1/3` and `t = 2/3` into three curves of the same kind
    /// that together trace the same path.
    pub fn split_in_thirds(&self) -> [EdgeSegment; 3] {
        const THIRD: f64 = 1.0 / 3.0;
        const TWO_THIRDS: f64 = 2.0 / 3.0;

        match self {
            EdgeSegment::Linear(p) => [
                EdgeSegment::Linear([p[0], self.point(THIRD)]),
                EdgeSegment::Linear([self.point(THIRD), self.point(TWO_THIRDS)]),
                EdgeSegment::Linear([self.point(TWO_THIRDS), p[1]]),
            ],
            EdgeSegment::Quadratic(p) => [
                EdgeSegment::Quadratic([p[0], mix(p[0], p[1], THIRD), self.point(THIRD)]),
                EdgeSegment::Quadratic([
                    self.point(THIRD),
                    mix(mix(p[0], p[1], 5.0 / 9.0), mix(p[1], p[2], 4.0 / 9.0), 0.5),
                    self.point(TWO_THIRDS),
                ]),
                EdgeSegment::Quadratic([self.point(TWO_THIRDS), mix(p[1], p[2], TWO_THIRDS), p[2]]),
            ],
            EdgeSegment::Cubic(p) => {
                let first_control = if p[0] == p[1] { p[0] } else { mix(p[0], p[1], THIRD) };
                let last_control = if p[2] == p[3] { p[3] } else { mix(p[2], p[3], TWO_THIRDS) };
                [
                    EdgeSegment::Cubic([
                        p[0],
                        first_control,
                        mix(mix(p[0], p[1], THIRD), mix(p[1], p[2], THIRD), THIRD),
                        self.point(THIRD),
                    ]),
                    EdgeSegment::Cubic([
                        self.point(THIRD),
                        mix(
                            mix(mix(p[0], p[1], THIRD), mix(p[1], p[2], THIRD), THIRD),
                            mix(mix(p[1], p[2], THIRD), mix(p[2], p[3], THIRD), THIRD),
                            TWO_THIRDS,
                        ),
                        mix(
                            mix(mix(p[0], p[1], TWO_THIRDS), mix(p[1], p[2], TWO_THIRDS), TWO_THIRDS),
                            mix(mix(p[1], p[2], TWO_THIRDS), mix(p[2], p[3], TWO_THIRDS), TWO_THIRDS),
                            THIRD,
                        ),
                        self.point(TWO_THIRDS),
                    ]),
                    EdgeSegment::Cubic([
                        self.point(TWO_THIRDS),
                        mix(mix(p[1], p[2], TWO_THIRDS), mix(p[2], p[3], TWO_THIRDS), TWO_THIRDS),
                        last_control,
                        p[3],
                    ]),
                ]
            }
        }
    }

    /// Grow `bounds` to contain the curve, including interior extrema.
    pub fn bounds(&self, bounds: &mut Bounds) {
        match self {
            EdgeSegment::Linear(p) => {
                bounds.include(p[0]);
                bounds.include(p[1]);
            }
            EdgeSegment::Quadratic(p) => {
                bounds.include(p[0]);
                bounds.include(p[2]);
                let bot = (p[1] - p[0]) - (p[2] - p[1]);
                if bot.x != 0.0 {
                    let t = (p[1].x - p[0].x) / bot.x;
                    if t > 0.0 && t < 1.0 {
                        bounds.include(self.point(t));
                    }
                }
                if bot.y != 0.0 {
                    let t = (p[1].y - p[0].y) / bot.y;
                    if t > 0.0 && t < 1.0 {
                        bounds.include(self.point(t));
                    }
                }
            }
            EdgeSegment::Cubic(p) => {
                bounds.include(p[0]);
                bounds.include(p[3]);
                let a0 = p[1] - p[0];
                let a1 = 2.0 * (p[2] - p[1] - a0);
                let a2 = p[3] - 3.0 * p[2] + 3.0 * p[1] - p[0];
                let mut params = [0.0; 3];
                for (a, b, c) in [(a2.x, a1.x, a0.x), (a2.y, a1.y, a0.y)] {
                    let n = solve_quadratic(&mut params, a, b, c).count();
                    for &t in &params[..n] {
                        if t > 0.0 && t < 1.0 {
                            bounds.include(self.point(t));
                        }
                    }
                }
            }
        }
    }
}

/// `num / den`, or zero when the denominator vanishes.
fn safe_param(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

fn linear_signed_distance(p: &[Point2; 2], origin: Point2) -> (SignedDistance, f64) {
    let aq = origin - p[0];
    let ab = p[1] - p[0];
    let param = safe_param(dot(aq, ab), dot(ab, ab));
    let eq = if param > 0.5 { p[1] } else { p[0] } - origin;
    let endpoint_distance = eq.length();
    if param > 0.0 && param < 1.0 {
        let ortho_distance = dot(ab.orthonormal(false, false), aq);
        if ortho_distance.abs() < endpoint_distance {
            return (SignedDistance::new(ortho_distance, 0.0), param);
        }
    }
    let distance = SignedDistance::new(
        non_zero_sign(cross(aq, ab)) * endpoint_distance,
        dot(ab.normalize(), eq.normalize()).abs(),
    );
    (distance, param)
}

/// Shared tail of the curve queries: endpoint hits get an orthogonality
/// tie-breaker, interior hits get zero.
fn finish_curve_distance(
    edge: &EdgeSegment,
    min_distance: f64,
    param: f64,
    origin: Point2,
) -> (SignedDistance, f64) {
    if (0.0..=1.0).contains(&param) {
        return (SignedDistance::new(min_distance, 0.0), param);
    }
    let dot_term = if param < 0.5 {
        dot(edge.direction(0.0).normalize(), (edge.start() - origin).normalize()).abs()
    } else {
        dot(edge.direction(1.0).normalize(), (edge.end() - origin).normalize()).abs()
    };
    (SignedDistance::new(min_distance, dot_term), param)
}

fn quadratic_signed_distance(
    edge: &EdgeSegment,
    p: &[Point2; 3],
    origin: Point2,
) -> (SignedDistance, f64) {
    let qa = p[0] - origin;
    let ab = p[1] - p[0];
    let br = p[2] - p[1] - ab;

    // Stationary points of |B(t) - origin|².
    let a = dot(br, br);
    let b = 3.0 * dot(ab, br);
    let c = 2.0 * dot(ab, ab) + dot(qa, br);
    let d = dot(qa, ab);
    let mut t = [0.0; 3];
    let solutions = solve_cubic(&mut t, a, b, c, d).count();

    let mut ep_dir = edge.direction(0.0);
    let mut min_distance = non_zero_sign(cross(ep_dir, qa)) * qa.length();
    let mut param = -safe_param(dot(qa, ep_dir), dot(ep_dir, ep_dir));
    {
        ep_dir = edge.direction(1.0);
        let distance = (p[2] - origin).length();
        if distance < min_distance.abs() {
            min_distance = non_zero_sign(cross(ep_dir, p[2] - origin)) * distance;
            param = safe_param(dot(origin - p[1], ep_dir), dot(ep_dir, ep_dir));
        }
    }

    for &ti in &t[..solutions] {
        if ti > 0.0 && ti < 1.0 {
            let qe = qa + 2.0 * ti * ab + ti * ti * br;
            let distance = qe.length();
            if distance <= min_distance.abs() {
                min_distance = non_zero_sign(cross(ab + ti * br, qe)) * distance;
                param = ti;
            }
        }
    }

    finish_curve_distance(edge, min_distance, param, origin)
}

fn cubic_signed_distance(
    edge: &EdgeSegment,
    p: &[Point2; 4],
    origin: Point2,
) -> (SignedDistance, f64) {
    let qa = p[0] - origin;
    let ab = p[1] - p[0];
    let br = p[2] - p[1] - ab;
    let az = (p[3] - p[2]) - (p[2] - p[1]) - br;

    let mut ep_dir = edge.direction(0.0);
    let mut min_distance = non_zero_sign(cross(ep_dir, qa)) * qa.length();
    let mut param = -safe_param(dot(qa, ep_dir), dot(ep_dir, ep_dir));
    {
        ep_dir = edge.direction(1.0);
        let distance = (p[3] - origin).length();
        if distance < min_distance.abs() {
            min_distance = non_zero_sign(cross(ep_dir, p[3] - origin)) * distance;
            param = safe_param(dot(ep_dir - (p[3] - origin), ep_dir), dot(ep_dir, ep_dir));
        }
    }

    // The stationary points of a cubic's squared distance form a quintic,
    // so refine a handful of starts with Newton's method instead.
    for i in 0..=CUBIC_SEARCH_STARTS {
        let mut t = i as f64 / CUBIC_SEARCH_STARTS as f64;
        let mut qe = qa + 3.0 * t * ab + 3.0 * t * t * br + t * t * t * az;
        for _ in 0..CUBIC_SEARCH_STEPS {
            let d1 = 3.0 * ab + 6.0 * t * br + 3.0 * t * t * az;
            let d2 = 6.0 * br + 6.0 * t * az;
            let denominator = dot(d1, d1) + dot(qe, d2);
            if denominator == 0.0 {
                break;
            }
            t -= dot(qe, d1) / denominator;
            if t <= 0.0 || t >= 1.0 {
                break;
            }
            qe = qa + 3.0 * t * ab + 3.0 * t * t * br + t * t * t * az;
            let distance = qe.length();
            if distance < min_distance.abs() {
                min_distance = non_zero_sign(cross(d1, qe)) * distance;
                param = t;
            }
        }
    }

    finish_curve_distance(edge, min_distance, param, origin)
}

/// An edge segment with its channel color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub segment: EdgeSegment,
    pub color: EdgeColor,
}

impl Edge {
    pub fn new(segment: EdgeSegment) -> Self {
        Self { segment, color: EdgeColor::Black }
    }

    pub fn with_color(segment: EdgeSegment, color: EdgeColor) -> Self {
        Self { segment, color }
    }

    pub fn signed_distance(&self, origin: Point2) -> (SignedDistance, f64) {
        self.segment.signed_distance(origin)
    }

    pub fn direction(&self, t: f64) -> Vector2 {
        self.segment.direction(t)
    }

    /// Thirds of this edge, each carrying this edge's color.
    pub fn split_in_thirds(&self) -> [Edge; 3] {
        self.segment
            .split_in_thirds()
            .map(|segment| Edge::with_color(segment, self.color))
    }
}

impl From<EdgeSegment> for Edge {
    fn from(segment: EdgeSegment) -> Self {
        Edge::new(segment)
    }
}
