//! Double-precision vector algebra shared by every distance query.
//!
//! All geometry runs in `f64`: a glyph can have dozens of edges and every
//! pixel queries all of them, so single precision accumulates visible error.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A 2D vector or point in shape space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

/// Points and vectors share a representation.
pub type Point2 = Vector2;

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn squared_length(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit vector in the same direction. A zero vector yields `(0, 1)`.
    pub fn normalize(self) -> Vector2 {
        let len = self.length();
        if len == 0.0 {
            return Vector2::new(0.0, 1.0);
        }
        Vector2::new(self.x / len, self.y / len)
    }

    /// Unit vector in the same direction. A zero vector stays `(0, 0)`.
    ///
    /// Not interchangeable with [`Vector2::normalize`]: corner classification
    /// and endpoint tie-breaks depend on which fallback is used.
    pub fn normalize_allow_zero(self) -> Vector2 {
        let len = self.length();
        if len == 0.0 {
            return Vector2::ZERO;
        }
        Vector2::new(self.x / len, self.y / len)
    }

    /// Perpendicular vector of the same length.
    ///
    /// `polarity == true` rotates counter-clockwise, `false` clockwise.
    pub fn orthogonal(self, polarity: bool) -> Vector2 {
        if polarity {
            Vector2::new(-self.y, self.x)
        } else {
            Vector2::new(self.y, -self.x)
        }
    }

    /// Perpendicular unit vector.
    ///
    /// Zero input yields `(0, ±1)`, or `(0, 0)` when `allow_zero` is set.
    pub fn orthonormal(self, polarity: bool, allow_zero: bool) -> Vector2 {
        let len = self.length();
        if len == 0.0 {
            let y = if allow_zero { 0.0 } else { 1.0 };
            return if polarity {
                Vector2::new(0.0, y)
            } else {
                Vector2::new(0.0, -y)
            };
        }
        if polarity {
            Vector2::new(-self.y / len, self.x / len)
        } else {
            Vector2::new(self.y / len, -self.x / len)
        }
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vector2> for f64 {
    type Output = Vector2;
    fn mul(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self * rhs.x, self * rhs.y)
    }
}

/// Component-wise product, used for per-axis scaling.
impl Mul<Vector2> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div<f64> for Vector2 {
    type Output = Vector2;
    fn div(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x / rhs, self.y / rhs)
    }
}

/// Component-wise quotient, used for per-axis unscaling.
impl Div<Vector2> for Vector2 {
    type Output = Vector2;
    fn div(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x / rhs.x, self.y / rhs.y)
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vector2::new(x, y)
    }
}

impl From<kurbo::Point> for Vector2 {
    fn from(p: kurbo::Point) -> Self {
        Vector2::new(p.x, p.y)
    }
}

pub fn dot(a: Vector2, b: Vector2) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Z component of the 3D cross product.
pub fn cross(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Linear interpolation: `a` at `t = 0`, `b` at `t = 1`.
pub fn mix(a: Vector2, b: Vector2, t: f64) -> Vector2 {
    Vector2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Scalar linear interpolation.
pub fn mix_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// `-1` for negative input, `+1` otherwise (including zero).
pub fn non_zero_sign(n: f64) -> f64 {
    if n > 0.0 { 1.0 } else { -1.0 }
}

/// Median of three values.
pub fn median(a: f32, b: f32, c: f32) -> f32 {
    a.min(b).max(a.max(b).min(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_falls_back_to_unit_y() {
        assert_eq!(Vector2::ZERO.normalize(), Vector2::new(0.0, 1.0));
    }

    #[test]
    fn normalize_allow_zero_keeps_zero() {
        assert_eq!(Vector2::ZERO.normalize_allow_zero(), Vector2::ZERO);
    }

    #[test]
    fn normalize_unit_length() {
        let n = Vector2::new(3.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-15);
        assert_eq!(n, Vector2::new(0.6, 0.8));
    }

    #[test]
    fn orthonormal_polarity() {
        let v = Vector2::new(2.0, 0.0);
        assert_eq!(v.orthonormal(true, false), Vector2::new(-0.0, 1.0));
        assert_eq!(v.orthonormal(false, false), Vector2::new(0.0, -1.0));
        assert_eq!(Vector2::ZERO.orthonormal(false, false), Vector2::new(0.0, -1.0));
        assert_eq!(Vector2::ZERO.orthonormal(true, true), Vector2::ZERO);
    }

    #[test]
    fn cross_sign_follows_turn_direction() {
        let right = Vector2::new(1.0, 0.0);
        let up = Vector2::new(0.0, 1.0);
        assert_eq!(cross(right, up), 1.0);
        assert_eq!(cross(up, right), -1.0);
        assert_eq!(dot(right, up), 0.0);
    }

    #[test]
    fn median_of_three() {
        assert_eq!(median(0.1, 0.9, 0.5), 0.5);
        assert_eq!(median(0.9, 0.1, 0.5), 0.5);
        assert_eq!(median(0.5, 0.5, 0.2), 0.5);
        assert_eq!(median(0.3, 0.7, 0.7), 0.7);
    }

    #[test]
    fn mix_endpoints() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, 6.0);
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 1.0), b);
        assert_eq!(mix(a, b, 0.5), Vector2::new(2.0, 4.0));
    }
}
